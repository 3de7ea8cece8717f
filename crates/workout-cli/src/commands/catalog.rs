use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CatalogArgs {
    /// TOML routine file with [[exercise]] tables
    #[arg(long)]
    pub routine: Option<PathBuf>,
    /// Print as JSON
    #[arg(long, conflicts_with = "toml")]
    pub json: bool,
    /// Print as a TOML routine file, ready to edit
    #[arg(long)]
    pub toml: bool,
}

pub fn run(args: CatalogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = super::load_catalog(args.routine.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else if args.toml {
        print!("{}", catalog.to_toml_string()?);
    } else {
        for (i, exercise) in catalog.iter().enumerate() {
            let pair = exercise
                .paired_with
                .as_deref()
                .map(|p| format!(" [paired with {p}]"))
                .unwrap_or_default();
            println!("{:>2}. {} ({}s){}", i + 1, exercise.name, exercise.base_duration, pair);
            println!("    {}", exercise.explanation);
        }
    }
    Ok(())
}

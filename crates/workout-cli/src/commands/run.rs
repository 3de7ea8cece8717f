use std::future::Future;
use std::io::Write;
use std::time::Duration;

use clap::Args;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use workout_core::{
    MutedNotifier, NotificationPort, NotifyResult, PhaseKind, SettingsStore, WallScheduler,
    WorkoutTimer, WorkoutView,
};

use super::WorkoutOpts;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub opts: WorkoutOpts,
    /// Keep the routine order instead of shuffling the middle exercises
    #[arg(long)]
    pub no_shuffle: bool,
    /// Seed for the shuffle, for a reproducible order
    #[arg(long)]
    pub seed: Option<u64>,
    /// Emit one JSON view per change instead of a status line
    #[arg(long)]
    pub json: bool,
}

/// Rings the terminal bell on the cues a speaker would play.
struct TerminalBell;

impl TerminalBell {
    fn ring(&self, times: usize) -> NotifyResult {
        let mut err = std::io::stderr();
        for _ in 0..times {
            err.write_all(b"\x07")?;
        }
        err.flush()?;
        Ok(())
    }
}

impl NotificationPort for TerminalBell {
    fn on_countdown_tick(&mut self, _phase_index: usize, _remaining_secs: u32) -> NotifyResult {
        self.ring(1)
    }

    fn on_phase_start(
        &mut self,
        _phase_index: usize,
        _kind: PhaseKind,
        _duration_secs: u32,
    ) -> NotifyResult {
        self.ring(2)
    }

    fn on_phase_end(&mut self, _phase_index: usize, _kind: PhaseKind) -> NotifyResult {
        self.ring(2)
    }

    fn on_workout_complete(&mut self, _elapsed_secs: u64) -> NotifyResult {
        self.ring(3)
    }
}

type LiveTimer = WorkoutTimer<WallScheduler, MutedNotifier<TerminalBell>>;

/// What a line of keyboard input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    TogglePause,
    Skip,
    GoBack,
    ToggleMute,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "p" | "pause" | "" => Input::TogglePause,
        "s" | "skip" => Input::Skip,
        "b" | "back" => Input::GoBack,
        "m" | "mute" => Input::ToggleMute,
        "q" | "quit" => Input::Quit,
        _ => Input::Unknown,
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store()?;
    let settings = args.opts.settings(&store)?;
    let mut catalog = args.opts.catalog()?;

    if !args.no_shuffle {
        let mut rng = match args.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };
        catalog = catalog.shuffled(&mut rng);
    }

    let notifier = MutedNotifier::new(TerminalBell, store.muted());
    let timer = WorkoutTimer::new(catalog, settings, WallScheduler::new(), notifier);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(async {
        let input = BufReader::new(tokio::io::stdin());
        drive(timer, store, args.json, input, tokio::signal::ctrl_c()).await
    });
    // A pending stdin read must not hold up exit.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

/// Run the workout until it completes, the user quits or `interrupt` resolves.
async fn drive(
    mut timer: LiveTimer,
    mut store: impl SettingsStore,
    json: bool,
    input: impl AsyncBufRead + Unpin,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = input.lines();
    let mut stdin_open = true;
    let mut last_phase = None;
    tokio::pin!(interrupt);

    if !json {
        eprintln!(
            "controls: [enter]/p pause-resume, s skip, b back (while paused), m mute, q quit"
        );
    }
    timer.start();
    render(&timer, json, &mut last_phase)?;

    while !timer.is_complete() {
        let deadline = timer.scheduler().next_deadline();
        let wake = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = wake => {
                timer.run_due();
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match parse_input(&line) {
                        Input::TogglePause => timer.toggle_pause(),
                        Input::Skip => {
                            let kind = timer.phase_kind();
                            timer.skip(kind);
                        }
                        Input::GoBack => {
                            if timer.is_paused() {
                                timer.go_back();
                            } else {
                                eprintln!("\npause first to go back");
                            }
                        }
                        Input::ToggleMute => {
                            let muted = timer.notifier_mut().toggle_mute();
                            if let Err(e) = store.set_muted(muted) {
                                warn!(error = %e, "could not persist mute status");
                            }
                        }
                        Input::Quit => {
                            info!("workout abandoned");
                            break;
                        }
                        Input::Unknown => eprintln!("\nunknown command: {}", line.trim()),
                    },
                    None => stdin_open = false,
                }
            }
            _ = &mut interrupt => {
                info!("interrupted");
                break;
            }
        }

        render(&timer, json, &mut last_phase)?;
    }

    if !json {
        println!();
    }
    Ok(())
}

fn render(
    timer: &LiveTimer,
    json: bool,
    last_phase: &mut Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = WorkoutView::from_timer(timer);
    let phase = view.snapshot.current_phase_index;
    let mut out = std::io::stdout().lock();

    if json {
        writeln!(out, "{}", serde_json::to_string(&view)?)?;
        return Ok(());
    }

    if *last_phase != Some(phase) || view.snapshot.complete {
        if last_phase.is_some() {
            writeln!(out)?;
        }
        if !view.snapshot.complete {
            let explanation = view
                .explanation
                .as_deref()
                .filter(|_| view.snapshot.phase_kind == PhaseKind::Work);
            match explanation {
                Some(explanation) => writeln!(out, "{}\n  {}", view.header_title, explanation)?,
                None => writeln!(out, "{}", view.header_title)?,
            }
        }
        *last_phase = Some(phase);
    }

    write!(
        out,
        "\r\x1b[2K{}  {}  | {} left | {}",
        view.timer_display, view.round_info, view.total_time_remaining, view.pause_button_text
    )?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use workout_core::{ExerciseCatalog, MemoryStore, Settings};

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("p"), Input::TogglePause);
        assert_eq!(parse_input(""), Input::TogglePause);
        assert_eq!(parse_input(" s "), Input::Skip);
        assert_eq!(parse_input("back"), Input::GoBack);
        assert_eq!(parse_input("m"), Input::ToggleMute);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("jump"), Input::Unknown);
    }

    fn live_timer() -> LiveTimer {
        WorkoutTimer::new(
            ExerciseCatalog::default_routine(),
            Settings::default(),
            WallScheduler::new(),
            MutedNotifier::new(TerminalBell, true),
        )
    }

    #[tokio::test]
    async fn interrupt_ends_the_workout() {
        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            drive(live_timer(), MemoryStore::new(), true, &b""[..], async { Ok(()) }),
        )
        .await;
        assert!(matches!(finished, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn interrupt_arriving_later_is_not_lost() {
        // Resolves on its second poll, after the loop has already gone round once.
        let mut polled = false;
        let interrupt = std::future::poll_fn(move |cx| {
            if polled {
                std::task::Poll::Ready(Ok(()))
            } else {
                polled = true;
                cx.waker().wake_by_ref();
                std::task::Poll::Pending
            }
        });
        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            drive(live_timer(), MemoryStore::new(), true, &b""[..], interrupt),
        )
        .await;
        assert!(matches!(finished, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn quit_command_ends_the_workout() {
        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            drive(
                live_timer(),
                MemoryStore::new(),
                true,
                &b"q\n"[..],
                std::future::pending::<std::io::Result<()>>(),
            ),
        )
        .await;
        assert!(matches!(finished, Ok(Ok(()))));
    }
}

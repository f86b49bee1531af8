use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::catalog::load_catalog;
use crate::mpris::ControlCmd;
use crate::output::RodioOutput;
use crate::player::PlaybackController;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();

    if let Err(e) = logging::init_logging(&settings.logging) {
        eprintln!("encore: logging disabled: {e}");
    }
    if let Some(msg) = fallback {
        warn!("{msg}");
        eprintln!("encore: {msg}");
    }

    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Fail before touching the terminal so the error stays readable.
    let catalog = load_catalog(&dir, &settings.tracks, &settings.library)?;
    info!(tracks = catalog.len(), "catalog ready");

    let initial = startup::initial_transport(&settings.playback);
    let (output, output_events) = RodioOutput::spawn(initial.volume);
    let mut player = PlaybackController::new(
        catalog,
        output,
        initial,
        startup::shuffle_rng(settings.playback.seed),
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&settings.ui);

        event_loop::run(
            &mut terminal,
            &settings,
            &mut player,
            &output_events,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::config;
use crate::error::Result as PlaybackResult;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::output::{MediaOutput, OutputEvent, RodioOutput};
use crate::player::PlaybackController;
use crate::runtime::mpris_sync::MprisSync;
use crate::ui::{self, ViewMode, ViewState};

/// Whether the loop keeps going after handling an input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    pub view: ViewState,
    mpris_sync: MprisSync,
}

impl EventLoopState {
    pub fn new(ui_settings: &config::UiSettings) -> Self {
        Self {
            view: ViewState::new(ui_settings.view.into(), 0),
            mpris_sync: MprisSync::default(),
        }
    }
}

/// Main terminal event loop: drains output events, draws, and handles input
/// from the keyboard and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    player: &mut PlaybackController<RodioOutput>,
    events: &Receiver<OutputEvent>,
    mpris: &MprisHandle,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = events.try_recv() {
            player.handle_output_event(ev);
        }

        state.mpris_sync.update(mpris, player);

        terminal.draw(|f| ui::draw(f, &*player, &state.view, &settings.ui, &settings.controls))?;

        let mut flow = Flow::Continue;
        while let Ok(cmd) = control_rx.try_recv() {
            flow = handle_control_cmd(cmd, player);
            if flow == Flow::Quit {
                break;
            }
        }

        if flow == Flow::Continue && event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    flow = handle_key_event(key, settings, player, &mut state.view);
                }
            }
        }

        if flow == Flow::Quit {
            info!("quit requested");
            player
                .output()
                .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(());
        }
    }
}

/// Apply a command that arrived over MPRIS.
pub fn handle_control_cmd<O: MediaOutput>(
    cmd: ControlCmd,
    player: &mut PlaybackController<O>,
) -> Flow {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return Flow::Quit,
        ControlCmd::Play => player.play(),
        // No stopped state: stop is a pause.
        ControlCmd::Pause | ControlCmd::Stop => player.pause(),
        ControlCmd::PlayPause => player.toggle(),
        ControlCmd::Next => player.next(),
        ControlCmd::Prev => player.previous(),
    }
    Flow::Continue
}

/// Apply a key press to the player or the view.
pub fn handle_key_event<O: MediaOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    player: &mut PlaybackController<O>,
    view: &mut ViewState,
) -> Flow {
    let controls = &settings.controls;

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Flow::Quit;
        }
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char(' ') | KeyCode::Char('p') => player.toggle(),
        KeyCode::Char('l') => player.next(),
        KeyCode::Char('h') => player.previous(),
        KeyCode::Char('L') => log_seek(player.seek_by(controls.seek_seconds as f64)),
        KeyCode::Char('H') => log_seek(player.seek_by(-(controls.seek_seconds as f64))),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let tenths = c.to_digit(10).unwrap_or(0);
            log_seek(player.seek_to_fraction(f64::from(tenths) / 10.0));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            player.set_volume(player.transport().volume + controls.volume_step);
        }
        KeyCode::Char('-') => {
            player.set_volume(player.transport().volume - controls.volume_step);
        }
        KeyCode::Char('s') => {
            let shuffled = !player.transport().shuffled;
            player.set_shuffled(shuffled);
        }
        KeyCode::Char('r') => player.cycle_repeat_mode(),
        KeyCode::Char('f') => player.toggle_liked(),
        KeyCode::Char('v') => view.toggle_mode(player.transport().current_index),
        KeyCode::Char('j') | KeyCode::Down if view.mode == ViewMode::Full => {
            view.cursor_down(player.catalog().len());
        }
        KeyCode::Char('k') | KeyCode::Up if view.mode == ViewMode::Full => view.cursor_up(),
        KeyCode::Enter if view.mode == ViewMode::Full => {
            if let Err(e) = player.select_track(view.cursor) {
                warn!(error = %e, "cannot select track under cursor");
            } else {
                player.play();
            }
        }
        _ => {}
    }

    Flow::Continue
}

fn log_seek(result: PlaybackResult<()>) {
    if let Err(e) = result {
        debug!(error = %e, "seek ignored");
    }
}

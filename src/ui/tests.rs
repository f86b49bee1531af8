use super::*;
use crate::catalog::{Catalog, TrackDescriptor};
use crate::output::testing::RecordingOutput;
use crate::output::{OutputEvent, OutputEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::TestBackend};

fn player(n: usize) -> PlaybackController<RecordingOutput> {
    let tracks = (0..n)
        .map(|i| TrackDescriptor {
            title: format!("Song {i}"),
            artist: "Band".to_string(),
            album: Some("Record".to_string()),
            duration_hint: None,
            art: None,
            source: format!("/m/{i}.mp3"),
            display: format!("Band - Song {i}"),
        })
        .collect();
    PlaybackController::new(
        Catalog::new(tracks).unwrap(),
        RecordingOutput::default(),
        TransportState::default(),
        Box::new(StdRng::seed_from_u64(1)),
    )
}

fn render(player: &PlaybackController<RecordingOutput>, view: &ViewState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| {
            draw(
                f,
                player,
                view,
                &UiSettings::default(),
                &ControlsSettings::default(),
            )
        })
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn toggling_into_full_view_moves_cursor_to_current_track() {
    let mut view = ViewState::new(ViewMode::Compact, 0);
    view.toggle_mode(3);
    assert_eq!(view, ViewState::new(ViewMode::Full, 3));

    view.cursor = 1;
    view.toggle_mode(5);
    assert_eq!(view, ViewState::new(ViewMode::Compact, 1));
}

#[test]
fn cursor_stays_inside_catalog() {
    let mut view = ViewState::new(ViewMode::Full, 0);
    view.cursor_up();
    assert_eq!(view.cursor, 0);
    view.cursor_down(2);
    view.cursor_down(2);
    assert_eq!(view.cursor, 1);
}

#[test]
fn view_mode_follows_setting() {
    assert_eq!(ViewMode::from(ViewSetting::Compact), ViewMode::Compact);
    assert_eq!(ViewMode::from(ViewSetting::Full), ViewMode::Full);
}

#[test]
fn controls_text_includes_scrub_seconds() {
    let text = controls_text(7, ViewMode::Compact);
    assert!(text.contains("[H/L] scrub -/+7s"));
    assert!(!text.contains("[enter]"));
    assert!(controls_text(7, ViewMode::Full).contains("[enter] play selected"));
}

#[test]
fn time_text_renders_unknown_as_zero() {
    let unknown = PositionSnapshot::derive(None, None);
    assert_eq!(time_text(&unknown, " / "), "0:00 / 0:00");

    let known = PositionSnapshot::derive(Some(75.0), Some(3723.0));
    assert_eq!(time_text(&known, " of "), "1:15 of 62:03");
}

#[test]
fn volume_text_rounds_to_percent() {
    assert!(volume_text(0.0).ends_with("  0%"));
    assert!(volume_text(0.424).ends_with(" 42%"));
    assert!(volume_text(1.0).ends_with("100%"));
}

#[test]
fn status_text_reflects_transport() {
    let mut t = TransportState::default();
    assert!(status_text(&t).contains("Paused"));
    assert!(status_text(&t).contains("repeat: off"));

    t.is_playing = true;
    t.shuffled = true;
    t.repeat_mode = RepeatMode::One;
    let s = status_text(&t);
    assert!(s.contains("Playing"));
    assert!(s.contains("shuffle: on"));
    assert!(s.contains("repeat: one"));
}

#[test]
fn compact_view_shows_current_track_and_time() {
    let mut p = player(3);
    let generation = p.generation();
    p.handle_output_event(OutputEvent::new(generation, OutputEventKind::DurationKnown(200.0)));
    p.handle_output_event(OutputEvent::new(generation, OutputEventKind::PositionChanged(65.0)));

    let screen = render(&p, &ViewState::new(ViewMode::Compact, 0));
    assert!(screen.contains("Song 0"));
    assert!(screen.contains("Band · Record"));
    assert!(screen.contains("1:05 / 3:20"));
    assert!(!screen.contains("tracks"));
}

#[test]
fn full_view_lists_the_catalog() {
    let p = player(3);
    let screen = render(&p, &ViewState::new(ViewMode::Full, 2));
    assert!(screen.contains("tracks"));
    for i in 0..3 {
        assert!(screen.contains(&format!("Band - Song {i}")));
    }
}

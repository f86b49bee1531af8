//! UI rendering helpers for the terminal user interface.
//!
//! Two presentations of the same player: a small floating **compact** card,
//! and a **full** screen that adds the catalog list. Both read the
//! controller's transport state and position snapshot; neither mutates it.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::config::{ControlsSettings, UiSettings, ViewSetting};
use crate::output::MediaOutput;
use crate::player::{PlaybackController, RepeatMode, TransportState};
use crate::position::{PositionSnapshot, VolumeLevel, format_time};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    // H/L is filled dynamically from config.
    map.insert("0-9", "jump");
    map.insert("+/-", "volume");
    map.insert("s", "shuffle");
    map.insert("r", "repeat");
    map.insert("f", "like");
    map.insert("v", "view");
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("q", "quit");
    map
});

/// Which presentation is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Compact,
    Full,
}

impl From<ViewSetting> for ViewMode {
    fn from(v: ViewSetting) -> Self {
        match v {
            ViewSetting::Compact => Self::Compact,
            ViewSetting::Full => Self::Full,
        }
    }
}

/// Presentation-only state: the active view and the catalog cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub cursor: usize,
}

impl ViewState {
    pub fn new(mode: ViewMode, cursor: usize) -> Self {
        Self { mode, cursor }
    }

    /// Switch view. Entering the full view puts the cursor on `current_index`.
    pub fn toggle_mode(&mut self, current_index: usize) {
        self.mode = match self.mode {
            ViewMode::Compact => {
                self.cursor = current_index;
                ViewMode::Full
            }
            ViewMode::Full => ViewMode::Compact,
        };
    }

    pub fn cursor_down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(seek_seconds: u64, mode: ViewMode) -> String {
    let order: &[&str] = match mode {
        ViewMode::Compact => &["space/p", "h/l", "H/L", "0-9", "+/-", "s", "r", "f", "v", "q"],
        ViewMode::Full => &[
            "j/k", "enter", "space/p", "h/l", "H/L", "0-9", "+/-", "s", "r", "f", "v", "q",
        ],
    };
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", seek_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn time_text(snap: &PositionSnapshot, separator: &str) -> String {
    format!(
        "{}{}{}",
        format_time(snap.position),
        separator,
        format_time(snap.duration)
    )
}

fn volume_text(volume: f32) -> String {
    let icon = match VolumeLevel::from_volume(volume) {
        VolumeLevel::Muted => "🔇",
        VolumeLevel::Low => "🔉",
        VolumeLevel::High => "🔊",
    };
    format!("{} {:>3}%", icon, (volume * 100.0).round() as u32)
}

fn repeat_text(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "repeat: off",
        RepeatMode::All => "repeat: all",
        RepeatMode::One => "repeat: one",
    }
}

fn status_text(t: &TransportState) -> String {
    let state = if t.is_playing { "▶ Playing" } else { "⏸ Paused" };
    let shuffle = if t.shuffled { "shuffle: on" } else { "shuffle: off" };
    [
        state.to_string(),
        shuffle.to_string(),
        repeat_text(t.repeat_mode).to_string(),
        volume_text(t.volume),
    ]
    .join(" • ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

/// Render the entire UI into `frame`.
pub fn draw<O: MediaOutput>(
    frame: &mut Frame,
    player: &PlaybackController<O>,
    view: &ViewState,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    match view.mode {
        ViewMode::Compact => draw_compact(frame, player, ui_settings, controls_settings),
        ViewMode::Full => draw_full(frame, player, view.cursor, ui_settings, controls_settings),
    }
}

fn draw_compact<O: MediaOutput>(
    frame: &mut Frame,
    player: &PlaybackController<O>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(4)])
        .split(area);

    let card = centered_rect_sized(64, 8, chunks[0]);
    frame.render_widget(Clear, card);
    draw_now_playing(frame, card, player, ui_settings);
    draw_footer(frame, chunks[1], controls_settings, ViewMode::Compact);
}

fn draw_full<O: MediaOutput>(
    frame: &mut Frame,
    player: &PlaybackController<O>,
    cursor: usize,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_now_playing(frame, chunks[0], player, ui_settings);
    draw_track_list(frame, chunks[1], player, cursor);
    draw_footer(frame, chunks[2], controls_settings, ViewMode::Full);
}

fn draw_now_playing<O: MediaOutput>(
    frame: &mut Frame,
    area: Rect,
    player: &PlaybackController<O>,
    ui_settings: &UiSettings,
) {
    let block = Block::bordered()
        .title(ui_settings.header_text.as_str())
        .title_alignment(Alignment::Center)
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let transport = player.transport();
    let track = player.current_track();
    let snap = player.position();

    let mut title = vec![Span::from(track.title.as_str()).bold()];
    if transport.liked {
        title.push(Span::from("  ♥").fg(Color::Red));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), rows[0]);

    let mut byline = track.artist.clone();
    if let Some(album) = track.album.as_deref().filter(|a| !a.trim().is_empty()) {
        byline.push_str(" · ");
        byline.push_str(album);
    }
    frame.render_widget(Paragraph::new(byline).italic(), rows[1]);

    let gauge_style = if snap.seekable() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let gauge = Gauge::default()
        .gauge_style(gauge_style)
        .use_unicode(true)
        .ratio(snap.progress_percent() / 100.0)
        .label(time_text(&snap, &ui_settings.time_separator));
    frame.render_widget(gauge, rows[3]);

    frame.render_widget(
        Paragraph::new(status_text(transport)).wrap(Wrap { trim: true }),
        rows[4],
    );
}

fn draw_track_list<O: MediaOutput>(
    frame: &mut Frame,
    area: Rect,
    player: &PlaybackController<O>,
    cursor: usize,
) {
    let catalog = player.catalog();
    let current = player.transport().current_index;

    // Only build ListItems for the visible window, centred on the cursor when possible.
    let total = catalog.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let cursor = cursor.min(total.saturating_sub(1));
    let (start, end, selected_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, cursor)
    } else {
        let half = list_height / 2;
        let mut start = cursor.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, cursor - start)
    };

    let items: Vec<ListItem> = catalog
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(i, track)| {
            let marker = if i == current { "♪ " } else { "  " };
            let item = ListItem::new(format!("{marker}{}", track.display));
            if i == current {
                item.bold()
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected_in_visible));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut Frame, area: Rect, controls_settings: &ControlsSettings, mode: ViewMode) {
    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds, mode))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests;

//! Transport state: what is selected and how it plays, independent of position.

use crate::config::RepeatSetting;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    Off,
    /// Wrap around to the first track.
    All,
    /// Repeat the current track when it ends.
    One,
}

impl RepeatMode {
    /// `Off -> All -> One -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(s: RepeatSetting) -> Self {
        match s {
            RepeatSetting::Off => Self::Off,
            RepeatSetting::All => Self::All,
            RepeatSetting::One => Self::One,
        }
    }
}

/// Transport fields owned by the controller. Handed out read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    pub current_index: usize,
    pub is_playing: bool,
    pub shuffled: bool,
    pub repeat_mode: RepeatMode,
    pub volume: f32,
    pub liked: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            shuffled: false,
            repeat_mode: RepeatMode::Off,
            volume: 1.0,
            liked: false,
        }
    }
}

//! The media-output contract shared by the controller and concrete outputs.
//!
//! Commands go in through [`MediaOutput`]; results come back asynchronously as
//! [`OutputEvent`]s tagged with the [`Generation`] of the load they belong to.

use std::fmt;

/// Monotonically increasing load counter. Events from older loads are stale.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputEventKind {
    /// Current playback position in seconds. May be NaN or negative while loading.
    PositionChanged(f64),
    /// Total duration in seconds, once the source knows it.
    DurationKnown(f64),
    /// The source played to its end.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputEvent {
    pub generation: Generation,
    pub kind: OutputEventKind,
}

impl OutputEvent {
    pub fn new(generation: Generation, kind: OutputEventKind) -> Self {
        Self { generation, kind }
    }
}

/// Transport requests understood by a media output.
///
/// All calls are fire-and-forget: effects are observed only through later
/// events, never through return values.
pub trait MediaOutput {
    /// Start preparing `source`. Everything emitted afterwards carries `generation`.
    fn load(&mut self, source: &str, generation: Generation);
    fn play(&mut self);
    fn pause(&mut self);
    /// Move to `seconds` from the start of the current source.
    fn seek(&mut self, seconds: f64);
    /// Output level in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);
}

#[derive(Debug)]
pub(super) enum OutputCmd {
    Load { source: String, generation: Generation },
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

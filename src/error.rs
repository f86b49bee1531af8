//! Error types for the playback core.
//!
//! All of these are local, recoverable conditions. Callers are expected to
//! prevent most of them (disable controls at boundaries, grey out the seek bar
//! while the duration is unknown) but the core still fails safely.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// A track index outside `[0, len)` was requested.
    #[error("track index {index} out of range (catalog has {len} tracks)")]
    OutOfRange { index: usize, len: usize },

    /// A catalog entry failed validation.
    #[error("invalid track at position {index}: {reason}")]
    InvalidTrack { index: usize, reason: String },

    /// The catalog has no entries.
    #[error("catalog is empty")]
    EmptyCatalog,

    /// Seeking was requested before the source reported its duration.
    #[error("seek unavailable: duration not known yet")]
    SeekUnavailable,
}

pub type Result<T> = std::result::Result<T, PlaybackError>;

//! Position reporting: turns raw, possibly-garbage position and duration
//! signals into a snapshot that is always safe to render.
//!
//! Unknown values are `None` all the way up to the render boundary, where
//! [`format_time`] and [`PositionSnapshot::progress_percent`] coerce them.

use crate::error::{PlaybackError, Result};

/// Derived view of playback progress. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionSnapshot {
    pub position: Option<f64>,
    pub duration: Option<f64>,
    pub progress: Option<f64>,
}

impl PositionSnapshot {
    /// Pure derivation of the snapshot from the last known readings.
    pub fn derive(position: Option<f64>, duration: Option<f64>) -> Self {
        let progress = match (position, duration) {
            (Some(p), Some(d)) if d > 0.0 => Some((p / d).clamp(0.0, 1.0)),
            _ => None,
        };
        Self {
            position,
            duration,
            progress,
        }
    }

    /// Progress in percent for gauges; unknown renders as 0.
    pub fn progress_percent(&self) -> f64 {
        self.progress.unwrap_or(0.0) * 100.0
    }

    /// Whether a seek bar should accept input.
    pub fn seekable(&self) -> bool {
        self.duration.is_some()
    }
}

/// Normalizes the output's asynchronous position/duration signals.
#[derive(Debug, Default, Clone)]
pub struct PositionReporter {
    position: Option<f64>,
    duration: Option<f64>,
}

fn valid(secs: f64) -> Option<f64> {
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

impl PositionReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; a new source is loading.
    pub fn reset(&mut self) {
        self.position = None;
        self.duration = None;
    }

    /// Back to the start of the same source; the duration stays known.
    pub fn rewind(&mut self) {
        self.position = Some(0.0);
    }

    /// Record a position reading. Garbage keeps the previous valid value.
    pub fn on_position_changed(&mut self, secs: f64) {
        if let Some(p) = valid(secs) {
            self.position = Some(p);
        }
    }

    /// Record the source duration once it is finite and non-negative.
    pub fn on_duration_known(&mut self, secs: f64) {
        if let Some(d) = valid(secs) {
            self.duration = Some(d);
        }
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot::derive(self.position, self.duration)
    }

    /// Resolve a seek to `fraction` of the duration, returning the target seconds.
    ///
    /// Fails with `SeekUnavailable` until the duration is known. The fraction
    /// is clamped to `[0, 1]`, NaN counting as 0.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<f64> {
        let duration = self.duration.ok_or(PlaybackError::SeekUnavailable)?;
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = duration * fraction;
        self.position = Some(target);
        Ok(target)
    }
}

/// Volume bands matching the three speaker icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeLevel {
    Muted,
    Low,
    High,
}

impl VolumeLevel {
    pub fn from_volume(volume: f32) -> Self {
        if volume <= 0.0 {
            Self::Muted
        } else if volume < 0.5 {
            Self::Low
        } else {
            Self::High
        }
    }
}

/// Format seconds as `m:ss`. Unknown or invalid values render as `0:00`.
pub fn format_time(secs: Option<f64>) -> String {
    let Some(secs) = secs.and_then(valid) else {
        return "0:00".to_string();
    };
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

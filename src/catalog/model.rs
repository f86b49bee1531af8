use std::ops::Index;
use std::time::Duration;

use crate::error::{PlaybackError, Result};

/// A single playable entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDescriptor {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    /// Advisory only. The authoritative duration comes from the output once loaded.
    pub duration_hint: Option<Duration>,
    /// Album art reference (path or URL).
    pub art: Option<String>,
    /// Media source reference handed to the output on load.
    pub source: String,
    /// Label used in lists and the status line.
    pub display: String,
}

/// Ordered, validated list of tracks. Never empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<TrackDescriptor>,
}

impl Catalog {
    /// Validate `tracks` and build a catalog from them, preserving their order.
    pub fn new(tracks: Vec<TrackDescriptor>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyCatalog);
        }

        for (index, track) in tracks.iter().enumerate() {
            if track.source.trim().is_empty() {
                return Err(PlaybackError::InvalidTrack {
                    index,
                    reason: "empty source".to_string(),
                });
            }
        }

        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackDescriptor> {
        self.tracks.iter()
    }
}

impl Index<usize> for Catalog {
    type Output = TrackDescriptor;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tracks[index]
    }
}

/// Convert a configured duration in seconds into a hint, rejecting garbage.
pub(crate) fn duration_hint_from_secs(index: usize, secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(PlaybackError::InvalidTrack {
            index,
            reason: format!("duration must be a finite, non-negative number (got {secs})"),
        });
    }
    Ok(Duration::from_secs_f64(secs))
}

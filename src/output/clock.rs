//! Per-source bookkeeping for the audio thread's periodic poll.

use std::time::Duration;

use super::types::{Generation, OutputEvent, OutputEventKind};

/// Tracks what the audio thread has already reported for the loaded source.
#[derive(Debug, Default)]
pub(super) struct SourceClock {
    pub generation: Generation,
    /// Offset added to the sink position after a rebuild with `skip_duration`.
    pub base_offset: Duration,
    pub playing: bool,
    ended_reported: bool,
}

impl SourceClock {
    pub fn loaded(generation: Generation) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    /// A seek resets end detection so a drained source can be replayed.
    pub fn seeked(&mut self, base_offset: Duration) {
        self.base_offset = base_offset;
        self.ended_reported = false;
    }

    /// Decide what to publish for one poll of the sink.
    ///
    /// `drained` is whether the sink has run out of audio, `sink_pos` its own
    /// position counter.
    pub fn tick(&mut self, drained: bool, sink_pos: Duration) -> Option<OutputEvent> {
        if !self.playing || self.ended_reported {
            return None;
        }
        let kind = if drained {
            self.ended_reported = true;
            OutputEventKind::Ended
        } else {
            OutputEventKind::PositionChanged((self.base_offset + sink_pos).as_secs_f64())
        };
        Some(OutputEvent::new(self.generation, kind))
    }
}

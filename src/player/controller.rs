use rand::RngCore;
use tracing::{debug, info, trace};

use crate::catalog::{Catalog, TrackDescriptor};
use crate::error::{PlaybackError, Result};
use crate::output::{Generation, MediaOutput, OutputEvent, OutputEventKind};
use crate::position::{PositionReporter, PositionSnapshot};

use super::order::{self, Direction};
use super::transport::{RepeatMode, TransportState};

/// Owns transport state and drives a [`MediaOutput`].
///
/// Every method runs to completion before the next one starts; there is no
/// locking because the controller lives on a single event-loop thread.
pub struct PlaybackController<O: MediaOutput> {
    catalog: Catalog,
    state: TransportState,
    output: O,
    reporter: PositionReporter,
    generation: Generation,
    rng: Box<dyn RngCore + Send>,
}

impl<O: MediaOutput> PlaybackController<O> {
    /// Mount a controller on `catalog`: index 0, paused, first source loaded.
    ///
    /// `initial` supplies shuffle, repeat mode, volume and liked defaults; its
    /// index and playing flag are ignored.
    pub fn new(
        catalog: Catalog,
        mut output: O,
        initial: TransportState,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let state = TransportState {
            current_index: 0,
            is_playing: false,
            volume: clamp_volume(initial.volume).unwrap_or(1.0),
            ..initial
        };
        output.set_volume(state.volume);

        let mut controller = Self {
            catalog,
            state,
            output,
            reporter: PositionReporter::new(),
            generation: Generation::default(),
            rng,
        };
        controller.load_current();
        controller
    }

    pub fn transport(&self) -> &TransportState {
        &self.state
    }

    pub fn position(&self) -> PositionSnapshot {
        self.reporter.snapshot()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_track(&self) -> &TrackDescriptor {
        &self.catalog[self.state.current_index]
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn play(&mut self) {
        if self.state.is_playing {
            return;
        }
        self.output.play();
        self.state.is_playing = true;
    }

    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.output.pause();
        self.state.is_playing = false;
    }

    pub fn toggle(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Switch to `index`. Playback continues on the new source if it was running.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        let len = self.catalog.len();
        if index >= len {
            return Err(PlaybackError::OutOfRange { index, len });
        }
        self.switch_to(index);
        Ok(())
    }

    /// Advance and start playing, whatever the previous state.
    pub fn next(&mut self) {
        self.step(Direction::Forward);
    }

    /// Retreat and start playing, whatever the previous state.
    pub fn previous(&mut self) {
        self.step(Direction::Backward);
    }

    /// Takes effect on the next `next()`/`previous()`; nothing is reordered.
    pub fn set_shuffled(&mut self, shuffled: bool) {
        self.state.shuffled = shuffled;
    }

    pub fn cycle_repeat_mode(&mut self) {
        self.state.repeat_mode = self.state.repeat_mode.cycled();
    }

    /// Clamp `volume` into `[0, 1]` and apply it. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            debug!("ignoring NaN volume");
            return;
        };
        self.state.volume = volume;
        self.output.set_volume(volume);
    }

    pub fn toggle_liked(&mut self) {
        self.state.liked = !self.state.liked;
    }

    /// Seek to `fraction` of the current source. Needs a known duration.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<()> {
        let target = self.reporter.seek_to_fraction(fraction)?;
        self.output.seek(target);
        Ok(())
    }

    /// Scrub by `delta` seconds relative to the current position.
    pub fn seek_by(&mut self, delta: f64) -> Result<()> {
        let snap = self.reporter.snapshot();
        let duration = snap.duration.ok_or(PlaybackError::SeekUnavailable)?;
        if duration <= 0.0 {
            return self.seek_to_fraction(0.0);
        }
        let target = snap.position.unwrap_or(0.0) + delta;
        self.seek_to_fraction(target / duration)
    }

    /// The current source played to its end.
    pub fn on_track_ended(&mut self) {
        match self.state.repeat_mode {
            RepeatMode::One => {
                self.reporter.rewind();
                self.output.seek(0.0);
                self.output.play();
                self.state.is_playing = true;
            }
            RepeatMode::Off if self.at_end_of_catalog() => {
                info!("end of catalog reached; stopping");
                self.pause();
                self.switch_to(0);
            }
            RepeatMode::Off | RepeatMode::All => self.next(),
        }
    }

    /// Apply an event from the output, dropping it if it belongs to an older load.
    pub fn handle_output_event(&mut self, event: OutputEvent) {
        if event.generation != self.generation {
            trace!(
                stale = %event.generation,
                current = %self.generation,
                "dropping stale output event"
            );
            return;
        }
        match event.kind {
            OutputEventKind::PositionChanged(secs) => self.reporter.on_position_changed(secs),
            OutputEventKind::DurationKnown(secs) => self.reporter.on_duration_known(secs),
            OutputEventKind::Ended => self.on_track_ended(),
        }
    }

    /// With shuffle on there is no last track, unless there is only one.
    fn at_end_of_catalog(&self) -> bool {
        let len = self.catalog.len();
        (!self.state.shuffled || len == 1) && order::wraps_forward(self.state.current_index, len)
    }

    fn step(&mut self, direction: Direction) {
        let index = order::step(
            self.state.current_index,
            self.catalog.len(),
            self.state.shuffled,
            direction,
            self.rng.as_mut(),
        );
        self.switch_to(index);
        self.play();
    }

    fn switch_to(&mut self, index: usize) {
        self.state.current_index = index;
        self.load_current();
        if self.state.is_playing {
            self.output.play();
        }
    }

    fn load_current(&mut self) {
        self.generation = self.generation.next();
        self.reporter.reset();
        let track = &self.catalog[self.state.current_index];
        debug!(
            index = self.state.current_index,
            generation = %self.generation,
            title = %track.title,
            "loading track"
        );
        self.output.load(&track.source, self.generation);
    }
}

fn clamp_volume(volume: f32) -> Option<f32> {
    (!volume.is_nan()).then(|| volume.clamp(0.0, 1.0))
}

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use super::thread::spawn_audio_thread;
use super::types::{Generation, MediaOutput, OutputCmd, OutputEvent};

/// Media output backed by `rodio`, driven from a dedicated audio thread.
pub struct RodioOutput {
    tx: Sender<OutputCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioOutput {
    /// Spawn the audio thread. Events are delivered on the returned receiver.
    pub fn spawn(initial_volume: f32) -> (Self, Receiver<OutputEvent>) {
        let (tx, rx) = mpsc::channel::<OutputCmd>();
        let (event_tx, event_rx) = mpsc::channel::<OutputEvent>();

        let handle = spawn_audio_thread(rx, event_tx, initial_volume);

        let output = Self {
            tx,
            join: Mutex::new(Some(handle)),
        };
        (output, event_rx)
    }

    fn send(&self, cmd: OutputCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(cmd = ?e.0, "audio thread is gone; dropping command");
        }
    }

    /// Fade out, stop the audio thread and wait for it.
    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(OutputCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaOutput for RodioOutput {
    fn load(&mut self, source: &str, generation: Generation) {
        self.send(OutputCmd::Load {
            source: source.to_string(),
            generation,
        });
    }

    fn play(&mut self) {
        self.send(OutputCmd::Play);
    }

    fn pause(&mut self) {
        self.send(OutputCmd::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.send(OutputCmd::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(OutputCmd::SetVolume(volume));
    }
}

//! Recording fake for controller-level tests.

use super::{Generation, MediaOutput};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String, Generation),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
}

#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub calls: Vec<Call>,
}

impl MediaOutput for RecordingOutput {
    fn load(&mut self, source: &str, generation: Generation) {
        self.calls.push(Call::Load(source.to_string(), generation));
    }
    fn play(&mut self) {
        self.calls.push(Call::Play);
    }
    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }
    fn seek(&mut self, seconds: f64) {
        self.calls.push(Call::Seek(seconds));
    }
    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::SetVolume(volume));
    }
}

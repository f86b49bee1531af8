use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::PlaybackSettings;
use crate::player::TransportState;

/// Startup transport defaults from `[playback]`.
pub fn initial_transport(playback: &PlaybackSettings) -> TransportState {
    TransportState {
        shuffled: playback.shuffle,
        repeat_mode: playback.repeat.into(),
        volume: playback.volume,
        ..TransportState::default()
    }
}

/// Generator for shuffled next/previous. Seeded runs are reproducible.
pub fn shuffle_rng(seed: Option<u64>) -> Box<dyn RngCore + Send> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_entropy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepeatSetting;
    use crate::player::RepeatMode;

    #[test]
    fn playback_settings_seed_transport() {
        let playback = PlaybackSettings {
            shuffle: true,
            repeat: RepeatSetting::One,
            volume: 0.3,
            seed: None,
        };
        let t = initial_transport(&playback);
        assert!(t.shuffled);
        assert_eq!(t.repeat_mode, RepeatMode::One);
        assert_eq!(t.volume, 0.3);
        assert_eq!(t.current_index, 0);
        assert!(!t.is_playing);
        assert!(!t.liked);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = shuffle_rng(Some(42));
        let mut b = shuffle_rng(Some(42));
        let xs: Vec<u64> = (0..4).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.next_u64()).collect();
        assert_eq!(xs, ys);
    }
}

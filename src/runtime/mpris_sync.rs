use crate::mpris::MprisHandle;
use crate::output::MediaOutput;
use crate::player::{PlaybackController, TransportState};

/// What was last pushed to MPRIS, so unchanged frames publish nothing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MprisSync {
    last: Option<Published>,
}

#[derive(Debug, Clone, PartialEq)]
struct Published {
    transport: TransportState,
    duration: Option<f64>,
}

impl MprisSync {
    /// Publish the player's state if it changed since the last call.
    ///
    /// Returns whether anything was published.
    pub fn update<O: MediaOutput>(
        &mut self,
        mpris: &MprisHandle,
        player: &PlaybackController<O>,
    ) -> bool {
        let now = Published {
            transport: player.transport().clone(),
            duration: player.position().duration,
        };
        if self.last.as_ref() == Some(&now) {
            return false;
        }

        let index = now.transport.current_index;
        mpris.set_track_metadata(Some((index, player.current_track())), now.duration);
        mpris.set_transport(&now.transport);
        self.last = Some(now);
        true
    }
}

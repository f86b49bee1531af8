//! Playback controller: transport state plus the rules for moving between
//! tracks and modes.
//!
//! The controller is the only writer of [`TransportState`]. It talks to the
//! audio side exclusively through [`crate::output::MediaOutput`] and consumes
//! that side's events through `handle_output_event`.

mod controller;
mod order;
mod transport;

pub use controller::PlaybackController;
pub use transport::{RepeatMode, TransportState};

//! Media output: the contract the controller drives, and a rodio implementation.
//!
//! The rodio output runs on its own thread. It receives commands over a
//! channel and publishes generation-tagged position, duration and
//! end-of-media events back.

mod clock;
mod rodio_output;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use rodio_output::RodioOutput;
pub use types::{Generation, MediaOutput, OutputEvent, OutputEventKind};

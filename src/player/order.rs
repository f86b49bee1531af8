//! Index selection for next/previous.
//!
//! Unshuffled, the catalog is a circular queue. Shuffled, a random index other
//! than the current one is drawn; the catalog itself is never reordered.

use rand::{Rng, RngCore};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Index `next()` (forward) or `previous()` (backward) should move to.
pub fn step(
    current: usize,
    len: usize,
    shuffled: bool,
    direction: Direction,
    rng: &mut dyn RngCore,
) -> usize {
    debug_assert!(len > 0 && current < len);
    if shuffled {
        return random_other(current, len, rng);
    }
    match direction {
        Direction::Forward => (current + 1) % len,
        Direction::Backward => (current + len - 1) % len,
    }
}

/// Whether an unshuffled forward step from `current` wraps to the start.
pub fn wraps_forward(current: usize, len: usize) -> bool {
    current + 1 >= len
}

fn random_other(current: usize, len: usize, rng: &mut dyn RngCore) -> usize {
    if len <= 1 {
        return 0;
    }
    // Draw from the other len - 1 slots and skip over `current`.
    let pick = rng.gen_range(0..len - 1);
    if pick >= current { pick + 1 } else { pick }
}

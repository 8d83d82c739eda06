//! Gesture buffers between the platform shell and the simulation
//!
//! The shell pushes abstract taps and swipes as they are recognized; the
//! frame loop drains them exactly once per tick into a [`TickInput`].

use crate::sim::{Swipe, Tap};

/// Buffered gestures awaiting the next tick. Consuming drains the buffer,
/// so a gesture can never be applied twice.
#[derive(Debug, Default)]
pub struct InputQueue {
    taps: Vec<Tap>,
    swipes: Vec<Swipe>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_tap(&mut self, tap: Tap) {
        self.taps.push(tap);
    }

    pub fn push_swipe(&mut self, swipe: Swipe) {
        self.swipes.push(swipe);
    }

    /// Take all pending taps, leaving the buffer empty
    pub fn consume_taps(&mut self) -> Vec<Tap> {
        std::mem::take(&mut self.taps)
    }

    /// Take all pending swipes, leaving the buffer empty
    pub fn consume_swipes(&mut self) -> Vec<Swipe> {
        std::mem::take(&mut self.swipes)
    }
}

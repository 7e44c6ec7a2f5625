use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical keys the simulation reads. The windowing layer is responsible
/// for mapping physical key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    /// Jump-charge key (crouch while held, jump on release).
    Jump,
    Confirm,
}

/// Input sampled for a single simulation tick, with edge detection.
///
/// `pressed` and `released` are true for exactly one tick; `held` reflects
/// the raw key state for the tick.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
}

impl InputFrame {
    /// A frame with no keys down. Useful for idle ticks in tests.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }
}

/// Builds per-tick [`InputFrame`]s from raw held-key sets, computing
/// press/release edges against the previous tick.
#[derive(Debug, Default)]
pub struct InputTracker {
    prev_held: HashSet<Key>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the frame for one tick given the keys currently down.
    pub fn frame(&mut self, held: &HashSet<Key>) -> InputFrame {
        let pressed = held.difference(&self.prev_held).copied().collect();
        let released = self.prev_held.difference(held).copied().collect();
        self.prev_held = held.clone();
        InputFrame {
            held: held.clone(),
            pressed,
            released,
        }
    }
}

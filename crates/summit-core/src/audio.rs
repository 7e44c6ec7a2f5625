use serde::{Deserialize, Serialize};

/// Fire-and-forget sound cues raised by the simulation. The session
/// collects these during a tick and returns them from `update`; playback
/// is the caller's concern and nothing in the simulation depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEvent {
    Jump,
    Landing,
    WallBump,
    Bounce,
}

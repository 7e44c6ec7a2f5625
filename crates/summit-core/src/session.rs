use crate::audio::SoundEvent;
use crate::input::InputFrame;

/// Contract between a simulation and the external game-loop driver.
///
/// The driver calls `update` once per tick with the elapsed time and the
/// sampled input; the simulation never blocks or suspends within a tick.
pub trait Session {
    /// Advance the simulation by one tick. Returns the sound cues raised
    /// during the tick.
    fn update(&mut self, dt: f32, input: &InputFrame) -> Vec<SoundEvent>;

    /// Serialize the full session state.
    fn snapshot(&self) -> Vec<u8>;

    /// Replace session state with a previously taken snapshot. Malformed
    /// bytes are ignored.
    fn restore(&mut self, bytes: &[u8]);

    /// Freeze the simulation; paused ticks are no-ops.
    fn pause(&mut self);

    fn resume(&mut self);

    /// Nominal tick rate in Hz. The driver may use fixed or variable
    /// timesteps; the simulation must be deterministic for any dt sequence.
    fn tick_rate(&self) -> f32 {
        60.0
    }
}

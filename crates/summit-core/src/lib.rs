pub mod animation;
pub mod audio;
pub mod input;
pub mod save;
pub mod session;
pub mod vec2;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashSet;

    use crate::audio::SoundEvent;
    use crate::input::{InputFrame, Key};
    use crate::session::Session;

    /// Build a held-key set from a slice.
    pub fn keys(ks: &[Key]) -> HashSet<Key> {
        ks.iter().copied().collect()
    }

    /// Run `n` ticks with the same input frame, returning all sound events.
    pub fn run_ticks(
        session: &mut dyn Session,
        n: usize,
        dt: f32,
        input: &InputFrame,
    ) -> Vec<SoundEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(session.update(dt, input));
        }
        events
    }

    // ================================================================
    // Session Contract Tests
    // ================================================================
    // A generic suite every Session implementation must pass. Simulation
    // crates call these from their own #[cfg(test)] modules.

    /// update() with dt>0 must change the serialized state.
    pub fn contract_update_advances_state(session: &mut dyn Session) {
        let before = session.snapshot();
        session.update(0.1, &InputFrame::empty());
        let after = session.snapshot();
        assert_ne!(before, after, "update(dt>0) must advance session state");
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(session: &mut dyn Session) {
        session.pause();
        let before = session.snapshot();
        session.update(0.5, &InputFrame::empty());
        let during_pause = session.snapshot();
        assert_eq!(before, during_pause, "State must not change while paused");

        session.resume();
        session.update(0.5, &InputFrame::empty());
        let after_resume = session.snapshot();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// snapshot → restore roundtrip must be stable.
    pub fn contract_snapshot_roundtrip_stable(session: &mut dyn Session) {
        let a = session.snapshot();
        session.restore(&a);
        let b = session.snapshot();
        session.restore(&b);
        let c = session.snapshot();
        assert_eq!(b, c, "State must be stable after snapshot→restore roundtrip");
    }
}

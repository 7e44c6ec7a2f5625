use serde::{Deserialize, Serialize};
use summit_core::animation::Animation;
use summit_core::vec2::Vec2;

use crate::config::PhysicsConfig;
use crate::states;

/// Player hitbox width in pixels. Height varies by state for sprite
/// alignment; see the per-state constants in `states`.
pub const PLAYER_WIDTH: f32 = 16.0;

/// Which of the pre-built animations is currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    Idle,
    Walk,
    Jump,
    Fall,
    Land,
    Crouch,
}

/// The player's pre-built animations. States swap which one is current;
/// only the current one advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSet {
    idle: Animation,
    walk: Animation,
    jump: Animation,
    fall: Animation,
    land: Animation,
    crouch: Animation,
    current: AnimationKind,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self {
            idle: Animation::new(4, 0.25),
            walk: Animation::new(6, 0.07),
            jump: Animation::new(3, 0.2),
            fall: Animation::new(2, 0.15),
            land: Animation::new(4, 0.1),
            crouch: Animation::new(2, 0.15),
            current: AnimationKind::Idle,
        }
    }
}

impl AnimationSet {
    pub fn play(&mut self, kind: AnimationKind) {
        self.current = kind;
    }

    /// Swap to `kind` and clear its play count. Used by Landing, which
    /// gates its exit on one full cycle.
    pub fn restart(&mut self, kind: AnimationKind) {
        self.current = kind;
        self.current_mut().reset();
    }

    pub fn current_kind(&self) -> AnimationKind {
        self.current
    }

    pub fn current(&self) -> &Animation {
        match self.current {
            AnimationKind::Idle => &self.idle,
            AnimationKind::Walk => &self.walk,
            AnimationKind::Jump => &self.jump,
            AnimationKind::Fall => &self.fall,
            AnimationKind::Land => &self.land,
            AnimationKind::Crouch => &self.crouch,
        }
    }

    fn current_mut(&mut self) -> &mut Animation {
        match self.current {
            AnimationKind::Idle => &mut self.idle,
            AnimationKind::Walk => &mut self.walk,
            AnimationKind::Jump => &mut self.jump,
            AnimationKind::Fall => &mut self.fall,
            AnimationKind::Land => &mut self.land,
            AnimationKind::Crouch => &mut self.crouch,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.current_mut().update(dt);
    }
}

/// The player's physical state. Per-frame behavior is delegated to the
/// active state in the state machine; the collision resolver mutates
/// position, velocity, and `is_on_ground` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub dimensions: Vec2,
    pub velocity: Vec2,
    pub facing_right: bool,
    /// True only immediately after a downward collision resolved this tick.
    pub is_on_ground: bool,
    pub is_sliding: bool,
    pub is_sticky: bool,
    pub is_bouncing: bool,
    /// Seconds elapsed in the current jump's ascent.
    pub jump_time: f32,
    /// Total jumps taken; persists across saves.
    pub hop_count: u32,
    /// Y position recorded when falling began; sizes the bounce boost.
    pub fall_height: f32,
    pub animations: AnimationSet,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            dimensions: Vec2::new(PLAYER_WIDTH, states::IDLE_HEIGHT),
            velocity: Vec2::ZERO,
            facing_right: true,
            is_on_ground: false,
            is_sliding: false,
            is_sticky: false,
            is_bouncing: false,
            jump_time: 0.0,
            hop_count: 0,
            fall_height: y,
            animations: AnimationSet::default(),
        }
    }

    /// Accelerate downward while airborne, clamped to terminal speed.
    pub fn apply_gravity(&mut self, dt: f32, physics: &PhysicsConfig) {
        if !self.is_on_ground {
            self.velocity.y =
                (self.velocity.y + physics.gravity * dt).min(physics.max_fall_speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_clamps_at_max_fall_speed() {
        let physics = PhysicsConfig::default();
        let mut player = Player::new(0.0, 0.0);
        for _ in 0..20 {
            player.apply_gravity(1.0 / 60.0, &physics);
        }
        assert_eq!(player.velocity.y, physics.max_fall_speed);
    }

    #[test]
    fn gravity_skipped_on_ground() {
        let physics = PhysicsConfig::default();
        let mut player = Player::new(0.0, 0.0);
        player.is_on_ground = true;
        player.apply_gravity(0.1, &physics);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn only_current_animation_advances() {
        let mut set = AnimationSet::default();
        set.play(AnimationKind::Walk);
        set.update(0.07);
        assert_eq!(set.current().current_frame(), 1);
        set.play(AnimationKind::Idle);
        assert_eq!(set.current().current_frame(), 0);
    }
}

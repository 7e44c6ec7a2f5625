//! The player state machine: six mutually exclusive behavior states with
//! enter/update/exit logic. Every tick runs the shared physics step
//! (gravity, axis-separated integration and collision, pixel rounding)
//! before the active state's own logic, and performs at most one
//! transition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use summit_core::audio::SoundEvent;
use summit_core::input::{InputFrame, Key};

use crate::collision;
use crate::config::ClimbConfig;
use crate::map::TileMap;
use crate::player::{AnimationKind, Player};

// Per-state hitbox heights and sprite-alignment offsets, in pixels.
// Values carry over from the 0.75-scaled sprite sheet.
pub(crate) const IDLE_HEIGHT: f32 = 30.0;
pub(crate) const WALK_HEIGHT: f32 = 33.0;
pub(crate) const CROUCH_HEIGHT: f32 = 21.75;
pub(crate) const LAND_HEIGHT: f32 = 43.0;
pub(crate) const FALL_GROWTH: f32 = 2.0;
pub(crate) const WALK_NUDGE: f32 = 5.0;
pub(crate) const LAND_NUDGE: f32 = 10.0;
/// Upward position correction applied when leaving the crouch, so the
/// restored hitbox does not start embedded in the ground.
pub(crate) const CROUCH_RISE: f32 = 5.0;
/// Small downward velocity while crouching to hold ground contact.
pub(crate) const CROUCH_SETTLE_VY: f32 = 1.0;
/// Horizontal speeds below this snap to exactly zero to prevent drift.
pub(crate) const VELOCITY_EPSILON: f32 = 0.1;

/// Name of a player state, used for persistence and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStateName {
    Idling,
    Walking,
    Crouching,
    Jumping,
    Falling,
    Landing,
}

impl fmt::Display for PlayerStateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerStateName::Idling => "idling",
            PlayerStateName::Walking => "walking",
            PlayerStateName::Crouching => "crouching",
            PlayerStateName::Jumping => "jumping",
            PlayerStateName::Falling => "falling",
            PlayerStateName::Landing => "landing",
        };
        f.write_str(name)
    }
}

/// A state name outside the closed state set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStateName(pub String);

impl fmt::Display for UnknownStateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown player state name `{}`", self.0)
    }
}

impl std::error::Error for UnknownStateName {}

impl FromStr for PlayerStateName {
    type Err = UnknownStateName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idling" => Ok(PlayerStateName::Idling),
            "walking" => Ok(PlayerStateName::Walking),
            "crouching" => Ok(PlayerStateName::Crouching),
            "jumping" => Ok(PlayerStateName::Jumping),
            "falling" => Ok(PlayerStateName::Falling),
            "landing" => Ok(PlayerStateName::Landing),
            other => Err(UnknownStateName(other.to_string())),
        }
    }
}

/// The active state plus its per-state data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerState {
    Idling,
    Walking,
    Crouching {
        /// Seconds the charge key has been held, clamped to `charge_time`.
        charge_time: f32,
        /// Last held horizontal direction: -1, 0, or 1.
        last_direction: i8,
        /// Y position on crouch entry, restored (minus the rise) at jump.
        origin_y: f32,
    },
    Jumping {
        /// Initial upward impulse (negative), decayed over the jump window.
        charged_height: f32,
    },
    Falling,
    Landing {
        /// X position before the sprite-alignment nudge, restored on exit.
        origin_x: f32,
    },
}

impl PlayerState {
    pub fn name(&self) -> PlayerStateName {
        match self {
            PlayerState::Idling => PlayerStateName::Idling,
            PlayerState::Walking => PlayerStateName::Walking,
            PlayerState::Crouching { .. } => PlayerStateName::Crouching,
            PlayerState::Jumping { .. } => PlayerStateName::Jumping,
            PlayerState::Falling => PlayerStateName::Falling,
            PlayerState::Landing { .. } => PlayerStateName::Landing,
        }
    }
}

/// Everything a state needs for one tick, borrowed from the session.
pub struct TickContext<'a> {
    pub dt: f32,
    pub input: &'a InputFrame,
    pub map: &'a TileMap,
    pub config: &'a ClimbConfig,
    pub sounds: &'a mut Vec<SoundEvent>,
}

/// A requested state change, applied at most once per tick.
enum Transition {
    Idle,
    Walk,
    Crouch,
    Jump { charged_height: f32, direction: i8 },
    Bounce { boost: f32, direction: i8 },
    Fall,
    Land,
}

fn held_direction(input: &InputFrame) -> i8 {
    if input.is_held(Key::Left) {
        -1
    } else if input.is_held(Key::Right) {
        1
    } else {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMachine {
    state: PlayerState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: PlayerState::Idling,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn state_name(&self) -> PlayerStateName {
        self.state.name()
    }

    /// Advance one tick: shared physics, then the active state's logic,
    /// then at most one transition. A slime bounce resolved during
    /// integration re-enters Jumping immediately and skips state logic
    /// for the rest of the tick.
    pub fn update(&mut self, player: &mut Player, ctx: &mut TickContext<'_>) {
        if let Some(bounce) = Self::base_update(player, ctx) {
            self.apply(bounce, player, ctx);
            return;
        }

        let transition = match &mut self.state {
            PlayerState::Idling => Self::update_idling(player, ctx),
            PlayerState::Walking => Self::update_walking(player, ctx),
            PlayerState::Crouching {
                charge_time,
                last_direction,
                origin_y,
            } => Self::update_crouching(player, ctx, charge_time, last_direction, *origin_y),
            PlayerState::Jumping { charged_height } => {
                Self::update_jumping(player, ctx, *charged_height)
            },
            PlayerState::Falling => Self::update_falling(player, ctx),
            PlayerState::Landing { origin_x } => Self::update_landing(player, ctx, *origin_x),
        };

        if let Some(transition) = transition {
            self.apply(transition, player, ctx);
        }
    }

    /// Re-enter the named state directly, bypassing transition rules. Used
    /// when rehydrating a session from a save; runs the state's normal
    /// entry effects, so the caller is expected to fix up persisted fields
    /// (hop count) afterwards and discard any sounds emitted here.
    pub fn force(&mut self, name: PlayerStateName, player: &mut Player, ctx: &mut TickContext<'_>) {
        let transition = match name {
            PlayerStateName::Idling => Transition::Idle,
            PlayerStateName::Walking => Transition::Walk,
            PlayerStateName::Crouching => Transition::Crouch,
            PlayerStateName::Jumping => Transition::Jump {
                charged_height: ctx.config.physics.jump_power,
                direction: 0,
            },
            PlayerStateName::Falling => Transition::Fall,
            PlayerStateName::Landing => Transition::Land,
        };
        self.apply(transition, player, ctx);
    }

    /// The shared per-tick physics step, run before any state logic:
    /// gravity, x integration and resolution, y integration and resolution
    /// with surface application, bounds clamp, pixel rounding, animation.
    /// Returns the bounce transition if a slime boost fired.
    fn base_update(player: &mut Player, ctx: &mut TickContext<'_>) -> Option<Transition> {
        player.apply_gravity(ctx.dt, &ctx.config.physics);
        let bounce = Self::integrate(player, ctx);
        player.animations.update(ctx.dt);
        bounce
    }

    fn integrate(player: &mut Player, ctx: &mut TickContext<'_>) -> Option<Transition> {
        let physics = &ctx.config.physics;

        player.position.x += player.velocity.x * ctx.dt;
        let wall = collision::resolve_horizontal(player, ctx.map, ctx.config.reflect_walls);
        if wall.bumped && !player.is_sliding {
            ctx.sounds.push(SoundEvent::WallBump);
        }

        player.position.y += player.velocity.y * ctx.dt;
        let hit = collision::resolve_vertical(player, ctx.map, physics.bounce_threshold);
        if let Some(surface) = hit.surface {
            surface.apply(player);
        }

        let max_x = ctx.map.pixel_width() - player.dimensions.x;
        player.position.x = player.position.x.round().clamp(0.0, max_x);
        player.position.y = player.position.y.round();

        hit.boost.map(|boost| Transition::Bounce {
            boost,
            direction: held_direction(ctx.input),
        })
    }

    // ---- per-state update logic ------------------------------------

    fn update_idling(player: &mut Player, ctx: &TickContext<'_>) -> Option<Transition> {
        if !player.is_sliding {
            player.velocity.x = 0.0;
        }
        Self::handle_sliding(player, ctx);

        if ctx.input.is_pressed(Key::Jump) {
            return Some(Transition::Crouch);
        }
        // Exactly one direction held starts walking.
        if ctx.input.is_held(Key::Left) != ctx.input.is_held(Key::Right) {
            return Some(Transition::Walk);
        }
        None
    }

    fn update_walking(player: &mut Player, ctx: &TickContext<'_>) -> Option<Transition> {
        Self::handle_horizontal_movement(player, ctx);
        Self::handle_sliding(player, ctx);

        if !player.is_on_ground {
            // An upward velocity while nominally walking means a jump was
            // queued under our feet; re-crouch rather than fall.
            return Some(if player.velocity.y < 0.0 {
                Transition::Crouch
            } else {
                Transition::Fall
            });
        }
        if ctx.input.is_pressed(Key::Jump) {
            return Some(Transition::Crouch);
        }
        let no_direction = !ctx.input.is_held(Key::Left) && !ctx.input.is_held(Key::Right);
        if no_direction && player.velocity.x.abs() < VELOCITY_EPSILON {
            return Some(Transition::Idle);
        }
        None
    }

    fn update_crouching(
        player: &mut Player,
        ctx: &TickContext<'_>,
        charge_time: &mut f32,
        last_direction: &mut i8,
        origin_y: f32,
    ) -> Option<Transition> {
        Self::handle_sliding(player, ctx);

        let direction = held_direction(ctx.input);
        if direction != 0 {
            *last_direction = direction;
        } else {
            *last_direction = 0;
        }

        let physics = &ctx.config.physics;
        if ctx.input.is_held(Key::Jump) {
            *charge_time = (*charge_time + ctx.dt).min(physics.charge_time);
            // Auto-jump once fully charged.
            if *charge_time >= physics.charge_time {
                return Some(Self::charged_jump(
                    player,
                    ctx,
                    *charge_time,
                    *last_direction,
                    origin_y,
                ));
            }
        } else if ctx.input.is_released(Key::Jump) {
            return Some(Self::charged_jump(
                player,
                ctx,
                *charge_time,
                *last_direction,
                origin_y,
            ));
        }
        None
    }

    /// Compute the release impulse from accumulated charge. Sticky ground
    /// halves the full-charge magnitude before scaling.
    fn charged_jump(
        player: &mut Player,
        ctx: &TickContext<'_>,
        charge_time: f32,
        direction: i8,
        origin_y: f32,
    ) -> Transition {
        let physics = &ctx.config.physics;
        let full = if player.is_sticky {
            physics.max_charge_jump_height / 2.0
        } else {
            physics.max_charge_jump_height
        };
        let charged_height = (charge_time / physics.charge_time) * full;
        player.position.y = origin_y - CROUCH_RISE;
        Transition::Jump {
            charged_height,
            direction,
        }
    }

    fn update_jumping(
        player: &mut Player,
        ctx: &TickContext<'_>,
        charged_height: f32,
    ) -> Option<Transition> {
        let physics = &ctx.config.physics;
        if player.jump_time <= physics.max_jump_time {
            // Linear impulse decay over the jump window.
            player.velocity.y = charged_height * (1.0 - player.jump_time / physics.max_jump_time);
            player.jump_time += ctx.dt;
        }
        if player.velocity.y >= 0.0 {
            return Some(Transition::Fall);
        }
        None
    }

    fn update_falling(player: &mut Player, ctx: &mut TickContext<'_>) -> Option<Transition> {
        Self::handle_horizontal_movement(player, ctx);

        if player.is_on_ground {
            ctx.sounds.push(SoundEvent::Landing);
            return Some(Transition::Land);
        }
        None
    }

    fn update_landing(
        player: &mut Player,
        ctx: &TickContext<'_>,
        origin_x: f32,
    ) -> Option<Transition> {
        Self::handle_sliding(player, ctx);

        // Jump presses are ignored until the landing animation completes.
        if player.animations.current().is_done() {
            // The alignment nudge is only undone on stable ground; a
            // sliding exit keeps whatever position the drift produced.
            if !player.is_sliding {
                player.position.x = origin_x;
            }
            return Some(Transition::Idle);
        }
        None
    }

    // ---- shared movement helpers -----------------------------------

    /// Accelerate toward the held direction up to half max speed, or
    /// decelerate toward zero. Ice swaps in its own constants.
    fn handle_horizontal_movement(player: &mut Player, ctx: &TickContext<'_>) {
        let physics = &ctx.config.physics;
        let (acceleration, deceleration) = if player.is_sliding {
            (physics.ice_acceleration, physics.ice_deceleration)
        } else {
            (physics.acceleration, physics.deceleration)
        };
        let cap = physics.max_speed / 2.0;

        let left = ctx.input.is_held(Key::Left);
        let right = ctx.input.is_held(Key::Right);
        if left && right {
            Self::slow_down(player, deceleration * ctx.dt);
        } else if left {
            player.velocity.x = (player.velocity.x - acceleration * ctx.dt).max(-cap);
            player.facing_right = false;
        } else if right {
            player.velocity.x = (player.velocity.x + acceleration * ctx.dt).min(cap);
            player.facing_right = true;
        } else {
            Self::slow_down(player, deceleration * ctx.dt);
        }

        if player.velocity.x.abs() < VELOCITY_EPSILON {
            player.velocity.x = 0.0;
        }
    }

    fn slow_down(player: &mut Player, amount: f32) {
        if player.velocity.x > 0.0 {
            player.velocity.x = (player.velocity.x - amount).max(0.0);
        } else if player.velocity.x < 0.0 {
            player.velocity.x = (player.velocity.x + amount).min(0.0);
        }
    }

    /// Ice friction for states that do not run full horizontal movement.
    fn handle_sliding(player: &mut Player, ctx: &TickContext<'_>) {
        if player.is_sliding {
            Self::slow_down(player, ctx.config.physics.ice_deceleration * ctx.dt);
            if player.velocity.x.abs() < VELOCITY_EPSILON {
                player.velocity.x = 0.0;
            }
        }
    }

    // ---- transitions -----------------------------------------------

    /// Exit the current state, enter the next. Synchronous, no
    /// intermediate tick.
    fn apply(&mut self, transition: Transition, player: &mut Player, ctx: &mut TickContext<'_>) {
        self.exit(player);
        let next = match transition {
            Transition::Idle => {
                Self::enter_idling(player, ctx);
                PlayerState::Idling
            },
            Transition::Walk => {
                Self::enter_walking(player);
                PlayerState::Walking
            },
            Transition::Crouch => {
                let origin_y = player.position.y;
                Self::enter_crouching(player);
                PlayerState::Crouching {
                    charge_time: 0.0,
                    last_direction: held_direction(ctx.input),
                    origin_y,
                }
            },
            Transition::Jump {
                charged_height,
                direction,
            } => {
                Self::enter_jumping(player, ctx, direction, SoundEvent::Jump);
                PlayerState::Jumping { charged_height }
            },
            Transition::Bounce { boost, direction } => {
                Self::enter_jumping(player, ctx, direction, SoundEvent::Bounce);
                PlayerState::Jumping {
                    charged_height: boost,
                }
            },
            Transition::Fall => {
                Self::enter_falling(player);
                PlayerState::Falling
            },
            Transition::Land => {
                let origin_x = Self::enter_landing(player);
                PlayerState::Landing { origin_x }
            },
        };
        tracing::debug!(from = %self.state.name(), to = %next.name(), "player state transition");
        self.state = next;
    }

    fn exit(&self, player: &mut Player) {
        // Falling refreshes the bounce reference on the way out; other
        // states have no exit effects.
        if let PlayerState::Falling = self.state {
            player.fall_height = player.position.y;
        }
    }

    fn enter_idling(player: &mut Player, ctx: &TickContext<'_>) {
        player.is_on_ground = true;
        player.dimensions.y = IDLE_HEIGHT;
        if !player.is_sliding {
            player.velocity.x = 0.0;
        }
        // Settle velocity keeps the resolver re-grounding us each tick.
        player.velocity.y = ctx.config.physics.settle_velocity;
        player.is_bouncing = false;
        player.animations.play(AnimationKind::Idle);
    }

    fn enter_walking(player: &mut Player) {
        if player.facing_right {
            player.position.x += WALK_NUDGE;
        }
        player.dimensions.y = WALK_HEIGHT;
        player.is_on_ground = true;
        player.animations.play(AnimationKind::Walk);
    }

    fn enter_crouching(player: &mut Player) {
        player.dimensions.y = CROUCH_HEIGHT;
        if !player.is_sliding {
            player.velocity.x = 0.0;
        }
        player.velocity.y = CROUCH_SETTLE_VY;
        player.animations.play(AnimationKind::Crouch);
    }

    fn enter_jumping(player: &mut Player, ctx: &mut TickContext<'_>, direction: i8, sound: SoundEvent) {
        let physics = &ctx.config.physics;
        player.jump_time = 0.0;
        player.dimensions.y = IDLE_HEIGHT;
        player.velocity.x = match direction {
            -1 => -physics.max_speed,
            1 => physics.max_speed,
            _ => 0.0,
        };
        player.velocity.y = 0.0;
        player.hop_count += 1;
        player.animations.play(AnimationKind::Jump);
        ctx.sounds.push(sound);
    }

    fn enter_falling(player: &mut Player) {
        player.dimensions.y += FALL_GROWTH;
        player.fall_height = player.position.y;
        player.animations.play(AnimationKind::Fall);
    }

    fn enter_landing(player: &mut Player) -> f32 {
        player.dimensions.y = LAND_HEIGHT;
        let origin_x = player.position.x;
        player.position.x = origin_x - LAND_NUDGE;
        if !player.is_sliding {
            player.velocity.x = 0.0;
        }
        player.velocity.y = 0.0;
        player.animations.restart(AnimationKind::Land);
        origin_x
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use summit_core::input::InputTracker;
    use summit_core::test_helpers::keys;

    use super::*;
    use crate::map::TileMap;

    const DT: f32 = 1.0 / 60.0;

    fn test_map() -> TileMap {
        TileMap::from_rows(&[
            "............",
            "............",
            "............",
            "............",
            "............",
            "............",
            "############",
        ])
    }

    struct Rig {
        machine: StateMachine,
        player: Player,
        map: TileMap,
        config: ClimbConfig,
        tracker: InputTracker,
        sounds: Vec<SoundEvent>,
    }

    impl Rig {
        /// A player standing on the floor of the test map, already idle.
        fn grounded() -> Self {
            let map = test_map();
            let mut rig = Rig {
                machine: StateMachine::new(),
                player: Player::new(48.0, 50.0),
                map,
                config: ClimbConfig::default(),
                tracker: InputTracker::new(),
                sounds: Vec::new(),
            };
            // Drop to the floor and settle.
            for _ in 0..120 {
                rig.tick(&[]);
            }
            assert_eq!(rig.machine.state_name(), PlayerStateName::Idling);
            assert!(rig.player.is_on_ground);
            rig.sounds.clear();
            rig
        }

        fn tick(&mut self, held: &[Key]) {
            let held: HashSet<Key> = keys(held);
            let input = self.tracker.frame(&held);
            let mut ctx = TickContext {
                dt: DT,
                input: &input,
                map: &self.map,
                config: &self.config,
                sounds: &mut self.sounds,
            };
            self.machine.update(&mut self.player, &mut ctx);
        }

        fn tick_n(&mut self, n: usize, held: &[Key]) {
            for _ in 0..n {
                self.tick(held);
            }
        }
    }

    #[test]
    fn state_names_round_trip_through_strings() {
        for name in [
            PlayerStateName::Idling,
            PlayerStateName::Walking,
            PlayerStateName::Crouching,
            PlayerStateName::Jumping,
            PlayerStateName::Falling,
            PlayerStateName::Landing,
        ] {
            assert_eq!(name.to_string().parse::<PlayerStateName>(), Ok(name));
        }
        assert!("flying".parse::<PlayerStateName>().is_err());
    }

    #[test]
    fn walking_off_a_ledge_falls_and_lands_with_sound() {
        let map = TileMap::from_rows(&[
            "............",
            "............",
            "............",
            "####........",
            "####........",
            "####........",
            "############",
        ]);
        let mut rig = Rig {
            machine: StateMachine::new(),
            player: Player::new(16.0, 18.0),
            map,
            config: ClimbConfig::default(),
            tracker: InputTracker::new(),
            sounds: Vec::new(),
        };
        // Settle onto the ledge, then walk off its right edge.
        rig.tick_n(120, &[]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Idling);
        rig.sounds.clear();

        let mut saw_falling = false;
        for _ in 0..600 {
            rig.tick(&[Key::Right]);
            if rig.machine.state_name() == PlayerStateName::Falling {
                saw_falling = true;
                break;
            }
        }
        assert!(saw_falling, "walking past the ledge must start falling");

        rig.tick_n(240, &[]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Idling);
        assert!(rig.player.is_on_ground);
        assert!(rig.sounds.contains(&SoundEvent::Landing));
    }

    #[test]
    fn direction_held_starts_walking() {
        let mut rig = Rig::grounded();
        rig.tick(&[Key::Right]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Walking);
        assert_eq!(rig.player.dimensions.y, WALK_HEIGHT);
    }

    #[test]
    fn both_directions_held_stays_idle() {
        let mut rig = Rig::grounded();
        rig.tick(&[Key::Left, Key::Right]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Idling);
    }

    #[test]
    fn walking_caps_at_half_max_speed() {
        let mut rig = Rig::grounded();
        rig.tick_n(120, &[Key::Right]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Walking);
        assert!(rig.player.velocity.x <= rig.config.physics.max_speed / 2.0);
        assert!(rig.player.velocity.x > 0.0);
        assert!(rig.player.facing_right);
    }

    #[test]
    fn releasing_direction_returns_to_idle() {
        let mut rig = Rig::grounded();
        rig.tick_n(30, &[Key::Right]);
        rig.tick_n(60, &[]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Idling);
        assert_eq!(rig.player.velocity.x, 0.0);
    }

    #[test]
    fn jump_press_crouches_and_charges() {
        let mut rig = Rig::grounded();
        rig.tick(&[Key::Jump]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Crouching);
        assert_eq!(rig.player.dimensions.y, CROUCH_HEIGHT);

        rig.tick_n(6, &[Key::Jump]);
        match rig.machine.state() {
            PlayerState::Crouching { charge_time, .. } => {
                assert!(*charge_time > 0.0);
                assert!(*charge_time < rig.config.physics.charge_time);
            },
            other => panic!("expected Crouching, got {other:?}"),
        }
    }

    #[test]
    fn full_charge_auto_jumps_with_max_impulse() {
        let mut rig = Rig::grounded();
        let ticks_to_full = (rig.config.physics.charge_time / DT).ceil() as usize + 2;
        rig.tick_n(ticks_to_full, &[Key::Jump]);

        match rig.machine.state() {
            PlayerState::Jumping { charged_height } => {
                assert_eq!(*charged_height, rig.config.physics.max_charge_jump_height);
            },
            other => panic!("expected Jumping after full charge, got {other:?}"),
        }
        assert_eq!(rig.player.hop_count, 1);
        assert!(rig.sounds.contains(&SoundEvent::Jump));
    }

    #[test]
    fn sticky_ground_halves_the_charged_impulse() {
        // Sticky floor keeps is_sticky set through every ground contact.
        let map = TileMap::from_rows(&[
            "............",
            "............",
            "............",
            "............",
            "............",
            "............",
            "SSSSSSSSSSSS",
        ]);
        let mut rig = Rig {
            machine: StateMachine::new(),
            player: Player::new(48.0, 50.0),
            map,
            config: ClimbConfig::default(),
            tracker: InputTracker::new(),
            sounds: Vec::new(),
        };
        rig.tick_n(120, &[]);
        assert!(rig.player.is_sticky);
        let ticks_to_full = (rig.config.physics.charge_time / DT).ceil() as usize + 2;
        rig.tick_n(ticks_to_full, &[Key::Jump]);

        match rig.machine.state() {
            PlayerState::Jumping { charged_height } => {
                assert_eq!(
                    *charged_height,
                    rig.config.physics.max_charge_jump_height / 2.0
                );
            },
            other => panic!("expected Jumping, got {other:?}"),
        }
    }

    #[test]
    fn early_release_jumps_with_partial_charge() {
        let mut rig = Rig::grounded();
        rig.tick_n(12, &[Key::Jump]);
        rig.tick(&[]); // release edge
        match rig.machine.state() {
            PlayerState::Jumping { charged_height } => {
                assert!(*charged_height < 0.0, "impulse must be upward");
                assert!(*charged_height > rig.config.physics.max_charge_jump_height);
            },
            other => panic!("expected Jumping on release, got {other:?}"),
        }
    }

    #[test]
    fn jump_direction_sets_full_horizontal_speed() {
        let mut rig = Rig::grounded();
        rig.tick_n(12, &[Key::Jump, Key::Left]);
        rig.tick(&[Key::Left]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Jumping);
        assert_eq!(rig.player.velocity.x, -rig.config.physics.max_speed);
        // Jump exits the crouch slightly above the charge position.
    }

    #[test]
    fn jump_impulse_decays_into_falling() {
        let mut rig = Rig::grounded();
        let ticks_to_full = (rig.config.physics.charge_time / DT).ceil() as usize + 2;
        rig.tick_n(ticks_to_full, &[Key::Jump]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Jumping);

        let start_y = rig.player.position.y;
        // Ride out the jump window; impulse decays to zero and the state
        // hands off to Falling.
        let window = (rig.config.physics.max_jump_time / DT).ceil() as usize + 2;
        rig.tick_n(window, &[]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Falling);
        assert!(rig.player.position.y < start_y, "jump must gain height");
    }

    #[test]
    fn landing_waits_for_animation_before_idling() {
        let mut rig = Rig::grounded();
        let ticks_to_full = (rig.config.physics.charge_time / DT).ceil() as usize + 2;
        rig.tick_n(ticks_to_full, &[Key::Jump]);
        // Ride the full arc back down to the floor.
        let mut saw_landing = false;
        for _ in 0..600 {
            rig.tick(&[]);
            if rig.machine.state_name() == PlayerStateName::Landing {
                saw_landing = true;
                break;
            }
        }
        assert!(saw_landing, "arc must come back down through Landing");
        assert_eq!(rig.player.dimensions.y, LAND_HEIGHT);

        // One tick in: animation not done yet, still landing.
        rig.tick(&[]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Landing);

        rig.tick_n(60, &[]);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Idling);
    }

    #[test]
    fn jump_press_during_landing_is_ignored() {
        let mut rig = Rig::grounded();
        let ticks_to_full = (rig.config.physics.charge_time / DT).ceil() as usize + 2;
        rig.tick_n(ticks_to_full, &[Key::Jump]);
        rig.tick(&[]);
        for _ in 0..600 {
            rig.tick(&[]);
            if rig.machine.state_name() == PlayerStateName::Landing {
                break;
            }
        }
        assert_eq!(rig.machine.state_name(), PlayerStateName::Landing);

        let hops_before = rig.player.hop_count;
        rig.tick(&[Key::Jump]);
        assert_ne!(rig.machine.state_name(), PlayerStateName::Crouching);
        assert_ne!(rig.machine.state_name(), PlayerStateName::Jumping);
        assert_eq!(rig.player.hop_count, hops_before);
    }

    #[test]
    fn slime_bounce_reenters_jumping() {
        let map = TileMap::from_rows(&[
            "............",
            "............",
            "............",
            "............",
            "............",
            "............",
            "BBBBBBBBBBBB",
        ]);
        let mut rig = Rig {
            machine: StateMachine::new(),
            player: Player::new(48.0, 0.0),
            map,
            config: ClimbConfig::default(),
            tracker: InputTracker::new(),
            sounds: Vec::new(),
        };
        // Start airborne at terminal velocity so the slime contact is at
        // the bounce threshold.
        rig.player.is_on_ground = false;
        rig.player.velocity.y = rig.config.physics.max_fall_speed;
        rig.player.fall_height = 0.0;

        let mut bounced = false;
        for _ in 0..120 {
            rig.tick(&[]);
            if rig.machine.state_name() == PlayerStateName::Jumping {
                bounced = true;
                break;
            }
        }
        assert!(bounced, "fast fall onto slime must re-enter Jumping");
        assert!(rig.player.is_bouncing);
        assert_eq!(rig.player.hop_count, 1);
        assert!(rig.sounds.contains(&SoundEvent::Bounce));
    }

    #[test]
    fn walking_into_a_wall_bumps_and_stops() {
        let map = TileMap::from_rows(&[
            "......#.....",
            "......#.....",
            "......#.....",
            "......#.....",
            "......#.....",
            "......#.....",
            "############",
        ]);
        let mut rig = Rig {
            machine: StateMachine::new(),
            player: Player::new(48.0, 50.0),
            map,
            config: ClimbConfig::default(),
            tracker: InputTracker::new(),
            sounds: Vec::new(),
        };
        rig.tick_n(120, &[]);
        rig.sounds.clear();
        rig.tick_n(120, &[Key::Right]);
        assert!(rig.sounds.contains(&SoundEvent::WallBump));
        assert!(rig.player.position.x + rig.player.dimensions.x <= 6.0 * 16.0);
    }

    #[test]
    fn ice_preserves_velocity_into_idle() {
        let map = TileMap::from_rows(&[
            "............",
            "............",
            "............",
            "............",
            "............",
            "............",
            "IIIIIIIIIIII",
        ]);
        let mut rig = Rig {
            machine: StateMachine::new(),
            player: Player::new(48.0, 50.0),
            map,
            config: ClimbConfig::default(),
            tracker: InputTracker::new(),
            sounds: Vec::new(),
        };
        rig.tick_n(120, &[]);
        assert!(rig.player.is_sliding);
        rig.player.velocity.x = 40.0;
        rig.tick(&[]);
        // Sliding idle keeps drifting; ice deceleration is near zero.
        assert!(rig.player.velocity.x > 0.0);
    }

    #[test]
    fn force_restores_named_state() {
        let mut rig = Rig::grounded();
        let held: HashSet<Key> = HashSet::new();
        let input = rig.tracker.frame(&held);
        let mut scratch = Vec::new();
        let mut ctx = TickContext {
            dt: DT,
            input: &input,
            map: &rig.map,
            config: &rig.config,
            sounds: &mut scratch,
        };
        rig.machine
            .force(PlayerStateName::Falling, &mut rig.player, &mut ctx);
        assert_eq!(rig.machine.state_name(), PlayerStateName::Falling);
        assert_eq!(rig.player.fall_height, rig.player.position.y);
    }
}

//! Deterministic climbing simulation: a charged-jump platformer over a
//! vertically scrolling tile map. The player avatar is driven by a
//! six-state machine (idling, walking, crouch-charging, jumping, falling,
//! landing) fed by an axis-separated tile collision resolver that reports
//! surface effects (sticky, ice, slime).
//!
//! Given the same map, config, dt sequence, and inputs, two runs produce
//! bit-identical trajectories; everything else (rendering, audio playback,
//! storage) lives outside this crate behind the [`Session`] contract.

pub mod collision;
pub mod config;
pub mod map;
pub mod player;
pub mod states;
pub mod surface;

use serde::{Deserialize, Serialize};
use summit_core::audio::SoundEvent;
use summit_core::input::InputFrame;
use summit_core::save::SaveData;
use summit_core::session::Session;
use summit_core::vec2::Vec2;

pub use config::ClimbConfig;
pub use map::{TileMap, generate_tower};
pub use player::Player;
pub use states::{PlayerStateName, StateMachine};

/// Running totals surfaced to the stats screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClimbStats {
    /// Total jumps taken, mirroring the player's hop count.
    pub hops: u32,
    /// Simulated seconds elapsed.
    pub elapsed: f32,
    /// Best climb height in pixels above the spawn point.
    pub best_height: f32,
}

/// Everything that changes tick to tick, serialized whole for snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ClimbState {
    player: Player,
    machine: StateMachine,
    stats: ClimbStats,
    spawn: Vec2,
}

/// One climb session over a fixed map. Implements [`Session`] for the
/// external game-loop driver.
pub struct ClimbGame {
    config: ClimbConfig,
    map: TileMap,
    state: ClimbState,
    paused: bool,
}

impl ClimbGame {
    pub fn new(map: TileMap, config: ClimbConfig) -> Self {
        let spawn = map.spawn;
        Self {
            state: ClimbState {
                player: Player::new(spawn.x, spawn.y),
                machine: StateMachine::new(),
                stats: ClimbStats::default(),
                spawn,
            },
            map,
            config,
            paused: false,
        }
    }

    /// Resume a session from persisted progress. An unknown state name in
    /// the save falls back to idling at the saved position; position and
    /// hop count always win over state entry effects.
    pub fn with_save(map: TileMap, config: ClimbConfig, save: &SaveData) -> Self {
        let mut game = Self::new(map, config);
        let name = match save.state.parse::<PlayerStateName>() {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("{e}, resuming as idling");
                PlayerStateName::Idling
            },
        };

        let ClimbState {
            player, machine, ..
        } = &mut game.state;
        player.position = Vec2::new(save.x, save.y);
        let mut scratch = Vec::new();
        let input = InputFrame::empty();
        let mut ctx = states::TickContext {
            dt: 0.0,
            input: &input,
            map: &game.map,
            config: &game.config,
            sounds: &mut scratch,
        };
        machine.force(name, player, &mut ctx);
        // Entry effects may have nudged the position or bumped the hop
        // count; the persisted values are authoritative.
        player.position = Vec2::new(save.x, save.y);
        player.hop_count = save.hop_count;
        game.state.stats.hops = save.hop_count;
        game
    }

    pub fn save(&self) -> SaveData {
        SaveData {
            x: self.state.player.position.x,
            y: self.state.player.position.y,
            hop_count: self.state.player.hop_count,
            state: self.state.machine.state_name().to_string(),
        }
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn state_name(&self) -> PlayerStateName {
        self.state.machine.state_name()
    }

    pub fn stats(&self) -> &ClimbStats {
        &self.state.stats
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }
}

impl Session for ClimbGame {
    fn update(&mut self, dt: f32, input: &InputFrame) -> Vec<SoundEvent> {
        if self.paused || dt <= 0.0 {
            return Vec::new();
        }
        let mut sounds = Vec::new();
        let ClimbState {
            player,
            machine,
            stats,
            spawn,
        } = &mut self.state;
        let mut ctx = states::TickContext {
            dt,
            input,
            map: &self.map,
            config: &self.config,
            sounds: &mut sounds,
        };
        machine.update(player, &mut ctx);

        stats.hops = player.hop_count;
        stats.elapsed += dt;
        stats.best_height = stats.best_height.max(spawn.y - player.position.y);
        sounds
    }

    fn snapshot(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.state).expect("climb state serialization must succeed")
    }

    fn restore(&mut self, bytes: &[u8]) {
        match rmp_serde::from_slice(bytes) {
            Ok(state) => self.state = state,
            Err(e) => tracing::warn!("Ignoring malformed snapshot: {e}"),
        }
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }
}

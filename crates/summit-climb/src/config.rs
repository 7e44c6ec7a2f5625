use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical constants for the climb simulation. Screen coordinates are
/// Y-down, so downward velocities are positive and jump impulses negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Top horizontal speed (px/s). States cap walking at half of this;
    /// the jump impulse uses the full value.
    pub max_speed: f32,
    /// Horizontal acceleration on normal ground (px/s^2).
    pub acceleration: f32,
    /// Horizontal deceleration on normal ground (px/s^2).
    pub deceleration: f32,
    /// Horizontal acceleration while sliding on ice (px/s^2).
    pub ice_acceleration: f32,
    /// Near-zero deceleration while sliding on ice (px/s^2).
    pub ice_deceleration: f32,
    /// Downward acceleration while airborne (px/s^2).
    pub gravity: f32,
    /// Terminal fall speed (px/s).
    pub max_fall_speed: f32,
    /// Window over which the jump impulse decays to zero (s).
    pub max_jump_time: f32,
    /// Time to reach a fully charged jump while crouching (s).
    pub charge_time: f32,
    /// Impulse of a fully charged jump (px/s, negative = upward).
    pub max_charge_jump_height: f32,
    /// Fallback jump impulse when no charge is available (px/s, negative).
    pub jump_power: f32,
    /// Downward speed at or above which a slime contact boosts instead of
    /// landing (px/s).
    pub bounce_threshold: f32,
    /// Small downward velocity applied while idling to hold ground contact
    /// (px/s).
    pub settle_velocity: f32,
    /// Grace period for jumps after walking off a ledge (s). Carried in
    /// config but not exercised by the current states.
    pub coyote_time: f32,
    /// Grace period for early jump presses before landing (s). Carried in
    /// config but not exercised by the current states.
    pub jump_buffer: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_speed: 100.0,
            acceleration: 600.0,
            deceleration: 600.0,
            ice_acceleration: 300.0,
            ice_deceleration: 18.0,
            gravity: 3000.0,
            max_fall_speed: 400.0,
            max_jump_time: 0.4,
            charge_time: 1.0,
            max_charge_jump_height: -600.0,
            jump_power: -500.0,
            bounce_threshold: 400.0,
            settle_velocity: 100.0,
            coyote_time: 0.1,
            jump_buffer: 0.1,
        }
    }
}

/// Top-level climb configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    pub physics: PhysicsConfig,
    /// Invert instead of zero horizontal velocity on wall contact. Off by
    /// default; the zero policy avoids runaway oscillation.
    pub reflect_walls: bool,
    /// Nominal simulation rate in Hz.
    pub tick_rate_hz: f32,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            reflect_walls: false,
            tick_rate_hz: 60.0,
        }
    }
}

/// A physical constant failed validation at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NotFinite { field: &'static str },
    WrongSign { field: &'static str, expected: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFinite { field } => {
                write!(f, "config field `{field}` must be finite")
            },
            ConfigError::WrongSign { field, expected } => {
                write!(f, "config field `{field}` must be {expected}")
            },
        }
    }
}

impl std::error::Error for ConfigError {}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::WrongSign {
            field,
            expected: "positive",
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::WrongSign {
            field,
            expected: "non-negative",
        });
    }
    Ok(())
}

fn upward(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    // Y-down coordinates: an upward impulse is negative.
    if value >= 0.0 {
        return Err(ConfigError::WrongSign {
            field,
            expected: "negative (upward)",
        });
    }
    Ok(())
}

impl ClimbConfig {
    /// Validate all physical constants. Called by `load`; constants are
    /// rejected here rather than at use time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        positive("physics.max_speed", p.max_speed)?;
        positive("physics.acceleration", p.acceleration)?;
        positive("physics.deceleration", p.deceleration)?;
        positive("physics.ice_acceleration", p.ice_acceleration)?;
        positive("physics.ice_deceleration", p.ice_deceleration)?;
        positive("physics.gravity", p.gravity)?;
        positive("physics.max_fall_speed", p.max_fall_speed)?;
        positive("physics.max_jump_time", p.max_jump_time)?;
        positive("physics.charge_time", p.charge_time)?;
        upward("physics.max_charge_jump_height", p.max_charge_jump_height)?;
        upward("physics.jump_power", p.jump_power)?;
        positive("physics.bounce_threshold", p.bounce_threshold)?;
        positive("physics.settle_velocity", p.settle_velocity)?;
        non_negative("physics.coyote_time", p.coyote_time)?;
        non_negative("physics.jump_buffer", p.jump_buffer)?;
        positive("tick_rate_hz", self.tick_rate_hz)?;
        Ok(())
    }

    /// Load config from a TOML file and validate it. A missing or
    /// unparseable file falls back to defaults; invalid constants are a
    /// hard error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SUMMIT_CLIMB_CONFIG")
            .unwrap_or_else(|_| "config/climb.toml".to_string());
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<ClimbConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    ClimbConfig::default()
                },
            },
            Err(_) => ClimbConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

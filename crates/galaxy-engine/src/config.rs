//! Simulation tuning for the galaxy map.
//!
//! [`MapConfig::default`] holds the shipped values. The host may pass a JSON
//! object overriding any subset of fields; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

// ── World ────────────────────────────────────────────────────────────

pub const WORLD_WIDTH: f32 = 200.0;
pub const WORLD_HEIGHT: f32 = 200.0;
/// Pixels of camera travel per world unit.
pub const SCALE_FACTOR: f32 = 12.0;
/// Camera components beyond this are pulled back by whole world periods.
pub const RECENTER_THRESHOLD: f32 = 100_000.0;

// ── Barrier ──────────────────────────────────────────────────────────

pub const BARRIER_RADIUS: f32 = 1200.0;
pub const BARRIER_MARGIN: f32 = 5.0;
pub const REPULSION_FORCE: f32 = 60.0;
pub const REPULSION_DURATION_MS: f64 = 300.0;
/// Degrees per second; cosmetic only.
pub const BARRIER_SPIN_DEG_PER_SEC: f32 = 6.0;

// ── Momentum ─────────────────────────────────────────────────────────

pub const FRICTION: f32 = 0.95;
pub const VELOCITY_EPSILON: f32 = 0.05;
/// Per-axis clamp for a single velocity sample, pixels per tick.
pub const MAX_VELOCITY: f32 = 40.0;
/// Weight of the newest sample when blending velocity.
pub const VELOCITY_BLEND: f32 = 0.8;
pub const HEADING_SMOOTHING: f32 = 0.15;

// ── Collision feedback ──────────────────────────────────────────────

pub const FLASH_DURATION_MS: f64 = 200.0;
pub const SPARK_COUNT: usize = 12;
pub const SPARK_LIFETIME_MS: f64 = 800.0;
pub const SPARK_SPEED_MIN: f32 = 60.0;
pub const SPARK_SPEED_MAX: f32 = 180.0;
pub const FEEDBACK_COOLDOWN_MS: f64 = 300.0;
pub const COLLISION_SOUND_INTERVAL_MS: f64 = 500.0;
pub const NOTIFICATION_DURATION_MS: f64 = 4000.0;

// ── Points of interest / persistence ────────────────────────────────

pub const PROXIMITY_INTERVAL_MS: f64 = 500.0;
/// World units.
pub const NEARBY_THRESHOLD: f32 = 10.0;
/// Screen pixels.
pub const POINT_HIT_RADIUS: f32 = 28.0;
pub const SAVE_INTERVAL_MS: f64 = 2000.0;

// ── Starfield ───────────────────────────────────────────────────────

pub const STAR_CELL_SIZE: f32 = 100.0;
pub const STAR_MARGIN: f32 = 100.0;
pub const STAR_SEED: u32 = 0x5EED_0001;

/// Runtime-tunable galaxy map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub scale_factor: f32,
    pub recenter_threshold: f32,

    pub barrier_radius: f32,
    pub barrier_margin: f32,
    pub repulsion_force: f32,
    pub repulsion_duration_ms: f64,
    pub barrier_spin_deg_per_sec: f32,

    pub friction: f32,
    pub velocity_epsilon: f32,
    pub max_velocity: f32,
    pub velocity_blend: f32,
    pub heading_smoothing: f32,

    pub flash_duration_ms: f64,
    pub spark_count: usize,
    pub spark_lifetime_ms: f64,
    pub spark_speed_min: f32,
    pub spark_speed_max: f32,
    pub feedback_cooldown_ms: f64,
    pub collision_sound_interval_ms: f64,
    pub notification_duration_ms: f64,
    pub collision_message: String,

    pub proximity_interval_ms: f64,
    pub nearby_threshold: f32,
    pub point_hit_radius: f32,
    pub save_interval_ms: f64,

    pub star_cell_size: f32,
    pub star_margin: f32,
    pub star_seed: u32,
    /// Seed for spark directions.
    pub effects_seed: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            scale_factor: SCALE_FACTOR,
            recenter_threshold: RECENTER_THRESHOLD,

            barrier_radius: BARRIER_RADIUS,
            barrier_margin: BARRIER_MARGIN,
            repulsion_force: REPULSION_FORCE,
            repulsion_duration_ms: REPULSION_DURATION_MS,
            barrier_spin_deg_per_sec: BARRIER_SPIN_DEG_PER_SEC,

            friction: FRICTION,
            velocity_epsilon: VELOCITY_EPSILON,
            max_velocity: MAX_VELOCITY,
            velocity_blend: VELOCITY_BLEND,
            heading_smoothing: HEADING_SMOOTHING,

            flash_duration_ms: FLASH_DURATION_MS,
            spark_count: SPARK_COUNT,
            spark_lifetime_ms: SPARK_LIFETIME_MS,
            spark_speed_min: SPARK_SPEED_MIN,
            spark_speed_max: SPARK_SPEED_MAX,
            feedback_cooldown_ms: FEEDBACK_COOLDOWN_MS,
            collision_sound_interval_ms: COLLISION_SOUND_INTERVAL_MS,
            notification_duration_ms: NOTIFICATION_DURATION_MS,
            collision_message: "Navigation barrier reached. Turn back to explored space.".into(),

            proximity_interval_ms: PROXIMITY_INTERVAL_MS,
            nearby_threshold: NEARBY_THRESHOLD,
            point_hit_radius: POINT_HIT_RADIUS,
            save_interval_ms: SAVE_INTERVAL_MS,

            star_cell_size: STAR_CELL_SIZE,
            star_margin: STAR_MARGIN,
            star_seed: STAR_SEED,
            effects_seed: 42,
        }
    }
}

impl MapConfig {
    /// Parse a (possibly partial) config from JSON and validate it.
    pub fn from_json(json: &str) -> MapResult<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> MapResult<()> {
        fn invalid(field: &'static str, reason: &'static str) -> MapResult<()> {
            Err(MapError::InvalidConfig { field, reason })
        }

        if !(self.world_width > 0.0) {
            return invalid("world_width", "must be > 0");
        }
        if !(self.world_height > 0.0) {
            return invalid("world_height", "must be > 0");
        }
        if !(self.scale_factor > 0.0) {
            return invalid("scale_factor", "must be > 0");
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return invalid("friction", "must be in (0, 1)");
        }
        if !(self.velocity_epsilon > 0.0) {
            return invalid("velocity_epsilon", "must be > 0");
        }
        if !(self.max_velocity > 0.0) {
            return invalid("max_velocity", "must be > 0");
        }
        if !(self.velocity_blend > 0.0 && self.velocity_blend <= 1.0) {
            return invalid("velocity_blend", "must be in (0, 1]");
        }
        if !(self.barrier_margin >= 0.0) {
            return invalid("barrier_margin", "must be >= 0");
        }
        if self.barrier_radius > 0.0 && self.recenter_threshold <= self.barrier_radius {
            return invalid("recenter_threshold", "must exceed barrier_radius");
        }
        if !(self.star_cell_size >= 8.0) {
            return invalid("star_cell_size", "must be >= 8");
        }
        if self.spark_speed_max < self.spark_speed_min {
            return invalid("spark_speed_max", "must be >= spark_speed_min");
        }
        Ok(())
    }

    /// Barrier boundary used by the collision test.
    pub fn effective_barrier_radius(&self) -> f32 {
        self.barrier_radius - self.barrier_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(MapConfig::default().validate().is_ok());
        assert_eq!(MapConfig::default().effective_barrier_radius(), 1195.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MapConfig::from_json(r#"{ "friction": 0.995, "world_width": 400 }"#).unwrap();
        assert_eq!(config.friction, 0.995);
        assert_eq!(config.world_width, 400.0);
        assert_eq!(config.world_height, WORLD_HEIGHT);
        assert_eq!(config.spark_count, SPARK_COUNT);
    }

    #[test]
    fn rejects_bad_friction() {
        let err = MapConfig::from_json(r#"{ "friction": 1.0 }"#).unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig { field: "friction", .. }));
    }

    #[test]
    fn rejects_recenter_inside_barrier() {
        let config = MapConfig {
            recenter_threshold: 500.0,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = MapConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, MapError::ConfigParse(_)));
    }
}

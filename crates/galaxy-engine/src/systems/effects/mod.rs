//! Visual effects: collision sparks.
//!
//! `EffectsState` owns the live sparks, their RNG and the flat instance
//! buffer handed to the renderer each frame.

mod rng;
mod particle;

pub use rng::Rng;
pub use particle::{Spark, SparkInstance};

use glam::Vec2;

/// Container for all transient visual effects.
pub struct EffectsState {
    pub sparks: Vec<Spark>,
    pub spark_buffer: Vec<SparkInstance>,
    pub rng: Rng,
}

impl EffectsState {
    /// Create a new EffectsState with the given RNG seed.
    pub fn new(seed: u64) -> Self {
        EffectsState {
            sparks: Vec::new(),
            spark_buffer: Vec::with_capacity(64),
            rng: Rng::new(seed.wrapping_add(7919)),
        }
    }

    /// Create a new EffectsState with a pre-allocated buffer capacity.
    pub fn with_capacity(seed: u64, max_sparks: usize) -> Self {
        EffectsState {
            sparks: Vec::with_capacity(max_sparks),
            spark_buffer: Vec::with_capacity(max_sparks),
            rng: Rng::new(seed.wrapping_add(7919)),
        }
    }

    /// Burst of sparks from `center`, each flying outward at a random angle
    /// with speed in `speed_range` (pixels per second).
    pub fn spawn_sparks(
        &mut self,
        center: Vec2,
        count: usize,
        speed_range: (f32, f32),
        lifetime_ms: f64,
    ) {
        for _ in 0..count {
            let angle = self.rng.next_f32() * std::f32::consts::TAU;
            let speed = self.rng.range(speed_range.0, speed_range.1);
            let size = self.rng.range(1.5, 3.5);
            let heat = self.rng.next_f32();
            self.sparks.push(Spark::new(
                center,
                Vec2::from_angle(angle) * speed,
                size,
                heat,
                lifetime_ms,
            ));
        }
    }

    /// Advance sparks, dropping expired ones.
    pub fn tick(&mut self, dt: f32) {
        self.sparks.retain_mut(|s| s.tick(dt));
    }

    /// Rebuild the spark instance buffer, keeping at most `max` entries.
    pub fn rebuild_spark_buffer(&mut self, max: usize) {
        self.spark_buffer.clear();
        self.spark_buffer
            .extend(self.sparks.iter().take(max).map(Spark::instance));
    }

    /// Clear all effects.
    pub fn clear(&mut self) {
        self.sparks.clear();
        self.spark_buffer.clear();
    }

    /// Live sparks.
    pub fn spark_count(&self) -> usize {
        self.sparks.len()
    }

    /// Instances written by the last `rebuild_spark_buffer`.
    pub fn spark_instance_count(&self) -> usize {
        self.spark_buffer.len()
    }

    pub fn spark_buffer_ptr(&self) -> *const f32 {
        self.spark_buffer.as_ptr() as *const f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_sparks_flies_outward() {
        let mut effects = EffectsState::new(42);
        effects.spawn_sparks(Vec2::new(50.0, 50.0), 12, (60.0, 180.0), 800.0);
        assert_eq!(effects.sparks.len(), 12);
        for s in &effects.sparks {
            let speed = s.velocity.length();
            assert!((59.9..=180.1).contains(&speed), "speed {}", speed);
        }
    }

    #[test]
    fn sparks_gone_after_lifetime() {
        let mut effects = EffectsState::new(1);
        effects.spawn_sparks(Vec2::ZERO, 12, (60.0, 180.0), 800.0);
        for _ in 0..47 {
            effects.tick(1.0 / 60.0);
        }
        assert_eq!(effects.sparks.len(), 12);
        for _ in 0..3 {
            effects.tick(1.0 / 60.0);
        }
        assert!(effects.sparks.is_empty());
    }

    #[test]
    fn same_seed_same_burst() {
        let mut a = EffectsState::new(9);
        let mut b = EffectsState::new(9);
        a.spawn_sparks(Vec2::ZERO, 5, (10.0, 20.0), 100.0);
        b.spawn_sparks(Vec2::ZERO, 5, (10.0, 20.0), 100.0);
        for (x, y) in a.sparks.iter().zip(&b.sparks) {
            assert_eq!(x.velocity, y.velocity);
        }
    }

    #[test]
    fn buffer_respects_cap() {
        let mut effects = EffectsState::with_capacity(3, 4);
        effects.spawn_sparks(Vec2::ZERO, 10, (1.0, 2.0), 500.0);
        effects.rebuild_spark_buffer(4);
        assert_eq!(effects.spark_instance_count(), 4);
        effects.clear();
        assert!(effects.sparks.is_empty());
    }
}

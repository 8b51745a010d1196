//! Collision sparks: short-lived points that fly outward, fade and shrink.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Per-spark render data: 6 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct SparkInstance {
    pub x: f32,
    pub y: f32,
    /// Radius in pixels, already scaled by remaining life.
    pub size: f32,
    pub alpha: f32,
    /// Warm tint: 0 = yellow-white, 1 = deep orange.
    pub heat: f32,
    pub _pad: f32,
}

impl SparkInstance {
    pub const FLOATS: usize = 6;
}

/// A single spark in screen space.
#[derive(Debug, Clone)]
pub struct Spark {
    pub position: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    pub size: f32,
    pub heat: f32,
    /// Remaining life in milliseconds.
    pub life_ms: f64,
    pub max_life_ms: f64,
}

impl Spark {
    /// Velocity retained per second.
    pub const DRAG_PER_SEC: f32 = 0.15;

    pub fn new(position: Vec2, velocity: Vec2, size: f32, heat: f32, lifetime_ms: f64) -> Self {
        Self {
            position,
            velocity,
            size,
            heat,
            life_ms: lifetime_ms,
            max_life_ms: lifetime_ms,
        }
    }

    /// Remaining life in [0, 1].
    pub fn life_fraction(&self) -> f32 {
        if self.max_life_ms <= 0.0 {
            0.0
        } else {
            (self.life_ms / self.max_life_ms).clamp(0.0, 1.0) as f32
        }
    }

    /// Advance by `dt` seconds. Returns false once expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.life_ms -= dt as f64 * 1000.0;
        if self.life_ms <= 0.0 {
            return false;
        }
        self.position += self.velocity * dt;
        self.velocity *= Self::DRAG_PER_SEC.powf(dt);
        true
    }

    pub fn instance(&self) -> SparkInstance {
        let f = self.life_fraction();
        SparkInstance {
            x: self.position.x,
            y: self.position.y,
            size: self.size * f,
            alpha: f,
            heat: self.heat,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spark_expires() {
        let mut s = Spark::new(Vec2::ZERO, Vec2::X, 3.0, 0.0, 100.0);
        assert!(!s.tick(0.2), "spark should expire");
    }

    #[test]
    fn spark_fades_and_shrinks() {
        let mut s = Spark::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 4.0, 0.5, 800.0);
        assert!(s.tick(0.4));
        let inst = s.instance();
        assert!((inst.alpha - 0.5).abs() < 1e-3);
        assert!((inst.size - 2.0).abs() < 1e-3);
        assert!(inst.x > 0.0, "spark should travel along its velocity");
    }

    #[test]
    fn spark_instance_is_6_floats() {
        assert_eq!(std::mem::size_of::<SparkInstance>(), SparkInstance::FLOATS * 4);
    }
}

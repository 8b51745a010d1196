// extensions/tween.rs
//
// Time-based animation of a Vec2 value. The galaxy map uses it to ease
// the camera back from the barrier after a collision.
//
// Usage:
//   let mut tween = Tween::new(from, to, 300.0, Easing::QuadOut);
//   let value = tween.advance(16.7);  // ms
//   if tween.is_complete() { ... }

use glam::Vec2;
use super::easing::{Easing, ease_vec2};

/// A single Vec2 tween driven by elapsed milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub from: Vec2,
    pub to: Vec2,
    /// Duration in milliseconds.
    pub duration_ms: f64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
            easing,
        }
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0) as f32
        }
    }

    /// Current eased value.
    pub fn value(&self) -> Vec2 {
        ease_vec2(self.from, self.to, self.progress(), self.easing)
    }

    /// Advance time and return the new value.
    pub fn advance(&mut self, dt_ms: f64) -> Vec2 {
        self.elapsed_ms += dt_ms.max(0.0);
        self.value()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_reaches_target() {
        let mut tween = Tween::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 1000.0, Easing::Linear);

        let half = tween.advance(500.0);
        assert!((half.x - 50.0).abs() < 0.01);
        assert!(!tween.is_complete());

        let end = tween.advance(600.0);
        assert!((end.x - 100.0).abs() < 0.01);
        assert!(tween.is_complete());
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let tween = Tween::new(Vec2::ZERO, Vec2::ONE, 0.0, Easing::QuadOut);
        assert_eq!(tween.value(), Vec2::ONE);
        assert!(tween.is_complete());
    }

    #[test]
    fn eased_tween_front_loads_motion() {
        let mut tween = Tween::new(Vec2::ZERO, Vec2::new(0.0, 60.0), 300.0, Easing::QuadOut);
        let v = tween.advance(150.0);
        assert!(v.y > 30.0);
    }
}

// extensions/easing.rs
//
// Easing curves for the repulsion tween and angle helpers for heading
// smoothing. Headings are degrees, 0 = nose up, clockwise positive.

use glam::Vec2;

/// Shape of a tween over normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Decelerating; the camera push-back uses this.
    QuadOut,
    CubicOut,
}

impl Easing {
    /// Map `t` (clamped to [0, 1]) onto the curve.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let inv = 1.0 - t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => 1.0 - inv,
            Easing::QuadOut => 1.0 - inv * inv,
            Easing::CubicOut => 1.0 - inv * inv * inv,
        }
    }
}

#[inline]
pub fn ease_vec2(a: Vec2, b: Vec2, t: f32, easing: Easing) -> Vec2 {
    a.lerp(b, easing.apply(t))
}

/// Signed difference `to - from` in degrees, folded into (-180, 180].
#[inline]
pub fn shortest_angle_deg(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Move `from` toward `to` by fraction `t`, taking the shorter way around.
/// The result is normalized to [0, 360).
#[inline]
pub fn approach_angle_deg(from: f32, to: f32, t: f32) -> f32 {
    (from + shortest_angle_deg(from, to) * t).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for e in [Easing::Linear, Easing::QuadOut, Easing::CubicOut] {
            assert!(e.apply(0.0).abs() < 1e-6);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6);
            assert!((e.apply(2.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn quad_out_front_loads() {
        assert_eq!(Easing::QuadOut.apply(0.5), 0.75);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn shortest_angle_wraps_at_180() {
        assert!((shortest_angle_deg(170.0, -170.0) - 20.0).abs() < 1e-4);
        assert!((shortest_angle_deg(-170.0, 170.0) + 20.0).abs() < 1e-4);
        assert!((shortest_angle_deg(10.0, 350.0) + 20.0).abs() < 1e-4);
    }

    #[test]
    fn approach_goes_the_short_way() {
        let a = approach_angle_deg(350.0, 10.0, 0.5);
        assert!(a.abs() < 1e-3 || (a - 360.0).abs() < 1e-3, "got {}", a);
    }

    #[test]
    fn repeated_approach_converges() {
        let mut h = 0.0;
        for _ in 0..120 {
            h = approach_angle_deg(h, 270.0, 0.15);
        }
        assert!((h - 270.0).abs() < 0.01);
    }
}

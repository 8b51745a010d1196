//! Toroidal world model.
//!
//! The camera offset (unbounded pixels) is the only coordinate the physics
//! writes. The player's world position is derived from it:
//!
//! ```text
//! position = wrap(anchor - camera / scale)
//! ```
//!
//! where `anchor` is the position restored at session start. Dragging the
//! camera right therefore moves the world position left, and the two can
//! never drift apart.

use glam::Vec2;

/// Shift `v` by whole multiples of `(max - min)` until it lies in `[min, max)`.
///
/// Total for finite input and idempotent. A degenerate range (`max <= min`)
/// returns `min`.
#[inline]
pub fn wrap(v: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if !(span > 0.0) || !v.is_finite() {
        return min;
    }
    let r = (v - min).rem_euclid(span);
    // rem_euclid can round up to exactly `span` for tiny negative inputs
    if r >= span {
        min
    } else {
        min + r
    }
}

/// Shortest signed offset from `a` to `b` on a circle of circumference `extent`.
#[inline]
fn shortest_axis(a: f32, b: f32, extent: f32) -> f32 {
    let d = wrap(b - a, 0.0, extent);
    if d > extent / 2.0 {
        d - extent
    } else {
        d
    }
}

/// Shortest signed per-axis offset from `a` to `b` on a `width × height` torus.
pub fn toroidal_delta(a: Vec2, b: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        shortest_axis(a.x, b.x, width),
        shortest_axis(a.y, b.y, height),
    )
}

/// Distance between two positions taking the shorter way around each axis.
pub fn toroidal_distance(a: Vec2, b: Vec2, width: f32, height: f32) -> f32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let dx = dx.min(width - dx).max(0.0);
    let dy = dy.min(height - dy).max(0.0);
    (dx * dx + dy * dy).sqrt()
}

/// A candidate state produced by a pointer or momentum delta.
/// Nothing is written until the barrier accepts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    pub camera: Vec2,
    pub position: Vec2,
}

/// Player position, camera offset and momentum.
#[derive(Debug, Clone)]
pub struct WorldState {
    width: f32,
    height: f32,
    /// Pixels per world unit.
    scale: f32,
    /// World position at camera origin.
    anchor: Vec2,
    camera: Vec2,
    pub velocity: Vec2,
}

impl WorldState {
    pub fn new(width: f32, height: f32, scale: f32, start: Vec2) -> Self {
        Self {
            width,
            height,
            scale,
            anchor: Vec2::new(wrap(start.x, 0.0, width), wrap(start.y, 0.0, height)),
            camera: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    /// Center of a `width × height` world.
    pub fn center(width: f32, height: f32) -> Vec2 {
        Vec2::new(width / 2.0, height / 2.0)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    /// Current toroidal world position.
    pub fn position(&self) -> Vec2 {
        self.position_for(self.camera)
    }

    fn position_for(&self, camera: Vec2) -> Vec2 {
        let p = self.anchor - camera / self.scale;
        Vec2::new(wrap(p.x, 0.0, self.width), wrap(p.y, 0.0, self.height))
    }

    /// Propose moving the camera by a pixel delta.
    pub fn propose(&self, delta: Vec2) -> Proposal {
        self.propose_camera(self.camera + delta)
    }

    /// Propose an absolute camera offset (used by the repulsion tween).
    pub fn propose_camera(&self, camera: Vec2) -> Proposal {
        Proposal {
            camera,
            position: self.position_for(camera),
        }
    }

    /// Apply an accepted proposal.
    pub fn commit(&mut self, proposal: Proposal) {
        self.camera = proposal.camera;
    }

    /// Pull the camera back by whole toroidal periods once any component
    /// exceeds `threshold`. The derived position is unchanged.
    /// Returns true when a shift happened.
    pub fn recenter(&mut self, threshold: f32) -> bool {
        let period = Vec2::new(self.width * self.scale, self.height * self.scale);
        let mut shifted = false;
        if self.camera.x.abs() > threshold {
            self.camera.x -= (self.camera.x / period.x).trunc() * period.x;
            shifted = true;
        }
        if self.camera.y.abs() > threshold {
            self.camera.y -= (self.camera.y / period.y).trunc() * period.y;
            shifted = true;
        }
        shifted
    }

    pub fn distance_to(&self, other: Vec2) -> f32 {
        toroidal_distance(self.position(), other, self.width, self.height)
    }

    pub fn delta_to(&self, other: Vec2) -> Vec2 {
        toroidal_delta(self.position(), other, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_lands_in_range() {
        let cases = [-1e6, -450.5, -200.0, -0.0001, 0.0, 13.0, 199.999, 200.0, 401.0, 1e7];
        for v in cases {
            let w = wrap(v, 0.0, 200.0);
            assert!((0.0..200.0).contains(&w), "wrap({}) = {}", v, w);
        }
        let w = wrap(7.0, -10.0, 5.0);
        assert!((-10.0..5.0).contains(&w));
        assert!((w - -8.0).abs() < 1e-4);
    }

    #[test]
    fn wrap_is_idempotent() {
        for v in [-1234.5, -1e-7, 0.0, 55.5, 200.0, 987.25] {
            let once = wrap(v, 0.0, 200.0);
            assert_eq!(wrap(once, 0.0, 200.0), once);
        }
    }

    #[test]
    fn wrap_degenerate_range_returns_min() {
        assert_eq!(wrap(10.0, 5.0, 5.0), 5.0);
        assert_eq!(wrap(f32::NAN, 0.0, 10.0), 0.0);
    }

    #[test]
    fn toroidal_distance_takes_short_way() {
        let d = toroidal_distance(Vec2::new(1.0, 0.0), Vec2::new(199.0, 0.0), 200.0, 200.0);
        assert!((d - 2.0).abs() < 1e-5, "got {}", d);
    }

    #[test]
    fn toroidal_distance_symmetric_and_zero_on_self() {
        let a = Vec2::new(12.0, 190.0);
        let b = Vec2::new(180.0, 4.0);
        let ab = toroidal_distance(a, b, 200.0, 200.0);
        let ba = toroidal_distance(b, a, 200.0, 200.0);
        assert_eq!(ab, ba);
        assert_eq!(toroidal_distance(a, a, 200.0, 200.0), 0.0);
    }

    #[test]
    fn toroidal_delta_points_across_seam() {
        let d = toroidal_delta(Vec2::new(199.0, 100.0), Vec2::new(1.0, 100.0), 200.0, 200.0);
        assert!((d.x - 2.0).abs() < 1e-5);
        assert_eq!(d.y, 0.0);
    }

    #[test]
    fn drag_left_moves_position_right() {
        let world = WorldState::new(200.0, 200.0, 12.0, Vec2::new(100.0, 100.0));
        let p = world.propose(Vec2::new(-120.0, 0.0));
        assert!((p.position.x - 110.0).abs() < 1e-4);
        assert_eq!(p.camera, Vec2::new(-120.0, 0.0));
        // Not committed yet
        assert_eq!(world.camera(), Vec2::ZERO);
    }

    #[test]
    fn position_wraps_through_seam() {
        let mut world = WorldState::new(200.0, 200.0, 12.0, Vec2::new(2.0, 100.0));
        let p = world.propose(Vec2::new(48.0, 0.0)); // -4 world units
        world.commit(p);
        assert!((world.position().x - 198.0).abs() < 1e-3);
    }

    #[test]
    fn recenter_keeps_position() {
        let mut world = WorldState::new(200.0, 200.0, 12.0, Vec2::new(50.0, 50.0));
        let p = world.propose(Vec2::new(10_000.0, -7_300.0));
        world.commit(p);
        let before = world.position();
        assert!(world.recenter(5_000.0));
        let after = world.position();
        assert!(world.camera().x.abs() < 2400.0);
        assert!(world.camera().y.abs() < 2400.0);
        assert!(toroidal_distance(before, after, 200.0, 200.0) < 1e-2);
    }
}

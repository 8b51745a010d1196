//! Star descriptors and their per-frame evaluation.

use std::f32::consts::TAU;

use glam::Vec2;

use super::hash::CellHash;
use super::layers::LayerSpec;
use crate::renderer::instance::StarInstance;

/// Hashed roll above which a star is special.
pub const SPECIAL_THRESHOLD: f32 = 0.97;
/// Hashed roll above which a star is ultra-special.
pub const ULTRA_THRESHOLD: f32 = 0.995;

/// Slot reserved for the per-cell star count roll.
const COUNT_SLOT: u32 = u32::MAX;
/// Hash channels per star.
const CHANNELS: u32 = 32;

mod ch {
    pub const X: u32 = 0;
    pub const Y: u32 = 1;
    pub const SIZE: u32 = 2;
    pub const OPACITY: u32 = 3;
    pub const COLOR: u32 = 4;
    pub const KIND: u32 = 5;
    pub const TWINKLE_PHASE: u32 = 6;
    pub const TWINKLE_SPEED: u32 = 7;
    pub const PULSE_PHASE: u32 = 8;
    pub const PULSE_SPEED: u32 = 9;
    pub const BREATHE_PHASE: u32 = 10;
    pub const BREATHE_SPEED: u32 = 11;
    pub const ORBIT_RADIUS: u32 = 12;
    pub const ORBIT_SPEED: u32 = 13;
    pub const ORBIT_PHASE: u32 = 14;
    pub const DRIFT_ANGLE: u32 = 15;
    pub const DRIFT_AMP: u32 = 16;
    pub const DRIFT_SPEED: u32 = 17;
    pub const DRIFT_PHASE: u32 = 18;
    pub const RAY_PHASE: u32 = 19;
    pub const KEEP: u32 = 20;
}

const NORMAL_PALETTE: [[f32; 3]; 5] = [
    [1.0, 1.0, 1.0],
    [0.80, 0.88, 1.0],
    [1.0, 0.95, 0.80],
    [1.0, 0.82, 0.62],
    [0.72, 0.95, 1.0],
];
const SPECIAL_PALETTE: [[f32; 3]; 3] = [[0.85, 0.75, 1.0], [0.60, 1.0, 0.90], [0.65, 0.80, 1.0]];
const ULTRA_PALETTE: [[f32; 3]; 2] = [[1.0, 0.85, 0.50], [1.0, 0.70, 0.90]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarKind {
    Normal,
    Special,
    UltraSpecial,
}

impl StarKind {
    fn code(self) -> f32 {
        match self {
            StarKind::Normal => 0.0,
            StarKind::Special => 1.0,
            StarKind::UltraSpecial => 2.0,
        }
    }
}

/// Everything about a star that does not depend on time or camera.
/// Never stored: rebuilt from the hash whenever its cell is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarDescriptor {
    pub cell: (i32, i32),
    pub layer: u32,
    pub index: u32,
    /// Position in layer space (pixels).
    pub base: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub color: [f32; 3],
    pub kind: StarKind,
    pub twinkle_phase: f32,
    pub twinkle_speed: f32,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
    pub breathe_phase: f32,
    pub breathe_speed: f32,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub orbit_phase: f32,
    pub drift_dir: Vec2,
    pub drift_amp: f32,
    pub drift_speed: f32,
    pub drift_phase: f32,
    pub ray_phase: f32,
}

#[inline]
fn between(range: (f32, f32), t: f32) -> f32 {
    range.0 + (range.1 - range.0) * t
}

#[inline]
fn pick<const N: usize>(palette: &[[f32; 3]; N], t: f32) -> [f32; 3] {
    palette[((t * N as f32) as usize).min(N - 1)]
}

/// Number of stars in a cell for a layer.
pub fn star_count<H: CellHash>(hasher: &H, spec: &LayerSpec, layer: u32, cx: i32, cy: i32) -> u32 {
    let whole = spec.density.floor();
    let frac = spec.density - whole;
    let extra = hasher.unit(cx, cy, layer, COUNT_SLOT) < frac;
    whole as u32 + extra as u32
}

/// Stable per-star roll in [0, 1) used to thin a layer that does not fit
/// the frame's star budget.
pub fn keep_roll<H: CellHash>(hasher: &H, layer: u32, cx: i32, cy: i32, index: u32) -> f32 {
    hasher.unit(cx, cy, layer, index.wrapping_mul(CHANNELS) + ch::KEEP)
}

impl StarDescriptor {
    /// Derive star `index` of cell `(cx, cy)` on `layer`.
    pub fn derive<H: CellHash>(
        hasher: &H,
        spec: &LayerSpec,
        layer: u32,
        cx: i32,
        cy: i32,
        index: u32,
        cell_size: f32,
    ) -> Self {
        let roll = |channel: u32| hasher.unit(cx, cy, layer, index.wrapping_mul(CHANNELS) + channel);

        let kind = if spec.allows_special {
            let r = roll(ch::KIND);
            if r > ULTRA_THRESHOLD {
                StarKind::UltraSpecial
            } else if r > SPECIAL_THRESHOLD {
                StarKind::Special
            } else {
                StarKind::Normal
            }
        } else {
            StarKind::Normal
        };

        let color = match kind {
            StarKind::Normal => pick(&NORMAL_PALETTE, roll(ch::COLOR)),
            StarKind::Special => pick(&SPECIAL_PALETTE, roll(ch::COLOR)),
            StarKind::UltraSpecial => pick(&ULTRA_PALETTE, roll(ch::COLOR)),
        };

        let size_boost = match kind {
            StarKind::Normal => 1.0,
            StarKind::Special => 1.4,
            StarKind::UltraSpecial => 1.8,
        };

        let base = Vec2::new(
            (cx as f32 + roll(ch::X)) * cell_size,
            (cy as f32 + roll(ch::Y)) * cell_size,
        );

        Self {
            cell: (cx, cy),
            layer,
            index,
            base,
            size: between(spec.size, roll(ch::SIZE)) * size_boost,
            opacity: between(spec.opacity, roll(ch::OPACITY)),
            color,
            kind,
            twinkle_phase: roll(ch::TWINKLE_PHASE) * TAU,
            twinkle_speed: between(spec.twinkle_speed, roll(ch::TWINKLE_SPEED)),
            pulse_phase: roll(ch::PULSE_PHASE) * TAU,
            pulse_speed: between((0.2, 0.8), roll(ch::PULSE_SPEED)),
            breathe_phase: roll(ch::BREATHE_PHASE) * TAU,
            breathe_speed: between((0.1, 0.5), roll(ch::BREATHE_SPEED)),
            orbit_radius: between((0.0, 1.5), roll(ch::ORBIT_RADIUS)),
            orbit_speed: between((0.05, 0.3), roll(ch::ORBIT_SPEED)),
            orbit_phase: roll(ch::ORBIT_PHASE) * TAU,
            drift_dir: Vec2::from_angle(roll(ch::DRIFT_ANGLE) * TAU),
            drift_amp: between((0.0, 4.0), roll(ch::DRIFT_AMP)),
            drift_speed: between((0.01, 0.06), roll(ch::DRIFT_SPEED)),
            drift_phase: roll(ch::DRIFT_PHASE) * TAU,
            ray_phase: roll(ch::RAY_PHASE) * TAU,
        }
    }

    /// Evaluate the star at time `t` (seconds) for a layer camera offset
    /// (`camera * parallax`).
    pub fn evaluate(&self, t: f32, layer_camera: Vec2) -> StarInstance {
        let twinkle = 0.7 + 0.3 * (t * self.twinkle_speed + self.twinkle_phase).sin();
        let pulse_depth = match self.kind {
            StarKind::Normal => 0.1,
            StarKind::Special => 0.25,
            StarKind::UltraSpecial => 0.35,
        };
        let pulse = 1.0 + pulse_depth * (t * self.pulse_speed + self.pulse_phase).sin();
        let breathe = 1.0 + 0.12 * (t * self.breathe_speed + self.breathe_phase).sin();

        let orbit_angle = t * self.orbit_speed + self.orbit_phase;
        let orbit = Vec2::from_angle(orbit_angle) * self.orbit_radius;
        let drift = self.drift_dir
            * self.drift_amp
            * (t * self.drift_speed + self.drift_phase).sin();

        let pos = self.base + layer_camera + orbit + drift;
        let radius = self.size * breathe;
        let alpha = (self.opacity * twinkle * pulse).clamp(0.0, 1.0);

        let (halo, rays, ray_len, orbiters) = match self.kind {
            StarKind::Normal => (0.0, 0.0, 0.0, 0.0),
            StarKind::Special => (radius * 4.0, 4.0, radius * 5.0, 0.0),
            StarKind::UltraSpecial => (radius * 6.0, 8.0, radius * 8.0, 3.0),
        };

        StarInstance {
            x: pos.x,
            y: pos.y,
            radius,
            alpha,
            r: self.color[0],
            g: self.color[1],
            b: self.color[2],
            kind: self.kind.code(),
            halo_radius: halo * pulse,
            ray_count: rays,
            ray_length: ray_len,
            ray_rotation: self.ray_phase + t * 0.2,
            orbiter_count: orbiters,
            orbiter_radius: radius * 3.0,
            orbiter_phase: self.orbit_phase + t * 1.2,
            layer: self.layer as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::starfield::hash::SeededHash;
    use crate::systems::starfield::layers::LAYERS;

    /// Returns a fixed roll for every input.
    struct ConstHash(u32);

    impl CellHash for ConstHash {
        fn hash(&self, _: i32, _: i32, _: u32, _: u32) -> u32 {
            self.0
        }
    }

    #[test]
    fn descriptor_stays_inside_its_cell() {
        let h = SeededHash::new(3);
        for i in 0..4 {
            let s = StarDescriptor::derive(&h, &LAYERS[0], 0, -2, 5, i, 100.0);
            assert!(s.base.x >= -200.0 && s.base.x < -100.0);
            assert!(s.base.y >= 500.0 && s.base.y < 600.0);
        }
    }

    #[test]
    fn max_roll_makes_ultra_where_allowed() {
        let h = ConstHash(u32::MAX);
        let near = StarDescriptor::derive(&h, &LAYERS[2], 2, 0, 0, 0, 100.0);
        assert_eq!(near.kind, StarKind::UltraSpecial);
        let distant = StarDescriptor::derive(&h, &LAYERS[0], 0, 0, 0, 0, 100.0);
        assert_eq!(distant.kind, StarKind::Normal);
    }

    #[test]
    fn zero_roll_is_plain_and_small() {
        let h = ConstHash(0);
        let s = StarDescriptor::derive(&h, &LAYERS[3], 3, 0, 0, 0, 100.0);
        assert_eq!(s.kind, StarKind::Normal);
        assert_eq!(s.size, LAYERS[3].size.0);
        assert_eq!(s.base, Vec2::ZERO);
    }

    #[test]
    fn count_uses_fractional_density() {
        let low = ConstHash(0);
        let high = ConstHash(u32::MAX);
        // ultra layer: density 0.12
        assert_eq!(star_count(&low, &LAYERS[4], 4, 0, 0), 1);
        assert_eq!(star_count(&high, &LAYERS[4], 4, 0, 0), 0);
        // distant: exactly 4
        assert_eq!(star_count(&high, &LAYERS[0], 0, 0, 0), 4);
    }

    #[test]
    fn evaluation_is_pure_in_time() {
        let h = SeededHash::new(11);
        let s = StarDescriptor::derive(&h, &LAYERS[3], 3, 4, 4, 0, 100.0);
        let a = s.evaluate(12.5, Vec2::new(10.0, -4.0));
        let b = s.evaluate(12.5, Vec2::new(10.0, -4.0));
        assert_eq!(a, b);
        let later = s.evaluate(13.5, Vec2::new(10.0, -4.0));
        assert_ne!(a, later);
    }

    #[test]
    fn special_stars_get_halo_and_rays() {
        let h = ConstHash(u32::MAX);
        let s = StarDescriptor::derive(&h, &LAYERS[4], 4, 0, 0, 0, 100.0);
        let inst = s.evaluate(0.0, Vec2::ZERO);
        assert_eq!(inst.kind, 2.0);
        assert!(inst.halo_radius > inst.radius);
        assert_eq!(inst.ray_count, 8.0);
        assert_eq!(inst.orbiter_count, 3.0);
    }
}

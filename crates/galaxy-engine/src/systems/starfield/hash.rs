//! Integer hashing for procedural content.
//!
//! Every star property is a pure function of `(cell_x, cell_y, layer, slot)`
//! through a [`CellHash`]. Swap the implementation to pin outputs in tests
//! or to reseed the sky.

/// Deterministic hash of a grid cell, a layer and a per-cell slot.
pub trait CellHash {
    fn hash(&self, cell_x: i32, cell_y: i32, layer: u32, slot: u32) -> u32;

    /// Same inputs mapped to a float in [0, 1).
    fn unit(&self, cell_x: i32, cell_y: i32, layer: u32, slot: u32) -> f32 {
        (self.hash(cell_x, cell_y, layer, slot) >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Seeded multiply-xorshift hash with a murmur3 finalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededHash {
    pub seed: u32,
}

impl SeededHash {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl CellHash for SeededHash {
    #[inline]
    fn hash(&self, cell_x: i32, cell_y: i32, layer: u32, slot: u32) -> u32 {
        let mut h = self.seed;
        h ^= (cell_x as u32).wrapping_mul(0x27d4_eb2d);
        h = h.rotate_left(13).wrapping_add((cell_y as u32).wrapping_mul(0x1656_67b1));
        h ^= layer.wrapping_add(1).wrapping_mul(0x9e37_79b9);
        h = h.rotate_left(7).wrapping_add(slot.wrapping_mul(0x85eb_ca6b));
        h ^= h >> 16;
        h = h.wrapping_mul(0x85eb_ca6b);
        h ^= h >> 13;
        h = h.wrapping_mul(0xc2b2_ae35);
        h ^= h >> 16;
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_hash() {
        let h = SeededHash::new(99);
        assert_eq!(h.hash(-3, 17, 2, 5), h.hash(-3, 17, 2, 5));
    }

    #[test]
    fn neighbours_differ() {
        let h = SeededHash::new(99);
        let base = h.hash(10, 10, 0, 0);
        assert_ne!(base, h.hash(11, 10, 0, 0));
        assert_ne!(base, h.hash(10, 11, 0, 0));
        assert_ne!(base, h.hash(10, 10, 1, 0));
        assert_ne!(base, h.hash(10, 10, 0, 1));
    }

    #[test]
    fn seed_changes_output() {
        assert_ne!(SeededHash::new(1).hash(0, 0, 0, 0), SeededHash::new(2).hash(0, 0, 0, 0));
    }

    #[test]
    fn unit_is_half_open() {
        let h = SeededHash::new(5);
        for i in 0..2000 {
            let u = h.unit(i, -i, 3, i as u32);
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn unit_is_roughly_uniform() {
        let h = SeededHash::new(1234);
        let n = 10_000;
        let below_half = (0..n).filter(|&i| h.unit(i, 7, 0, 0) < 0.5).count();
        let ratio = below_half as f32 / n as f32;
        assert!((0.45..0.55).contains(&ratio), "ratio {}", ratio);
    }
}

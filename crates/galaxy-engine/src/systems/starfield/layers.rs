//! Parallax layer table, back to front.

/// Static parameters of one parallax layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    pub name: &'static str,
    /// Expected stars per cell; the fractional part is a hashed chance of one more.
    pub density: f32,
    /// Radius range in pixels.
    pub size: (f32, f32),
    pub opacity: (f32, f32),
    /// Fraction of camera motion this layer follows.
    pub parallax: f32,
    /// Twinkle angular speed range, radians per second.
    pub twinkle_speed: (f32, f32),
    /// Whether special and ultra-special stars may appear.
    pub allows_special: bool,
}

pub const LAYER_COUNT: usize = 5;

pub const LAYERS: [LayerSpec; LAYER_COUNT] = [
    LayerSpec {
        name: "distant",
        density: 4.0,
        size: (0.4, 1.0),
        opacity: (0.15, 0.45),
        parallax: 0.05,
        twinkle_speed: (0.3, 0.9),
        allows_special: false,
    },
    LayerSpec {
        name: "mid",
        density: 2.5,
        size: (0.6, 1.4),
        opacity: (0.3, 0.65),
        parallax: 0.15,
        twinkle_speed: (0.5, 1.4),
        allows_special: false,
    },
    LayerSpec {
        name: "near",
        density: 1.2,
        size: (0.9, 1.9),
        opacity: (0.45, 0.85),
        parallax: 0.35,
        twinkle_speed: (0.8, 2.0),
        allows_special: true,
    },
    LayerSpec {
        name: "bright",
        density: 0.5,
        size: (1.4, 2.6),
        opacity: (0.7, 1.0),
        parallax: 0.6,
        twinkle_speed: (1.0, 2.6),
        allows_special: true,
    },
    LayerSpec {
        name: "ultra",
        density: 0.12,
        size: (2.2, 3.6),
        opacity: (0.85, 1.0),
        parallax: 0.9,
        twinkle_speed: (1.2, 3.0),
        allows_special: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_get_closer_and_sparser() {
        for pair in LAYERS.windows(2) {
            assert!(pair[1].parallax > pair[0].parallax, "{} vs {}", pair[0].name, pair[1].name);
            assert!(pair[1].density < pair[0].density);
        }
    }
}

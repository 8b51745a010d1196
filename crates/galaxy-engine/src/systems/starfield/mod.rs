//! Infinite, deterministic, five-layer parallax starfield.
//!
//! Nothing is stored between frames. Each frame the visible cell range of
//! every layer is computed from the camera offset, and every star in those
//! cells is re-derived from the cell hash and evaluated at the current time.
//!
//! A star on layer `l` with layer-space position `p` is drawn at
//! `p + camera * parallax(l)`, so distant layers slide less than near ones.

pub mod hash;
pub mod layers;
pub mod star;

use glam::Vec2;

pub use hash::{CellHash, SeededHash};
pub use layers::{LayerSpec, LAYERS, LAYER_COUNT};
pub use star::{StarDescriptor, StarKind, SPECIAL_THRESHOLD, ULTRA_THRESHOLD};

use crate::renderer::instance::StarBuffer;
use star::{keep_roll, star_count};

/// Inclusive range of cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl CellRange {
    pub fn contains(&self, cx: i32, cy: i32) -> bool {
        (self.min_x..=self.max_x).contains(&cx) && (self.min_y..=self.max_y).contains(&cy)
    }

    pub fn cell_count(&self) -> usize {
        let w = (self.max_x - self.min_x + 1).max(0) as usize;
        let h = (self.max_y - self.min_y + 1).max(0) as usize;
        w * h
    }

    /// Row-major iteration over every cell in the range.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y).flat_map(move |cy| (min_x..=max_x).map(move |cx| (cx, cy)))
    }
}

/// Procedural starfield generator, generic over the cell hash.
pub struct Starfield<H: CellHash = SeededHash> {
    hasher: H,
    cell_size: f32,
    /// Extra pixels rendered beyond each viewport edge.
    margin: f32,
    layers: [LayerSpec; LAYER_COUNT],
}

impl Starfield<SeededHash> {
    pub fn new(seed: u32, cell_size: f32, margin: f32) -> Self {
        Self::with_hasher(SeededHash::new(seed), cell_size, margin)
    }
}

impl<H: CellHash> Starfield<H> {
    pub fn with_hasher(hasher: H, cell_size: f32, margin: f32) -> Self {
        Self {
            hasher,
            cell_size,
            margin,
            layers: LAYERS,
        }
    }

    pub fn layers(&self) -> &[LayerSpec; LAYER_COUNT] {
        &self.layers
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cells of `layer` that can contribute to a `viewport`-sized screen.
    pub fn visible_cells(&self, layer: usize, camera: Vec2, viewport: Vec2) -> CellRange {
        let shift = camera * self.layers[layer].parallax;
        let min = (-shift - Vec2::splat(self.margin)) / self.cell_size;
        let max = (-shift + viewport + Vec2::splat(self.margin)) / self.cell_size;
        CellRange {
            min_x: min.x.floor() as i32,
            max_x: max.x.floor() as i32,
            min_y: min.y.floor() as i32,
            max_y: max.y.floor() as i32,
        }
    }

    /// All stars of one cell, in index order.
    pub fn cell_stars(&self, layer: usize, cx: i32, cy: i32) -> Vec<StarDescriptor> {
        let spec = &self.layers[layer];
        let n = star_count(&self.hasher, spec, layer as u32, cx, cy);
        (0..n)
            .map(|i| StarDescriptor::derive(&self.hasher, spec, layer as u32, cx, cy, i, self.cell_size))
            .collect()
    }

    /// Every star descriptor visible for a camera offset, back layer first.
    pub fn visible_stars(&self, camera: Vec2, viewport: Vec2) -> Vec<StarDescriptor> {
        let mut out = Vec::new();
        for layer in 0..LAYER_COUNT {
            let range = self.visible_cells(layer, camera, viewport);
            for (cx, cy) in range.cells() {
                out.extend(self.cell_stars(layer, cx, cy));
            }
        }
        out
    }

    /// Clear `buffer` and fill it with this frame's stars, back layer first.
    ///
    /// When the visible stars outnumber the buffer, the capacity is shared
    /// out with [`layer_quotas`] so sparse front layers always fit. A layer
    /// over its quota keeps its special and ultra-special stars plus the
    /// normal stars with the lowest per-star roll. Returns the number written.
    pub fn render(&self, camera: Vec2, viewport: Vec2, time: f32, buffer: &mut StarBuffer) -> usize {
        buffer.clear();
        let visible: [Vec<StarDescriptor>; LAYER_COUNT] = std::array::from_fn(|layer| {
            let range = self.visible_cells(layer, camera, viewport);
            range.cells().flat_map(|(cx, cy)| self.cell_stars(layer, cx, cy)).collect()
        });
        let needs: [usize; LAYER_COUNT] = std::array::from_fn(|layer| visible[layer].len());
        let quotas = layer_quotas(needs, buffer.capacity());

        for (layer, stars) in visible.iter().enumerate() {
            let layer_camera = camera * self.layers[layer].parallax;
            let quota = quotas[layer];
            if quota >= stars.len() {
                for star in stars {
                    buffer.push(star.evaluate(time, layer_camera));
                }
                continue;
            }

            // Specials first, then the normal stars with the lowest rolls
            let mut kept: Vec<bool> = stars.iter().map(|s| s.kind != StarKind::Normal).collect();
            let specials = kept.iter().filter(|&&k| k).count();
            let mut ranked: Vec<(f32, usize)> = stars
                .iter()
                .enumerate()
                .filter(|(_, s)| s.kind == StarKind::Normal)
                .map(|(i, s)| (keep_roll(&self.hasher, s.layer, s.cell.0, s.cell.1, s.index), i))
                .collect();
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
            for &(_, i) in ranked.iter().take(quota.saturating_sub(specials)) {
                kept[i] = true;
            }
            let chosen = stars.iter().zip(&kept).filter(|(_, k)| **k).take(quota);
            for (star, _) in chosen {
                buffer.push(star.evaluate(time, layer_camera));
            }
        }
        buffer.instances.len()
    }
}

/// Split `capacity` star slots between layers. Layers are served from the
/// smallest need up, each taking at most an even share of what is left, so
/// a layer only loses stars when it needs more than its share.
pub fn layer_quotas(needs: [usize; LAYER_COUNT], capacity: usize) -> [usize; LAYER_COUNT] {
    let mut order: [usize; LAYER_COUNT] = std::array::from_fn(|layer| layer);
    order.sort_by_key(|&layer| needs[layer]);
    let mut quotas = [0; LAYER_COUNT];
    let mut remaining = capacity;
    for (served, &layer) in order.iter().enumerate() {
        let share = remaining / (LAYER_COUNT - served);
        quotas[layer] = needs[layer].min(share);
        remaining -= quotas[layer];
    }
    quotas
}

//! Overlay tessellation on top of lyon.
//!
//! Shapes are tessellated on the CPU into a flat, non-indexed triangle
//! list of `x, y, r, g, b, a` vertices. The map draws its barrier ring,
//! point markers and ship through this each frame; the web painter fills
//! the triangles on the canvas.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

/// Curve flattening tolerance in pixels.
const TOLERANCE: f32 = 0.5;

/// One overlay vertex, 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn tinted(p: lyon::math::Point, c: VectorColor) -> Self {
        Self { x: p.x, y: p.y, r: c.r, g: c.g, b: c.b, a: c.a }
    }
}

/// Straight (non-premultiplied) RGBA, components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Barrier ring at rest.
    pub const BARRIER: Self = Self::new(0.35, 0.75, 1.0, 0.55);
    /// Barrier ring while flashing after a hit.
    pub const BARRIER_FLASH: Self = Self::new(1.0, 0.25, 0.2, 0.9);
    pub const MARKER: Self = Self::new(0.95, 0.8, 0.35, 0.9);
    pub const MARKER_NEARBY: Self = Self::new(0.45, 1.0, 0.6, 1.0);
    pub const SHIP: Self = Self::new(0.85, 0.9, 1.0, 1.0);
    pub const SHIP_FLAME: Self = Self::new(1.0, 0.55, 0.15, 0.85);
}

/// Paints every vertex of a shape with one color.
struct Tint(VectorColor);

impl FillVertexConstructor<VectorVertex> for Tint {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::tinted(vertex.position(), self.0)
    }
}

impl StrokeVertexConstructor<VectorVertex> for Tint {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::tinted(vertex.position(), self.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Paint {
    Fill,
    Stroke(f32),
}

fn polyline(points: &[Vec2], closed: bool) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(points[0].x, points[0].y));
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(closed);
    builder.build()
}

fn circle(center: Vec2, radius: f32) -> Path {
    let mut builder = Path::builder();
    builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
    builder.build()
}

/// Per-frame overlay geometry, capped at `max_vertices`. A shape that
/// would overflow the cap is dropped whole, never clipped.
pub struct VectorState {
    fill: FillTessellator,
    stroke: StrokeTessellator,
    scratch: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    max_vertices: usize,
}

impl VectorState {
    pub fn new() -> Self {
        Self::with_capacity(16384)
    }

    pub fn with_capacity(max_vertices: usize) -> Self {
        Self {
            fill: FillTessellator::new(),
            stroke: StrokeTessellator::new(),
            scratch: VertexBuffers::new(),
            buffer: Vec::with_capacity(max_vertices * VectorVertex::FLOATS),
            max_vertices,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn vertices(&self) -> &[f32] {
        &self.buffer
    }

    /// Closed polygon, convex or concave.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: VectorColor) {
        if points.len() >= 3 {
            self.draw(&polyline(points, true), Paint::Fill, color);
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius > 0.0 {
            self.draw(&circle(center, radius), Paint::Fill, color);
        }
    }

    /// Open polyline.
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() >= 2 && width > 0.0 {
            self.draw(&polyline(points, false), Paint::Stroke(width), color);
        }
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: VectorColor) {
        if radius > 0.0 && width > 0.0 {
            self.draw(&circle(center, radius), Paint::Stroke(width), color);
        }
    }

    /// Arc of `sweep` radians starting at `start`, flattened to `segments`
    /// straight pieces.
    pub fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        sweep: f32,
        segments: usize,
        width: f32,
        color: VectorColor,
    ) {
        if radius <= 0.0 || segments == 0 {
            return;
        }
        let points: Vec<Vec2> = (0..=segments)
            .map(|i| center + Vec2::from_angle(start + sweep * i as f32 / segments as f32) * radius)
            .collect();
        self.stroke_polyline(&points, width, color);
    }

    fn draw(&mut self, path: &Path, paint: Paint, color: VectorColor) {
        let result = {
            let mut out = BuffersBuilder::new(&mut self.scratch, Tint(color));
            match paint {
                Paint::Fill => self
                    .fill
                    .tessellate_path(path, &FillOptions::tolerance(TOLERANCE), &mut out),
                Paint::Stroke(width) => self.stroke.tessellate_path(
                    path,
                    &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
                    &mut out,
                ),
            }
        };
        if result.is_ok() && self.vertex_count() + self.scratch.indices.len() <= self.max_vertices {
            for &i in &self.scratch.indices {
                let v = self.scratch.vertices[i as usize];
                self.buffer.extend_from_slice(bytemuck::cast_slice(&[v]));
            }
        }
        self.scratch.vertices.clear();
        self.scratch.indices.clear();
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_six_floats() {
        assert_eq!(std::mem::size_of::<VectorVertex>(), VectorVertex::STRIDE_BYTES);
    }

    #[test]
    fn triangle_fills_to_three_vertices() {
        let mut state = VectorState::new();
        let tri = [Vec2::ZERO, Vec2::new(100.0, 0.0), Vec2::new(50.0, 100.0)];
        state.fill_polygon(&tri, VectorColor::SHIP);
        assert_eq!(state.vertex_count(), 3);
        let v = state.vertices();
        assert_eq!(&v[2..6], &[0.85, 0.9, 1.0, 1.0]);
    }

    #[test]
    fn arcs_and_circles_stroke() {
        let mut state = VectorState::new();
        state.stroke_arc(Vec2::ZERO, 100.0, 0.0, 0.5, 6, 2.0, VectorColor::BARRIER);
        let arc = state.vertex_count();
        assert!(arc > 0);
        state.stroke_circle(Vec2::new(50.0, 50.0), 25.0, 1.5, VectorColor::MARKER);
        assert!(state.vertex_count() > arc);
        state.clear();
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn degenerate_shapes_produce_nothing() {
        let mut state = VectorState::new();
        state.fill_polygon(&[Vec2::ZERO, Vec2::ONE], VectorColor::WHITE);
        state.stroke_polyline(&[Vec2::ZERO], 1.0, VectorColor::WHITE);
        state.fill_circle(Vec2::ZERO, 0.0, VectorColor::WHITE);
        state.stroke_arc(Vec2::ZERO, 10.0, 0.0, 1.0, 0, 1.0, VectorColor::WHITE);
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn overflowing_shape_is_dropped() {
        let mut state = VectorState::with_capacity(4);
        let tri = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        state.fill_polygon(&tri, VectorColor::WHITE);
        state.fill_polygon(&tri, VectorColor::WHITE);
        assert_eq!(state.vertex_count(), 3);
    }
}

//! Screen-space overlay: the barrier ring, point markers and the ship.

use glam::Vec2;

use crate::systems::poi::{marker_position, PointOfInterest};
use crate::systems::vector::{VectorColor, VectorState};

const DASH_COUNT: usize = 48;
/// Fraction of each dash slot that is drawn.
const DASH_FILL: f32 = 0.6;
const DASH_SEGMENTS: usize = 5;
const RING_WIDTH: f32 = 2.0;
const RING_FLASH_WIDTH: f32 = 3.5;

const MARKER_RADIUS: f32 = 7.0;
const MARKER_HALO: f32 = 12.0;
/// Markers this far outside the viewport are still drawn.
const MARKER_CULL_MARGIN: f32 = 40.0;

const SHIP_NOSE: f32 = 14.0;
const SHIP_TAIL: f32 = 10.0;
const SHIP_HALF_WIDTH: f32 = 9.0;

/// Inputs for one overlay frame.
pub struct OverlayFrame<'a> {
    pub viewport: Vec2,
    pub camera: Vec2,
    /// Seconds.
    pub time: f32,
    /// 0 disables the ring.
    pub barrier_radius: f32,
    pub barrier_spin_deg_per_sec: f32,
    pub flashing: bool,
    pub points: &'a [PointOfInterest],
    pub nearby: Option<usize>,
    pub player: Vec2,
    pub scale: f32,
    pub world_size: Vec2,
    /// Degrees, 0 = nose up.
    pub heading: f32,
    pub thrusting: bool,
}

pub fn draw(vectors: &mut VectorState, frame: &OverlayFrame) {
    vectors.clear();
    let center = frame.viewport * 0.5;
    if frame.barrier_radius > 0.0 {
        draw_barrier(vectors, center + frame.camera, frame);
    }
    draw_markers(vectors, center, frame);
    draw_ship(vectors, center, frame.heading, frame.thrusting);
}

fn draw_barrier(vectors: &mut VectorState, origin: Vec2, frame: &OverlayFrame) {
    let (color, width) = if frame.flashing {
        (VectorColor::BARRIER_FLASH, RING_FLASH_WIDTH)
    } else {
        (VectorColor::BARRIER, RING_WIDTH)
    };
    let rotation = (frame.time * frame.barrier_spin_deg_per_sec).to_radians();
    let slot = std::f32::consts::TAU / DASH_COUNT as f32;
    for i in 0..DASH_COUNT {
        let start = rotation + i as f32 * slot;
        vectors.stroke_arc(origin, frame.barrier_radius, start, slot * DASH_FILL, DASH_SEGMENTS, width, color);
    }
}

fn draw_markers(vectors: &mut VectorState, center: Vec2, frame: &OverlayFrame) {
    let min = Vec2::splat(-MARKER_CULL_MARGIN);
    let max = frame.viewport + Vec2::splat(MARKER_CULL_MARGIN);
    for (i, point) in frame.points.iter().enumerate() {
        let at = marker_position(
            point.position(),
            frame.player,
            center,
            frame.scale,
            frame.world_size.x,
            frame.world_size.y,
        );
        if at.cmplt(min).any() || at.cmpgt(max).any() {
            continue;
        }
        if frame.nearby == Some(i) {
            let pulse = 1.0 + 0.25 * (frame.time * 4.0).sin();
            vectors.stroke_circle(at, MARKER_HALO * pulse, 1.5, VectorColor::MARKER_NEARBY);
            vectors.fill_circle(at, MARKER_RADIUS, VectorColor::MARKER_NEARBY);
        } else {
            vectors.fill_circle(at, MARKER_RADIUS, VectorColor::MARKER);
        }
    }
}

fn draw_ship(vectors: &mut VectorState, center: Vec2, heading: f32, thrusting: bool) {
    // heading 0 points up (screen -y), clockwise positive
    let h = heading.to_radians();
    let forward = Vec2::new(h.sin(), -h.cos());
    let right = Vec2::new(-forward.y, forward.x);

    let nose = center + forward * SHIP_NOSE;
    let left = center - forward * SHIP_TAIL - right * SHIP_HALF_WIDTH;
    let right_wing = center - forward * SHIP_TAIL + right * SHIP_HALF_WIDTH;
    vectors.fill_polygon(&[nose, right_wing, center - forward * (SHIP_TAIL * 0.5), left], VectorColor::SHIP);

    if thrusting {
        let base = center - forward * (SHIP_TAIL * 0.6);
        let flame = [
            base - right * 3.5,
            base + right * 3.5,
            base - forward * 9.0,
        ];
        vectors.fill_polygon(&flame, VectorColor::SHIP_FLAME);
    }
}

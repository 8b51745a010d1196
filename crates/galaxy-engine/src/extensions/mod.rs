// extensions/mod.rs
//
// Small animation helpers decoupled from the map state.

pub mod easing;
pub mod tween;

pub use easing::{approach_angle_deg, ease_vec2, shortest_angle_deg, Easing};
pub use tween::Tween;

use glam::Vec2;

use crate::api::types::GameEvent;
use crate::systems::poi::PointOfInterest;

// ── Game event kinds (shared buffer) ─────────────────────────────────

/// a = world x, b = world y, c = heading in degrees.
pub const EVENT_POSITION: f32 = 1.0;
/// a = nearby point index, or -1 for none.
pub const EVENT_NEARBY: f32 = 2.0;
/// a = clicked point index.
pub const EVENT_POINT_CLICKED: f32 = 3.0;
/// a = 1 shown, 0 dismissed.
pub const EVENT_NOTIFICATION: f32 = 4.0;
/// a = 1 flash on, 0 off.
pub const EVENT_FLASH: f32 = 5.0;
/// a, b = screen contact point.
pub const EVENT_COLLISION: f32 = 6.0;

/// Everything the map reports to its host, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Moved { position: Vec2, heading: f32 },
    NearbyChanged { index: Option<usize> },
    PointClicked { index: usize, point: PointOfInterest },
    NotificationShown { message: String },
    NotificationDismissed,
    FlashChanged { on: bool },
    Collision { screen_point: Vec2 },
}

impl MapEvent {
    /// Flat form for the shared buffer.
    pub fn to_game_event(&self) -> GameEvent {
        let (kind, a, b, c) = match self {
            MapEvent::Moved { position, heading } => (EVENT_POSITION, position.x, position.y, *heading),
            MapEvent::NearbyChanged { index } => {
                (EVENT_NEARBY, index.map_or(-1.0, |i| i as f32), 0.0, 0.0)
            }
            MapEvent::PointClicked { index, .. } => (EVENT_POINT_CLICKED, *index as f32, 0.0, 0.0),
            MapEvent::NotificationShown { .. } => (EVENT_NOTIFICATION, 1.0, 0.0, 0.0),
            MapEvent::NotificationDismissed => (EVENT_NOTIFICATION, 0.0, 0.0, 0.0),
            MapEvent::FlashChanged { on } => (EVENT_FLASH, if *on { 1.0 } else { 0.0 }, 0.0, 0.0),
            MapEvent::Collision { screen_point } => {
                (EVENT_COLLISION, screen_point.x, screen_point.y, 0.0)
            }
        };
        GameEvent { kind, a, b, c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_nearby_point_encodes_as_minus_one() {
        let ev = MapEvent::NearbyChanged { index: None }.to_game_event();
        assert_eq!(ev.kind, EVENT_NEARBY);
        assert_eq!(ev.a, -1.0);
    }

    #[test]
    fn position_carries_heading() {
        let ev = MapEvent::Moved { position: Vec2::new(3.0, 4.0), heading: 90.0 }.to_game_event();
        assert_eq!((ev.kind, ev.a, ev.b, ev.c), (EVENT_POSITION, 3.0, 4.0, 90.0));
    }
}

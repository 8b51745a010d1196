//! Fixed points of interest on the toroidal map.
//!
//! Points never move; only the player does. "Nearby" and marker placement
//! are derived from the player's world position each time they are asked.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::world::{toroidal_delta, toroidal_distance};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub image: String,
}

impl PointOfInterest {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

fn point(id: &str, x: f32, y: f32, name: &str, kind: &str, description: &str) -> PointOfInterest {
    PointOfInterest {
        id: id.into(),
        x,
        y,
        name: name.into(),
        kind: kind.into(),
        description: description.into(),
        image: format!("/images/locations/{}.png", id),
    }
}

/// The Xenopets locations shipped with the map.
pub fn default_points() -> Vec<PointOfInterest> {
    vec![
        point("home-base", 100.0, 100.0, "Home Base", "base",
            "Your pets' habitat and the center of explored space."),
        point("crystal-caverns", 60.0, 72.0, "Crystal Caverns", "dungeon",
            "Glittering tunnels where rare gems grow in the dark."),
        point("nebula-market", 142.0, 88.0, "Nebula Market", "shop",
            "Traders from every arm of the galaxy sell food and gear here."),
        point("stardust-arena", 118.0, 140.0, "Stardust Arena", "arena",
            "Pets battle for glory under a dome of captured starlight."),
        point("moonlit-grove", 74.0, 128.0, "Moonlit Grove", "nature",
            "A quiet forest moon where wild xenopets roam."),
        point("ancient-ruins", 30.0, 170.0, "Ancient Ruins", "dungeon",
            "Crumbling towers left behind by a vanished civilization."),
        point("comet-observatory", 172.0, 24.0, "Comet Observatory", "landmark",
            "Watch comets streak past and study the far reaches of the map."),
    ]
}

/// Index of the closest point strictly within `threshold` of `position`.
/// On equal distances the earlier point wins.
pub fn nearest_nearby(
    points: &[PointOfInterest],
    position: Vec2,
    threshold: f32,
    width: f32,
    height: f32,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = toroidal_distance(position, p.position(), width, height);
        if d >= threshold {
            continue;
        }
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Screen-space marker position. The player is always drawn at `center`.
pub fn marker_position(point: Vec2, player: Vec2, center: Vec2, scale: f32, width: f32, height: f32) -> Vec2 {
    center + toroidal_delta(player, point, width, height) * scale
}

/// Point set plus the derived nearby state.
#[derive(Debug, Clone)]
pub struct PointSet {
    points: Vec<PointOfInterest>,
    nearby: Option<usize>,
}

impl PointSet {
    pub fn new(points: Vec<PointOfInterest>) -> Self {
        Self { points, nearby: None }
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&PointOfInterest> {
        self.points.get(index)
    }

    pub fn nearby(&self) -> Option<usize> {
        self.nearby
    }

    /// Recompute the nearby point. Returns `Some(new)` when it changed.
    pub fn check_proximity(
        &mut self,
        position: Vec2,
        threshold: f32,
        width: f32,
        height: f32,
    ) -> Option<Option<usize>> {
        let next = nearest_nearby(&self.points, position, threshold, width, height);
        if next == self.nearby {
            return None;
        }
        self.nearby = next;
        Some(next)
    }

    /// Marker whose screen position is within `radius` of `screen`,
    /// closest first.
    pub fn hit_test(
        &self,
        screen: Vec2,
        player: Vec2,
        center: Vec2,
        scale: f32,
        radius: f32,
        width: f32,
        height: f32,
    ) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let marker = marker_position(p.position(), player, center, scale, width, height);
            let d = marker.distance(screen);
            if d > radius {
                continue;
            }
            match best {
                Some((_, bd)) if bd <= d => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new(default_points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: &str, x: f32, y: f32) -> PointOfInterest {
        point(id, x, y, id, "test", "")
    }

    #[test]
    fn nearby_uses_toroidal_distance() {
        let points = vec![at("edge", 198.0, 100.0)];
        assert_eq!(nearest_nearby(&points, Vec2::new(3.0, 100.0), 10.0, 200.0, 200.0), Some(0));
        assert_eq!(nearest_nearby(&points, Vec2::new(100.0, 100.0), 10.0, 200.0, 200.0), None);
    }

    #[test]
    fn closest_wins_and_ties_keep_first() {
        let points = vec![at("a", 105.0, 100.0), at("b", 95.0, 100.0), at("c", 102.0, 100.0)];
        assert_eq!(nearest_nearby(&points, Vec2::new(100.0, 100.0), 10.0, 200.0, 200.0), Some(2));
        let tied = vec![at("a", 105.0, 100.0), at("b", 95.0, 100.0)];
        assert_eq!(nearest_nearby(&tied, Vec2::new(100.0, 100.0), 10.0, 200.0, 200.0), Some(0));
    }

    #[test]
    fn threshold_is_exclusive() {
        let points = vec![at("a", 110.0, 100.0)];
        assert_eq!(nearest_nearby(&points, Vec2::new(100.0, 100.0), 10.0, 200.0, 200.0), None);
    }

    #[test]
    fn proximity_reports_changes_only() {
        let mut set = PointSet::new(vec![at("a", 100.0, 100.0)]);
        assert_eq!(set.check_proximity(Vec2::new(101.0, 100.0), 10.0, 200.0, 200.0), Some(Some(0)));
        assert_eq!(set.check_proximity(Vec2::new(102.0, 100.0), 10.0, 200.0, 200.0), None);
        assert_eq!(set.check_proximity(Vec2::new(150.0, 100.0), 10.0, 200.0, 200.0), Some(None));
    }

    #[test]
    fn markers_wrap_around_the_seam() {
        let m = marker_position(
            Vec2::new(1.0, 100.0),
            Vec2::new(199.0, 100.0),
            Vec2::new(400.0, 300.0),
            12.0,
            200.0,
            200.0,
        );
        assert!((m.x - 424.0).abs() < 1e-3);
        assert!((m.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn hit_test_finds_marker_under_pointer() {
        let set = PointSet::new(vec![at("a", 102.0, 100.0), at("b", 50.0, 50.0)]);
        let center = Vec2::new(400.0, 300.0);
        let player = Vec2::new(100.0, 100.0);
        assert_eq!(set.hit_test(Vec2::new(430.0, 305.0), player, center, 12.0, 28.0, 200.0, 200.0), Some(0));
        assert_eq!(set.hit_test(Vec2::new(600.0, 300.0), player, center, 12.0, 28.0, 200.0, 200.0), None);
    }

    #[test]
    fn default_points_serialize_with_type_field() {
        let points = default_points();
        assert!(!points.is_empty());
        let json = serde_json::to_string(&points[0]).unwrap();
        assert!(json.contains("\"type\":\"base\""));
    }
}

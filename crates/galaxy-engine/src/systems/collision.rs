//! Circular barrier around the map origin and the response to crossing it.
//!
//! The barrier lives in camera space: the ship sits at `-camera` relative
//! to the barrier center, so a proposal collides once `|camera|` reaches
//! the effective radius.

use glam::Vec2;

/// A rejected proposal. Ephemeral: consumed by the feedback cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The camera offset that was refused.
    pub proposed_camera: Vec2,
    /// `|proposed_camera|`.
    pub distance: f32,
    /// Unit vector from the barrier center through the contact point.
    pub normal: Vec2,
    /// Contact point relative to the barrier center.
    pub contact: Vec2,
    /// Contact point in screen pixels.
    pub screen_point: Vec2,
}

/// Do-not-cross ring. A radius of zero or less disables it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    pub radius: f32,
    pub margin: f32,
}

impl Barrier {
    pub fn new(radius: f32, margin: f32) -> Self {
        Self { radius, margin }
    }

    pub fn is_enabled(&self) -> bool {
        self.radius > 0.0
    }

    /// Boundary distance; the margin keeps the ship off the drawn ring.
    pub fn effective_radius(&self) -> f32 {
        (self.radius - self.margin).max(0.0)
    }

    /// Test a proposed camera offset. `viewport_center` is where the ship
    /// is drawn and is only used to place the screen contact point.
    pub fn test(&self, camera: Vec2, viewport_center: Vec2) -> Option<CollisionEvent> {
        if !self.is_enabled() {
            return None;
        }
        let distance = camera.length();
        let effective = self.effective_radius();
        if distance < effective {
            return None;
        }
        let normal = (-camera).try_normalize().unwrap_or(Vec2::NEG_X);
        let contact = normal * effective;
        Some(CollisionEvent {
            proposed_camera: camera,
            distance,
            normal,
            contact,
            screen_point: viewport_center + camera + contact,
        })
    }
}

/// What a single collision should trigger, after cooldowns are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub sparks_at: Vec2,
    /// Camera offset the repulsion tween should end at.
    pub repulsion_to: Vec2,
    pub play_sound: bool,
}

/// Rate limits for collision feedback. One per map instance.
///
/// Positional rejection happens on every violating proposal; this only
/// decides whether sparks/flash/repulsion/sound fire again while the ship
/// stays pinned against the ring.
#[derive(Debug, Clone, Default)]
pub struct CollisionResponder {
    cooldown_ms: f64,
    sound_interval_ms: f64,
    repulsion_force: f32,
    last_feedback_ms: Option<f64>,
    last_sound_ms: Option<f64>,
}

impl CollisionResponder {
    pub fn new(cooldown_ms: f64, sound_interval_ms: f64, repulsion_force: f32) -> Self {
        Self {
            cooldown_ms,
            sound_interval_ms,
            repulsion_force,
            last_feedback_ms: None,
            last_sound_ms: None,
        }
    }

    /// Decide the feedback for `event`. `camera` is the last committed offset.
    /// Returns `None` while the feedback cooldown is running.
    pub fn respond(&mut self, event: &CollisionEvent, camera: Vec2, now_ms: f64) -> Option<Feedback> {
        if let Some(last) = self.last_feedback_ms {
            if now_ms - last < self.cooldown_ms {
                return None;
            }
        }
        self.last_feedback_ms = Some(now_ms);

        let play_sound = match self.last_sound_ms {
            Some(last) if now_ms - last < self.sound_interval_ms => false,
            _ => {
                self.last_sound_ms = Some(now_ms);
                true
            }
        };

        Some(Feedback {
            sparks_at: event.screen_point,
            repulsion_to: camera + event.normal * self.repulsion_force,
            play_sound,
        })
    }
}

/// Single on-screen notification slot. Repeat triggers restart the
/// dismissal timer (owned by the scheduler) rather than stacking.
#[derive(Debug, Clone, Default)]
pub struct NotificationSlot {
    visible: bool,
}

impl NotificationSlot {
    /// Returns true when the notification was not already showing.
    pub fn show(&mut self) -> bool {
        !std::mem::replace(&mut self.visible, true)
    }

    /// Returns true when a visible notification was dismissed.
    pub fn dismiss(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barrier() -> Barrier {
        Barrier::new(1200.0, 5.0)
    }

    #[test]
    fn boundary_sits_at_effective_radius() {
        let b = barrier();
        assert!(b.test(Vec2::new(1194.0, 0.0), Vec2::ZERO).is_none());
        assert!(b.test(Vec2::new(0.0, -1196.0), Vec2::ZERO).is_some());
        assert!(b.test(Vec2::new(1195.0, 0.0), Vec2::ZERO).is_some());
    }

    #[test]
    fn contact_points_back_toward_ship() {
        let b = barrier();
        let ev = b.test(Vec2::new(1300.0, 0.0), Vec2::new(400.0, 300.0)).unwrap();
        assert_eq!(ev.normal, Vec2::new(-1.0, 0.0));
        assert!((ev.contact.x + 1195.0).abs() < 1e-3);
        // center + camera + contact
        assert!((ev.screen_point.x - (400.0 + 1300.0 - 1195.0)).abs() < 1e-3);
        assert!((ev.screen_point.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn disabled_barrier_never_collides() {
        let b = Barrier::new(0.0, 5.0);
        assert!(b.test(Vec2::new(1e6, 1e6), Vec2::ZERO).is_none());
    }

    #[test]
    fn repulsion_pushes_camera_inward() {
        let b = barrier();
        let ev = b.test(Vec2::new(0.0, 1200.0), Vec2::ZERO).unwrap();
        let mut r = CollisionResponder::new(300.0, 500.0, 60.0);
        let fb = r.respond(&ev, Vec2::new(0.0, 1190.0), 0.0).unwrap();
        assert!((fb.repulsion_to.y - 1130.0).abs() < 1e-3);
        assert!(fb.play_sound);
    }

    #[test]
    fn feedback_and_sound_are_rate_limited() {
        let b = barrier();
        let ev = b.test(Vec2::new(1200.0, 0.0), Vec2::ZERO).unwrap();
        let mut r = CollisionResponder::new(300.0, 500.0, 60.0);
        assert!(r.respond(&ev, Vec2::ZERO, 0.0).is_some());
        assert!(r.respond(&ev, Vec2::ZERO, 100.0).is_none());
        let second = r.respond(&ev, Vec2::ZERO, 350.0).unwrap();
        assert!(!second.play_sound, "sound interval still running");
        let third = r.respond(&ev, Vec2::ZERO, 700.0).unwrap();
        assert!(third.play_sound);
    }

    #[test]
    fn notification_slot_coalesces() {
        let mut slot = NotificationSlot::default();
        assert!(slot.show());
        assert!(!slot.show());
        assert!(slot.dismiss());
        assert!(!slot.dismiss());
    }
}

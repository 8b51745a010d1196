//! Drag, flick-and-glide momentum, and ship heading.
//!
//! Everything here is free of DOM and clock types: a pointer delta (and
//! the current world state) goes in, a proposal or a collision comes out.
//! The caller commits accepted proposals and runs the feedback for
//! rejected ones.

use glam::Vec2;

use crate::core::world::{Proposal, WorldState};
use crate::extensions::easing::approach_angle_deg;
use crate::systems::collision::{Barrier, CollisionEvent};

/// Outcome of validating a single camera delta against the barrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovePlan {
    Commit(Proposal),
    Blocked(CollisionEvent),
}

/// Propose `delta` and test the result. Never mutates `world`.
pub fn plan_move(world: &WorldState, delta: Vec2, barrier: &Barrier, viewport_center: Vec2) -> MovePlan {
    let proposal = world.propose(delta);
    match barrier.test(proposal.camera, viewport_center) {
        Some(collision) => MovePlan::Blocked(collision),
        None => MovePlan::Commit(proposal),
    }
}

/// Ship heading in degrees, [0, 360) with 0 = nose up, for a pointer
/// movement `delta`. The ship faces away from the drag direction.
pub fn heading_for(delta: Vec2) -> f32 {
    ((-delta.y).atan2(-delta.x).to_degrees() + 90.0).rem_euclid(360.0)
}

/// Result of one pointer-move or momentum step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Nothing to do (not dragging, zero delta, or momentum at rest).
    Idle,
    /// The proposal passed and has been committed.
    Moved(Proposal),
    /// The proposal was rejected; velocity is already zero.
    Blocked(CollisionEvent),
}

/// What a pointer-up turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    /// No movement between down and up.
    pub click: bool,
    /// Residual velocity is large enough to glide.
    pub glide: bool,
}

#[derive(Debug, Clone)]
pub struct Controller {
    max_velocity: f32,
    /// Weight of the newest velocity sample.
    blend: f32,
    friction: f32,
    epsilon: f32,
    smoothing: f32,

    dragging: bool,
    has_moved: bool,
    last_pointer: Vec2,
    gliding: bool,

    target_heading: f32,
    heading: f32,
}

impl Controller {
    pub fn new(max_velocity: f32, blend: f32, friction: f32, epsilon: f32, smoothing: f32) -> Self {
        Self {
            max_velocity,
            blend,
            friction,
            epsilon,
            smoothing,
            dragging: false,
            has_moved: false,
            last_pointer: Vec2::ZERO,
            gliding: false,
            target_heading: 0.0,
            heading: 0.0,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn is_gliding(&self) -> bool {
        self.gliding
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn target_heading(&self) -> f32 {
        self.target_heading
    }

    /// Begin a drag. Zeroes velocity and cancels any glide.
    pub fn pointer_down(&mut self, world: &mut WorldState, at: Vec2) {
        self.dragging = true;
        self.has_moved = false;
        self.last_pointer = at;
        self.gliding = false;
        world.velocity = Vec2::ZERO;
    }

    /// Track the pointer. While dragging, the delta since the last sample
    /// is validated and committed, or rejected.
    pub fn pointer_move(
        &mut self,
        world: &mut WorldState,
        barrier: &Barrier,
        viewport_center: Vec2,
        at: Vec2,
    ) -> Step {
        if !self.dragging {
            return Step::Idle;
        }
        let delta = at - self.last_pointer;
        self.last_pointer = at;
        if delta == Vec2::ZERO {
            return Step::Idle;
        }
        self.has_moved = true;

        let sample = delta.clamp(Vec2::splat(-self.max_velocity), Vec2::splat(self.max_velocity));
        let blended = world.velocity * (1.0 - self.blend) + sample * self.blend;

        match plan_move(world, delta, barrier, viewport_center) {
            MovePlan::Commit(proposal) => {
                world.commit(proposal);
                world.velocity = blended;
                self.target_heading = heading_for(delta);
                Step::Moved(proposal)
            }
            MovePlan::Blocked(collision) => {
                self.halt(world);
                Step::Blocked(collision)
            }
        }
    }

    /// End a drag. Returns `None` when no drag was in progress, so a
    /// duplicate pointer-up from a second listener is harmless.
    pub fn pointer_up(&mut self, world: &mut WorldState) -> Option<Release> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        let click = !self.has_moved;
        if click {
            world.velocity = Vec2::ZERO;
        }
        let glide = world.velocity.length() > self.epsilon;
        self.gliding = glide;
        Some(Release { click, glide })
    }

    /// One momentum tick: decay, then validate and commit the decayed
    /// velocity as a camera delta. Stops at rest or at the first collision.
    pub fn momentum_step(&mut self, world: &mut WorldState, barrier: &Barrier, viewport_center: Vec2) -> Step {
        if !self.gliding || self.dragging {
            self.gliding = false;
            return Step::Idle;
        }
        world.velocity *= self.friction;
        if world.velocity.length() <= self.epsilon {
            world.velocity = Vec2::ZERO;
            self.gliding = false;
            return Step::Idle;
        }
        match plan_move(world, world.velocity, barrier, viewport_center) {
            MovePlan::Commit(proposal) => {
                world.commit(proposal);
                Step::Moved(proposal)
            }
            MovePlan::Blocked(collision) => {
                self.halt(world);
                Step::Blocked(collision)
            }
        }
    }

    /// Zero velocity and stop gliding. The drag itself continues.
    pub fn halt(&mut self, world: &mut WorldState) {
        world.velocity = Vec2::ZERO;
        self.gliding = false;
    }

    /// Ease the drawn heading toward the target along the shorter arc.
    pub fn smooth_heading(&mut self) -> f32 {
        self.heading = approach_angle_deg(self.heading, self.target_heading, self.smoothing);
        self.heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Vec2 = Vec2::new(400.0, 300.0);

    fn setup() -> (Controller, WorldState, Barrier) {
        (
            Controller::new(40.0, 0.8, 0.95, 0.05, 0.15),
            WorldState::new(200.0, 200.0, 12.0, Vec2::new(100.0, 100.0)),
            Barrier::new(1200.0, 5.0),
        )
    }

    #[test]
    fn drag_commits_and_sets_heading() {
        let (mut c, mut world, barrier) = setup();
        c.pointer_down(&mut world, Vec2::new(500.0, 300.0));
        let step = c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(380.0, 300.0));
        assert!(matches!(step, Step::Moved(_)));
        assert!((world.position().x - 110.0).abs() < 1e-4);
        assert!((c.target_heading() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn heading_points_against_drag() {
        // dragging down moves the ship up
        assert!((heading_for(Vec2::new(0.0, 10.0)) - 0.0).abs() < 1e-4);
        assert!((heading_for(Vec2::new(10.0, 0.0)) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn velocity_sample_is_clamped_and_blended() {
        let (mut c, mut world, barrier) = setup();
        c.pointer_down(&mut world, Vec2::ZERO);
        c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(100.0, -10.0));
        assert!((world.velocity.x - 32.0).abs() < 1e-4);
        assert!((world.velocity.y + 8.0).abs() < 1e-4);
    }

    #[test]
    fn click_leaves_velocity_zero() {
        let (mut c, mut world, _) = setup();
        world.velocity = Vec2::new(3.0, 3.0);
        c.pointer_down(&mut world, Vec2::new(10.0, 10.0));
        let release = c.pointer_up(&mut world).unwrap();
        assert!(release.click);
        assert!(!release.glide);
        assert_eq!(world.velocity, Vec2::ZERO);
    }

    #[test]
    fn duplicate_events_are_harmless() {
        let (mut c, mut world, barrier) = setup();
        c.pointer_down(&mut world, Vec2::ZERO);
        c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(5.0, 0.0));
        let camera = world.camera();
        assert_eq!(c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(5.0, 0.0)), Step::Idle);
        assert_eq!(world.camera(), camera);
        assert!(c.pointer_up(&mut world).is_some());
        assert!(c.pointer_up(&mut world).is_none());
    }

    #[test]
    fn blocked_move_does_not_commit() {
        let (mut c, mut world, barrier) = setup();
        c.pointer_down(&mut world, Vec2::ZERO);
        c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(20.0, 0.0));
        let before = (world.camera(), world.position());
        let step = c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(1300.0, 0.0));
        assert!(matches!(step, Step::Blocked(_)));
        assert_eq!((world.camera(), world.position()), before);
        assert_eq!(world.velocity, Vec2::ZERO);
        assert!(c.is_dragging());
    }

    #[test]
    fn momentum_terminates() {
        let mut c = Controller::new(40.0, 0.8, 0.995, 0.001, 0.15);
        let mut world = WorldState::new(200.0, 200.0, 12.0, Vec2::new(100.0, 100.0));
        let barrier = Barrier::new(0.0, 0.0);
        c.pointer_down(&mut world, Vec2::ZERO);
        c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(1.0, 0.0));
        world.velocity = Vec2::new(1.0, 0.0);
        assert!(c.pointer_up(&mut world).unwrap().glide);

        let mut ticks = 0;
        while c.momentum_step(&mut world, &barrier, CENTER) != Step::Idle {
            ticks += 1;
            assert!(ticks < 2000, "glide never stopped");
        }
        // 0.995^n <= 0.001  =>  n ~ 1378
        assert!(ticks > 1300);
        assert!(!c.is_gliding());
        assert_eq!(world.velocity, Vec2::ZERO);
    }

    #[test]
    fn glide_into_barrier_stops_at_once() {
        let (mut c, mut world, barrier) = setup();
        c.pointer_down(&mut world, Vec2::ZERO);
        c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(30.0, 0.0));
        world.commit(world.propose_camera(Vec2::new(1180.0, 0.0)));
        world.velocity = Vec2::new(30.0, 0.0);
        c.pointer_up(&mut world);

        let camera = world.camera();
        let step = c.momentum_step(&mut world, &barrier, CENTER);
        assert!(matches!(step, Step::Blocked(_)));
        assert_eq!(world.velocity, Vec2::ZERO);
        assert_eq!(world.camera(), camera);
        assert_eq!(c.momentum_step(&mut world, &barrier, CENTER), Step::Idle);
    }

    #[test]
    fn heading_smoothing_takes_short_arc() {
        let (mut c, mut world, barrier) = setup();
        c.pointer_down(&mut world, Vec2::ZERO);
        // target 270 from 0: the short way is -90
        c.pointer_move(&mut world, &barrier, CENTER, Vec2::new(10.0, 0.0));
        let h = c.smooth_heading();
        assert!(h < 0.0 || h > 180.0, "went the long way: {}", h);
    }
}

//! The galaxy map: world, controller, barrier, starfield and points of
//! interest wired together behind the `Game` trait.
//!
//! One `GalaxyMap` is created per mounted view. Every piece of mutable state
//! (rate limits, timers, the glide, the repulsion tween) lives on the
//! instance, so two maps never share anything.

pub mod events;
#[cfg(feature = "vectors")]
pub mod overlay;

use std::collections::VecDeque;

use glam::Vec2;
use log::{debug, info};

use crate::api::game::{EngineContext, Game, GameConfig};
use crate::api::types::SoundEvent;
use crate::config::MapConfig;
use crate::core::scheduler::Scheduler;
use crate::core::world::WorldState;
use crate::error::MapResult;
use crate::extensions::{Easing, Tween};
use crate::input::controller::{plan_move, Controller, MovePlan, Step};
use crate::input::queue::{InputEvent, InputQueue, CUSTOM_RESIZE};
use crate::persist::{Persistence, PositionStore};
use crate::systems::collision::{Barrier, CollisionEvent, CollisionResponder, NotificationSlot};
use crate::systems::poi::{PointOfInterest, PointSet};
use crate::systems::starfield::Starfield;

pub use events::MapEvent;

/// Pending host events kept when nobody drains them.
const MAX_PENDING_EVENTS: usize = 256;

/// Recurring tasks and one-shot timers owned by the map.
/// Tasks due in the same tick run in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Job {
    HeadingSmoothing,
    MomentumDecay,
    ProximityCheck,
    PositionSave,
    StarfieldRedraw,
    CollisionFlash,
    NotificationDismiss,
}

pub struct GalaxyMap {
    config: MapConfig,
    world: WorldState,
    controller: Controller,
    barrier: Barrier,
    responder: CollisionResponder,
    notification: NotificationSlot,
    flashing: bool,
    repulsion: Option<Tween>,
    /// Set when the tween was created during this update; it starts moving
    /// on the next one.
    repulsion_fresh: bool,
    starfield: Starfield,
    points: PointSet,
    persistence: Persistence,
    scheduler: Scheduler<Job>,
    /// Events not yet taken by `drain_events`, oldest first.
    events: VecDeque<MapEvent>,
    /// Events emitted during the current init or update.
    emitted: Vec<MapEvent>,
    last_tick_ms: f64,
    moved: bool,
    active: bool,
}

impl GalaxyMap {
    /// Build a map and restore the player's position from `store`.
    pub fn new(config: MapConfig, store: Box<dyn PositionStore>) -> Self {
        let persistence = Persistence::new(store);
        let start = persistence.restore(config.world_width, config.world_height);
        Self {
            world: WorldState::new(config.world_width, config.world_height, config.scale_factor, start),
            controller: Controller::new(
                config.max_velocity,
                config.velocity_blend,
                config.friction,
                config.velocity_epsilon,
                config.heading_smoothing,
            ),
            barrier: Barrier::new(config.barrier_radius, config.barrier_margin),
            responder: CollisionResponder::new(
                config.feedback_cooldown_ms,
                config.collision_sound_interval_ms,
                config.repulsion_force,
            ),
            notification: NotificationSlot::default(),
            flashing: false,
            repulsion: None,
            repulsion_fresh: false,
            starfield: Starfield::new(config.star_seed, config.star_cell_size, config.star_margin),
            points: PointSet::default(),
            persistence,
            scheduler: Scheduler::new(),
            events: VecDeque::new(),
            emitted: Vec::new(),
            last_tick_ms: 0.0,
            moved: false,
            active: false,
            config,
        }
    }

    /// Parse and validate a JSON config, then build the map.
    pub fn from_json(json: &str, store: Box<dyn PositionStore>) -> MapResult<Self> {
        Ok(Self::new(MapConfig::from_json(json)?, store))
    }

    /// Replace the default Xenopets locations.
    pub fn with_points(mut self, points: Vec<PointOfInterest>) -> Self {
        self.points = PointSet::new(points);
        self
    }

    pub fn map_config(&self) -> &MapConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn position(&self) -> Vec2 {
        self.world.position()
    }

    pub fn camera(&self) -> Vec2 {
        self.world.camera()
    }

    pub fn velocity(&self) -> Vec2 {
        self.world.velocity
    }

    pub fn heading(&self) -> f32 {
        self.controller.heading()
    }

    pub fn target_heading(&self) -> f32 {
        self.controller.target_heading()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    pub fn notification_visible(&self) -> bool {
        self.notification.is_visible()
    }

    pub fn points(&self) -> &[PointOfInterest] {
        self.points.points()
    }

    pub fn nearby(&self) -> Option<&PointOfInterest> {
        self.points.nearby().and_then(|i| self.points.get(i))
    }

    pub fn scheduler(&self) -> &Scheduler<Job> {
        &self.scheduler
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain(..).collect()
    }

    fn push_event(&mut self, event: MapEvent) {
        self.emitted.push(event);
    }

    /// Forward this step's events to the shared buffer, then queue them for
    /// `drain_events`, dropping the oldest past `MAX_PENDING_EVENTS`.
    fn flush_events(&mut self, ctx: &mut EngineContext) {
        for event in self.emitted.drain(..) {
            ctx.emit_event(event.to_game_event());
            if self.events.len() >= MAX_PENDING_EVENTS {
                self.events.pop_front();
            }
            self.events.push_back(event);
        }
    }

    // ── Input ────────────────────────────────────────────────────────

    fn handle_input(&mut self, ctx: &mut EngineContext, event: &InputEvent, now_ms: f64) {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.repulsion = None;
                self.scheduler.stop(Job::MomentumDecay);
                self.controller.pointer_down(&mut self.world, Vec2::new(x, y));
                ctx.emit_sound(SoundEvent::ENGINE_START);
            }
            InputEvent::PointerMove { x, y } => {
                let center = ctx.viewport_center();
                match self.controller.pointer_move(&mut self.world, &self.barrier, center, Vec2::new(x, y)) {
                    Step::Moved(_) => self.moved = true,
                    Step::Blocked(collision) => self.collide(ctx, &collision, now_ms),
                    Step::Idle => {}
                }
            }
            InputEvent::PointerUp { x, y } => {
                let Some(release) = self.controller.pointer_up(&mut self.world) else {
                    return;
                };
                ctx.emit_sound(SoundEvent::ENGINE_STOP);
                if release.click {
                    self.click(ctx, Vec2::new(x, y));
                } else {
                    self.persistence.save_if_changed(self.world.position());
                }
                if release.glide {
                    self.scheduler.start(Job::MomentumDecay, 0.0, now_ms);
                }
            }
            InputEvent::Custom { kind: CUSTOM_RESIZE, a, b, .. } => {
                if a > 0.0 && b > 0.0 {
                    ctx.viewport = Vec2::new(a, b);
                }
            }
            InputEvent::Custom { .. } => {}
        }
    }

    fn click(&mut self, ctx: &EngineContext, at: Vec2) {
        let hit = self.points.hit_test(
            at,
            self.world.position(),
            ctx.viewport_center(),
            self.world.scale(),
            self.config.point_hit_radius,
            self.world.width(),
            self.world.height(),
        );
        if let Some(index) = hit {
            if let Some(point) = self.points.get(index).cloned() {
                info!("Point clicked: {}", point.id);
                self.push_event(MapEvent::PointClicked { index, point });
            }
        }
    }

    // ── Collision feedback ───────────────────────────────────────────

    /// Positional rejection has already happened; this runs the
    /// (cooldown-gated) feedback cycle.
    fn collide(&mut self, ctx: &mut EngineContext, collision: &CollisionEvent, now_ms: f64) {
        self.scheduler.stop(Job::MomentumDecay);
        self.controller.halt(&mut self.world);

        let Some(feedback) = self.responder.respond(collision, self.world.camera(), now_ms) else {
            return;
        };
        debug!(
            "Barrier hit at distance {:.1}, contact ({:.1}, {:.1})",
            collision.distance, feedback.sparks_at.x, feedback.sparks_at.y
        );

        if !self.flashing {
            self.flashing = true;
            self.push_event(MapEvent::FlashChanged { on: true });
        }
        self.scheduler.arm(Job::CollisionFlash, self.config.flash_duration_ms, now_ms);

        ctx.effects.spawn_sparks(
            feedback.sparks_at,
            self.config.spark_count,
            (self.config.spark_speed_min, self.config.spark_speed_max),
            self.config.spark_lifetime_ms,
        );

        self.repulsion = Some(Tween::new(
            self.world.camera(),
            feedback.repulsion_to,
            self.config.repulsion_duration_ms,
            Easing::QuadOut,
        ));
        self.repulsion_fresh = true;

        if feedback.play_sound {
            ctx.emit_sound(SoundEvent::COLLISION);
        }

        if self.notification.show() {
            self.push_event(MapEvent::NotificationShown {
                message: self.config.collision_message.clone(),
            });
        }
        self.scheduler.arm(Job::NotificationDismiss, self.config.notification_duration_ms, now_ms);

        self.push_event(MapEvent::Collision {
            screen_point: feedback.sparks_at,
        });
    }

    /// Apply this tick's slice of the repulsion tween as a validated delta,
    /// so it composes with a drag in progress.
    fn advance_repulsion(&mut self, ctx: &EngineContext, dt_ms: f64) {
        if self.repulsion_fresh {
            return;
        }
        let Some(tween) = self.repulsion.as_mut() else {
            return;
        };
        let before = tween.value();
        let after = tween.advance(dt_ms);
        let done = tween.is_complete();
        match plan_move(&self.world, after - before, &self.barrier, ctx.viewport_center()) {
            MovePlan::Commit(proposal) => {
                self.world.commit(proposal);
                self.moved = true;
                if done {
                    self.repulsion = None;
                }
            }
            MovePlan::Blocked(_) => self.repulsion = None,
        }
    }

    // ── Scheduled jobs ───────────────────────────────────────────────

    fn run_job(&mut self, ctx: &mut EngineContext, job: Job, now_ms: f64) {
        match job {
            Job::HeadingSmoothing => {
                self.controller.smooth_heading();
            }
            Job::MomentumDecay => {
                let center = ctx.viewport_center();
                match self.controller.momentum_step(&mut self.world, &self.barrier, center) {
                    Step::Moved(_) => self.moved = true,
                    Step::Blocked(collision) => self.collide(ctx, &collision, now_ms),
                    Step::Idle => {
                        self.scheduler.stop(Job::MomentumDecay);
                    }
                }
            }
            Job::ProximityCheck => self.check_proximity(),
            Job::PositionSave => {
                if !self.controller.is_dragging() {
                    self.persistence.save_if_changed(self.world.position());
                }
            }
            Job::StarfieldRedraw => self.redraw(ctx),
            Job::CollisionFlash => {
                if self.flashing {
                    self.flashing = false;
                    self.push_event(MapEvent::FlashChanged { on: false });
                }
            }
            Job::NotificationDismiss => {
                if self.notification.dismiss() {
                    self.push_event(MapEvent::NotificationDismissed);
                }
            }
        }
    }

    fn check_proximity(&mut self) {
        let changed = self.points.check_proximity(
            self.world.position(),
            self.config.nearby_threshold,
            self.world.width(),
            self.world.height(),
        );
        if let Some(index) = changed {
            if let Some(point) = index.and_then(|i| self.points.get(i)) {
                debug!("Nearby: {}", point.name);
            }
            self.push_event(MapEvent::NearbyChanged { index });
        }
    }

    fn redraw(&mut self, ctx: &mut EngineContext) {
        let time = ctx.clock.seconds();
        self.starfield.render(self.world.camera(), ctx.viewport, time, &mut ctx.stars);

        #[cfg(feature = "vectors")]
        overlay::draw(
            &mut ctx.vectors,
            &overlay::OverlayFrame {
                viewport: ctx.viewport,
                camera: self.world.camera(),
                time,
                barrier_radius: if self.barrier.is_enabled() { self.barrier.radius } else { 0.0 },
                barrier_spin_deg_per_sec: self.config.barrier_spin_deg_per_sec,
                flashing: self.flashing,
                points: self.points.points(),
                nearby: self.points.nearby(),
                player: self.world.position(),
                scale: self.world.scale(),
                world_size: Vec2::new(self.world.width(), self.world.height()),
                heading: self.controller.heading(),
                thrusting: self.world.velocity.length() > self.config.velocity_epsilon,
            },
        );
    }
}

impl Game for GalaxyMap {
    fn config(&self) -> GameConfig {
        GameConfig {
            effects_seed: self.config.effects_seed,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let now = ctx.clock.now_ms();
        self.last_tick_ms = now;
        self.scheduler.start(Job::HeadingSmoothing, 0.0, now);
        self.scheduler.start(Job::StarfieldRedraw, 0.0, now);
        self.scheduler.start(Job::ProximityCheck, self.config.proximity_interval_ms, now);
        self.scheduler.start(Job::PositionSave, self.config.save_interval_ms, now);
        self.persistence.mark_saved(self.world.position());
        self.check_proximity();
        self.flush_events(ctx);
        self.active = true;
        let p = self.world.position();
        info!("Galaxy map started at ({:.1}, {:.1})", p.x, p.y);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if !self.active {
            return;
        }
        let now = ctx.clock.now_ms();
        let dt_ms = (now - self.last_tick_ms).max(0.0);
        self.last_tick_ms = now;
        self.moved = false;

        for event in input.iter() {
            self.handle_input(ctx, event, now);
        }

        if dt_ms > 0.0 {
            self.advance_repulsion(ctx, dt_ms);

            for job in self.scheduler.fired(now) {
                self.run_job(ctx, job, now);
            }
            for job in self.scheduler.due(now) {
                self.run_job(ctx, job, now);
            }
        } else if self.moved {
            // Input-only update: no time passed, but the view must follow
            self.redraw(ctx);
        }

        if self.world.recenter(self.config.recenter_threshold) {
            debug!("Camera re-centered to ({:.1}, {:.1})", self.world.camera().x, self.world.camera().y);
        }

        if self.moved {
            self.push_event(MapEvent::Moved {
                position: self.world.position(),
                heading: self.controller.heading(),
            });
        }

        self.repulsion_fresh = false;
        self.flush_events(ctx);
    }

    fn teardown(&mut self, ctx: &mut EngineContext) {
        if !self.active {
            return;
        }
        self.active = false;
        self.scheduler.cancel_all();
        self.repulsion = None;
        self.repulsion_fresh = false;
        self.controller.halt(&mut self.world);
        self.persistence.save(self.world.position());
        ctx.effects.clear();
        info!("Galaxy map torn down");
    }
}

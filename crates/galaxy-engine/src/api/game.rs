use glam::Vec2;

use crate::api::types::{GameEvent, SoundEvent};
use crate::core::time::VirtualClock;
use crate::input::queue::InputQueue;
use crate::renderer::instance::StarBuffer;
use crate::systems::effects::EffectsState;
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorState;

/// Runner-level configuration, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Initial viewport width in CSS pixels, until the first resize.
    pub viewport_width: f32,
    /// Initial viewport height in CSS pixels.
    pub viewport_height: f32,
    /// Maximum star instances per frame (default: 4096).
    pub max_stars: usize,
    /// Maximum live sparks (default: 256).
    pub max_sparks: usize,
    /// Maximum overlay vertices (default: 16384).
    pub max_vector_vertices: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Seed for spark randomness.
    pub effects_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            max_stars: 4096,
            max_sparks: 256,
            max_vector_vertices: 16384,
            max_sounds: 32,
            max_events: 32,
            effects_seed: 42,
        }
    }
}

/// The contract between a simulation and the runner that drives it.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Restore state and start recurring work.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. `ctx.clock` has already been advanced, except when a
    /// frame ran no step: then the runner calls this with the clock
    /// unchanged so queued input is still handled in that frame.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Stop all recurring work and flush state. Called once on unmount.
    fn teardown(&mut self, _ctx: &mut EngineContext) {}
}

/// Mutable access to engine state, passed to `Game::init` and `Game::update`.
pub struct EngineContext {
    pub clock: VirtualClock,
    /// Canvas size in CSS pixels.
    pub viewport: Vec2,
    pub effects: EffectsState,
    pub stars: StarBuffer,
    #[cfg(feature = "vectors")]
    pub vectors: VectorState,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    max_sounds: usize,
    max_events: usize,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            clock: VirtualClock::new(),
            viewport: Vec2::new(config.viewport_width, config.viewport_height),
            effects: EffectsState::with_capacity(config.effects_seed, config.max_sparks),
            stars: StarBuffer::with_capacity(config.max_stars),
            #[cfg(feature = "vectors")]
            vectors: VectorState::with_capacity(config.max_vector_vertices),
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            max_sounds: config.max_sounds,
            max_events: config.max_events,
        }
    }

    pub fn viewport_center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Emit a sound event. Dropped once the frame's sound slots are full.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        if self.sounds.len() < self.max_sounds {
            self.sounds.push(event);
        }
    }

    /// Emit a game event. Dropped once the frame's event slots are full.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() < self.max_events {
            self.events.push(event);
        }
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

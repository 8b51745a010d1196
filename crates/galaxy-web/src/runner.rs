use galaxy_engine::bridge::protocol::{
    HEADER_EVENT_COUNT, HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_SOUND_COUNT,
    HEADER_SPARK_COUNT, HEADER_STAR_COUNT, HEADER_TIME, HEADER_VECTOR_VERTEX_COUNT,
    HEADER_VIEWPORT_HEIGHT, HEADER_VIEWPORT_WIDTH,
};
use galaxy_engine::{
    EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue, ProtocolLayout,
    SoundEvent,
};
use log::warn;

/// Generic runner that wires a `Game` to the browser frame loop.
///
/// The exported free functions in `lib.rs` keep one runner in a
/// `thread_local!`, because wasm-bindgen cannot export generic structs.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    torn_down: bool,
    frame_counter: u32,
    header: [f32; HEADER_FLOATS],
    /// Flat buffer of sound event IDs for shared-buffer reads.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);
        let mut header = [0.0; HEADER_FLOATS];
        layout.write_capacities(&mut header);

        Self {
            ctx: EngineContext::new(&config),
            input: InputQueue::new(),
            timestep: FixedTimestep::new(config.fixed_dt),
            sound_buffer: Vec::with_capacity(config.max_sounds),
            game,
            layout,
            config,
            initialized: false,
            torn_down: false,
            frame_counter: 0,
            header,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    pub fn push_input(&mut self, event: InputEvent) {
        if !self.torn_down {
            self.input.push(event);
        }
    }

    /// Run one animation frame: fixed steps, then pack shared buffers.
    /// `dt` is the frame delta in seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized || self.torn_down {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        let step_dt = self.timestep.dt();
        if steps == 0 && !self.input.is_empty() {
            // Input never waits for a later frame
            self.game.update(&mut self.ctx, &self.input);
            self.consume_input();
        }
        for _ in 0..steps {
            self.ctx.clock.advance(step_dt);
            self.game.update(&mut self.ctx, &self.input);
            // Queued input is seen by exactly one step
            self.consume_input();
            self.ctx.effects.tick(step_dt);
        }

        self.ctx.effects.rebuild_spark_buffer(self.layout.max_sparks);

        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.layout.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.write_header();
    }

    fn consume_input(&mut self) {
        if self.input.dropped() > 0 {
            warn!("Input backlog full; dropped {} pointer moves", self.input.dropped());
        }
        self.input.clear();
    }

    fn write_header(&mut self) {
        let vector_vertices = self.vector_vertex_count() as f32;
        let h = &mut self.header;
        h[HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        h[HEADER_STAR_COUNT] = self.ctx.stars.instance_count().min(self.layout.max_stars as u32) as f32;
        h[HEADER_SPARK_COUNT] = self.ctx.effects.spark_instance_count() as f32;
        h[HEADER_VECTOR_VERTEX_COUNT] = vector_vertices;
        h[HEADER_SOUND_COUNT] = self.sound_buffer.len() as f32;
        h[HEADER_EVENT_COUNT] = self.ctx.events.len().min(self.layout.max_events) as f32;
        h[HEADER_VIEWPORT_WIDTH] = self.ctx.viewport.x;
        h[HEADER_VIEWPORT_HEIGHT] = self.ctx.viewport.y;
        h[HEADER_TIME] = self.ctx.clock.seconds();
    }

    /// Stop the game for good. Further ticks and input are ignored.
    pub fn teardown(&mut self) {
        if !self.initialized || self.torn_down {
            return;
        }
        self.game.teardown(&mut self.ctx);
        self.input.clear();
        self.torn_down = true;
    }

    pub fn is_running(&self) -> bool {
        self.initialized && !self.torn_down
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn sounds(&self) -> &[SoundEvent] {
        &self.ctx.sounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    // ---- Pointer accessors for shared-buffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn stars_ptr(&self) -> *const f32 {
        self.ctx.stars.instances_ptr()
    }

    pub fn star_count(&self) -> u32 {
        self.ctx.stars.instance_count()
    }

    pub fn sparks_ptr(&self) -> *const f32 {
        self.ctx.effects.spark_buffer_ptr()
    }

    pub fn spark_count(&self) -> u32 {
        self.ctx.effects.spark_instance_count() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.ctx.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.ctx.vectors.vertex_count() as u32
    }

    #[cfg(not(feature = "vectors"))]
    pub fn vector_vertex_count(&self) -> u32 {
        0
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    pub fn viewport_width(&self) -> f32 {
        self.ctx.viewport.x
    }

    pub fn viewport_height(&self) -> f32 {
        self.ctx.viewport.y
    }

    // ---- Capacity accessors ----

    pub fn max_stars(&self) -> u32 {
        self.layout.max_stars as u32
    }

    pub fn max_sparks(&self) -> u32 {
        self.layout.max_sparks as u32
    }

    pub fn max_vector_vertices(&self) -> u32 {
        self.layout.max_vector_vertices as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

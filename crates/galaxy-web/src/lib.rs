//! WASM bridge for the galaxy map.
//!
//! Two ways to drive a map:
//!
//! - `map_mount(canvas, config)` wires everything: pointer listeners, a
//!   resize observer, a `requestAnimationFrame` loop and the Canvas 2D
//!   painter. `map_unmount()` removes all of it.
//! - `map_init(config)` creates a headless map; the host calls `map_tick`
//!   and the pointer functions itself and reads the shared buffers.
//!
//! Only one map exists at a time per WASM instance.

pub mod canvas;
pub mod dom;
pub mod host;
pub mod runner;
pub mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use galaxy_engine::{GalaxyMap, InputEvent, CUSTOM_RESIZE};
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub use runner::GameRunner;

use canvas::CanvasPainter;
use dom::DomBindings;
use host::{HostCall, HostCallbacks};
use storage::LocalStorageStore;

/// Longest frame delta fed to the fixed timestep, in seconds.
const MAX_FRAME_DT: f32 = 0.1;

struct App {
    runner: GameRunner<GalaxyMap>,
    host: HostCallbacks,
    painter: Option<CanvasPainter>,
    last_frame_ms: Option<f64>,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
    static DOM: RefCell<Option<DomBindings>> = RefCell::new(None);
}

/// Run `f` against the live map. Returns `None` (and logs) when no map
/// exists or the map is already borrowed further up the stack.
fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut borrow) => borrow.as_mut().map(f),
        Err(_) => {
            warn!("Galaxy map is busy; call ignored");
            None
        }
    })
}

fn create(config_json: &str, painter: Option<CanvasPainter>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    destroy();

    let json = if config_json.trim().is_empty() { "{}" } else { config_json };
    let map = GalaxyMap::from_json(json, Box::new(LocalStorageStore::new()))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut runner = GameRunner::new(map);
    runner.init();

    APP.with(|cell| {
        *cell.borrow_mut() = Some(App {
            runner,
            host: HostCallbacks::default(),
            painter,
            last_frame_ms: None,
        });
    });
    info!("galaxy-map: initialized");
    Ok(())
}

fn destroy() {
    // Drop DOM bindings first so no callback fires into a half-torn-down map
    let dom = DOM.with(|cell| cell.borrow_mut().take());
    drop(dom);
    let app = APP.with(|cell| cell.try_borrow_mut().ok().and_then(|mut b| b.take()));
    if let Some(mut app) = app {
        app.runner.teardown();
        info!("galaxy-map: destroyed");
    }
}

/// Advance by `dt` seconds and hand this frame's host calls to the JS
/// callbacks once the map is no longer borrowed.
fn step(dt: f32, paint: bool) {
    let pending = with_app(|app| {
        app.runner.tick(dt.clamp(0.0, MAX_FRAME_DT));
        if paint {
            if let Some(painter) = app.painter.as_mut() {
                painter.paint(app.runner.context());
            }
        }
        let events = app.runner.game_mut().drain_events();
        let calls = HostCall::collect(&events, app.runner.sounds());
        (app.host.clone(), calls)
    });
    if let Some((host, calls)) = pending {
        host.dispatch(&calls);
    }
}

fn on_frame(timestamp_ms: f64) {
    let dt = with_app(|app| {
        let dt = app.last_frame_ms.map_or(0.0, |last| ((timestamp_ms - last) / 1000.0) as f32);
        app.last_frame_ms = Some(timestamp_ms);
        dt
    });
    if let Some(dt) = dt {
        step(dt, true);
    }
}

fn push_input(event: InputEvent) {
    with_app(|app| app.runner.push_input(event));
}

fn on_resize(width: f32, height: f32, dpr: f64) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    with_app(|app| {
        if let Some(painter) = app.painter.as_mut() {
            painter.resize(width, height, dpr);
        }
        app.runner.push_input(InputEvent::Custom {
            kind: CUSTOM_RESIZE,
            a: width,
            b: height,
            c: dpr as f32,
        });
    });
}

// ---- Lifecycle ----

/// Create the map on `canvas` and start its frame loop.
#[wasm_bindgen]
pub fn map_mount(canvas: HtmlCanvasElement, config_json: &str) -> Result<(), JsValue> {
    create(config_json, Some(CanvasPainter::new(canvas.clone())))?;
    let bindings = DomBindings::attach(
        &canvas,
        Rc::new(push_input),
        Rc::new(on_resize),
        Box::new(on_frame),
    );
    match bindings {
        Ok(bindings) => {
            DOM.with(|cell| *cell.borrow_mut() = Some(bindings));
            Ok(())
        }
        Err(e) => {
            destroy();
            Err(e)
        }
    }
}

/// Stop the frame loop, remove listeners, save the position.
#[wasm_bindgen]
pub fn map_unmount() {
    destroy();
}

/// Create a headless map driven by `map_tick`.
#[wasm_bindgen]
pub fn map_init(config_json: &str) -> Result<(), JsValue> {
    create(config_json, None)
}

#[wasm_bindgen]
pub fn map_destroy() {
    destroy();
}

#[wasm_bindgen]
pub fn map_tick(dt: f32) {
    step(dt, false);
}

// ---- Input ----

#[wasm_bindgen]
pub fn map_pointer_down(x: f32, y: f32) {
    push_input(InputEvent::PointerDown { x, y });
}

#[wasm_bindgen]
pub fn map_pointer_move(x: f32, y: f32) {
    push_input(InputEvent::PointerMove { x, y });
}

#[wasm_bindgen]
pub fn map_pointer_up(x: f32, y: f32) {
    push_input(InputEvent::PointerUp { x, y });
}

#[wasm_bindgen]
pub fn map_resize(width: f32, height: f32, dpr: f64) {
    on_resize(width, height, dpr);
}

// ---- Host callbacks ----

/// `f(id, pointJson)` on a point click.
#[wasm_bindgen]
pub fn map_on_point_click(f: Option<js_sys::Function>) {
    with_app(|app| app.host.on_point_click = f);
}

/// `f(soundId)` for every sound event.
#[wasm_bindgen]
pub fn map_on_sound(f: Option<js_sys::Function>) {
    with_app(|app| app.host.on_sound = f);
}

/// `f(message, visible)` when the barrier notification shows or hides.
#[wasm_bindgen]
pub fn map_on_notification(f: Option<js_sys::Function>) {
    with_app(|app| app.host.on_notification = f);
}

// ---- State queries ----

#[wasm_bindgen]
pub fn get_position_x() -> f32 {
    with_app(|app| app.runner.game().position().x).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_position_y() -> f32 {
    with_app(|app| app.runner.game().position().y).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_heading() -> f32 {
    with_app(|app| app.runner.game().heading()).unwrap_or(0.0)
}

/// JSON array of the map's points of interest.
#[wasm_bindgen]
pub fn get_points_json() -> String {
    with_app(|app| serde_json::to_string(app.runner.game().points()).unwrap_or_else(|_| "[]".into()))
        .unwrap_or_else(|| "[]".into())
}

/// Id of the nearby point, or an empty string.
#[wasm_bindgen]
pub fn get_nearby_id() -> String {
    with_app(|app| app.runner.game().nearby().map(|p| p.id.clone()))
        .flatten()
        .unwrap_or_default()
}

// ---- Shared buffer accessors ----

#[wasm_bindgen]
pub fn get_header_ptr() -> *const f32 {
    with_app(|app| app.runner.header_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_stars_ptr() -> *const f32 {
    with_app(|app| app.runner.stars_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_star_count() -> u32 {
    with_app(|app| app.runner.star_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_sparks_ptr() -> *const f32 {
    with_app(|app| app.runner.sparks_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_spark_count() -> u32 {
    with_app(|app| app.runner.spark_count()).unwrap_or(0)
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    with_app(|app| app.runner.vector_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_app(|app| app.runner.vector_vertex_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_sound_events_ptr() -> *const u8 {
    with_app(|app| app.runner.sound_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_sound_events_len() -> u32 {
    with_app(|app| app.runner.sound_events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_app(|app| app.runner.game_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_app(|app| app.runner.game_events_len()).unwrap_or(0)
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_stars() -> u32 {
    with_app(|app| app.runner.max_stars()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_sparks() -> u32 {
    with_app(|app| app.runner.max_sparks()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_vector_vertices() -> u32 {
    with_app(|app| app.runner.max_vector_vertices()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_sounds() -> u32 {
    with_app(|app| app.runner.max_sounds()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_app(|app| app.runner.max_events()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_app(|app| app.runner.buffer_total_floats()).unwrap_or(0)
}

//! DOM wiring: pointer listeners, canvas resize observation and the
//! `requestAnimationFrame` loop. Everything registered here is removed
//! again when `DomBindings` is dropped.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use galaxy_engine::InputEvent;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, PointerEvent, ResizeObserver, ResizeObserverEntry};

pub type InputSink = Rc<dyn Fn(InputEvent)>;
/// CSS width, CSS height, device pixel ratio.
pub type ResizeSink = Rc<dyn Fn(f32, f32, f64)>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(PointerEvent)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(PointerEvent)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self { target, kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

struct Resize {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl Drop for Resize {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// `requestAnimationFrame` loop with cancellation.
pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl FrameLoop {
    /// Start calling `on_frame(timestamp_ms)` once per animation frame.
    pub fn start(mut on_frame: Box<dyn FnMut(f64)>) -> Self {
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let next: Weak<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::downgrade(&callback);
        let running = Rc::downgrade(&handle);
        *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            on_frame(timestamp);
            // The loop may have been stopped or dropped inside the frame
            let (Some(handle), Some(next)) = (running.upgrade(), next.upgrade()) else {
                return;
            };
            if handle.get().is_some() {
                handle.set(request(&next));
            }
        }));
        handle.set(request(&callback));

        Self { handle, callback }
    }

    pub fn is_running(&self) -> bool {
        self.handle.get().is_some()
    }

    pub fn stop(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    warn!("cancelAnimationFrame failed: {:?}", e);
                }
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        self.callback.borrow_mut().take();
    }
}

fn request(callback: &RefCell<Option<Closure<dyn FnMut(f64)>>>) -> Option<i32> {
    let window = web_sys::window()?;
    let borrow = callback.borrow();
    let closure = borrow.as_ref()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}

/// Everything the map registered on the page.
pub struct DomBindings {
    _listeners: Vec<Listener>,
    _resize: Option<Resize>,
    frame_loop: FrameLoop,
}

impl DomBindings {
    /// Pointer-down is taken on the canvas; move and up are taken on the
    /// window so a drag keeps tracking once the pointer leaves the canvas.
    pub fn attach(
        canvas: &HtmlCanvasElement,
        on_input: InputSink,
        on_resize: ResizeSink,
        on_frame: Box<dyn FnMut(f64)>,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let window_target: EventTarget = window.clone().into();
        let canvas_target: EventTarget = canvas.clone().into();

        let mut listeners = Vec::with_capacity(4);
        listeners.push(Listener::attach(
            canvas_target,
            "pointerdown",
            pointer_closure(canvas, &on_input, |x, y| InputEvent::PointerDown { x, y }),
        )?);
        listeners.push(Listener::attach(
            window_target.clone(),
            "pointermove",
            pointer_closure(canvas, &on_input, |x, y| InputEvent::PointerMove { x, y }),
        )?);
        listeners.push(Listener::attach(
            window_target.clone(),
            "pointerup",
            pointer_closure(canvas, &on_input, |x, y| InputEvent::PointerUp { x, y }),
        )?);
        listeners.push(Listener::attach(
            window_target,
            "pointercancel",
            pointer_closure(canvas, &on_input, |x, y| InputEvent::PointerUp { x, y }),
        )?);

        let resize = match observe_resize(canvas, on_resize.clone()) {
            Ok(resize) => Some(resize),
            Err(e) => {
                // Fall back to the initial size only
                warn!("ResizeObserver unavailable: {:?}", e);
                None
            }
        };
        let rect = canvas.get_bounding_client_rect();
        on_resize(rect.width() as f32, rect.height() as f32, window.device_pixel_ratio());

        Ok(Self {
            _listeners: listeners,
            _resize: resize,
            frame_loop: FrameLoop::start(on_frame),
        })
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }
}

fn pointer_closure(
    canvas: &HtmlCanvasElement,
    sink: &InputSink,
    make: fn(f32, f32) -> InputEvent,
) -> Closure<dyn FnMut(PointerEvent)> {
    let canvas = canvas.clone();
    let sink = sink.clone();
    Closure::new(move |event: PointerEvent| {
        if !event.is_primary() {
            return;
        }
        let rect = canvas.get_bounding_client_rect();
        let x = event.client_x() as f64 - rect.left();
        let y = event.client_y() as f64 - rect.top();
        sink(make(x as f32, y as f32));
    })
}

fn observe_resize(canvas: &HtmlCanvasElement, sink: ResizeSink) -> Result<Resize, JsValue> {
    let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
        let Some(entry) = entries.get(0).dyn_into::<ResizeObserverEntry>().ok() else {
            return;
        };
        let rect = entry.content_rect();
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        sink(rect.width() as f32, rect.height() as f32, dpr);
    });
    let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
    observer.observe(canvas);
    Ok(Resize {
        observer,
        _callback: callback,
    })
}

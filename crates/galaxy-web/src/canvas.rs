//! Canvas 2D painter for one frame of map output.
//!
//! Reads the same data the shared buffer exposes (stars, sparks, overlay
//! triangles) straight from the engine context. Keeps no state between
//! frames besides the context handle.

use std::f64::consts::TAU;

use galaxy_engine::{EngineContext, SparkInstance, StarInstance};
use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#05060f";

pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    warned: bool,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let ctx = acquire(&canvas);
        if ctx.is_none() {
            warn!("Canvas 2D context unavailable; frames will be skipped");
        }
        Self {
            canvas,
            ctx,
            warned: false,
        }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resize the backing store to `css_size * dpr` device pixels.
    pub fn resize(&mut self, css_width: f32, css_height: f32, dpr: f64) {
        let dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((css_width as f64 * dpr).round().max(1.0) as u32);
        self.canvas.set_height((css_height as f64 * dpr).round().max(1.0) as u32);
        if let Some(ctx) = &self.ctx {
            if let Err(e) = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
                warn!("Canvas transform failed: {:?}", e);
            }
        }
    }

    /// Clear and redraw. A missing context skips the frame; the loop keeps
    /// running and acquisition is retried next frame.
    pub fn paint(&mut self, engine: &EngineContext) {
        if self.ctx.is_none() {
            self.ctx = acquire(&self.canvas);
        }
        let Some(ctx) = self.ctx.as_ref() else {
            return;
        };
        if let Err(e) = draw_frame(ctx, engine) {
            if !self.warned {
                warn!("Canvas draw failed: {:?}", e);
                self.warned = true;
            }
        }
    }
}

fn acquire(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn draw_frame(ctx: &CanvasRenderingContext2d, engine: &EngineContext) -> Result<(), JsValue> {
    let w = engine.viewport.x as f64;
    let h = engine.viewport.y as f64;
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);

    for star in &engine.stars.instances {
        draw_star(ctx, star)?;
    }

    #[cfg(feature = "vectors")]
    draw_triangles(ctx, engine.vectors.vertices());

    for spark in &engine.effects.spark_buffer {
        draw_spark(ctx, spark)?;
    }

    ctx.set_global_alpha(1.0);
    Ok(())
}

fn rgba(r: f32, g: f32, b: f32, a: f32) -> String {
    format!(
        "rgba({},{},{},{:.3})",
        (r.clamp(0.0, 1.0) * 255.0) as u8,
        (g.clamp(0.0, 1.0) * 255.0) as u8,
        (b.clamp(0.0, 1.0) * 255.0) as u8,
        a.clamp(0.0, 1.0)
    )
}

fn draw_star(ctx: &CanvasRenderingContext2d, s: &StarInstance) -> Result<(), JsValue> {
    if s.alpha <= 0.0 || s.radius <= 0.0 {
        return Ok(());
    }
    let (x, y) = (s.x as f64, s.y as f64);

    if s.halo_radius > 0.0 {
        let halo = ctx.create_radial_gradient(x, y, 0.0, x, y, s.halo_radius as f64)?;
        halo.add_color_stop(0.0, &rgba(s.r, s.g, s.b, s.alpha * 0.45))?;
        halo.add_color_stop(1.0, &rgba(s.r, s.g, s.b, 0.0))?;
        ctx.set_fill_style_canvas_gradient(&halo);
        ctx.begin_path();
        ctx.arc(x, y, s.halo_radius as f64, 0.0, TAU)?;
        ctx.fill();
    }

    if s.ray_count >= 1.0 && s.ray_length > 0.0 {
        ctx.set_stroke_style_str(&rgba(s.r, s.g, s.b, s.alpha * 0.6));
        ctx.set_line_width(0.8);
        let n = s.ray_count as u32;
        ctx.begin_path();
        for i in 0..n {
            let a = s.ray_rotation as f64 + i as f64 * TAU / n as f64;
            ctx.move_to(x, y);
            ctx.line_to(x + a.cos() * s.ray_length as f64, y + a.sin() * s.ray_length as f64);
        }
        ctx.stroke();
    }

    ctx.set_fill_style_str(&rgba(s.r, s.g, s.b, s.alpha));
    ctx.begin_path();
    ctx.arc(x, y, s.radius as f64, 0.0, TAU)?;
    ctx.fill();

    if s.orbiter_count >= 1.0 {
        let n = s.orbiter_count as u32;
        ctx.set_fill_style_str(&rgba(1.0, 1.0, 1.0, s.alpha * 0.8));
        for i in 0..n {
            let a = s.orbiter_phase as f64 + i as f64 * TAU / n as f64;
            let r = s.orbiter_radius as f64;
            ctx.begin_path();
            ctx.arc(x + a.cos() * r, y + a.sin() * r, 0.9, 0.0, TAU)?;
            ctx.fill();
        }
    }
    Ok(())
}

fn draw_spark(ctx: &CanvasRenderingContext2d, s: &SparkInstance) -> Result<(), JsValue> {
    if s.alpha <= 0.0 || s.size <= 0.0 {
        return Ok(());
    }
    // heat 0 = yellow-white, 1 = deep orange
    let g = 0.95 - 0.45 * s.heat;
    let b = 0.7 - 0.6 * s.heat;
    ctx.set_fill_style_str(&rgba(1.0, g, b, s.alpha));
    ctx.begin_path();
    ctx.arc(s.x as f64, s.y as f64, s.size as f64, 0.0, TAU)?;
    ctx.fill();
    Ok(())
}

/// Fill a flat triangle list of `x, y, r, g, b, a` vertices.
#[cfg(feature = "vectors")]
fn draw_triangles(ctx: &CanvasRenderingContext2d, vertices: &[f32]) {
    let mut current = String::new();
    for tri in vertices.chunks_exact(18) {
        let color = rgba(tri[2], tri[3], tri[4], tri[5]);
        if color != current {
            if !current.is_empty() {
                ctx.fill();
            }
            ctx.set_fill_style_str(&color);
            ctx.begin_path();
            current = color;
        }
        ctx.move_to(tri[0] as f64, tri[1] as f64);
        ctx.line_to(tri[6] as f64, tri[7] as f64);
        ctx.line_to(tri[12] as f64, tri[13] as f64);
        ctx.close_path();
    }
    if !current.is_empty() {
        ctx.fill();
    }
}

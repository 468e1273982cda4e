use std::f64::consts::TAU;

use dotfield_engine::{Bounds, DrawCommand, DrawList, EngineError, Rgba};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn surface_err(e: JsValue) -> EngineError {
    EngineError::Surface(format!("{:?}", e))
}

/// Replays draw lists onto a Canvas2D context.
///
/// Coordinates are CSS pixels; the backing store is scaled by the device
/// pixel ratio.
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: Bounds,
    dpr: f64,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(surface_err)?
            .ok_or(EngineError::NoCanvasContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::NoCanvasContext)?;
        Ok(Self {
            canvas,
            ctx,
            size: Bounds::ZERO,
            dpr: 1.0,
        })
    }

    /// Match the backing store to `size` CSS pixels at `dpr`. No-op when
    /// nothing changed, since resizing a canvas clears it.
    pub fn resize(&mut self, size: Bounds, dpr: f64) -> Result<(), EngineError> {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        if size == self.size && dpr == self.dpr {
            return Ok(());
        }
        self.size = size;
        self.dpr = dpr;
        self.canvas
            .set_width((size.width.max(0.0) as f64 * dpr).round() as u32);
        self.canvas
            .set_height((size.height.max(0.0) as f64 * dpr).round() as u32);
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(surface_err)?;
        log::debug!("canvas resized to {:?} @{}x", size, dpr);
        Ok(())
    }

    pub fn paint(&self, list: &DrawList) -> Result<(), EngineError> {
        let (w, h) = (self.size.width as f64, self.size.height as f64);
        for command in list.commands() {
            match *command {
                DrawCommand::Fill { color } => {
                    self.ctx.set_fill_style_str(&color.to_css());
                    self.ctx.fill_rect(0.0, 0.0, w, h);
                }
                DrawCommand::Clear => self.ctx.clear_rect(0.0, 0.0, w, h),
                DrawCommand::Circle { center, radius, color } => {
                    self.ctx.begin_path();
                    self.ctx
                        .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
                        .map_err(surface_err)?;
                    self.ctx.set_fill_style_str(&color.to_css());
                    self.ctx.fill();
                }
                DrawCommand::Line { from, to, width, color } => {
                    self.ctx.begin_path();
                    self.ctx.move_to(from.x as f64, from.y as f64);
                    self.ctx.line_to(to.x as f64, to.y as f64);
                    self.ctx.set_line_width(width as f64);
                    self.ctx.set_stroke_style_str(&color.to_css());
                    self.ctx.stroke();
                }
                DrawCommand::Glow { center, focus, radius, color } => {
                    self.glow(
                        (center.x as f64, center.y as f64),
                        (focus.x as f64, focus.y as f64),
                        radius as f64,
                        color,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Gradient from `color` at the centre to transparent at twice the
    /// radius around `focus`, clipped to a disc of `radius`.
    fn glow(
        &self,
        (cx, cy): (f64, f64),
        (fx, fy): (f64, f64),
        radius: f64,
        color: Rgba,
    ) -> Result<(), EngineError> {
        let gradient = self
            .ctx
            .create_radial_gradient(cx, cy, 0.0, fx, fy, radius * 2.0)
            .map_err(surface_err)?;
        gradient.add_color_stop(0.0, &color.to_css()).map_err(surface_err)?;
        gradient
            .add_color_stop(0.6, &color.with_alpha(color.a * 0.4).to_css())
            .map_err(surface_err)?;
        gradient
            .add_color_stop(1.0, &color.with_alpha(0.0).to_css())
            .map_err(surface_err)?;

        self.ctx.begin_path();
        self.ctx.arc(cx, cy, radius, 0.0, TAU).map_err(surface_err)?;
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill();
        Ok(())
    }

    pub fn size(&self) -> Bounds {
        self.size
    }
}

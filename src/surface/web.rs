//! Browser `<canvas>` surface.

use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::DrawingSurface;
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::style::{Font, TextAlign, TextBaseline};

/// Forwards every call to a `CanvasRenderingContext2D`.
#[derive(Debug, Clone)]
pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebSurface {
    /// Wrap a canvas element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rendering`] if the element has no 2D context.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| Error::Rendering(format!("get_context failed: {e:?}")))?
            .ok_or_else(|| Error::Rendering("canvas has no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::Rendering("2d context has an unexpected type".to_string()))?;
        Ok(Self { canvas, ctx })
    }

    /// The wrapped element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

fn check(op: &'static str, result: std::result::Result<(), JsValue>) {
    if let Err(err) = result {
        warn!(op, ?err, "canvas call failed");
    }
}

impl DrawingSurface for WebSurface {
    fn client_size(&self) -> Size {
        let rect = self.canvas.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn device_pixel_ratio(&self) -> f64 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        check("scale", self.ctx.scale(sx, sy));
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_font(&mut self, font: &Font) {
        self.ctx.set_font(&font.to_string());
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(align.as_css());
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ctx.set_text_baseline(baseline.as_css());
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.rect(x, y, width, height);
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) {
        check(
            "arc",
            self.ctx.arc_with_anticlockwise(
                x,
                y,
                radius,
                start_angle,
                end_angle,
                counterclockwise,
            ),
        );
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        check("fill_text", self.ctx.fill_text(text, x, y));
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        check("stroke_text", self.ctx.stroke_text(text, x, y));
    }
}

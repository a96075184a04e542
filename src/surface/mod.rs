//! Host drawing surfaces.
//!
//! [`DrawingSurface`] is the subset of the Canvas 2D API the canvas layers
//! draw through. Components never own a surface: every drawing call
//! borrows it, so one surface can be shared by several [`MathCanvas`]es
//! layered on top of each other.
//!
//! | Surface              | Output                         |
//! |----------------------|--------------------------------|
//! | [`RasterSurface`]    | software pixels, PNG           |
//! | [`SvgSurface`]       | SVG document                   |
//! | [`RecordingSurface`] | command log (tests, inspection)|
//! | `WebSurface`         | browser `<canvas>` (`wasm`)    |
//!
//! [`MathCanvas`]: crate::canvas::MathCanvas

mod path;
mod raster;
mod recording;
mod svg;
#[cfg(feature = "wasm")]
mod web;

pub use raster::RasterSurface;
pub use recording::{DrawCommand, RecordedStroke, RecordedText, RecordingSurface};
pub use svg::SvgSurface;
#[cfg(feature = "wasm")]
pub use web::WebSurface;

use crate::color::Rgba;
use crate::geometry::{Point, Size};
use crate::style::{Font, TextAlign, TextBaseline};

/// A 2D drawing context in the style of `CanvasRenderingContext2D`.
///
/// Coordinates are in the surface's current user space: backing pixels
/// scaled by every [`scale`](DrawingSurface::scale) call since the last
/// [`resize_backing`](DrawingSurface::resize_backing).
pub trait DrawingSurface {
    /// On-screen layout size in CSS pixels.
    ///
    /// Callers re-read this on every mapping call; a host may change it
    /// between two draws.
    fn client_size(&self) -> Size;

    /// Backing pixels per CSS pixel.
    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Set the backing store dimensions. Resets the transform, the current
    /// path and every style to its initial value.
    fn resize_backing(&mut self, width: u32, height: u32);

    /// Multiply the current transform by a scale.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Color used by [`stroke`](DrawingSurface::stroke) and
    /// [`stroke_text`](DrawingSurface::stroke_text).
    fn set_stroke_color(&mut self, color: Rgba);

    /// Color used by fills.
    fn set_fill_color(&mut self, color: Rgba);

    /// Stroke width in user units.
    fn set_line_width(&mut self, width: f64);

    /// Font for text operations.
    fn set_font(&mut self, font: &Font);

    /// Horizontal text alignment.
    fn set_text_align(&mut self, align: TextAlign);

    /// Vertical text alignment.
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    /// Discard the current path.
    fn begin_path(&mut self);

    /// Start a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);

    /// Extend the current subpath with a straight segment.
    fn line_to(&mut self, x: f64, y: f64);

    /// Add a closed rectangular subpath.
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Add a circular arc to the current subpath.
    ///
    /// Angles are radians, clockwise on screen unless `counterclockwise`.
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    );

    /// Stroke the current path.
    fn stroke(&mut self);

    /// Fill the current path.
    fn fill(&mut self);

    /// Fill a rectangle without touching the current path. Negative sizes
    /// extend left/up from the origin.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Reset a rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Draw filled text anchored at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Draw stroked text anchored at `(x, y)`.
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);
}

/// Initial style values of a fresh Canvas 2D context.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ContextState {
    pub(crate) stroke_color: Rgba,
    pub(crate) fill_color: Rgba,
    pub(crate) line_width: f64,
    pub(crate) font: Font,
    pub(crate) text_align: TextAlign,
    pub(crate) text_baseline: TextBaseline,
    pub(crate) scale: (f64, f64),
}

impl Default for ContextState {
    fn default() -> Self {
        Self {
            stroke_color: Rgba::BLACK,
            fill_color: Rgba::BLACK,
            line_width: 1.0,
            font: Font::new(10.0, "sans-serif"),
            text_align: TextAlign::Start,
            text_baseline: TextBaseline::Alphabetic,
            scale: (1.0, 1.0),
        }
    }
}

impl ContextState {
    /// Apply the current transform to a user-space point.
    pub(crate) fn transform(&self, x: f64, y: f64) -> Point {
        Point::new(x * self.scale.0, y * self.scale.1)
    }

    /// Line width in device units.
    pub(crate) fn device_line_width(&self) -> f64 {
        self.line_width * (self.scale.0 + self.scale.1) / 2.0
    }

    /// Font size in device units.
    pub(crate) fn device_font_size(&self) -> f64 {
        self.font.size_px * self.scale.1
    }

    /// Set the line width; non-finite or non-positive widths are ignored,
    /// as in the Canvas API.
    pub(crate) fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    /// Multiply the transform, ignoring non-finite factors.
    pub(crate) fn apply_scale(&mut self, sx: f64, sy: f64) {
        if sx.is_finite() && sy.is_finite() {
            self.scale = (self.scale.0 * sx, self.scale.1 * sy);
        }
    }
}

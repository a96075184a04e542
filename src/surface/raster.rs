//! Software surface rendering into a [`Framebuffer`].

use std::path::Path;

use tracing::debug;

use super::path::PathBuilder;
use super::{ContextState, DrawingSurface};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect, Size};
use crate::output::PngEncoder;
use crate::render::{self, Coverage};
use crate::style::{Font, TextAlign, TextBaseline};

/// A CPU-rendered surface.
///
/// The backing framebuffer starts at the client size times the pixel
/// ratio and transparent, like a fresh `<canvas>`.
///
/// # Example
///
/// ```
/// use mathcanvas::surface::{DrawingSurface, RasterSurface};
/// use mathcanvas::Rgba;
///
/// let mut surface = RasterSurface::new(20, 20).unwrap();
/// surface.set_fill_color(Rgba::RED);
/// surface.fill_rect(0.0, 0.0, 10.0, 10.0);
///
/// assert_eq!(surface.framebuffer().get_pixel(5, 5), Some(Rgba::RED));
/// assert_eq!(surface.framebuffer().get_pixel(15, 15), Some(Rgba::TRANSPARENT));
/// ```
#[derive(Debug, Clone)]
pub struct RasterSurface {
    fb: Framebuffer,
    client: Size,
    pixel_ratio: f64,
    state: ContextState,
    path: PathBuilder,
}

impl RasterSurface {
    /// A surface of `width`×`height` CSS pixels at pixel ratio 1.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_pixel_ratio(width, height, 1.0)
    }

    /// A surface of `width`×`height` CSS pixels backed by
    /// `width * ratio`×`height * ratio` pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or the ratio is not a
    /// finite positive number.
    pub fn with_pixel_ratio(width: u32, height: u32, ratio: f64) -> Result<Self> {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(Error::invalid_arg(
                "pixel_ratio",
                format!("must be a finite positive number, got {ratio}"),
            ));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let fb = Framebuffer::new(
            backing_len(f64::from(width), ratio),
            backing_len(f64::from(height), ratio),
        )?;

        Ok(Self {
            fb,
            client: Size::new(f64::from(width), f64::from(height)),
            pixel_ratio: ratio,
            state: ContextState::default(),
            path: PathBuilder::default(),
        })
    }

    /// The rendered pixels.
    #[must_use]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Change the reported layout size without touching the backing store.
    pub fn set_client_size(&mut self, width: f64, height: f64) {
        self.client = Size::new(width, height);
    }

    /// Encode the backing store as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        PngEncoder::to_bytes(&self.fb)
    }

    /// Write the backing store to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PngEncoder::write_to_file(&self.fb, path)
    }

    /// User-space rectangle to normalized device space.
    fn device_rect(&self, x: f64, y: f64, width: f64, height: f64) -> Rect {
        let origin = self.state.transform(x, y);
        let corner = self.state.transform(x + width, y + height);
        Rect::new(origin.x, origin.y, corner.x - origin.x, corner.y - origin.y).normalized()
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: Rgba) {
        let anchor = self.state.transform(x, y);
        render::draw_text(
            &mut self.fb,
            text,
            anchor,
            self.state.device_font_size(),
            self.state.text_align,
            self.state.text_baseline,
            color,
        );
    }
}

/// Backing length for a CSS length, at least one pixel.
fn backing_len(css: f64, ratio: f64) -> u32 {
    (css * ratio).round().clamp(1.0, f64::from(u32::MAX)) as u32
}

impl DrawingSurface for RasterSurface {
    fn client_size(&self) -> Size {
        self.client
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        match Framebuffer::new(width.max(1), height.max(1)) {
            Ok(fb) => self.fb = fb,
            Err(err) => debug!(%err, "keeping previous backing store"),
        }
        self.state = ContextState::default();
        self.path.clear();
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.apply_scale(sx, sy);
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.state.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.state.fill_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.set_line_width(width);
    }

    fn set_font(&mut self, font: &Font) {
        self.state.font.clone_from(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.state.transform(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.state.transform(x, y);
        self.path.line_to(p);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let origin = self.state.transform(x, y);
        let corner = self.state.transform(x + width, y + height);
        self.path.rect(origin, corner);
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
        if radius < 0.0 {
            return;
        }
        let center = self.state.transform(x, y);
        // non-uniform scales would turn circles into ellipses; use the mean
        let radius = radius * (self.state.scale.0 + self.state.scale.1) / 2.0;
        self.path
            .arc(center, radius, start_angle, end_angle, counterclockwise);
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let width = self.state.device_line_width();
        let mut coverage = Coverage::for_points(&self.fb, self.path.points(), width + 1.0);
        for sub in self.path.subpaths() {
            render::stroke_polyline(&mut coverage, &sub.points, sub.closed, width);
        }
        render::composite(&mut self.fb, &coverage, self.state.stroke_color);
    }

    fn fill(&mut self) {
        let polygons = self.path.polygons();
        if polygons.is_empty() {
            return;
        }
        let mut coverage = Coverage::for_points(&self.fb, polygons.iter().flatten(), 1.0);
        render::fill_even_odd(&mut coverage, &polygons);
        render::composite(&mut self.fb, &coverage, self.state.fill_color);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let r = self.device_rect(x, y, width, height);
        let quad = vec![
            Point::new(r.x, r.y),
            Point::new(r.x + r.width, r.y),
            Point::new(r.x + r.width, r.y + r.height),
            Point::new(r.x, r.y + r.height),
        ];
        let mut coverage = Coverage::for_points(&self.fb, &quad, 1.0);
        render::fill_even_odd(&mut coverage, &[quad]);
        render::composite(&mut self.fb, &coverage, self.state.fill_color);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let r = self.device_rect(x, y, width, height);
        if !(r.x.is_finite() && r.y.is_finite() && r.width.is_finite() && r.height.is_finite()) {
            return;
        }
        let limit = |v: f64, max: u32| v.round().clamp(0.0, f64::from(max)) as u32;
        let x0 = limit(r.x, self.fb.width());
        let y0 = limit(r.y, self.fb.height());
        let x1 = limit(r.x + r.width, self.fb.width());
        let y1 = limit(r.y + r.height, self.fb.height());
        self.fb.fill_rect(x0, y0, x1 - x0, y1 - y0, Rgba::TRANSPARENT);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.draw_text(text, x, y, self.state.fill_color);
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.draw_text(text, x, y, self.state.stroke_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(RasterSurface::new(0, 10).is_err());
        assert!(RasterSurface::with_pixel_ratio(10, 10, 0.0).is_err());
        assert!(RasterSurface::with_pixel_ratio(10, 10, f64::NAN).is_err());
    }

    #[test]
    fn test_pixel_ratio_sizes_backing() {
        let s = RasterSurface::with_pixel_ratio(100, 50, 2.0).unwrap();
        assert_eq!(s.framebuffer().width(), 200);
        assert_eq!(s.framebuffer().height(), 100);
        assert_eq!(s.client_size(), Size::new(100.0, 50.0));
    }

    #[test]
    fn test_scale_applies_to_fill_rect() {
        let mut s = RasterSurface::with_pixel_ratio(10, 10, 2.0).unwrap();
        s.resize_backing(20, 20);
        s.scale(2.0, 2.0);
        s.set_fill_color(Rgba::BLUE);
        s.fill_rect(0.0, 0.0, 5.0, 5.0);

        assert_eq!(s.framebuffer().get_pixel(9, 9), Some(Rgba::BLUE));
        assert_eq!(s.framebuffer().get_pixel(10, 10), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_negative_fill_rect_extends_up() {
        let mut s = RasterSurface::new(10, 10).unwrap();
        s.fill_rect(2.0, 8.0, 3.0, -4.0);
        assert_eq!(s.framebuffer().get_pixel(3, 5), Some(Rgba::BLACK));
        assert_eq!(s.framebuffer().get_pixel(3, 8), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_stroke_path() {
        let mut s = RasterSurface::new(20, 20).unwrap();
        s.begin_path();
        s.set_stroke_color(Rgba::RED);
        s.move_to(0.0, 10.5);
        s.line_to(20.0, 10.5);
        s.stroke();

        assert_eq!(s.framebuffer().get_pixel(5, 10), Some(Rgba::RED));
        assert_eq!(s.framebuffer().get_pixel(5, 9), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_filled_arc() {
        let mut s = RasterSurface::new(40, 40).unwrap();
        s.begin_path();
        s.arc(20.0, 20.0, 10.0, 0.0, std::f64::consts::TAU, false);
        s.set_fill_color(Rgba::GREEN);
        s.fill();

        assert_eq!(s.framebuffer().get_pixel(20, 20), Some(Rgba::GREEN));
        assert_eq!(s.framebuffer().get_pixel(20, 35), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_clear_rect_resets_pixels() {
        let mut s = RasterSurface::new(10, 10).unwrap();
        s.fill_rect(0.0, 0.0, 10.0, 10.0);
        s.clear_rect(0.0, 0.0, 5.0, 10.0);

        assert_eq!(s.framebuffer().get_pixel(2, 2), Some(Rgba::TRANSPARENT));
        assert_eq!(s.framebuffer().get_pixel(7, 2), Some(Rgba::BLACK));
    }

    #[test]
    fn test_resize_backing_resets_state() {
        let mut s = RasterSurface::new(10, 10).unwrap();
        s.scale(3.0, 3.0);
        s.set_fill_color(Rgba::RED);
        s.resize_backing(10, 10);
        s.fill_rect(0.0, 0.0, 2.0, 2.0);

        assert_eq!(s.framebuffer().get_pixel(1, 1), Some(Rgba::BLACK));
        assert_eq!(s.framebuffer().get_pixel(4, 4), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_png_bytes() {
        let s = RasterSurface::new(4, 4).unwrap();
        let bytes = s.to_png_bytes().unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}

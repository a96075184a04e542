//! Surface that builds an SVG document.

use std::path::Path;

use tracing::debug;

use super::path::{round3, PathBuilder};
use super::{ContextState, DrawingSurface};
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::Size;
use crate::output::{Paint, SvgElement, SvgEncoder, TextAnchor};
use crate::style::{Font, TextAlign, TextBaseline};

/// Records canvas calls as SVG elements, coordinates in backing pixels.
///
/// # Example
///
/// ```
/// use mathcanvas::surface::{DrawingSurface, SvgSurface};
///
/// let mut surface = SvgSurface::new(100, 50);
/// surface.begin_path();
/// surface.move_to(0.5, 10.5);
/// surface.line_to(99.5, 10.5);
/// surface.stroke();
///
/// assert!(surface.render().contains(r#"d="M0.5 10.5 L99.5 10.5""#));
/// ```
#[derive(Debug, Clone)]
pub struct SvgSurface {
    doc: SvgEncoder,
    client: Size,
    state: ContextState,
    path: PathBuilder,
}

impl SvgSurface {
    /// A `width`×`height` document, laid out at the same CSS size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            doc: SvgEncoder::new(width, height),
            client: Size::new(f64::from(width), f64::from(height)),
            state: ContextState::default(),
            path: PathBuilder::default(),
        }
    }

    /// The document built so far.
    #[must_use]
    pub fn encoder(&self) -> &SvgEncoder {
        &self.doc
    }

    /// Change the reported layout size without touching the document.
    pub fn set_client_size(&mut self, width: f64, height: f64) {
        self.client = Size::new(width, height);
    }

    /// Serialize the document.
    #[must_use]
    pub fn render(&self) -> String {
        self.doc.render()
    }

    /// Write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.doc.write_to_file(path)
    }

    fn push_text(&mut self, text: &str, x: f64, y: f64, paint: Paint) {
        let at = self.state.transform(x, y);
        if !at.is_finite() || text.is_empty() {
            return;
        }
        self.doc.add_element(SvgElement::Text {
            x: round3(at.x),
            y: round3(at.y),
            text: text.to_string(),
            font_size: round3(self.state.device_font_size()),
            font_family: self.state.font.family.clone(),
            anchor: TextAnchor::from(self.state.text_align),
            baseline: self.state.text_baseline,
            paint,
        });
    }
}

impl DrawingSurface for SvgSurface {
    fn client_size(&self) -> Size {
        self.client
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.doc.resize(width, height);
        self.doc.clear();
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
        let radius = radius * (self.state.scale.0 + self.state.scale.1) / 2.0;
        self.path
            .arc(center, radius, start_angle, end_angle, counterclockwise);
    }

    fn stroke(&mut self) {
        let d = self.path.to_svg_data();
        if d.is_empty() {
            return;
        }
        let paint = Paint::stroke(
            self.state.stroke_color,
            round3(self.state.device_line_width()),
        );
        self.doc.add_element(SvgElement::Path { d, paint });
    }

    fn fill(&mut self) {
        let d = self.path.to_svg_data();
        if d.is_empty() {
            return;
        }
        self.doc.add_element(SvgElement::Path {
            d,
            paint: Paint::fill(self.state.fill_color),
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let origin = self.state.transform(x, y);
        let corner = self.state.transform(x + width, y + height);
        if !(origin.is_finite() && corner.is_finite()) {
            return;
        }
        self.doc.add_element(SvgElement::Rect {
            x: round3(origin.x.min(corner.x)),
            y: round3(origin.y.min(corner.y)),
            width: round3((corner.x - origin.x).abs()),
            height: round3((corner.y - origin.y).abs()),
            paint: Paint::fill(self.state.fill_color),
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let origin = self.state.transform(x, y);
        let corner = self.state.transform(x + width, y + height);
        let covers_document = origin.x.min(corner.x) <= 0.0
            && origin.y.min(corner.y) <= 0.0
            && origin.x.max(corner.x) >= f64::from(self.doc.width())
            && origin.y.max(corner.y) >= f64::from(self.doc.height());
        if covers_document {
            self.doc.clear();
        } else {
            debug!(x, y, width, height, "partial clear_rect ignored by SVG surface");
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.push_text(text, x, y, Paint::fill(self.state.fill_color));
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        let paint = Paint::stroke(
            self.state.stroke_color,
            round3(self.state.device_line_width()),
        );
        self.push_text(text, x, y, paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_normalizes() {
        let mut s = SvgSurface::new(100, 100);
        s.set_fill_color(Rgba::RED);
        s.fill_rect(10.0, 90.0, 20.0, -30.0);

        assert_eq!(
            s.encoder().elements(),
            &[SvgElement::Rect {
                x: 10.0,
                y: 60.0,
                width: 20.0,
                height: 30.0,
                paint: Paint::fill(Rgba::RED),
            }]
        );
    }

    #[test]
    fn test_scale_applies_to_paths() {
        let mut s = SvgSurface::new(200, 200);
        s.scale(2.0, 2.0);
        s.set_line_width(1.5);
        s.begin_path();
        s.move_to(1.0, 1.0);
        s.line_to(10.0, 1.0);
        s.stroke();

        let svg = s.render();
        assert!(svg.contains(r#"d="M2 2 L20 2""#));
        assert!(svg.contains(r#"stroke-width="3""#));
    }

    #[test]
    fn test_full_clear_drops_elements() {
        let mut s = SvgSurface::new(50, 50);
        s.fill_rect(0.0, 0.0, 10.0, 10.0);
        s.clear_rect(10.0, 10.0, 5.0, 5.0);
        assert_eq!(s.encoder().elements().len(), 1);

        s.clear_rect(0.0, 0.0, 50.0, 50.0);
        assert!(s.encoder().elements().is_empty());
    }

    #[test]
    fn test_text_uses_context_state() {
        let mut s = SvgSurface::new(100, 100);
        s.set_font(&"bold 20px Poppins".parse().unwrap());
        s.set_text_align(TextAlign::Right);
        s.set_text_baseline(TextBaseline::Top);
        s.fill_text("1.5", 40.0, 10.0);

        let svg = s.render();
        assert!(svg.contains(r#"font-size="20""#));
        assert!(svg.contains(r#"font-family="Poppins""#));
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(svg.contains(">1.5</text>"));
    }

    #[test]
    fn test_resize_backing_resets_document() {
        let mut s = SvgSurface::new(10, 10);
        s.fill_rect(0.0, 0.0, 1.0, 1.0);
        s.resize_backing(20, 30);

        assert!(s.encoder().elements().is_empty());
        assert_eq!((s.encoder().width(), s.encoder().height()), (20, 30));
        assert_eq!(s.client_size(), Size::new(10.0, 10.0));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        SvgSurface::new(10, 10).save(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }
}

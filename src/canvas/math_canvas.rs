//! Plane-to-pixel mapped drawing.

use tracing::debug;

use super::{check_finite, check_positive, Mode};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::{Padding, Plane, Point, Rect, Size};
use crate::scale::map;
use crate::style::{LineStyle, ShapeStyle, TextStyle};
use crate::surface::DrawingSurface;

/// Draws on a surface in logical plane coordinates.
///
/// The y axis points up: `ymin` is the bottom edge of the padded area and
/// `ymax` the top edge. Every mapped coordinate lands on a pixel center
/// (`n + 0.5`) so that 1px horizontal and vertical strokes stay crisp.
///
/// The surface size is read again on every call, so a `MathCanvas` follows
/// its host through relayouts without being told.
///
/// # Example
///
/// ```
/// use mathcanvas::canvas::MathCanvas;
/// use mathcanvas::geometry::{Plane, Point};
/// use mathcanvas::surface::RecordingSurface;
///
/// let mut surface = RecordingSurface::new(100.0, 100.0);
/// let m = MathCanvas::new(&mut surface, Some(Plane::new(0.0, 10.0, 0.0, 10.0))).unwrap();
///
/// assert_eq!(m.map_coords(&surface, Point::new(0.0, 0.0)), Point::new(0.5, 100.5));
/// assert_eq!(m.map_coords(&surface, Point::new(5.0, 5.0)), Point::new(50.5, 50.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MathCanvas {
    plane: Plane,
    padding: Padding,
    mode: Mode,
}

impl MathCanvas {
    /// Prepare `surface` for crisp drawing at its pixel ratio and map
    /// `plane` onto it.
    ///
    /// The backing store is resized to the client size times the device
    /// pixel ratio and scaled back, so callers always work in CSS pixels.
    /// Without a plane, the plane is the client size in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlane`] for a non-finite or inverted plane.
    pub fn new<S>(surface: &mut S, plane: Option<Plane>) -> Result<Self>
    where
        S: DrawingSurface + ?Sized,
    {
        setup_surface(surface);

        let mut canvas = Self {
            plane: Plane::from_size(surface.client_size()),
            padding: Padding::ZERO,
            mode: Mode::Normal,
        };
        if let Some(plane) = plane {
            canvas.set_plane(plane)?;
        }
        Ok(canvas)
    }

    /// Current plane.
    #[must_use]
    pub const fn plane(&self) -> Plane {
        self.plane
    }

    /// Replace the plane. Returns the accepted plane.
    ///
    /// # Errors
    ///
    /// In [`Mode::Normal`], returns [`Error::InvalidPlane`] unless every
    /// bound is finite, `xmin < xmax` and `ymin < ymax`.
    pub fn set_plane(&mut self, plane: Plane) -> Result<Plane> {
        if self.mode.validates() {
            plane.validate()?;
        }
        self.plane = plane;
        Ok(plane)
    }

    /// Reset the plane to `[0, width, 0, height]` of the surface.
    pub fn reset_plane<S>(&mut self, surface: &S) -> Plane
    where
        S: DrawingSurface + ?Sized,
    {
        self.plane = Plane::from_size(surface.client_size());
        self.plane
    }

    /// Current padding.
    #[must_use]
    pub const fn padding(&self) -> Padding {
        self.padding
    }

    /// Replace the padding. Unset sides of a `Padding { left: 5.0,
    /// ..Padding::default() }` literal stay at zero.
    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    /// Current validation mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch validation mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Client size minus padding: the pixel area the plane maps onto.
    pub fn drawable_size<S>(&self, surface: &S) -> Size
    where
        S: DrawingSurface + ?Sized,
    {
        let client = surface.client_size();
        Size::new(
            client.width - self.padding.horizontal(),
            client.height - self.padding.vertical(),
        )
    }

    /// Map a plane point to a surface pixel center.
    ///
    /// The point is clamped into the plane first, so nothing is drawn
    /// beyond the padded area.
    pub fn map_coords<S>(&self, surface: &S, point: Point) -> Point
    where
        S: DrawingSurface + ?Sized,
    {
        let Plane {
            xmin,
            xmax,
            ymin,
            ymax,
        } = self.plane;
        let size = self.drawable_size(surface);

        // max/min rather than clamp: an inverted plane must not panic
        let x = point.x.max(xmin).min(xmax);
        let y = point.y.max(ymin).min(ymax);

        let px = map(x, (xmin, xmax), (0.0, size.width)) + self.padding.left;
        let py = map(y, (ymin, ymax), (size.height, 0.0)) + self.padding.top;
        Point::new(px.floor() + 0.5, py.floor() + 0.5)
    }

    /// Stroke a segment between two plane points.
    pub fn line<S>(&self, surface: &mut S, from: Point, to: Point, style: &LineStyle) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        if self.mode.validates() {
            check_finite(&[("from.x", from.x), ("from.y", from.y)])?;
            check_finite(&[("to.x", to.x), ("to.y", to.y)])?;
            check_positive("line_width", style.line_width)?;
        }

        let from = self.map_coords(surface, from);
        let to = self.map_coords(surface, to);

        surface.set_stroke_color(style.color);
        surface.set_line_width(style.line_width);
        surface.begin_path();
        surface.move_to(from.x, from.y);
        surface.line_to(to.x, to.y);
        surface.stroke();
        Ok(())
    }

    /// Stroke one connected path through `points`, in order.
    ///
    /// Fewer than two points draw nothing.
    pub fn polyline<S>(&self, surface: &mut S, points: &[Point], style: &LineStyle) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        if self.mode.validates() {
            for p in points {
                check_finite(&[("point.x", p.x), ("point.y", p.y)])?;
            }
            check_positive("line_width", style.line_width)?;
        }
        let [first, rest @ ..] = points else {
            return Ok(());
        };
        if rest.is_empty() {
            return Ok(());
        }

        surface.set_stroke_color(style.color);
        surface.set_line_width(style.line_width);
        surface.begin_path();
        let start = self.map_coords(surface, *first);
        surface.move_to(start.x, start.y);
        for p in rest {
            let p = self.map_coords(surface, *p);
            surface.line_to(p.x, p.y);
        }
        surface.stroke();
        Ok(())
    }

    /// Fill or stroke the rectangle from `(x, y)` to `(x + width, y + height)`.
    ///
    /// Sizes may be negative. They are scaled against the full client size,
    /// not the padded area, and truncated toward zero.
    pub fn rect<S>(
        &self,
        surface: &mut S,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: &ShapeStyle,
    ) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        if self.mode.validates() {
            check_finite(&[("x", x), ("y", y), ("width", width), ("height", height)])?;
            if !style.fill {
                check_positive("line_width", style.line_width)?;
            }
        }

        let origin = self.map_coords(surface, Point::new(x, y));
        let client = surface.client_size();
        let w = map(width, (0.0, self.plane.x_span()), (0.0, client.width)).trunc();
        let h = map(height, (0.0, self.plane.y_span()), (0.0, client.height)).trunc();

        surface.begin_path();
        if style.fill {
            surface.set_fill_color(style.color);
            surface.fill_rect(origin.x, origin.y, w, -h);
        } else {
            surface.set_stroke_color(style.color);
            surface.set_line_width(style.line_width);
            surface.rect(origin.x, origin.y, w, -h);
            surface.stroke();
        }
        Ok(())
    }

    /// Draw `text` anchored at a plane point.
    ///
    /// The pixel margins of `style.position` are added after mapping. With
    /// `stay_in_bound`, the anchor is then kept `in_bound_margin_px` away
    /// from every edge of the surface.
    pub fn text<S>(&self, surface: &mut S, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        let position = &style.position;
        let glyphs = &style.text;
        if self.mode.validates() {
            check_finite(&[
                ("x", x),
                ("y", y),
                ("margin_left_px", position.margin_left_px),
                ("margin_top_px", position.margin_top_px),
                ("in_bound_margin_px", position.in_bound_margin_px),
            ])?;
            check_positive("font size", glyphs.font.size_px)?;
            if !style.fill || glyphs.outline {
                check_positive("line_width", glyphs.line_width)?;
            }
        }

        let mapped = self.map_coords(surface, Point::new(x, y));
        let mut at = Point::new(
            mapped.x + position.margin_left_px,
            mapped.y + position.margin_top_px,
        );
        if position.stay_in_bound {
            let client = surface.client_size();
            let safe = Rect::new(0.0, 0.0, client.width, client.height)
                .inset(position.in_bound_margin_px);
            at = safe.clamp_point(at);
        }

        surface.set_text_align(glyphs.align);
        surface.set_text_baseline(glyphs.baseline);
        surface.set_font(&glyphs.font);
        surface.begin_path();
        if style.fill {
            surface.set_fill_color(glyphs.color);
            surface.fill_text(text, at.x, at.y);
        } else {
            surface.set_stroke_color(glyphs.color);
            surface.set_line_width(glyphs.line_width);
            surface.stroke_text(text, at.x, at.y);
        }
        if glyphs.outline {
            surface.set_stroke_color(glyphs.outline_color);
            surface.set_line_width(glyphs.line_width);
            surface.stroke_text(text, at.x, at.y);
        }
        Ok(())
    }

    /// Fill or stroke an arc centered on a plane point.
    ///
    /// Only the center is mapped: `radius_px` is in surface pixels and does
    /// not follow the plane's zoom. Angles are radians, clockwise on screen
    /// unless `counterclockwise`.
    pub fn arc<S>(
        &self,
        surface: &mut S,
        center: Point,
        radius_px: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
        style: &ShapeStyle,
    ) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        if self.mode.validates() {
            check_finite(&[
                ("x", center.x),
                ("y", center.y),
                ("radius_px", radius_px),
                ("start_angle", start_angle),
                ("end_angle", end_angle),
            ])?;
            if radius_px < 0.0 {
                return Err(Error::invalid_arg(
                    "radius_px",
                    format!("must not be negative, got {radius_px}"),
                ));
            }
            if !style.fill {
                check_positive("line_width", style.line_width)?;
            }
        }

        let c = self.map_coords(surface, center);
        surface.begin_path();
        surface.arc(c.x, c.y, radius_px, start_angle, end_angle, counterclockwise);
        if style.fill {
            surface.set_fill_color(style.color);
            surface.fill();
        } else {
            surface.set_line_width(style.line_width);
            surface.set_stroke_color(style.color);
            surface.stroke();
        }
        Ok(())
    }

    /// Clear the whole surface.
    pub fn clear<S>(&self, surface: &mut S)
    where
        S: DrawingSurface + ?Sized,
    {
        let client = surface.client_size();
        surface.clear_rect(0.0, 0.0, client.width, client.height);
    }

    /// Fill the whole plane with `color`.
    pub fn set_background<S>(&self, surface: &mut S, color: Rgba) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        let p = self.plane;
        self.rect(
            surface,
            p.xmin,
            p.ymin,
            p.x_span(),
            p.y_span(),
            &ShapeStyle::filled(color),
        )
    }
}

/// Size the backing store for the device pixel ratio and scale it back to
/// CSS pixels.
fn setup_surface<S>(surface: &mut S)
where
    S: DrawingSurface + ?Sized,
{
    let ratio = match surface.device_pixel_ratio() {
        r if r.is_finite() && r > 0.0 => r,
        _ => 1.0,
    };
    let client = surface.client_size();
    let backing = |css: f64| {
        let px = (css * ratio).round();
        if px.is_finite() {
            px.clamp(0.0, f64::from(u32::MAX)) as u32
        } else {
            0
        }
    };
    let (width, height) = (backing(client.width), backing(client.height));
    debug!(width, height, ratio, "surface backing store");

    surface.resize_backing(width, height);
    surface.scale(ratio, ratio);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FontStyle, TextAlign, TextBaseline, TextPosition};
    use crate::surface::{DrawCommand, RecordingSurface};

    fn surface() -> RecordingSurface {
        RecordingSurface::new(100.0, 100.0)
    }

    fn canvas(surface: &mut RecordingSurface, plane: Plane) -> MathCanvas {
        let m = MathCanvas::new(surface, Some(plane)).unwrap();
        surface.take_commands();
        m
    }

    #[test]
    fn test_new_sets_up_backing_store() {
        let mut s = RecordingSurface::new(100.0, 50.0).with_pixel_ratio(2.0);
        let m = MathCanvas::new(&mut s, None).unwrap();

        assert_eq!(
            s.commands(),
            &[
                DrawCommand::ResizeBacking {
                    width: 200,
                    height: 100
                },
                DrawCommand::Scale { x: 2.0, y: 2.0 },
            ]
        );
        assert_eq!(m.plane(), Plane::new(0.0, 100.0, 0.0, 50.0));
    }

    #[test]
    fn test_new_rejects_inverted_plane() {
        let mut s = surface();
        let err = MathCanvas::new(&mut s, Some(Plane::new(10.0, 0.0, 0.0, 1.0))).unwrap_err();
        assert!(matches!(err, Error::InvalidPlane(_)));
    }

    #[test]
    fn test_map_coords_corners() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));

        assert_eq!(m.map_coords(&s, Point::new(0.0, 0.0)), Point::new(0.5, 100.5));
        assert_eq!(m.map_coords(&s, Point::new(10.0, 10.0)), Point::new(100.5, 0.5));
        assert_eq!(m.map_coords(&s, Point::new(2.5, 7.5)), Point::new(25.5, 25.5));
    }

    #[test]
    fn test_map_coords_clamps_to_plane() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));

        assert_eq!(
            m.map_coords(&s, Point::new(-50.0, 1e9)),
            m.map_coords(&s, Point::new(0.0, 10.0))
        );
    }

    #[test]
    fn test_map_coords_with_padding() {
        let mut s = surface();
        let mut m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        m.set_padding(Padding {
            left: 10.0,
            bottom: 20.0,
            ..Padding::default()
        });

        assert_eq!(m.drawable_size(&s), Size::new(90.0, 80.0));
        assert_eq!(m.map_coords(&s, Point::new(0.0, 0.0)), Point::new(10.5, 80.5));
        assert_eq!(m.map_coords(&s, Point::new(10.0, 10.0)), Point::new(100.5, 0.5));
    }

    #[test]
    fn test_map_coords_follows_relayout() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        s.set_client_size(200.0, 50.0);

        assert_eq!(m.map_coords(&s, Point::new(10.0, 0.0)), Point::new(200.5, 50.5));
    }

    #[test]
    fn test_line_strokes_mapped_segment() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, -5.0, 5.0));
        let style = LineStyle::new(Rgba::RED, 2.0);
        m.line(&mut s, Point::new(0.0, 0.0), Point::new(10.0, 0.0), &style)
            .unwrap();

        let strokes = s.strokes();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].from, Point::new(0.5, 50.5));
        assert_eq!(strokes[0].to, Point::new(100.5, 50.5));
        assert_eq!(strokes[0].color, Rgba::RED);
        assert_eq!(strokes[0].line_width, 2.0);
    }

    #[test]
    fn test_line_validation_depends_on_mode() {
        let mut s = surface();
        let mut m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        let bad = Point::new(f64::NAN, 0.0);

        let err = m
            .line(&mut s, bad, Point::new(1.0, 1.0), &LineStyle::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "from.x", .. }));
        assert!(s.commands().is_empty());

        m.set_mode(Mode::Performance);
        m.line(&mut s, bad, Point::new(1.0, 1.0), &LineStyle::default())
            .unwrap();
        assert_eq!(s.strokes().len(), 1);
    }

    #[test]
    fn test_polyline_single_path() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        let points = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 10.0),
            Point::new(10.0, 0.0),
        ];
        m.polyline(&mut s, &points, &LineStyle::default()).unwrap();

        assert_eq!(s.count(|c| *c == DrawCommand::Stroke), 1);
        assert_eq!(s.strokes().len(), 2);

        m.polyline(&mut s, &points[..1], &LineStyle::default())
            .unwrap();
        assert_eq!(s.count(|c| *c == DrawCommand::Stroke), 1);
    }

    #[test]
    fn test_rect_fill_draws_upward() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        m.rect(&mut s, 2.0, 2.0, 3.0, 4.0, &ShapeStyle::filled(Rgba::BLUE))
            .unwrap();

        assert!(s.commands().contains(&DrawCommand::SetFillColor(Rgba::BLUE)));
        assert!(s.commands().contains(&DrawCommand::FillRect {
            x: 20.5,
            y: 80.5,
            width: 30.0,
            height: -40.0,
        }));
    }

    #[test]
    fn test_rect_size_truncates() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 3.0, 0.0, 3.0));
        m.rect(&mut s, 0.0, 0.0, 1.0, -1.0, &ShapeStyle::default())
            .unwrap();

        assert!(s.commands().contains(&DrawCommand::Rect {
            x: 0.5,
            y: 100.5,
            width: 33.0,
            height: 33.0,
        }));
        assert_eq!(s.count(|c| *c == DrawCommand::Stroke), 1);
    }

    #[test]
    fn test_rect_size_ignores_padding() {
        let mut s = surface();
        let mut m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        m.set_padding(Padding::new(50.0, 0.0, 0.0, 0.0));
        m.rect(&mut s, 0.0, 0.0, 10.0, 10.0, &ShapeStyle::filled(Rgba::BLUE))
            .unwrap();

        // origin moves with the padding, size does not shrink with it
        assert!(s.commands().contains(&DrawCommand::FillRect {
            x: 50.5,
            y: 100.5,
            width: 100.0,
            height: -100.0,
        }));
    }

    #[test]
    fn test_text_defaults() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        m.text(&mut s, "hi", 5.0, 5.0, &TextStyle::default()).unwrap();

        let texts = s.texts();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].at, Point::new(50.5, 50.5));
        assert!(texts[0].filled);
        assert_eq!(texts[0].align, TextAlign::Center);
        assert_eq!(texts[0].baseline, TextBaseline::Middle);
        assert_eq!(texts[0].font.to_string(), "15px Arial");
    }

    #[test]
    fn test_text_stays_in_bound() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        m.text(&mut s, "corner", 0.0, 0.0, &TextStyle::default())
            .unwrap();
        m.text(&mut s, "top", 10.0, 10.0, &TextStyle::default())
            .unwrap();

        let texts = s.texts();
        assert_eq!(texts[0].at, Point::new(20.0, 80.0));
        assert_eq!(texts[1].at, Point::new(80.0, 20.0));
    }

    #[test]
    fn test_text_margins_and_outline() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 10.0, 0.0, 10.0));
        let style = TextStyle {
            fill: false,
            text: FontStyle {
                color: Rgba::BLUE,
                outline: true,
                ..FontStyle::default()
            },
            position: TextPosition {
                margin_left_px: 3.0,
                margin_top_px: -2.0,
                stay_in_bound: false,
                ..TextPosition::default()
            },
        };
        m.text(&mut s, "x", 0.0, 0.0, &style).unwrap();

        let texts = s.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].at, Point::new(3.5, 98.5));
        assert!(!texts[0].filled);
        assert_eq!(texts[0].color, Rgba::BLUE);
        assert_eq!(texts[1].color, Rgba::RED);
    }

    #[test]
    fn test_arc_radius_not_scaled() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 1.0, 0.0, 1.0));
        m.arc(
            &mut s,
            Point::new(0.5, 0.5),
            10.0,
            0.0,
            std::f64::consts::TAU,
            false,
            &ShapeStyle::filled(Rgba::GREEN),
        )
        .unwrap();

        assert!(s.commands().contains(&DrawCommand::Arc {
            x: 50.5,
            y: 50.5,
            radius: 10.0,
            start_angle: 0.0,
            end_angle: std::f64::consts::TAU,
            counterclockwise: false,
        }));
        assert_eq!(s.count(|c| *c == DrawCommand::Fill), 1);
    }

    #[test]
    fn test_arc_rejects_negative_radius() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(0.0, 1.0, 0.0, 1.0));
        let err = m
            .arc(&mut s, Point::ORIGIN, -1.0, 0.0, 1.0, false, &ShapeStyle::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "radius_px", .. }));
    }

    #[test]
    fn test_clear_and_background() {
        let mut s = surface();
        let m = canvas(&mut s, Plane::new(-1.0, 1.0, -1.0, 1.0));
        m.clear(&mut s);
        m.set_background(&mut s, Rgba::WHITE).unwrap();

        assert_eq!(
            s.commands()[0],
            DrawCommand::ClearRect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0
            }
        );
        assert!(s.commands().contains(&DrawCommand::FillRect {
            x: 0.5,
            y: 100.5,
            width: 100.0,
            height: -100.0,
        }));
    }

    #[test]
    fn test_reset_plane_uses_client_size() {
        let mut s = surface();
        let mut m = canvas(&mut s, Plane::new(0.0, 1.0, 0.0, 1.0));
        s.set_client_size(300.0, 150.0);
        assert_eq!(m.reset_plane(&s), Plane::new(0.0, 300.0, 0.0, 150.0));
    }
}

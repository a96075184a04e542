//! Primitive rasterization.
//!
//! Shapes are first accumulated into a [`Coverage`] mask (one value in
//! `0.0..=1.0` per pixel, overlapping shapes take the maximum) and then
//! composited onto the framebuffer once, so the joints of a translucent
//! polyline are not blended twice.
//!
//! Pixel `(x, y)` is covered by a shape when its center `(x + 0.5, y + 0.5)`
//! lies inside it. A 1px stroke along `x = 10.5` therefore covers exactly
//! column 10.

use std::f64::consts::TAU;

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;

/// Strokes thinner than this are traced with Bresenham at partial coverage.
const HAIRLINE_WIDTH: f64 = 1.0;

/// Upper bound on segments used to flatten one arc.
const MAX_ARC_SEGMENTS: usize = 720;

/// Per-pixel coverage over a clipped window of a framebuffer.
#[derive(Debug, Clone)]
pub struct Coverage {
    x0: i32,
    y0: i32,
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl Coverage {
    /// Mask over the pixels of `fb` touched by the box `min..max`, grown by
    /// `margin` on every side.
    #[must_use]
    pub fn for_bounds(fb: &Framebuffer, min: Point, max: Point, margin: f64) -> Self {
        let clip = |lo: f64, hi: f64, limit: u32| -> (i32, i32) {
            if !(lo.is_finite() && hi.is_finite()) {
                return (0, limit as i32);
            }
            let a = (lo - margin).floor().clamp(0.0, f64::from(limit)) as i32;
            let b = (hi + margin).ceil().clamp(0.0, f64::from(limit)) as i32;
            (a, b.max(a))
        };
        let (x0, x1) = clip(min.x, max.x, fb.width());
        let (y0, y1) = clip(min.y, max.y, fb.height());
        let width = (x1 - x0) as usize;
        let height = (y1 - y0) as usize;

        Self {
            x0,
            y0,
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    /// Mask covering the bounding box of `points`.
    #[must_use]
    pub fn for_points<'a>(
        fb: &Framebuffer,
        points: impl IntoIterator<Item = &'a Point>,
        margin: f64,
    ) -> Self {
        let (min, max) = points.into_iter().filter(|p| p.is_finite()).fold(
            (
                Point::new(f64::INFINITY, f64::INFINITY),
                Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(lo, hi), p| {
                (
                    Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        );
        if min.x > max.x {
            return Self::for_bounds(fb, Point::ORIGIN, Point::ORIGIN, 0.0);
        }
        Self::for_bounds(fb, min, max, margin)
    }

    /// Whether the mask covers no pixel at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Coverage at framebuffer pixel `(x, y)`.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(0.0, |i| self.cells[i])
    }

    /// Raise the coverage at `(x, y)` to at least `value`.
    pub fn mark(&mut self, x: i32, y: i32, value: f32) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = self.cells[i].max(value);
        }
    }

    /// Mark pixels `x_start..x_end` of row `y`.
    fn mark_span(&mut self, y: i32, x_start: i32, x_end: i32, value: f32) {
        let start = x_start.max(self.x0);
        let end = x_end.min(self.x0 + self.width as i32);
        for x in start..end {
            self.mark(x, y, value);
        }
    }

    fn rows(&self) -> std::ops::Range<i32> {
        self.y0..self.y0 + self.height as i32
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let dx = x - self.x0;
        let dy = y - self.y0;
        if dx < 0 || dy < 0 || dx as usize >= self.width || dy as usize >= self.height {
            return None;
        }
        Some(dy as usize * self.width + dx as usize)
    }
}

/// Blend `color` onto `fb` wherever the mask is non-zero.
pub fn composite(fb: &mut Framebuffer, coverage: &Coverage, color: Rgba) {
    if color.a == 0 {
        return;
    }
    for (i, &c) in coverage.cells.iter().enumerate() {
        if c <= 0.0 {
            continue;
        }
        let x = coverage.x0 + (i % coverage.width) as i32;
        let y = coverage.y0 + (i / coverage.width) as i32;
        let alpha = (f32::from(color.a) * c.min(1.0)).round() as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

// ============================================================================
// Lines
// ============================================================================

/// Trace a line with Bresenham's algorithm, marking every pixel at `value`.
///
/// The segment is clipped to the mask first, so far off-screen endpoints
/// cost nothing.
pub fn trace_line(coverage: &mut Coverage, from: Point, to: Point, value: f32) {
    let window = (
        f64::from(coverage.x0) - 1.0,
        f64::from(coverage.y0) - 1.0,
        f64::from(coverage.x0) + coverage.width as f64 + 1.0,
        f64::from(coverage.y0) + coverage.height as f64 + 1.0,
    );
    let Some((a, b)) = clip_segment(from, to, window) else {
        return;
    };

    let (x0, y0) = (a.x.floor() as i32, a.y.floor() as i32);
    let (x1, y1) = (b.x.floor() as i32, b.y.floor() as i32);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        coverage.mark(x, y, value);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Stroke a segment of `width` pixels with butt caps.
///
/// Widths below one pixel are traced as a hairline whose coverage is the
/// width itself.
pub fn stroke_segment(coverage: &mut Coverage, from: Point, to: Point, width: f64) {
    if !(from.is_finite() && to.is_finite() && width.is_finite()) || width <= 0.0 {
        return;
    }
    if width < HAIRLINE_WIDTH {
        trace_line(coverage, from, to, width as f32);
        return;
    }

    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return;
    }
    let (nx, ny) = (-dy / len * width / 2.0, dx / len * width / 2.0);
    let quad = [
        Point::new(from.x + nx, from.y + ny),
        Point::new(to.x + nx, to.y + ny),
        Point::new(to.x - nx, to.y - ny),
        Point::new(from.x - nx, from.y - ny),
    ];
    fill_even_odd(coverage, &[quad.to_vec()]);
}

/// Stroke every segment of a polyline, closing it back to the first point
/// when `closed`.
pub fn stroke_polyline(coverage: &mut Coverage, points: &[Point], closed: bool, width: f64) {
    for pair in points.windows(2) {
        stroke_segment(coverage, pair[0], pair[1], width);
    }
    if closed && points.len() > 2 {
        stroke_segment(coverage, points[points.len() - 1], points[0], width);
    }
}

// ============================================================================
// Fills
// ============================================================================

/// Fill a set of implicitly closed polygons with the even-odd rule.
pub fn fill_even_odd(coverage: &mut Coverage, polygons: &[Vec<Point>]) {
    let mut crossings: Vec<f64> = Vec::new();

    for y in coverage.rows() {
        let center = f64::from(y) + 0.5;
        crossings.clear();

        for polygon in polygons {
            if polygon.len() < 3 {
                continue;
            }
            let last = polygon.len() - 1;
            for i in 0..polygon.len() {
                let a = polygon[if i == 0 { last } else { i - 1 }];
                let b = polygon[i];
                if !(a.is_finite() && b.is_finite()) {
                    continue;
                }
                if (a.y <= center && center < b.y) || (b.y <= center && center < a.y) {
                    crossings.push(a.x + (center - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
        }

        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            // pixel x is inside when left <= x + 0.5 < right
            let start = (pair[0] - 0.5).ceil();
            let end = (pair[1] - 0.5).ceil();
            coverage.mark_span(y, saturate(start), saturate(end), 1.0);
        }
    }
}

#[inline]
fn saturate(v: f64) -> i32 {
    v.clamp(f64::from(i32::MIN / 2), f64::from(i32::MAX / 2)) as i32
}

// ============================================================================
// Arcs
// ============================================================================

/// Flatten a circular arc into a point sequence, Canvas 2D style.
///
/// Angles are in radians, measured clockwise on screen (y grows down).
/// A sweep of a full turn or more in the drawing direction yields a full
/// circle; otherwise the sweep is reduced modulo a full turn.
#[must_use]
pub fn flatten_arc(
    center: Point,
    radius: f64,
    start: f64,
    end: f64,
    counterclockwise: bool,
) -> Vec<Point> {
    if !(center.is_finite() && radius.is_finite() && start.is_finite() && end.is_finite()) {
        return Vec::new();
    }

    let sweep = if counterclockwise {
        if start - end >= TAU {
            -TAU
        } else {
            -(start - end).rem_euclid(TAU)
        }
    } else if end - start >= TAU {
        TAU
    } else {
        (end - start).rem_euclid(TAU)
    };

    let segments = ((sweep.abs() * radius.max(1.0) / 2.0).ceil() as usize).clamp(8, MAX_ARC_SEGMENTS);
    (0..=segments)
        .map(|i| {
            let angle = start + sweep * (i as f64 / segments as f64);
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Liang-Barsky clip of a segment against `(xmin, ymin, xmax, ymax)`.
fn clip_segment(a: Point, b: Point, window: (f64, f64, f64, f64)) -> Option<(Point, Point)> {
    if !(a.is_finite() && b.is_finite()) {
        return None;
    }
    let (xmin, ymin, xmax, ymax) = window;
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, a.x - xmin),
        (dx, xmax - a.x),
        (-dy, a.y - ymin),
        (dy, ymax - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }
    Some((
        Point::new(a.x + t0 * dx, a.y + t0 * dy),
        Point::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

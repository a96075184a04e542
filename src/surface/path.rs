//! Path accumulation shared by the software surfaces.

use std::fmt::Write;

use crate::geometry::Point;
use crate::render::flatten_arc;

/// One subpath in device coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SubPath {
    pub(crate) points: Vec<Point>,
    pub(crate) closed: bool,
}

/// The current path of a context.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PathBuilder {
    subpaths: Vec<SubPath>,
}

impl PathBuilder {
    pub(crate) fn clear(&mut self) {
        self.subpaths.clear();
    }

    pub(crate) fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|s| s.points.is_empty())
    }

    pub(crate) fn move_to(&mut self, p: Point) {
        self.subpaths.push(SubPath {
            points: vec![p],
            closed: false,
        });
    }

    /// Append to the open subpath; with no subpath, start one at `p`.
    pub(crate) fn line_to(&mut self, p: Point) {
        match self.subpaths.last_mut() {
            Some(sub) if !sub.closed => sub.points.push(p),
            _ => self.move_to(p),
        }
    }

    pub(crate) fn rect(&mut self, origin: Point, corner: Point) {
        self.subpaths.push(SubPath {
            points: vec![
                origin,
                Point::new(corner.x, origin.y),
                corner,
                Point::new(origin.x, corner.y),
            ],
            closed: true,
        });
    }

    /// Append a flattened arc, connected to the open subpath if any.
    pub(crate) fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        counterclockwise: bool,
    ) {
        for p in flatten_arc(center, radius, start, end, counterclockwise) {
            self.line_to(p);
        }
    }

    /// Every subpath, each as its own point list (fills close them).
    pub(crate) fn polygons(&self) -> Vec<Vec<Point>> {
        self.subpaths
            .iter()
            .filter(|s| s.points.len() > 2)
            .map(|s| s.points.clone())
            .collect()
    }

    /// Every point of the path, for bounds computations.
    pub(crate) fn points(&self) -> impl Iterator<Item = &Point> {
        self.subpaths.iter().flat_map(|s| s.points.iter())
    }

    /// SVG path data (`M x y L x y ... Z`), rounded to 1/1000 pixel.
    pub(crate) fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for sub in &self.subpaths {
            for (i, p) in sub.points.iter().enumerate() {
                if !p.is_finite() {
                    continue;
                }
                let cmd = if i == 0 { 'M' } else { 'L' };
                if !d.is_empty() {
                    d.push(' ');
                }
                let _ = write!(d, "{cmd}{} {}", round3(p.x), round3(p.y));
            }
            if sub.closed {
                d.push_str(" Z");
            }
        }
        d
    }
}

pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

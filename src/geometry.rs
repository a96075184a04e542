//! Geometric primitives shared by the canvas layers.
//!
//! Logical coordinates live on a [`Plane`]; device coordinates are CSS
//! pixels of the host surface, shrunk by a [`Padding`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D point with floating-point coordinates.
///
/// Used both for logical plane coordinates and for mapped pixel positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Logical coordinate bounds `(xmin, xmax, ymin, ymax)`.
///
/// Serialized as a four-element sequence, the same shape callers pass
/// on the command line and in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 4]")]
pub struct Plane {
    /// Lower x bound.
    pub xmin: f64,
    /// Upper x bound.
    pub xmax: f64,
    /// Lower y bound.
    pub ymin: f64,
    /// Upper y bound.
    pub ymax: f64,
}

impl Plane {
    /// Create a plane from its four bounds.
    #[must_use]
    pub const fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// The plane `[0, width, 0, height]` covering a surface one unit per pixel.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, size.width, 0.0, size.height)
    }

    /// Bounding plane of a set of points, or `None` when empty.
    ///
    /// The result may be degenerate (zero span) for a single point or a
    /// flat series; [`Plane::validate`] reports that.
    #[must_use]
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self::new(first.x, first.x, first.y, first.y);
        Some(points.iter().fold(init, |p, pt| {
            Self::new(
                p.xmin.min(pt.x),
                p.xmax.max(pt.x),
                p.ymin.min(pt.y),
                p.ymax.max(pt.y),
            )
        }))
    }

    /// Width of the plane in logical units.
    #[must_use]
    pub fn x_span(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height of the plane in logical units.
    #[must_use]
    pub fn y_span(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// The plane shifted by `(-dx, -dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.xmin - dx, self.xmax - dx, self.ymin - dy, self.ymax - dy)
    }

    /// Bounds as `[xmin, xmax, ymin, ymax]`.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.xmin, self.xmax, self.ymin, self.ymax]
    }

    /// Check that every bound is finite and both intervals are non-empty.
    pub fn validate(&self) -> Result<()> {
        if !self.to_array().iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidPlane(format!(
                "bounds must be finite, got {:?}",
                self.to_array()
            )));
        }
        if self.xmin >= self.xmax {
            return Err(Error::InvalidPlane(format!(
                "xmin ({}) must be lower than xmax ({})",
                self.xmin, self.xmax
            )));
        }
        if self.ymin >= self.ymax {
            return Err(Error::InvalidPlane(format!(
                "ymin ({}) must be lower than ymax ({})",
                self.ymin, self.ymax
            )));
        }
        Ok(())
    }
}

impl From<[f64; 4]> for Plane {
    fn from([xmin, xmax, ymin, ymax]: [f64; 4]) -> Self {
        Self::new(xmin, xmax, ymin, ymax)
    }
}

impl From<Plane> for [f64; 4] {
    fn from(plane: Plane) -> Self {
        plane.to_array()
    }
}

impl TryFrom<&[f64]> for Plane {
    type Error = Error;

    fn try_from(values: &[f64]) -> Result<Self> {
        match *values {
            [xmin, xmax, ymin, ymax] => Ok(Self::new(xmin, xmax, ymin, ymax)),
            _ => Err(Error::PlaneShape { len: values.len() }),
        }
    }
}

impl TryFrom<Vec<f64>> for Plane {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::try_from(values.as_slice())
    }
}

/// Pixel insets on each side of the surface.
///
/// Unspecified sides default to zero, both in struct-update syntax and
/// in config files.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Padding {
    /// Left inset.
    pub left: f64,
    /// Top inset.
    pub top: f64,
    /// Right inset.
    pub right: f64,
    /// Bottom inset.
    pub bottom: f64,
}

impl Padding {
    /// No inset on any side.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a padding from its four sides.
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Total horizontal inset.
    #[must_use]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical inset.
    #[must_use]
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f64,
    /// Y coordinate of the top-left corner.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same rectangle with non-negative width and height.
    ///
    /// Canvas APIs accept negative sizes, meaning the rectangle extends
    /// left/up from its origin.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }

    /// Shrink every edge by `margin`.
    #[must_use]
    pub fn inset(&self, margin: f64) -> Self {
        Self::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }

    /// Move `point` into the rectangle, edge by edge.
    ///
    /// Each bound is applied in turn without asserting `min <= max`, so an
    /// inset larger than the rectangle pins the point to the far edges
    /// instead of panicking.
    #[must_use]
    pub fn clamp_point(&self, point: Point) -> Point {
        let mut p = point;
        if p.x < self.x {
            p.x = self.x;
        }
        if p.x > self.x + self.width {
            p.x = self.x + self.width;
        }
        if p.y < self.y {
            p.y = self.y;
        }
        if p.y > self.y + self.height {
            p.y = self.y + self.height;
        }
        p
    }

    /// Check if a point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

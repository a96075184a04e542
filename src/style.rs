//! Style descriptors for the drawing operations.
//!
//! Each operation takes a fully-typed style whose [`Default`] is the
//! operation's default style. Partial styles are written with struct
//! update syntax, which keeps every unspecified leaf at its default at
//! every nesting level:
//!
//! ```
//! use mathcanvas::style::{FontStyle, TextBaseline, TextStyle};
//!
//! let style = TextStyle {
//!     text: FontStyle { baseline: TextBaseline::Bottom, ..FontStyle::default() },
//!     ..TextStyle::default()
//! };
//! assert_eq!(style.text.font.size_px, 15.0);
//! assert!(style.position.stay_in_bound);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Style for [`MathCanvas::line`](crate::canvas::MathCanvas::line).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color. Default black.
    pub color: Rgba,
    /// Stroke width in CSS pixels. Default 1.
    pub line_width: f64,
}

impl LineStyle {
    /// Create a line style.
    #[must_use]
    pub const fn new(color: Rgba, line_width: f64) -> Self {
        Self { color, line_width }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new(Rgba::BLACK, 1.0)
    }
}

/// Style for rectangles and arcs: either filled or stroked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// Fill or stroke color. Default black.
    pub color: Rgba,
    /// Stroke width when not filled. Default 1.
    pub line_width: f64,
    /// Fill instead of stroking. Default false.
    pub fill: bool,
}

impl ShapeStyle {
    /// A filled shape of `color`.
    #[must_use]
    pub const fn filled(color: Rgba) -> Self {
        Self {
            color,
            line_width: 1.0,
            fill: true,
        }
    }

    /// A stroked shape outline.
    #[must_use]
    pub const fn stroked(color: Rgba, line_width: f64) -> Self {
        Self {
            color,
            line_width,
            fill: false,
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::stroked(Rgba::BLACK, 1.0)
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor at the left edge of the text.
    Left,
    /// Anchor at the right edge of the text.
    Right,
    /// Anchor at the horizontal center.
    #[default]
    Center,
    /// Left edge for left-to-right text.
    Start,
    /// Right edge for left-to-right text.
    End,
}

impl TextAlign {
    /// The Canvas 2D `textAlign` keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Start => "start",
            Self::End => "end",
        }
    }

    /// Fraction of the text width lying left of the anchor (LTR text).
    #[must_use]
    pub const fn anchor_fraction(self) -> f64 {
        match self {
            Self::Left | Self::Start => 0.0,
            Self::Center => 0.5,
            Self::Right | Self::End => 1.0,
        }
    }
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    /// Anchor at the top of the em box.
    Top,
    /// Anchor at the hanging baseline.
    Hanging,
    /// Anchor at the vertical middle.
    #[default]
    Middle,
    /// Anchor at the alphabetic baseline.
    Alphabetic,
    /// Anchor at the ideographic baseline.
    Ideographic,
    /// Anchor at the bottom of the em box.
    Bottom,
}

impl TextBaseline {
    /// The Canvas 2D `textBaseline` keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Hanging => "hanging",
            Self::Middle => "middle",
            Self::Alphabetic => "alphabetic",
            Self::Ideographic => "ideographic",
            Self::Bottom => "bottom",
        }
    }

    /// The SVG `dominant-baseline` keyword closest to this baseline.
    #[must_use]
    pub const fn as_svg(self) -> &'static str {
        match self {
            Self::Top => "text-before-edge",
            Self::Hanging => "hanging",
            Self::Middle => "middle",
            Self::Alphabetic => "alphabetic",
            Self::Ideographic => "ideographic",
            Self::Bottom => "text-after-edge",
        }
    }
}

/// A CSS font shorthand reduced to what the surfaces use.
///
/// Parses strings such as `"15px Arial"` or `"bold 20px Poppins"`; `pt`
/// sizes are converted to pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Leading keywords (`bold`, `italic`, ...), space separated.
    pub modifiers: String,
    /// Font size in CSS pixels.
    pub size_px: f64,
    /// Family list, as written.
    pub family: String,
}

impl Font {
    /// A font of `size_px` pixels in `family`.
    #[must_use]
    pub fn new(size_px: f64, family: impl Into<String>) -> Self {
        Self {
            modifiers: String::new(),
            size_px,
            family: family.into(),
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(15.0, "Arial")
    }
}

impl FromStr for Font {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid_arg("font", format!("must look like \"15px Arial\", got {s:?}"));
        let tokens: Vec<&str> = s.split_whitespace().collect();

        let (index, size_px) = tokens
            .iter()
            .enumerate()
            .find_map(|(i, tok)| {
                // "15px/1.2" carries a line height we do not use
                let size = tok.split('/').next().unwrap_or(tok);
                let px = if let Some(v) = size.strip_suffix("px") {
                    v.parse::<f64>().ok()
                } else if let Some(v) = size.strip_suffix("pt") {
                    v.parse::<f64>().ok().map(|pt| pt * 4.0 / 3.0)
                } else {
                    None
                };
                px.map(|px| (i, px))
            })
            .ok_or_else(invalid)?;

        let family = tokens[index + 1..].join(" ");
        if family.is_empty() || !size_px.is_finite() || size_px <= 0.0 {
            return Err(invalid());
        }

        Ok(Self {
            modifiers: tokens[..index].join(" "),
            size_px,
            family,
        })
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.modifiers.is_empty() {
            write!(f, "{} ", self.modifiers)?;
        }
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

/// Glyph styling for [`TextStyle`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    /// Text color. Default black.
    pub color: Rgba,
    /// Stroke width for stroked text. Default 1.
    pub line_width: f64,
    /// Font. Default `15px Arial`.
    pub font: Font,
    /// Vertical alignment. Default middle.
    pub baseline: TextBaseline,
    /// Horizontal alignment. Default center.
    pub align: TextAlign,
    /// Stroke an outline over the text. Default false.
    pub outline: bool,
    /// Outline color. Default red.
    pub outline_color: Rgba,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            line_width: 1.0,
            font: Font::default(),
            baseline: TextBaseline::Middle,
            align: TextAlign::Center,
            outline: false,
            outline_color: Rgba::RED,
        }
    }
}

/// Pixel placement adjustments for [`TextStyle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPosition {
    /// Horizontal pixel offset applied after mapping. Default 0.
    pub margin_left_px: f64,
    /// Vertical pixel offset applied after mapping. Default 0.
    pub margin_top_px: f64,
    /// Keep the anchor inside the surface. Default true.
    pub stay_in_bound: bool,
    /// Distance kept from every surface edge when clamping. Default 20.
    pub in_bound_margin_px: f64,
}

impl Default for TextPosition {
    fn default() -> Self {
        Self {
            margin_left_px: 0.0,
            margin_top_px: 0.0,
            stay_in_bound: true,
            in_bound_margin_px: 20.0,
        }
    }
}

/// Style for [`MathCanvas::text`](crate::canvas::MathCanvas::text).
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Fill the glyphs (default) or stroke them.
    pub fill: bool,
    /// Glyph styling.
    pub text: FontStyle,
    /// Placement adjustments.
    pub position: TextPosition,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fill: true,
            text: FontStyle::default(),
            position: TextPosition::default(),
        }
    }
}

impl TextStyle {
    /// Replace the alignment pair.
    #[must_use]
    pub fn aligned(mut self, align: TextAlign, baseline: TextBaseline) -> Self {
        self.text.align = align;
        self.text.baseline = baseline;
        self
    }

    /// Replace the font.
    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.text.font = font;
        self
    }
}

//! SVG document model and serializer.
//!
//! [`SvgSurface`](crate::surface::SvgSurface) translates canvas calls into
//! [`SvgElement`]s; [`SvgEncoder::render`] writes them out in order.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::color::Rgba;
use crate::error::Result;
use crate::style::{TextAlign, TextBaseline};

/// An SVG document under construction.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    /// Background color (None for transparent).
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// A paint: fill and/or stroke.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Paint {
    /// Fill color, `None` for `fill="none"`.
    pub fill: Option<Rgba>,
    /// Stroke color, `None` for no stroke.
    pub stroke: Option<Rgba>,
    /// Stroke width in user units.
    pub stroke_width: f64,
}

impl Paint {
    /// Fill only.
    #[must_use]
    pub const fn fill(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    /// Stroke only.
    #[must_use]
    pub const fn stroke(color: Rgba, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }

    fn attributes(&self) -> String {
        let mut attrs = format!(
            r#" fill="{}""#,
            self.fill.map_or_else(|| "none".to_string(), Rgba::to_css)
        );
        if let Some(stroke) = self.stroke {
            let _ = write!(
                attrs,
                r#" stroke="{}" stroke-width="{}""#,
                stroke.to_css(),
                self.stroke_width
            );
        }
        attrs
    }
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    },
    /// Path (SVG path data).
    Path { d: String, paint: Paint },
    /// Text.
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        font_family: String,
        anchor: TextAnchor,
        baseline: TextBaseline,
        paint: Paint,
    },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Text starts at the position (left-aligned for LTR).
    #[default]
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position (right-aligned for LTR).
    End,
}

impl TextAnchor {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl From<TextAlign> for TextAnchor {
    fn from(align: TextAlign) -> Self {
        match align {
            TextAlign::Left | TextAlign::Start => Self::Start,
            TextAlign::Center => Self::Middle,
            TextAlign::Right | TextAlign::End => Self::End,
        }
    }
}

impl SvgEncoder {
    /// Create an empty, transparent document.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            elements: Vec::new(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Document width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Document height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Change the document size, keeping the elements.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Append an element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Render to an SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(256 + self.elements.len() * 96);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                bg.to_css()
            );
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write the rendered document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            paint,
        } => format!(
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}"{}/>"#,
            paint.attributes()
        ),
        SvgElement::Path { d, paint } => {
            format!(r#"<path d="{d}"{}/>"#, paint.attributes())
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            font_family,
            anchor,
            baseline,
            paint,
        } => format!(
            r#"<text x="{x}" y="{y}" font-size="{font_size}" font-family="{}" text-anchor="{}" dominant-baseline="{}"{}>{}</text>"#,
            escape_xml(font_family),
            anchor.as_str(),
            baseline.as_svg(),
            paint.attributes(),
            escape_xml(text)
        ),
    }
}

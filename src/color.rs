//! Color types and CSS color parsing.
//!
//! Styles and grid settings name their colors the way a web canvas does
//! (`"grey"`, `"#ff8800"`, `"rgba(50,200,60,0.4)"`), so [`Rgba`] parses and
//! prints CSS color syntax and (de)serializes as a CSS string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green (CSS `lime`).
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);
    /// CSS `grey`, the default grid line color.
    pub const GREY: Self = Self::rgb(128, 128, 128);
    /// CSS `lightgrey`, the default sub-grid line color.
    pub const LIGHT_GREY: Self = Self::rgb(211, 211, 211);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Whether the color is fully transparent.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// CSS representation: `rgb(r,g,b)` when opaque, `rgba(r,g,b,a)` otherwise.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }

    /// Parse a CSS color string.
    ///
    /// Accepts named colors (case-insensitive), `#rgb`, `#rgba`, `#rrggbb`,
    /// `#rrggbbaa`, `rgb()`, `rgba()`, `hsl()` and `hsla()`.
    ///
    /// # Example
    ///
    /// ```
    /// use mathcanvas::color::Rgba;
    ///
    /// assert_eq!(Rgba::parse("lightGrey").unwrap(), Rgba::LIGHT_GREY);
    /// assert_eq!(Rgba::parse("rgba(50,200,60,0.4)").unwrap(), Rgba::new(50, 200, 60, 102));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        let invalid = || Error::InvalidColor(input.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = s.to_ascii_lowercase();
        if let Some((name, args)) = lower.split_once('(') {
            let args = args.strip_suffix(')').ok_or_else(invalid)?;
            let parts: Vec<&str> = args
                .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
                .filter(|p| !p.is_empty())
                .collect();
            return match (name.trim(), parts.len()) {
                ("rgb" | "rgba", 3 | 4) => parse_rgb_args(&parts).ok_or_else(invalid),
                ("hsl" | "hsla", 3 | 4) => parse_hsl_args(&parts).ok_or_else(invalid),
                _ => Err(invalid()),
            };
        }

        named_color(&lower).ok_or_else(invalid)
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_css()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// A channel value, either `0-255` or a percentage.
fn parse_channel(part: &str) -> Option<u8> {
    let value = match part.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? * 2.55,
        None => part.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| value.round().clamp(0.0, 255.0) as u8)
}

/// An alpha value, either `0.0-1.0` or a percentage.
fn parse_alpha(part: &str) -> Option<u8> {
    let value = match part.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0,
        None => part.parse::<f64>().ok()?,
    };
    value
        .is_finite()
        .then(|| (value.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn parse_rgb_args(parts: &[&str]) -> Option<Rgba> {
    let a = match parts.get(3) {
        Some(alpha) => parse_alpha(alpha)?,
        None => 255,
    };
    Some(Rgba::new(
        parse_channel(parts[0])?,
        parse_channel(parts[1])?,
        parse_channel(parts[2])?,
        a,
    ))
}

fn parse_hsl_args(parts: &[&str]) -> Option<Rgba> {
    let h = parts[0].trim_end_matches("deg").parse::<f32>().ok()?;
    let s = parts[1].strip_suffix('%')?.parse::<f32>().ok()? / 100.0;
    let l = parts[2].strip_suffix('%')?.parse::<f32>().ok()? / 100.0;
    let a = match parts.get(3) {
        Some(alpha) => f32::from(parse_alpha(alpha)?) / 255.0,
        None => 1.0,
    };
    Some(Hsla::new(h.rem_euclid(360.0), s.clamp(0.0, 1.0), l.clamp(0.0, 1.0), a).to_rgba())
}

fn named_color(name: &str) -> Option<Rgba> {
    let rgb = match name {
        "transparent" => return Some(Rgba::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "lime" => (0, 255, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "grey" | "gray" => (128, 128, 128),
        "lightgrey" | "lightgray" => (211, 211, 211),
        "darkgrey" | "darkgray" => (169, 169, 169),
        "dimgrey" | "dimgray" => (105, 105, 105),
        "silver" => (192, 192, 192),
        "gainsboro" => (220, 220, 220),
        "whitesmoke" => (245, 245, 245),
        "maroon" => (128, 0, 0),
        "darkred" => (139, 0, 0),
        "crimson" => (220, 20, 60),
        "orange" => (255, 165, 0),
        "darkorange" => (255, 140, 0),
        "gold" => (255, 215, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "darkblue" => (0, 0, 139),
        "royalblue" => (65, 105, 225),
        "steelblue" => (70, 130, 180),
        "skyblue" => (135, 206, 235),
        "lightblue" => (173, 216, 230),
        "teal" => (0, 128, 128),
        "darkgreen" => (0, 100, 0),
        "forestgreen" => (34, 139, 34),
        "seagreen" => (46, 139, 87),
        "lightgreen" => (144, 238, 144),
        "purple" => (128, 0, 128),
        "indigo" => (75, 0, 130),
        "violet" => (238, 130, 238),
        "pink" => (255, 192, 203),
        "hotpink" => (255, 105, 180),
        "brown" => (165, 42, 42),
        "chocolate" => (210, 105, 30),
        "tomato" => (255, 99, 71),
        "coral" => (255, 127, 80),
        "salmon" => (250, 128, 114),
        "tan" => (210, 180, 140),
        "beige" => (245, 245, 220),
        "ivory" => (255, 255, 240),
        _ => return None,
    };
    Some(Rgba::rgb(rgb.0, rgb.1, rgb.2))
}

/// HSLA color with floating-point components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsla {
    /// Hue (0.0-360.0 degrees).
    pub h: f32,
    /// Saturation (0.0-1.0).
    pub s: f32,
    /// Lightness (0.0-1.0).
    pub l: f32,
    /// Alpha (0.0-1.0).
    pub a: f32,
}

impl Hsla {
    /// Create a new HSLA color.
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Create an opaque HSL color (alpha = 1.0).
    #[must_use]
    pub const fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::new(h, s, l, 1.0)
    }

    /// Convert to RGBA.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        let h = self.h / 360.0;
        let s = self.s;
        let l = self.l;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;

            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Rgba::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        )
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl From<Hsla> for Rgba {
    fn from(hsla: Hsla) -> Self {
        hsla.to_rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::RED.r, 255);
        assert_eq!(Rgba::GREEN.g, 255);
        assert_eq!(Rgba::BLUE.b, 255);
    }

    #[test]
    fn test_parse_named_case_insensitive() {
        assert_eq!(Rgba::parse("grey").unwrap(), Rgba::GREY);
        assert_eq!(Rgba::parse("lightGrey").unwrap(), Rgba::LIGHT_GREY);
        assert_eq!(Rgba::parse("BLACK").unwrap(), Rgba::BLACK);
        assert_eq!(Rgba::parse("transparent").unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgba::parse("#f00").unwrap(), Rgba::RED);
        assert_eq!(Rgba::parse("#00ff00").unwrap(), Rgba::GREEN);
        assert_eq!(Rgba::parse("#0000ff80").unwrap(), Rgba::new(0, 0, 255, 128));
        assert!(Rgba::parse("#12345").is_err());
        assert!(Rgba::parse("#gg0000").is_err());
    }

    #[test]
    fn test_parse_functional_forms() {
        assert_eq!(Rgba::parse("rgb(1, 2, 3)").unwrap(), Rgba::rgb(1, 2, 3));
        assert_eq!(
            Rgba::parse("rgba(50,200,60,0.4)").unwrap(),
            Rgba::new(50, 200, 60, 102)
        );
        assert_eq!(Rgba::parse("rgb(100%, 0%, 0%)").unwrap(), Rgba::RED);
        assert_eq!(Rgba::parse("hsl(0, 100%, 50%)").unwrap(), Rgba::RED);
        assert_eq!(Rgba::parse("hsla(240, 100%, 50%, 0.5)").unwrap().a, 128);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Rgba::parse("not-a-color").is_err());
        assert!(Rgba::parse("rgb(1,2)").is_err());
        assert!(Rgba::parse("rgb(1,2,3").is_err());
        assert!(Rgba::parse("").is_err());
    }

    #[test]
    fn test_css_roundtrip_through_serde() {
        let color = Rgba::new(10, 20, 30, 255);
        let yaml = serde_yaml_ng::to_string(&color).unwrap();
        assert!(yaml.contains("rgb(10,20,30)"));
        let back: Rgba = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn test_serde_rejects_bad_color() {
        let result: std::result::Result<Rgba, _> = serde_yaml_ng::from_str("\"nope\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_to_css_translucent() {
        assert_eq!(Rgba::new(255, 0, 0, 0).to_css(), "rgba(255,0,0,0.000)");
        assert_eq!(Rgba::RED.to_css(), "rgb(255,0,0)");
    }

    #[test]
    fn test_hsla_to_rgba() {
        let red = Hsla::hsl(0.0, 1.0, 0.5).to_rgba();
        assert_eq!(red, Rgba::RED);

        let gray = Hsla::hsl(0.0, 0.0, 0.5).to_rgba();
        assert_eq!(gray.r, 128);
        assert_eq!(gray.g, 128);
        assert_eq!(gray.b, 128);
    }

    #[test]
    fn test_hsla_to_rgba_cyan() {
        let cyan = Hsla::hsl(180.0, 1.0, 0.5).to_rgba();
        assert_eq!(cyan.r, 0);
        assert_eq!(cyan.g, 255);
        assert_eq!(cyan.b, 255);
    }
}

//! Bitmap text rendering with the `embedded-graphics` ASCII mono fonts.
//!
//! The largest font whose glyph height fits the requested pixel size is
//! used. Sizes beyond twice the largest font are drawn with integer pixel
//! scaling, capped so one glyph cell never exceeds the framebuffer.

use std::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point as GlyphPoint, Size as GlyphSize};
use embedded_graphics::mono_font::ascii::{
    FONT_10X20, FONT_4X6, FONT_5X8, FONT_6X10, FONT_6X12, FONT_7X14, FONT_8X13, FONT_9X15,
    FONT_9X18,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_graphics::{Drawable, Pixel};

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;
use crate::style::{TextAlign, TextBaseline};

/// Fonts by ascending glyph height.
const FONTS: [&MonoFont<'static>; 9] = [
    &FONT_4X6, &FONT_5X8, &FONT_6X10, &FONT_6X12, &FONT_8X13, &FONT_7X14, &FONT_9X15, &FONT_9X18,
    &FONT_10X20,
];

/// Pick a font and integer scale for a pixel size, the scale at most
/// `max_scale`.
fn select_font(size_px: f64, max_scale: i32) -> (&'static MonoFont<'static>, i32) {
    let tallest = FONTS[FONTS.len() - 1];
    let tallest_height = f64::from(tallest.character_size.height);
    if size_px >= 2.0 * tallest_height {
        let scale = (size_px / tallest_height).floor().min(f64::from(max_scale.max(1)));
        return (tallest, scale as i32);
    }
    let font = FONTS
        .iter()
        .rev()
        .find(|font| f64::from(font.character_size.height) <= size_px)
        .copied()
        .unwrap_or(FONTS[0]);
    (font, 1)
}

/// Draws glyph pixels into a framebuffer, blended, `scale`×`scale` each.
struct GlyphTarget<'a> {
    fb: &'a mut Framebuffer,
    color: Rgba,
    origin: GlyphPoint,
    scale: i32,
}

impl OriginDimensions for GlyphTarget<'_> {
    fn size(&self) -> GlyphSize {
        GlyphSize::new(self.fb.width(), self.fb.height())
    }
}

impl DrawTarget for GlyphTarget<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(at, on) in pixels {
            if on != BinaryColor::On {
                continue;
            }
            // glyphs are laid out around the origin, then scaled about it
            let scale = i64::from(self.scale);
            let x = i64::from(self.origin.x) + i64::from(at.x - self.origin.x) * scale;
            let y = i64::from(self.origin.y) + i64::from(at.y - self.origin.y) * scale;
            // only the part of the cell inside the framebuffer
            let (x0, x1) = (x.max(0), (x + scale).min(i64::from(self.fb.width())));
            let (y0, y1) = (y.max(0), (y + scale).min(i64::from(self.fb.height())));
            for py in y0..y1 {
                for px in x0..x1 {
                    self.fb.blend_pixel(px as u32, py as u32, self.color);
                }
            }
        }
        Ok(())
    }
}

/// Draw `text` anchored at `anchor` (device pixels).
pub fn draw_text(
    fb: &mut Framebuffer,
    text: &str,
    anchor: Point,
    size_px: f64,
    align: TextAlign,
    baseline: TextBaseline,
    color: Rgba,
) {
    if text.is_empty() || !anchor.is_finite() || color.a == 0 {
        return;
    }
    let tallest_height = FONTS[FONTS.len() - 1].character_size.height;
    let max_scale =
        i32::try_from(fb.width().max(fb.height()) / tallest_height + 1).unwrap_or(i32::MAX);
    let (font, scale) = select_font(size_px, max_scale);

    let alignment = match align {
        TextAlign::Left | TextAlign::Start => Alignment::Left,
        TextAlign::Center => Alignment::Center,
        TextAlign::Right | TextAlign::End => Alignment::Right,
    };
    let baseline = match baseline {
        TextBaseline::Top | TextBaseline::Hanging => Baseline::Top,
        TextBaseline::Middle => Baseline::Middle,
        TextBaseline::Alphabetic => Baseline::Alphabetic,
        TextBaseline::Ideographic | TextBaseline::Bottom => Baseline::Bottom,
    };

    let limit = f64::from(i32::MAX / 4);
    let origin = GlyphPoint::new(
        anchor.x.floor().clamp(-limit, limit) as i32,
        anchor.y.floor().clamp(-limit, limit) as i32,
    );
    let character_style = MonoTextStyle::new(font, BinaryColor::On);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();

    let mut target = GlyphTarget {
        fb,
        color,
        origin,
        scale,
    };
    let _ = Text::with_text_style(text, origin, character_style, text_style).draw(&mut target);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_font_by_height() {
        assert_eq!(select_font(15.0, 8).0.character_size.height, 15);
        assert_eq!(select_font(20.0, 8).0.character_size.height, 20);
        assert_eq!(select_font(3.0, 8).0.character_size.height, 6);
        let (font, scale) = select_font(45.0, 8);
        assert_eq!(font.character_size.height, 20);
        assert_eq!(scale, 2);
    }

    #[test]
    fn test_select_font_caps_scale() {
        assert_eq!(select_font(1e12, 6).1, 6);
        assert_eq!(select_font(f64::MAX, 0).1, 1);
    }

    #[test]
    fn test_draw_text_huge_font_returns() {
        let mut fb = Framebuffer::new(60, 60).unwrap();
        fb.clear(Rgba::WHITE);
        draw_text(
            &mut fb,
            "a",
            Point::new(5.0, 5.0),
            1e12,
            TextAlign::Left,
            TextBaseline::Top,
            Rgba::BLACK,
        );
        let dark = (0..60)
            .flat_map(|x| (0..60).map(move |y| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) == Some(Rgba::BLACK))
            .count();
        assert!(dark > 0);
    }

    #[test]
    fn test_draw_text_marks_pixels_near_anchor() {
        let mut fb = Framebuffer::new(100, 40).unwrap();
        fb.clear(Rgba::WHITE);
        draw_text(
            &mut fb,
            "Hi",
            Point::new(50.0, 20.0),
            15.0,
            TextAlign::Center,
            TextBaseline::Middle,
            Rgba::BLACK,
        );

        let dark = (0..100)
            .flat_map(|x| (0..40).map(move |y| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) == Some(Rgba::BLACK))
            .collect::<Vec<_>>();
        assert!(!dark.is_empty());
        assert!(dark.iter().all(|&(x, y)| (35..65).contains(&x) && (10..30).contains(&y)));
    }

    #[test]
    fn test_draw_text_off_surface_is_ignored() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        draw_text(
            &mut fb,
            "far",
            Point::new(-1e9, 1e9),
            15.0,
            TextAlign::Left,
            TextBaseline::Top,
            Rgba::BLACK,
        );
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::TRANSPARENT));
    }
}

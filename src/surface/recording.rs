//! A surface that records every call instead of drawing.

use super::DrawingSurface;
use crate::color::Rgba;
use crate::geometry::{Point, Size};
use crate::style::{Font, TextAlign, TextBaseline};

/// One recorded surface call, arguments as passed (user space).
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DrawCommand {
    ResizeBacking {
        width: u32,
        height: u32,
    },
    Scale {
        x: f64,
        y: f64,
    },
    SetStrokeColor(Rgba),
    SetFillColor(Rgba),
    SetLineWidth(f64),
    SetFont(Font),
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    },
    Stroke,
    Fill,
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
    },
    StrokeText {
        text: String,
        x: f64,
        y: f64,
    },
}

/// A straight segment that was stroked, with the style in effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedStroke {
    /// Segment start.
    pub from: Point,
    /// Segment end.
    pub to: Point,
    /// Stroke color.
    pub color: Rgba,
    /// Line width.
    pub line_width: f64,
}

/// A text draw, with the style in effect.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedText {
    /// Drawn string.
    pub text: String,
    /// Anchor point.
    pub at: Point,
    /// Whether it was filled (`fill_text`) or stroked.
    pub filled: bool,
    /// Fill or stroke color, whichever applied.
    pub color: Rgba,
    /// Font.
    pub font: Font,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub baseline: TextBaseline,
}

/// Records [`DrawCommand`]s for later inspection.
///
/// # Example
///
/// ```
/// use mathcanvas::surface::{DrawingSurface, RecordingSurface};
///
/// let mut surface = RecordingSurface::new(100.0, 100.0);
/// surface.begin_path();
/// surface.move_to(0.5, 0.5);
/// surface.line_to(10.5, 0.5);
/// surface.stroke();
///
/// assert_eq!(surface.commands().len(), 4);
/// assert_eq!(surface.strokes().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    client: Size,
    pixel_ratio: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// A surface laid out at `width`×`height` CSS pixels.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            client: Size::new(width, height),
            pixel_ratio: 1.0,
            commands: Vec::new(),
        }
    }

    /// Report a device pixel ratio other than 1.
    #[must_use]
    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Simulate a host relayout.
    pub fn set_client_size(&mut self, width: f64, height: f64) {
        self.client = Size::new(width, height);
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the log.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Replay the log into the straight segments each `stroke` painted.
    ///
    /// Rectangles and arcs are not expanded; only `move_to`/`line_to`
    /// segments are reported.
    #[must_use]
    pub fn strokes(&self) -> Vec<RecordedStroke> {
        let mut out = Vec::new();
        let mut color = Rgba::BLACK;
        let mut line_width = 1.0;
        let mut segments: Vec<(Point, Point)> = Vec::new();
        let mut cursor: Option<Point> = None;

        for command in &self.commands {
            match *command {
                DrawCommand::ResizeBacking { .. } => {
                    color = Rgba::BLACK;
                    line_width = 1.0;
                    segments.clear();
                    cursor = None;
                }
                DrawCommand::SetStrokeColor(c) => color = c,
                DrawCommand::SetLineWidth(w) if w.is_finite() && w > 0.0 => line_width = w,
                DrawCommand::BeginPath => {
                    segments.clear();
                    cursor = None;
                }
                DrawCommand::MoveTo { x, y } => cursor = Some(Point::new(x, y)),
                DrawCommand::LineTo { x, y } => {
                    let to = Point::new(x, y);
                    if let Some(from) = cursor {
                        segments.push((from, to));
                    }
                    cursor = Some(to);
                }
                DrawCommand::Stroke => out.extend(segments.iter().map(|&(from, to)| {
                    RecordedStroke {
                        from,
                        to,
                        color,
                        line_width,
                    }
                })),
                _ => {}
            }
        }
        out
    }

    /// Replay the log into the text draws.
    #[must_use]
    pub fn texts(&self) -> Vec<RecordedText> {
        let mut out = Vec::new();
        let mut fill = Rgba::BLACK;
        let mut stroke = Rgba::BLACK;
        let mut font = Font::new(10.0, "sans-serif");
        let mut align = TextAlign::Start;
        let mut baseline = TextBaseline::Alphabetic;

        for command in &self.commands {
            match command {
                DrawCommand::ResizeBacking { .. } => {
                    fill = Rgba::BLACK;
                    stroke = Rgba::BLACK;
                    font = Font::new(10.0, "sans-serif");
                    align = TextAlign::Start;
                    baseline = TextBaseline::Alphabetic;
                }
                DrawCommand::SetFillColor(c) => fill = *c,
                DrawCommand::SetStrokeColor(c) => stroke = *c,
                DrawCommand::SetFont(f) => font = f.clone(),
                DrawCommand::SetTextAlign(a) => align = *a,
                DrawCommand::SetTextBaseline(b) => baseline = *b,
                DrawCommand::FillText { text, x, y } | DrawCommand::StrokeText { text, x, y } => {
                    let filled = matches!(command, DrawCommand::FillText { .. });
                    out.push(RecordedText {
                        text: text.clone(),
                        at: Point::new(*x, *y),
                        filled,
                        color: if filled { fill } else { stroke },
                        font: font.clone(),
                        align,
                        baseline,
                    });
                }
                _ => {}
            }
        }
        out
    }
}

impl DrawingSurface for RecordingSurface {
    fn client_size(&self) -> Size {
        self.client
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.commands.push(DrawCommand::ResizeBacking { width, height });
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Scale { x, y });
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::SetStrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::SetFillColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_font(&mut self, font: &Font) {
        self.commands.push(DrawCommand::SetFont(font.clone()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.commands.push(DrawCommand::SetTextBaseline(baseline));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
        });
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
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
            counterclockwise,
        });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::StrokeText {
            text: text.to_string(),
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strokes_replay_style() {
        let mut s = RecordingSurface::new(10.0, 10.0);
        s.begin_path();
        s.set_stroke_color(Rgba::RED);
        s.set_line_width(2.0);
        s.move_to(0.0, 0.0);
        s.line_to(1.0, 1.0);
        s.line_to(2.0, 0.0);
        s.stroke();
        s.begin_path();
        s.move_to(5.0, 5.0);
        s.stroke();

        let strokes = s.strokes();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[1].from, Point::new(1.0, 1.0));
        assert_eq!(strokes[1].color, Rgba::RED);
        assert_eq!(strokes[1].line_width, 2.0);
    }

    #[test]
    fn test_texts_replay_style() {
        let mut s = RecordingSurface::new(10.0, 10.0);
        s.set_fill_color(Rgba::BLUE);
        s.set_text_align(TextAlign::Right);
        s.fill_text("a", 1.0, 2.0);
        s.stroke_text("b", 3.0, 4.0);

        let texts = s.texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].filled);
        assert_eq!(texts[0].color, Rgba::BLUE);
        assert_eq!(texts[0].align, TextAlign::Right);
        assert!(!texts[1].filled);
        assert_eq!(texts[1].color, Rgba::BLACK);
    }

    #[test]
    fn test_take_commands_drains() {
        let mut s = RecordingSurface::new(10.0, 10.0).with_pixel_ratio(2.0);
        s.fill();
        assert_eq!(s.device_pixel_ratio(), 2.0);
        assert_eq!(s.take_commands(), vec![DrawCommand::Fill]);
        assert!(s.commands().is_empty());
    }

    #[test]
    fn test_client_size_tracks_relayout() {
        let mut s = RecordingSurface::new(10.0, 10.0);
        s.set_client_size(30.0, 40.0);
        assert_eq!(s.client_size(), Size::new(30.0, 40.0));
    }
}

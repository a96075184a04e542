//! Grid lines, sub-grid lines and axes over a plane.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{check_finite, check_positive, MathCanvas, Mode, MAX_GRID_LINES};
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Padding, Plane, Point};
use crate::merge::{merge_leaf, DeepMerge};
use crate::style::LineStyle;
use crate::surface::DrawingSurface;

// ============================================================================
// Settings
// ============================================================================

/// Visibility and stroke of one family of lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSettings {
    /// Whether the lines are drawn.
    pub displayed: bool,
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width in pixels.
    pub line_width: f64,
}

impl LineSettings {
    /// Displayed lines of the given color and width.
    #[must_use]
    pub const fn shown(color: Rgba, line_width: f64) -> Self {
        Self {
            displayed: true,
            color,
            line_width,
        }
    }

    fn style(&self) -> LineStyle {
        LineStyle::new(self.color, self.line_width)
    }
}

/// Settings for vertical and horizontal lines of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePair {
    /// Lines of constant x.
    pub vertical: LineSettings,
    /// Lines of constant y.
    pub horizontal: LineSettings,
}

/// Settings for the two axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSettings {
    /// The `y = 0` line.
    pub x: LineSettings,
    /// The `x = 0` line.
    pub y: LineSettings,
}

/// Everything a [`Grid`] draws, and how.
///
/// Each grid owns its own copy; [`GridSettings::default`] builds a fresh
/// tree every time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Lines at every step.
    pub grid_lines: LinePair,
    /// Lines between two grid lines.
    pub sub_grid_lines: LinePair,
    /// The axes.
    pub axis: AxisSettings,
    /// Target pixel distance between grid lines, used by auto-stepping.
    pub step_px: f64,
    /// Color painted under the grid.
    pub background_color: Rgba,
}

impl Default for GridSettings {
    fn default() -> Self {
        let grid = LineSettings::shown(Rgba::GREY, 0.5);
        let sub = LineSettings::shown(Rgba::LIGHT_GREY, 0.5);
        let axis = LineSettings::shown(Rgba::BLACK, 1.0);
        Self {
            grid_lines: LinePair {
                vertical: grid,
                horizontal: grid,
            },
            sub_grid_lines: LinePair {
                vertical: sub,
                horizontal: sub,
            },
            axis: AxisSettings { x: axis, y: axis },
            step_px: 100.0,
            background_color: Rgba::WHITE,
        }
    }
}

/// Partial [`LineSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct LineSettingsPatch {
    pub displayed: Option<bool>,
    pub color: Option<Rgba>,
    pub line_width: Option<f64>,
}

impl LineSettingsPatch {
    /// A patch that only toggles visibility.
    #[must_use]
    pub const fn displayed(displayed: bool) -> Self {
        Self {
            displayed: Some(displayed),
            color: None,
            line_width: None,
        }
    }
}

/// Partial [`LinePair`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct LinePairPatch {
    pub vertical: Option<LineSettingsPatch>,
    pub horizontal: Option<LineSettingsPatch>,
}

/// Partial [`AxisSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct AxisPatch {
    pub x: Option<LineSettingsPatch>,
    pub y: Option<LineSettingsPatch>,
}

/// Partial [`GridSettings`]: only the leaves that are set get applied.
///
/// ```
/// use mathcanvas::canvas::{GridSettings, GridSettingsPatch};
/// use mathcanvas::merge::DeepMerge;
///
/// let patch: GridSettingsPatch =
///     serde_yaml_ng::from_str("grid_lines: {vertical: {color: red}}").unwrap();
/// let settings = GridSettings::default().merged(&patch);
///
/// assert_eq!(settings.grid_lines.vertical.color.to_css(), "rgb(255,0,0)");
/// assert_eq!(settings.grid_lines.vertical.line_width, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct GridSettingsPatch {
    pub grid_lines: Option<LinePairPatch>,
    pub sub_grid_lines: Option<LinePairPatch>,
    pub axis: Option<AxisPatch>,
    pub step_px: Option<f64>,
    pub background_color: Option<Rgba>,
}

impl DeepMerge for LineSettings {
    type Patch = LineSettingsPatch;

    fn deep_merge(&mut self, patch: &LineSettingsPatch) {
        merge_leaf(&mut self.displayed, patch.displayed.as_ref());
        merge_leaf(&mut self.color, patch.color.as_ref());
        merge_leaf(&mut self.line_width, patch.line_width.as_ref());
    }
}

impl DeepMerge for LinePair {
    type Patch = LinePairPatch;

    fn deep_merge(&mut self, patch: &LinePairPatch) {
        if let Some(p) = &patch.vertical {
            self.vertical.deep_merge(p);
        }
        if let Some(p) = &patch.horizontal {
            self.horizontal.deep_merge(p);
        }
    }
}

impl DeepMerge for AxisSettings {
    type Patch = AxisPatch;

    fn deep_merge(&mut self, patch: &AxisPatch) {
        if let Some(p) = &patch.x {
            self.x.deep_merge(p);
        }
        if let Some(p) = &patch.y {
            self.y.deep_merge(p);
        }
    }
}

impl DeepMerge for GridSettings {
    type Patch = GridSettingsPatch;

    fn deep_merge(&mut self, patch: &GridSettingsPatch) {
        if let Some(p) = &patch.grid_lines {
            self.grid_lines.deep_merge(p);
        }
        if let Some(p) = &patch.sub_grid_lines {
            self.sub_grid_lines.deep_merge(p);
        }
        if let Some(p) = &patch.axis {
            self.axis.deep_merge(p);
        }
        merge_leaf(&mut self.step_px, patch.step_px.as_ref());
        merge_leaf(&mut self.background_color, patch.background_color.as_ref());
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Positions `start + k * step` for every `k >= 0` up to `max`.
///
/// With `lead`, `start` is `min` aligned to the step and one step lower,
/// so the first line sits below the plane. Returns `None` when the
/// step is unusable or the count would exceed [`MAX_GRID_LINES`].
pub(crate) fn line_positions(min: f64, max: f64, step: f64, lead: bool) -> Option<Vec<f64>> {
    if !(step.is_finite() && step > 0.0 && min.is_finite() && max.is_finite()) {
        return None;
    }
    let mut start = min - min % step;
    if lead {
        start -= step;
    }
    let estimate = (max - start) / step;
    if !estimate.is_finite() || estimate > MAX_GRID_LINES as f64 {
        return None;
    }
    Some(
        (0..=MAX_GRID_LINES)
            .map(|k| start + k as f64 * step)
            .take_while(|v| *v <= max)
            .collect(),
    )
}

/// Draws a rectangular lattice with axes over a [`MathCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    canvas: MathCanvas,
    settings: GridSettings,
    x_step: f64,
    y_step: f64,
    x_subsections: u32,
    y_subsections: u32,
}

impl Grid {
    /// Grid over `plane` (or the surface's pixel plane), with the default
    /// settings overridden by `patch`.
    pub fn new<S>(surface: &mut S, plane: Option<Plane>, patch: &GridSettingsPatch) -> Result<Self>
    where
        S: DrawingSurface + ?Sized,
    {
        Ok(Self {
            canvas: MathCanvas::new(surface, plane)?,
            settings: GridSettings::default().merged(patch),
            x_step: 1.0,
            y_step: 1.0,
            x_subsections: 4,
            y_subsections: 4,
        })
    }

    /// Apply the leaves set in `patch`, keep the others.
    pub fn change_settings(&mut self, patch: &GridSettingsPatch) {
        self.settings.deep_merge(patch);
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Current validation mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.canvas.mode()
    }

    /// Switch validation mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.canvas.set_mode(mode);
    }

    /// Current plane.
    #[must_use]
    pub const fn plane(&self) -> Plane {
        self.canvas.plane()
    }

    /// Replace the plane. Returns the accepted plane.
    pub fn set_plane(&mut self, plane: Plane) -> Result<Plane> {
        self.canvas.set_plane(plane)
    }

    /// Reset the plane to the surface's pixel plane.
    pub fn reset_plane<S>(&mut self, surface: &S) -> Plane
    where
        S: DrawingSurface + ?Sized,
    {
        self.canvas.reset_plane(surface)
    }

    /// Current padding.
    #[must_use]
    pub const fn padding(&self) -> Padding {
        self.canvas.padding()
    }

    /// Replace the padding.
    pub fn set_padding(&mut self, padding: Padding) {
        self.canvas.set_padding(padding);
    }

    /// Distance between vertical grid lines, in plane units.
    #[must_use]
    pub const fn x_step(&self) -> f64 {
        self.x_step
    }

    /// Distance between horizontal grid lines, in plane units.
    #[must_use]
    pub const fn y_step(&self) -> f64 {
        self.y_step
    }

    /// Sub-grid sections between two vertical grid lines.
    #[must_use]
    pub const fn x_subsections(&self) -> u32 {
        self.x_subsections
    }

    /// Sub-grid sections between two horizontal grid lines.
    #[must_use]
    pub const fn y_subsections(&self) -> u32 {
        self.y_subsections
    }

    /// Set the vertical grid line spacing.
    pub fn set_x_step(&mut self, step: f64) -> Result<()> {
        if self.mode().validates() {
            check_positive("x_step", step)?;
        }
        self.x_step = step;
        Ok(())
    }

    /// Set the horizontal grid line spacing.
    pub fn set_y_step(&mut self, step: f64) -> Result<()> {
        if self.mode().validates() {
            check_positive("y_step", step)?;
        }
        self.y_step = step;
        Ok(())
    }

    /// Set the number of sections between two vertical grid lines.
    pub fn set_x_subsections(&mut self, subsections: u32) {
        self.x_subsections = subsections;
    }

    /// Set the number of sections between two horizontal grid lines.
    pub fn set_y_subsections(&mut self, subsections: u32) {
        self.y_subsections = subsections;
    }

    /// Shift the plane by `(-dx, -dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) -> Result<Plane> {
        if self.mode().validates() {
            check_finite(&[("dx", dx), ("dy", dy)])?;
        }
        let plane = self.plane().translated(dx, dy);
        self.set_plane(plane)
    }

    /// Clear the surface.
    pub fn clear<S>(&self, surface: &mut S)
    where
        S: DrawingSurface + ?Sized,
    {
        self.canvas.clear(surface);
    }

    /// Clear the surface, then draw background, sub-lines, grid lines and
    /// axes.
    pub fn draw_grid<S>(&self, surface: &mut S) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        let plane = self.plane();
        let GridSettings {
            grid_lines,
            sub_grid_lines,
            ..
        } = self.settings;

        self.canvas.clear(surface);

        // background spans the padding too
        let mut edge = self.canvas.clone();
        edge.set_padding(Padding::ZERO);
        edge.set_background(surface, self.settings.background_color)?;

        debug!(
            x_step = self.x_step,
            y_step = self.y_step,
            ?plane,
            "drawing grid"
        );

        if let Some(ys) = self.positions("horizontal", plane.ymin, plane.ymax, self.y_step) {
            for y in ys {
                self.draw_lines(
                    surface,
                    y,
                    self.y_step,
                    self.y_subsections,
                    grid_lines.horizontal,
                    sub_grid_lines.horizontal,
                    |v| (Point::new(plane.xmin, v), Point::new(plane.xmax, v)),
                )?;
            }
        }
        if let Some(xs) = self.positions("vertical", plane.xmin, plane.xmax, self.x_step) {
            for x in xs {
                self.draw_lines(
                    surface,
                    x,
                    self.x_step,
                    self.x_subsections,
                    grid_lines.vertical,
                    sub_grid_lines.vertical,
                    |v| (Point::new(v, plane.ymin), Point::new(v, plane.ymax)),
                )?;
            }
        }

        self.draw_axis(surface)
    }

    fn positions(&self, direction: &str, min: f64, max: f64, step: f64) -> Option<Vec<f64>> {
        let positions = line_positions(min, max, step, true);
        if positions.is_none() {
            warn!(direction, step, min, max, "skipping grid lines");
        }
        positions
    }

    /// Sub-lines after `value` (skipping the one on the grid line when that
    /// is drawn anyway), then the grid line itself.
    fn draw_lines<S, F>(
        &self,
        surface: &mut S,
        value: f64,
        step: f64,
        subsections: u32,
        grid: LineSettings,
        sub: LineSettings,
        ends: F,
    ) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
        F: Fn(f64) -> (Point, Point),
    {
        if sub.displayed {
            let first = u32::from(grid.displayed);
            for i in first..subsections {
                let (from, to) = ends(value + f64::from(i) * step / f64::from(subsections));
                self.canvas.line(surface, from, to, &sub.style())?;
            }
        }
        if grid.displayed {
            let (from, to) = ends(value);
            self.canvas.line(surface, from, to, &grid.style())?;
        }
        Ok(())
    }

    fn draw_axis<S>(&self, surface: &mut S) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        let p = self.plane();
        let AxisSettings { x, y } = self.settings.axis;
        if x.displayed {
            self.canvas.line(
                surface,
                Point::new(p.xmin, 0.0),
                Point::new(p.xmax, 0.0),
                &x.style(),
            )?;
        }
        if y.displayed {
            self.canvas.line(
                surface,
                Point::new(0.0, p.ymin),
                Point::new(0.0, p.ymax),
                &y.style(),
            )?;
        }
        Ok(())
    }
}

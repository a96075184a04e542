//! Auto-stepping grid with value labels.

use tracing::{debug, warn};

use super::grid::line_positions;
use super::{
    check_positive, AxisPatch, Grid, GridSettings, GridSettingsPatch, LinePairPatch,
    LineSettingsPatch, MathCanvas, Mode,
};
use crate::error::{Error, Result};
use crate::geometry::{Padding, Plane};
use crate::scale::{format_grid_value, nice_step};
use crate::style::{TextAlign, TextBaseline, TextPosition, TextStyle};
use crate::surface::DrawingSurface;

/// Room left around the grid for the value labels.
const DEFAULT_PADDING: Padding = Padding::new(50.0, 10.0, 30.0, 25.0);

/// Distance kept between labels and the surface edges.
const LABEL_EDGE_MARGIN_PX: f64 = 2.0;

/// Gap between the y labels and the grid.
const Y_LABEL_GAP_PX: f64 = 6.0;

/// A [`Grid`] that picks its own step and labels its lines.
///
/// Axes and vertical sub-lines are hidden unless the settings patch
/// given to [`PlotGrid::new`] turns them back on.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGrid {
    grid: Grid,
    x_labels: MathCanvas,
    y_labels: MathCanvas,
    padding: Padding,
    x_step_label: String,
    y_step_label: String,
}

impl PlotGrid {
    /// Plot grid over `plane` (or the surface's pixel plane).
    pub fn new<S>(surface: &mut S, plane: Option<Plane>, patch: &GridSettingsPatch) -> Result<Self>
    where
        S: DrawingSurface + ?Sized,
    {
        let mut grid = Grid::new(surface, plane, &builtin_patch())?;
        grid.change_settings(patch);

        let mut plot_grid = Self {
            grid,
            x_labels: MathCanvas::new(surface, plane)?,
            y_labels: MathCanvas::new(surface, plane)?,
            padding: DEFAULT_PADDING,
            x_step_label: "1".to_string(),
            y_step_label: "1".to_string(),
        };
        plot_grid.set_padding(DEFAULT_PADDING);
        Ok(plot_grid)
    }

    /// The wrapped grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &GridSettings {
        self.grid.settings()
    }

    /// Apply the leaves set in `patch`, keep the others.
    pub fn change_settings(&mut self, patch: &GridSettingsPatch) {
        self.grid.change_settings(patch);
    }

    /// Current validation mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.grid.mode()
    }

    /// Switch validation mode of the grid and both label layers.
    pub fn set_mode(&mut self, mode: Mode) {
        self.grid.set_mode(mode);
        self.x_labels.set_mode(mode);
        self.y_labels.set_mode(mode);
    }

    /// Current plane.
    #[must_use]
    pub const fn plane(&self) -> Plane {
        self.grid.plane()
    }

    /// Replace the plane of the grid and both label layers.
    pub fn set_plane(&mut self, plane: Plane) -> Result<Plane> {
        let plane = self.grid.set_plane(plane)?;
        self.x_labels.set_plane(plane)?;
        self.y_labels.set_plane(plane)?;
        Ok(plane)
    }

    /// Reset every plane to the surface's pixel plane.
    pub fn reset_plane<S>(&mut self, surface: &S) -> Plane
    where
        S: DrawingSurface + ?Sized,
    {
        self.x_labels.reset_plane(surface);
        self.y_labels.reset_plane(surface);
        self.grid.reset_plane(surface)
    }

    /// Padding around the grid.
    #[must_use]
    pub const fn padding(&self) -> Padding {
        self.padding
    }

    /// Pad the grid; x labels share its left/right insets and y labels its
    /// top/bottom insets.
    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
        self.grid.set_padding(padding);
        self.x_labels.set_padding(Padding {
            left: padding.left,
            right: padding.right,
            ..Padding::ZERO
        });
        self.y_labels.set_padding(Padding {
            top: padding.top,
            bottom: padding.bottom,
            ..Padding::ZERO
        });
    }

    /// Distance between vertical grid lines.
    #[must_use]
    pub const fn x_step(&self) -> f64 {
        self.grid.x_step()
    }

    /// Distance between horizontal grid lines.
    #[must_use]
    pub const fn y_step(&self) -> f64 {
        self.grid.y_step()
    }

    /// The x step as shown to people (`5×10^6` for large decades).
    #[must_use]
    pub fn x_step_label(&self) -> &str {
        &self.x_step_label
    }

    /// The y step as shown to people.
    #[must_use]
    pub fn y_step_label(&self) -> &str {
        &self.y_step_label
    }

    /// Set the vertical grid line spacing.
    pub fn set_x_step(&mut self, step: f64) -> Result<()> {
        self.grid.set_x_step(step)?;
        self.x_step_label = format_grid_value(step, step);
        Ok(())
    }

    /// Set the horizontal grid line spacing.
    pub fn set_y_step(&mut self, step: f64) -> Result<()> {
        self.grid.set_y_step(step)?;
        self.y_step_label = format_grid_value(step, step);
        Ok(())
    }

    /// Pick the smallest 1-2-5 steps that keep grid lines at least
    /// `step_px` pixels apart.
    ///
    /// In [`Mode::Performance`], an axis with no usable step keeps its
    /// previous step.
    pub fn auto_step<S>(&mut self, surface: &S) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        let step_px = self.settings().step_px;
        let validates = self.mode().validates();
        if validates {
            check_positive("step_px", step_px)?;
        }

        let client = surface.client_size();
        let plane = self.plane();
        let columns = client.width / step_px;
        let rows = client.height / step_px;

        match (nice_step(plane.x_span(), columns), validates) {
            (Some(step), _) => {
                self.grid.set_x_step(step.value())?;
                self.x_step_label = step.label();
            }
            (None, true) => return Err(no_step("x", plane.x_span(), columns)),
            (None, false) => warn!(span = plane.x_span(), columns, "no usable x step"),
        }
        match (nice_step(plane.y_span(), rows), validates) {
            (Some(step), _) => {
                self.grid.set_y_step(step.value())?;
                self.y_step_label = step.label();
            }
            (None, true) => return Err(no_step("y", plane.y_span(), rows)),
            (None, false) => warn!(span = plane.y_span(), rows, "no usable y step"),
        }

        debug!(
            x_step = self.x_step(),
            y_step = self.y_step(),
            columns,
            rows,
            "auto step"
        );
        Ok(())
    }

    /// Label every grid line: x values along the bottom edge, y values
    /// right-aligned in the left padding.
    pub fn draw_grid_values<S>(&self, surface: &mut S) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        let plane = self.plane();
        let in_bound = TextPosition {
            in_bound_margin_px: LABEL_EDGE_MARGIN_PX,
            ..TextPosition::default()
        };

        let x_style = TextStyle {
            position: in_bound,
            ..TextStyle::default()
        }
        .aligned(TextAlign::Center, TextBaseline::Bottom);
        let x_step = self.x_step();
        match line_positions(plane.xmin, plane.xmax, x_step, false) {
            Some(xs) => {
                for x in xs {
                    let label = format_grid_value(x, x_step);
                    self.x_labels
                        .text(surface, &label, x, plane.ymin, &x_style)?;
                }
            }
            None => warn!(step = x_step, "skipping x labels"),
        }

        let y_style = TextStyle {
            position: TextPosition {
                margin_left_px: self.padding.left - Y_LABEL_GAP_PX,
                ..in_bound
            },
            ..TextStyle::default()
        }
        .aligned(TextAlign::Right, TextBaseline::Middle);
        let y_step = self.y_step();
        match line_positions(plane.ymin, plane.ymax, y_step, false) {
            Some(ys) => {
                for y in ys {
                    let label = format_grid_value(y, y_step);
                    self.y_labels
                        .text(surface, &label, plane.xmin, y, &y_style)?;
                }
            }
            None => warn!(step = y_step, "skipping y labels"),
        }
        Ok(())
    }

    /// Draw the grid, then its labels.
    pub fn draw_grid<S>(&self, surface: &mut S) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        self.grid.draw_grid(surface)?;
        self.draw_grid_values(surface)
    }

    /// Clear the surface.
    pub fn clear<S>(&self, surface: &mut S)
    where
        S: DrawingSurface + ?Sized,
    {
        self.grid.clear(surface);
    }
}

/// Axes hidden, horizontal sub-lines shown, vertical sub-lines hidden.
fn builtin_patch() -> GridSettingsPatch {
    GridSettingsPatch {
        axis: Some(AxisPatch {
            x: Some(LineSettingsPatch::displayed(false)),
            y: Some(LineSettingsPatch::displayed(false)),
        }),
        sub_grid_lines: Some(LinePairPatch {
            horizontal: Some(LineSettingsPatch::displayed(true)),
            vertical: Some(LineSettingsPatch::displayed(false)),
        }),
        ..GridSettingsPatch::default()
    }
}

fn no_step(axis: &str, span: f64, count: f64) -> Error {
    Error::invalid_arg(
        "step_px",
        format!("leaves no usable {axis} step for a span of {span} over {count} lines"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::surface::RecordingSurface;

    fn plot_grid(plane: Plane, patch: &GridSettingsPatch) -> (RecordingSurface, PlotGrid) {
        let mut s = RecordingSurface::new(800.0, 600.0);
        let pg = PlotGrid::new(&mut s, Some(plane), patch).unwrap();
        s.take_commands();
        (s, pg)
    }

    #[test]
    fn test_builtin_overrides() {
        let (_, pg) = plot_grid(Plane::new(0.0, 1.0, 0.0, 1.0), &GridSettingsPatch::default());
        let settings = pg.settings();
        assert!(!settings.axis.x.displayed);
        assert!(!settings.axis.y.displayed);
        assert!(settings.sub_grid_lines.horizontal.displayed);
        assert!(!settings.sub_grid_lines.vertical.displayed);
        assert_eq!(pg.padding(), Padding::new(50.0, 10.0, 30.0, 25.0));
    }

    #[test]
    fn test_caller_patch_wins_over_builtin() {
        let patch = GridSettingsPatch {
            axis: Some(AxisPatch {
                x: Some(LineSettingsPatch::displayed(true)),
                ..AxisPatch::default()
            }),
            ..GridSettingsPatch::default()
        };
        let (_, pg) = plot_grid(Plane::new(0.0, 1.0, 0.0, 1.0), &patch);
        assert!(pg.settings().axis.x.displayed);
        assert!(!pg.settings().axis.y.displayed);
    }

    #[test]
    fn test_auto_step_density() {
        let (s, mut pg) = plot_grid(Plane::new(-5.0, 50.0, 0.0, 10.0), &GridSettingsPatch::default());
        pg.auto_step(&s).unwrap();

        // 800px / 100px = 8 columns, 600px / 100px = 6 rows
        assert_eq!(pg.x_step(), 10.0);
        assert_eq!(pg.y_step(), 2.0);
        assert_eq!(pg.x_step_label(), "10");
    }

    #[test]
    fn test_auto_step_narrow_and_large() {
        let (s, mut pg) = plot_grid(Plane::new(0.0, 0.5, 0.0, 3e7), &GridSettingsPatch::default());
        pg.auto_step(&s).unwrap();

        assert_eq!(pg.x_step(), 1.0);
        assert_eq!(pg.x_step_label(), "1");
        assert_eq!(pg.y_step(), 5e6);
        assert_eq!(pg.y_step_label(), "5×10^6");
    }

    #[test]
    fn test_auto_step_unit_plane_steps_by_one() {
        let (s, mut pg) = plot_grid(Plane::new(0.0, 1.0, 0.0, 1.0), &GridSettingsPatch::default());
        pg.auto_step(&s).unwrap();

        assert_eq!(pg.x_step(), 1.0);
        assert_eq!(pg.y_step(), 1.0);
    }

    #[test]
    fn test_auto_step_rejects_bad_step_px() {
        let patch = GridSettingsPatch {
            step_px: Some(0.0),
            ..GridSettingsPatch::default()
        };
        let (s, mut pg) = plot_grid(Plane::new(0.0, 1.0, 0.0, 1.0), &patch);
        assert!(pg.auto_step(&s).is_err());

        pg.set_mode(Mode::Performance);
        pg.auto_step(&s).unwrap();
        assert_eq!(pg.x_step(), 1.0);
    }

    #[test]
    fn test_labels_placement() {
        let (mut s, mut pg) = plot_grid(Plane::new(0.0, 10.0, 0.0, 10.0), &GridSettingsPatch::default());
        pg.auto_step(&s).unwrap();
        pg.draw_grid_values(&mut s).unwrap();

        let texts = s.texts();
        let (xs, ys): (Vec<_>, Vec<_>) = texts.iter().partition(|t| t.align == TextAlign::Center);
        assert_eq!(xs.len(), 6);
        assert_eq!(ys.len(), 6);

        assert_eq!(xs[0].text, "0");
        assert_eq!(xs[0].at, Point::new(50.5, 598.0));
        assert_eq!(xs[0].baseline, TextBaseline::Bottom);
        assert_eq!(xs[5].text, "10");
        assert_eq!(xs[5].at, Point::new(770.5, 598.0));

        assert_eq!(ys[5].text, "10");
        assert_eq!(ys[5].at, Point::new(44.5, 10.5));
        assert_eq!(ys[5].align, TextAlign::Right);
        assert_eq!(ys[5].baseline, TextBaseline::Middle);
    }

    #[test]
    fn test_set_padding_splits_between_label_layers() {
        let (mut s, mut pg) = plot_grid(Plane::new(0.0, 10.0, 0.0, 10.0), &GridSettingsPatch::default());
        pg.set_padding(Padding::new(100.0, 0.0, 0.0, 0.0));
        pg.set_x_step(5.0).unwrap();
        pg.set_y_step(5.0).unwrap();
        pg.draw_grid_values(&mut s).unwrap();

        let texts = s.texts();
        assert_eq!(texts[0].at, Point::new(100.5, 598.0));
        assert_eq!(texts[3].at, Point::new(94.5, 598.0));
        assert_eq!(pg.grid().padding(), Padding::new(100.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_plane_propagates() {
        let (_, mut pg) = plot_grid(Plane::new(0.0, 10.0, 0.0, 10.0), &GridSettingsPatch::default());
        let plane = Plane::new(-1.0, 1.0, -2.0, 2.0);
        pg.set_plane(plane).unwrap();
        assert_eq!(pg.grid().plane(), plane);
        assert!(pg.set_plane(Plane::new(1.0, 1.0, 0.0, 1.0)).is_err());
    }
}

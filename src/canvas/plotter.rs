//! Series plotting over an auto-fitted [`PlotGrid`].

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GridSettingsPatch, MathCanvas, Mode, PlotGrid};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::{Padding, Plane, Point};
use crate::style::{LineStyle, ShapeStyle};
use crate::surface::DrawingSurface;

/// Series color when none is given.
const DEFAULT_COLOR: Rgba = Rgba::RED;

/// Series line width when none is given.
const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    /// One connected line through the points, in x order.
    #[default]
    Graph,
    /// A filled dot of radius `2 * line_width` on each point.
    Points,
}

/// A series and how to draw it.
///
/// ```
/// use mathcanvas::canvas::DataContext;
/// use mathcanvas::Rgba;
///
/// let ctx = DataContext::new(vec![(0.0, 1.0).into(), (1.0, 3.0).into()])
///     .main()
///     .color(Rgba::BLUE);
/// assert!(ctx.main);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataContext {
    /// Points of the series. Sorted by x, in place, when plotted.
    pub data: Vec<Point>,
    /// Drawing style.
    pub plot_style: PlotStyle,
    /// Whether this series decides the plotted plane.
    pub main: bool,
    /// Stroke or marker color, red when unset.
    pub color: Option<Rgba>,
    /// Line width, 1 when unset.
    pub line_width: Option<f64>,
}

impl DataContext {
    /// A red graph series.
    #[must_use]
    pub fn new(data: Vec<Point>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Mark the series as the one the plane is fitted to.
    #[must_use]
    pub fn main(mut self) -> Self {
        self.main = true;
        self
    }

    /// Set the color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the line width.
    #[must_use]
    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    /// Set the drawing style.
    #[must_use]
    pub fn plot_style(mut self, style: PlotStyle) -> Self {
        self.plot_style = style;
        self
    }

    fn line_style(&self) -> LineStyle {
        LineStyle::new(
            self.color.unwrap_or(DEFAULT_COLOR),
            self.line_width.unwrap_or(DEFAULT_LINE_WIDTH),
        )
    }
}

/// Plots data series on a [`PlotGrid`].
///
/// The `main` series decides the plane; the others are drawn on top in
/// the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct Plotter {
    plot_grid: PlotGrid,
    graph: MathCanvas,
    contexts: Vec<DataContext>,
}

impl Plotter {
    /// A plotter with no series. `patch` overrides the grid settings.
    pub fn new<S>(surface: &mut S, patch: &GridSettingsPatch) -> Result<Self>
    where
        S: DrawingSurface + ?Sized,
    {
        let plot_grid = PlotGrid::new(surface, None, patch)?;
        let mut graph = MathCanvas::new(surface, None)?;
        graph.set_padding(plot_grid.padding());
        Ok(Self {
            plot_grid,
            graph,
            contexts: Vec::new(),
        })
    }

    /// Append a series. Series are drawn in insertion order.
    pub fn add_data_context(&mut self, context: DataContext) {
        self.contexts.push(context);
    }

    /// The series, as last plotted (sorted by x once plotted).
    #[must_use]
    pub fn data_contexts(&self) -> &[DataContext] {
        &self.contexts
    }

    /// Drop every series.
    pub fn clear_data_contexts(&mut self) {
        self.contexts.clear();
    }

    /// Current validation mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.graph.mode()
    }

    /// Switch validation mode of every layer.
    pub fn set_mode(&mut self, mode: Mode) {
        self.graph.set_mode(mode);
        self.plot_grid.set_mode(mode);
    }

    /// Plane used when no series is `main`.
    pub fn set_plane(&mut self, plane: Plane) -> Result<Plane> {
        let plane = self.graph.set_plane(plane)?;
        self.plot_grid.set_plane(plane)
    }

    /// Pad the grid and the series alike.
    pub fn set_padding(&mut self, padding: Padding) {
        self.plot_grid.set_padding(padding);
        self.graph.set_padding(padding);
    }

    /// The series layer.
    #[must_use]
    pub const fn canvas(&self) -> &MathCanvas {
        &self.graph
    }

    /// The grid layer.
    #[must_use]
    pub const fn plot_grid(&self) -> &PlotGrid {
        &self.plot_grid
    }

    /// The grid layer, for step or settings changes.
    pub fn plot_grid_mut(&mut self) -> &mut PlotGrid {
        &mut self.plot_grid
    }

    /// Clear the surface and draw every non-empty series.
    ///
    /// A `main` series first fits the plane to its bounds, re-steps the
    /// grid and draws it. Without one, the grid is still stepped and drawn
    /// over the current plane before any series, rather than leaving the
    /// series on a bare surface.
    ///
    /// # Errors
    ///
    /// In [`Mode::Normal`], a main series without extent on either axis
    /// returns [`Error::InvalidPlane`]; other invalid input returns
    /// [`Error::InvalidArgument`].
    pub fn plot<S>(&mut self, surface: &mut S) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
    {
        let Self {
            plot_grid,
            graph,
            contexts,
        } = self;

        graph.set_padding(plot_grid.padding());
        graph.clear(surface);
        plot_grid.clear(surface);

        if !contexts.iter().any(|c| c.main && !c.data.is_empty()) {
            plot_grid.auto_step(surface)?;
            plot_grid.draw_grid(surface)?;
        }

        for context in contexts.iter_mut() {
            if context.data.is_empty() {
                continue;
            }
            context.data.sort_by(|a, b| a.x.total_cmp(&b.x));

            if context.main {
                let plane = Plane::bounding(&context.data).ok_or(Error::EmptyData)?;
                debug!(?plane, "fitted plane to main series");

                graph.set_plane(plane)?;
                plot_grid.set_plane(plane)?;
                plot_grid.auto_step(surface)?;
                graph.rect(
                    surface,
                    plane.xmin,
                    plane.ymin,
                    plane.x_span(),
                    plane.y_span(),
                    &ShapeStyle::filled(Rgba::WHITE),
                )?;
                plot_grid.draw_grid(surface)?;
            }

            let style = context.line_style();
            match context.plot_style {
                PlotStyle::Graph => graph.polyline(surface, &context.data, &style)?,
                PlotStyle::Points => {
                    let marker = ShapeStyle::filled(style.color);
                    for &point in &context.data {
                        graph.arc(
                            surface,
                            point,
                            2.0 * style.line_width,
                            0.0,
                            TAU,
                            false,
                            &marker,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

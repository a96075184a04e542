//! Plane-mapped drawing, grids and plots.
//!
//! Layers, leaf to root:
//!
//! - [`MathCanvas`]: maps logical plane coordinates to surface pixels and
//!   draws lines, rectangles, text and arcs.
//! - [`Grid`]: draws a background, grid lines, sub-grid lines and axes.
//! - [`PlotGrid`]: a [`Grid`] with an automatic 1-2-5 step and value labels.
//! - [`Plotter`]: fits a [`PlotGrid`] to a main data series and draws every
//!   series on top.
//!
//! None of them own the surface. Every drawing call borrows it, which lets
//! several layers share one surface.

mod grid;
mod math_canvas;
mod plot_grid;
mod plotter;

pub use grid::{
    AxisPatch, AxisSettings, Grid, GridSettings, GridSettingsPatch, LinePair, LinePairPatch,
    LineSettings, LineSettingsPatch,
};
pub use math_canvas::MathCanvas;
pub use plot_grid::PlotGrid;
pub use plotter::{DataContext, PlotStyle, Plotter};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on grid lines drawn per direction in one pass.
pub const MAX_GRID_LINES: usize = 10_000;

/// Argument validation policy.
///
/// `Performance` skips every runtime check. Switch to it only once a scene
/// renders correctly in `Normal` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Validate every argument and fail fast.
    #[default]
    Normal,
    /// Trust the caller.
    Performance,
}

impl Mode {
    /// Whether arguments are checked.
    #[must_use]
    pub const fn validates(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "performance" => Ok(Self::Performance),
            _ => Err(Error::invalid_arg(
                "mode",
                format!("must be \"normal\" or \"performance\", got {s:?}"),
            )),
        }
    }
}

/// Fail unless every value is finite.
pub(crate) fn check_finite(values: &[(&'static str, f64)]) -> Result<()> {
    for &(name, value) in values {
        if !value.is_finite() {
            return Err(Error::invalid_arg(name, format!("must be finite, got {value}")));
        }
    }
    Ok(())
}

/// Fail unless `value` is finite and strictly positive.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_arg(
            name,
            format!("must be a finite positive number, got {value}"),
        ))
    }
}

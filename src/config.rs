//! YAML chart configuration.
//!
//! A config file describes one plot: the output size, the validation mode,
//! grid overrides and the series to draw. Every key is optional.
//!
//! ```yaml
//! width: 800
//! height: 600
//! mode: normal
//! grid:
//!   grid_lines:
//!     vertical: { color: "#c0c0c0" }
//! series:
//!   - main: true
//!     data: [{x: 0, y: 1}, {x: 1, y: 3}, {x: 2, y: 2}]
//! ```
//!
//! Several files can be layered; later files override earlier ones key by
//! key (see [`ChartConfig::load_layered`]).

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use tracing::debug;

use crate::canvas::{DataContext, GridSettingsPatch, Mode, Plotter};
use crate::error::{Error, Result};
use crate::geometry::{Padding, Plane};
use crate::merge::merge_values;
use crate::surface::DrawingSurface;

/// One chart: surface size, grid overrides and series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    /// Surface width in CSS pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Surface height in CSS pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Backing pixels per CSS pixel.
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,

    /// Validation mode.
    #[serde(default)]
    pub mode: Mode,

    /// Plane used when no series is `main`.
    #[serde(default)]
    pub plane: Option<Plane>,

    /// Padding around the plot, the grid default when unset.
    #[serde(default)]
    pub padding: Option<Padding>,

    /// Grid settings overrides.
    #[serde(default)]
    pub grid: GridSettingsPatch,

    /// Series, drawn in order.
    #[serde(default)]
    pub series: Vec<DataContext>,
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_pixel_ratio() -> f64 {
    1.0
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            pixel_ratio: default_pixel_ratio(),
            mode: Mode::default(),
            plane: None,
            padding: None,
            grid: GridSettingsPatch::default(),
            series: Vec::new(),
        }
    }
}

impl ChartConfig {
    /// Parses a config from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the failing line.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(parse_error)
    }

    /// Loads a config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads several files, each deep-merged over the ones before it.
    ///
    /// Mappings merge key by key; sequences such as `series` or `plane` are
    /// replaced whole. No paths yields the default config.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or the merged tree does
    /// not describe a valid config.
    pub fn load_layered<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut tree = Value::Mapping(serde_yaml_ng::Mapping::new());
        for path in paths {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)?;
            let layer: Value = serde_yaml_ng::from_str(&content).map_err(parse_error)?;
            // an empty file parses to null and must not wipe earlier layers
            if !layer.is_null() {
                merge_values(&mut tree, &layer);
            }
            debug!(path = %path.display(), "merged config layer");
        }
        serde_yaml_ng::from_value(tree).map_err(parse_error)
    }

    /// Loads a config, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Build a [`Plotter`] for `surface` carrying this config's settings
    /// and series.
    ///
    /// # Errors
    ///
    /// Returns an error if the plane is rejected in [`Mode::Normal`].
    pub fn plotter<S>(&self, surface: &mut S) -> Result<Plotter>
    where
        S: DrawingSurface + ?Sized,
    {
        let mut plotter = Plotter::new(surface, &self.grid)?;
        plotter.set_mode(self.mode);
        if let Some(padding) = self.padding {
            plotter.set_padding(padding);
        }
        if let Some(plane) = self.plane {
            plotter.set_plane(plane)?;
        }
        for series in &self.series {
            plotter.add_data_context(series.clone());
        }
        Ok(plotter)
    }
}

fn parse_error(e: serde_yaml_ng::Error) -> Error {
    let line = e.location().map(|l| l.line()).unwrap_or(0);
    Error::ConfigParse {
        line,
        message: e.to_string(),
    }
}

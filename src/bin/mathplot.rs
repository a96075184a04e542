//! mathplot - render charts to PNG or SVG.
//!
//! ```text
//! mathplot plot --config base.yaml --config data.yaml --output chart.png
//! mathplot demo --output demo.svg
//! ```
//!
//! The output format follows the file extension.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mathcanvas::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "mathplot")]
#[command(version)]
#[command(about = "Render plane-mapped plots to PNG or SVG", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot the series of one or more layered YAML configs
    Plot {
        /// Config file; later files override earlier ones
        #[arg(short, long = "config", required = true)]
        configs: Vec<PathBuf>,

        /// Output file (.png or .svg)
        #[arg(short, long)]
        output: PathBuf,

        /// Width in pixels, overrides the config
        #[arg(long)]
        width: Option<u32>,

        /// Height in pixels, overrides the config
        #[arg(long)]
        height: Option<u32>,

        /// Validation mode (normal or performance), overrides the config
        #[arg(long)]
        mode: Option<Mode>,
    },
    /// Draw the primitive demo scene
    Demo {
        /// Output file (.png or .svg)
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Png,
    Svg,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => bail!(
                "cannot infer output format of {}: use a .png or .svg extension",
                path.display()
            ),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Plot {
            configs,
            output,
            width,
            height,
            mode,
        } => {
            let mut config = ChartConfig::load_layered(&configs)
                .with_context(|| format!("loading {} config file(s)", configs.len()))?;
            if let Some(width) = width {
                config.width = width;
            }
            if let Some(height) = height {
                config.height = height;
            }
            if let Some(mode) = mode {
                config.mode = mode;
            }
            render(&output, config.width, config.height, config.pixel_ratio, |surface| {
                let mut plotter = config.plotter(surface)?;
                plotter.plot(surface)
            })?;
        }
        Command::Demo { output } => {
            render(&output, 800, 600, 1.0, draw_demo)?;
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Draw with `scene` onto a surface matching the output format, then save.
fn render<F>(output: &Path, width: u32, height: u32, pixel_ratio: f64, scene: F) -> Result<()>
where
    F: FnOnce(&mut dyn DrawingSurface) -> mathcanvas::Result<()>,
{
    let format = Format::from_path(output)?;
    match format {
        Format::Png => {
            let mut surface = RasterSurface::with_pixel_ratio(width, height, pixel_ratio)?;
            scene(&mut surface).context("drawing failed")?;
            surface
                .save_png(output)
                .with_context(|| format!("writing {}", output.display()))?;
        }
        Format::Svg => {
            let mut surface = SvgSurface::new(width, height);
            scene(&mut surface).context("drawing failed")?;
            surface
                .save(output)
                .with_context(|| format!("writing {}", output.display()))?;
        }
    }
    info!(path = %output.display(), ?format, width, height, "chart written");
    Ok(())
}

/// Translucent background, a vertical line, the x axis, a label and a disc.
fn draw_demo(surface: &mut dyn DrawingSurface) -> mathcanvas::Result<()> {
    let translucent_green = Rgba::new(50, 200, 60, 102);
    let canvas = MathCanvas::new(surface, Some(Plane::new(0.0, 10.0, -5.0, 5.0)))?;

    canvas.set_background(surface, translucent_green)?;
    canvas.line(
        surface,
        Point::new(1.0, -5.0),
        Point::new(1.0, 5.0),
        &LineStyle::new(Rgba::BLACK, 1.0),
    )?;
    canvas.line(
        surface,
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        &LineStyle::default(),
    )?;
    canvas.text(
        surface,
        "aaa",
        5.0,
        0.0,
        &TextStyle::default()
            .with_font(Font::new(20.0, "Poppins"))
            .aligned(TextAlign::Center, TextBaseline::Middle),
    )?;
    canvas.arc(
        surface,
        Point::new(5.0, 0.0),
        10.0,
        0.0,
        TAU,
        false,
        &ShapeStyle::filled(translucent_green),
    )
}

//! WebAssembly bindings.
//!
//! Draws straight onto a page `<canvas>` through [`WebSurface`], or renders
//! a chart config off-screen to PNG bytes.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { ChartCanvas, render_png } from 'mathcanvas';
//!
//! await init();
//!
//! const chart = new ChartCanvas(document.getElementById('plot'), null);
//! chart.add_series(new Float64Array([-5, 3, 2]), new Float64Array([1, 4, -15]), true, null, false);
//! chart.add_series(new Float64Array([0, 1]), new Float64Array([0, 2]), false, '#00f', true);
//! chart.plot();
//!
//! const png = render_png('series: [{main: true, data: [{x: 0, y: 0}, {x: 1, y: 1}]}]');
//! ```

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::canvas::{DataContext, Mode, PlotStyle, Plotter};
use crate::color::Rgba;
use crate::config::ChartConfig;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::surface::{RasterSurface, WebSurface};

// ============================================================================
// Initialization
// ============================================================================

/// Called by the generated glue when the module loads.
#[wasm_bindgen(start)]
pub fn init() {
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "mathcanvas loaded");
}

fn js_err(err: Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Zip two coordinate arrays into points.
fn zip_points(xs: &[f64], ys: &[f64]) -> Result<Vec<Point>> {
    if xs.len() != ys.len() {
        return Err(Error::invalid_arg(
            "ys",
            format!("expected {} values to match xs, got {}", xs.len(), ys.len()),
        ));
    }
    Ok(xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect())
}

// ============================================================================
// Live canvas
// ============================================================================

/// A [`Plotter`] bound to a page canvas.
#[wasm_bindgen]
pub struct ChartCanvas {
    surface: WebSurface,
    plotter: Plotter,
}

#[wasm_bindgen]
impl ChartCanvas {
    /// Bind to `canvas`. `config_yaml` may carry grid settings, mode and
    /// series in the YAML chart format; its size keys are ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        config_yaml: Option<String>,
    ) -> std::result::Result<ChartCanvas, JsValue> {
        let config = match config_yaml {
            Some(yaml) => ChartConfig::parse(&yaml).map_err(js_err)?,
            None => ChartConfig::default(),
        };
        let mut surface = WebSurface::from_canvas(canvas).map_err(js_err)?;
        let plotter = config.plotter(&mut surface).map_err(js_err)?;
        Ok(Self { surface, plotter })
    }

    /// Add a series. `color` is any CSS color the crate parses; `dots`
    /// draws markers instead of a line.
    pub fn add_series(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        main: bool,
        color: Option<String>,
        dots: bool,
    ) -> std::result::Result<(), JsValue> {
        let mut context = DataContext::new(zip_points(xs, ys).map_err(js_err)?);
        context.main = main;
        if dots {
            context.plot_style = PlotStyle::Points;
        }
        if let Some(color) = color {
            context.color = Some(Rgba::parse(&color).map_err(js_err)?);
        }
        self.plotter.add_data_context(context);
        Ok(())
    }

    /// Drop every series.
    pub fn clear_series(&mut self) {
        self.plotter.clear_data_contexts();
    }

    /// `"normal"` or `"performance"`.
    pub fn set_mode(&mut self, mode: &str) -> std::result::Result<(), JsValue> {
        let mode: Mode = mode.parse().map_err(js_err)?;
        self.plotter.set_mode(mode);
        Ok(())
    }

    /// Redraw grid and series.
    pub fn plot(&mut self) -> std::result::Result<(), JsValue> {
        self.plotter.plot(&mut self.surface).map_err(js_err)
    }
}

// ============================================================================
// Off-screen rendering
// ============================================================================

/// Render a YAML chart config to PNG bytes.
#[wasm_bindgen]
pub fn render_png(config_yaml: &str) -> std::result::Result<Vec<u8>, JsValue> {
    let config = ChartConfig::parse(config_yaml).map_err(js_err)?;
    let mut surface = RasterSurface::with_pixel_ratio(config.width, config.height, config.pixel_ratio)
        .map_err(js_err)?;
    let mut plotter = config.plotter(&mut surface).map_err(js_err)?;
    plotter.plot(&mut surface).map_err(js_err)?;
    surface.to_png_bytes().map_err(js_err)
}

/// Crate version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// Tests
// ============================================================================

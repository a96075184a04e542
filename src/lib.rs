//! # MathCanvas
//!
//! Mathematical plotting onto a 2D drawing surface: a logical coordinate
//! plane mapped onto a padded pixel area, grids with sub-grids and axes,
//! auto-stepped value labels, and series plotting that fits the plane to
//! the data.
//!
//! Rendering goes through the [`surface::DrawingSurface`] trait, modelled on
//! the browser Canvas 2D context. Shipped surfaces render to pixels
//! ([`surface::RasterSurface`], PNG out), to SVG ([`surface::SvgSurface`]),
//! to a command log ([`surface::RecordingSurface`]) or, with the `wasm`
//! feature, to a page `<canvas>`.
//!
//! ## Quick Start
//!
//! ```rust
//! use mathcanvas::prelude::*;
//!
//! let mut surface = RasterSurface::new(400, 300)?;
//! let mut plotter = Plotter::new(&mut surface, &GridSettingsPatch::default())?;
//! plotter.add_data_context(
//!     DataContext::new(vec![(-2.0, 4.0).into(), (0.0, 0.0).into(), (2.0, 4.0).into()]).main(),
//! );
//! plotter.plot(&mut surface)?;
//!
//! let png = surface.to_png_bytes()?;
//! assert!(!png.is_empty());
//! # Ok::<(), mathcanvas::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): the `mathplot` binary
//! - `wasm`: `WebSurface` and `wasm-bindgen` entry points

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// unwrap() is allowed in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Colors and CSS color parsing.
pub mod color;

/// RGBA pixel buffer.
pub mod framebuffer;

/// Points, planes, padding and rectangles.
pub mod geometry;

/// Interval mapping and grid step selection.
pub mod scale;

/// Deep merge of settings trees.
pub mod merge;

/// Line, shape and text styles.
pub mod style;

// ============================================================================
// Drawing Modules
// ============================================================================

/// Host drawing surfaces.
pub mod surface;

/// Plane-mapped canvas, grids and plotting.
pub mod canvas;

/// YAML chart configuration.
pub mod config;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Software rasterization.
pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

/// WebAssembly bindings for browser usage.
#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for mathcanvas operations.
pub mod error;

pub use color::Rgba;
pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use mathcanvas::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{
        DataContext, Grid, GridSettings, GridSettingsPatch, MathCanvas, Mode, PlotGrid, PlotStyle,
        Plotter,
    };
    pub use crate::color::Rgba;
    pub use crate::config::ChartConfig;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Padding, Plane, Point, Size};
    pub use crate::merge::DeepMerge;
    pub use crate::style::{
        Font, FontStyle, LineStyle, ShapeStyle, TextAlign, TextBaseline, TextPosition, TextStyle,
    };
    pub use crate::surface::{DrawingSurface, RasterSurface, RecordingSurface, SvgSurface};
}

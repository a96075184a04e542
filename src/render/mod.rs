//! Software rasterization backing [`RasterSurface`](crate::surface::RasterSurface).
//!
//! # Algorithms
//!
//! - **Bresenham's Line**: hairlines thinner than one pixel
//! - **Scanline polygon fill**: even-odd rule, sampled at pixel centers;
//!   thick strokes are filled as quads
//! - **Arc flattening**: Canvas 2D angle and direction rules
//!
//! # References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."
//! - Liang, Y. D., & Barsky, B. A. (1984). "A new concept and method for line clipping."

mod primitives;
mod text;

pub use primitives::{
    composite, fill_even_odd, flatten_arc, stroke_polyline, stroke_segment, trace_line, Coverage,
};
pub use text::draw_text;

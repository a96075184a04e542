//! Interval mapping and grid step selection.
//!
//! [`map`] is the affine remap every plane-to-pixel conversion goes
//! through. [`nice_step`] picks grid spacings from the classic 1-2-5
//! sequence (1, 2, 5, 10, 20, 50, ...).

/// Mantissas tried, in order, within each decade.
pub const STEP_BASES: [f64; 3] = [1.0, 2.0, 5.0];

/// Largest decade exponent the step search will reach.
const MAX_EXPONENT: i32 = 308;

/// Remap `value` from the interval `from` to the interval `to`.
///
/// No clamping is applied: values outside `from` land outside `to`.
/// A degenerate `from` interval (`from.0 == from.1`) yields a non-finite
/// result rather than an error.
///
/// # Example
///
/// ```
/// use mathcanvas::scale::map;
///
/// assert_eq!(map(5.0, (0.0, 10.0), (0.0, 100.0)), 50.0);
/// assert_eq!(map(0.0, (0.0, 10.0), (100.0, 0.0)), 100.0);
/// ```
#[inline]
#[must_use]
pub fn map(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let t = (value - from.0) / (from.1 - from.0);
    to.0 + t * (to.1 - to.0)
}

/// A step of the form `base × 10^exponent` with `base` in [`STEP_BASES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NiceStep {
    /// One of 1, 2 or 5.
    pub base: f64,
    /// Decade exponent.
    pub exponent: i32,
}

impl NiceStep {
    /// Create a step from its mantissa and exponent.
    #[must_use]
    pub const fn new(base: f64, exponent: i32) -> Self {
        Self { base, exponent }
    }

    /// The numeric step value.
    ///
    /// Negative exponents divide instead of multiplying by a fractional
    /// power so that `0.1`, `0.2`, `0.5` are the closest doubles.
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.exponent >= 0 {
            self.base * 10f64.powi(self.exponent)
        } else {
            self.base / 10f64.powi(-self.exponent)
        }
    }

    /// Human readable step: plain for small exponents, `5×10^6` beyond ±3.
    #[must_use]
    pub fn label(&self) -> String {
        if self.exponent.abs() > 3 {
            format!("{}×10^{}", self.base, self.exponent)
        } else {
            format_grid_value(self.value(), self.value())
        }
    }
}

/// Ascending iterator over 1-2-5 steps starting at `10^exponent`.
#[derive(Debug, Clone)]
pub struct NiceSteps {
    index: usize,
    exponent: i32,
}

impl NiceSteps {
    /// Start the sequence at `1 × 10^exponent`.
    #[must_use]
    pub const fn starting_at(exponent: i32) -> Self {
        Self { index: 0, exponent }
    }
}

impl Iterator for NiceSteps {
    type Item = NiceStep;

    fn next(&mut self) -> Option<NiceStep> {
        if self.exponent > MAX_EXPONENT {
            return None;
        }
        let step = NiceStep::new(STEP_BASES[self.index], self.exponent);
        self.index += 1;
        if self.index == STEP_BASES.len() {
            self.index = 0;
            self.exponent += 1;
        }
        Some(step)
    }
}

/// Smallest 1-2-5 step for which `span / step <= ideal_count`.
///
/// The search starts at 1, so spans narrower than the target density still
/// get a step of 1. Returns `None` for non-finite or non-positive inputs.
///
/// # Example
///
/// ```
/// use mathcanvas::scale::nice_step;
///
/// // 55 units across 800px with one line every 100px: at most 8 columns.
/// assert_eq!(nice_step(55.0, 8.0).unwrap().value(), 10.0);
/// assert_eq!(nice_step(0.3, 6.0).unwrap().value(), 1.0);
/// ```
#[must_use]
pub fn nice_step(span: f64, ideal_count: f64) -> Option<NiceStep> {
    if !(span.is_finite() && ideal_count.is_finite()) || span <= 0.0 || ideal_count <= 0.0 {
        return None;
    }
    NiceSteps::starting_at(0).find(|step| span / step.value() <= ideal_count)
}

/// Format a grid line value with as many decimals as `step` requires.
///
/// Values are snapped to the nearest multiple of `step` first so that
/// accumulated floating-point noise never reaches the label. Steps with a
/// decade exponent beyond ±3 switch to scientific notation.
#[must_use]
pub fn format_grid_value(value: f64, step: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if !(step.is_finite() && step > 0.0) {
        return value.to_string();
    }

    let mut v = (value / step).round() * step;
    if v == 0.0 {
        // no "-0"
        v = 0.0;
    }

    let exponent = step.log10().floor() as i32;
    if exponent.abs() > 3 {
        return format!("{v:e}");
    }

    let mut decimals = (-exponent).max(0) as usize;
    while decimals < 10 {
        let shown = format!("{v:.decimals$}");
        let parsed: f64 = shown.parse().unwrap_or(v);
        if (parsed - v).abs() <= step * 1e-6 {
            return shown;
        }
        decimals += 1;
    }
    format!("{v:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_map_endpoints() {
        assert_eq!(map(2.0, (2.0, 7.0), (-1.0, 3.0)), -1.0);
        assert_eq!(map(7.0, (2.0, 7.0), (-1.0, 3.0)), 3.0);
    }

    #[test]
    fn test_map_extrapolates() {
        assert_relative_eq!(map(20.0, (0.0, 10.0), (0.0, 1.0)), 2.0);
        assert_relative_eq!(map(-10.0, (0.0, 10.0), (0.0, 1.0)), -1.0);
    }

    #[test]
    fn test_map_degenerate_interval_is_not_finite() {
        assert!(!map(1.0, (3.0, 3.0), (0.0, 1.0)).is_finite());
    }

    #[test]
    fn test_nice_steps_sequence() {
        let values: Vec<f64> = NiceSteps::starting_at(0).take(7).map(|s| s.value()).collect();
        assert_eq!(values, vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0]);
    }

    #[test]
    fn test_nice_step_density_target() {
        assert_eq!(nice_step(55.0, 8.0).unwrap(), NiceStep::new(1.0, 1));
        assert_eq!(nice_step(8.0, 8.0).unwrap().value(), 1.0);
        assert_eq!(nice_step(9.0, 8.0).unwrap().value(), 2.0);
        assert_eq!(nice_step(30_000.0, 6.0).unwrap().value(), 5_000.0);
    }

    #[test]
    fn test_nice_step_never_below_one() {
        assert_eq!(nice_step(1.0, 8.0).unwrap().value(), 1.0);
        assert_eq!(nice_step(0.3, 6.0).unwrap().value(), 1.0);
        assert_eq!(nice_step(1e-6, 6.0).unwrap().value(), 1.0);
        assert_eq!(nice_step(1.0, 8.0).unwrap().label(), "1");
    }

    #[test]
    fn test_nice_step_rejects_bad_input() {
        assert!(nice_step(0.0, 8.0).is_none());
        assert!(nice_step(10.0, 0.0).is_none());
        assert!(nice_step(f64::NAN, 8.0).is_none());
        assert!(nice_step(10.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_step_label() {
        assert_eq!(NiceStep::new(2.0, 1).label(), "20");
        assert_eq!(NiceStep::new(5.0, -2).label(), "0.05");
        assert_eq!(NiceStep::new(5.0, 6).label(), "5×10^6");
    }

    #[test]
    fn test_format_grid_value() {
        assert_eq!(format_grid_value(10.0, 10.0), "10");
        assert_eq!(format_grid_value(-0.0, 1.0), "0");
        assert_eq!(format_grid_value(0.30000000000000004, 0.1), "0.3");
        assert_eq!(format_grid_value(2.5, 2.5), "2.5");
        assert_eq!(format_grid_value(20_000.0, 10_000.0), "2e4");
    }
}

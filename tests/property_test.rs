//! Property tests for interval mapping, step selection and plane mapping.
//!
//! Run: cargo test --test property_test

#![allow(clippy::unwrap_used)]

use approx::relative_eq;
use mathcanvas::prelude::*;
use mathcanvas::scale::{map, nice_step, STEP_BASES};
use proptest::prelude::*;

fn plane_strategy() -> impl Strategy<Value = Plane> {
    (-1e3..1e3f64, 1e-3..1e3f64, -1e3..1e3f64, 1e-3..1e3f64)
        .prop_map(|(x, w, y, h)| Plane::new(x, x + w, y, y + h))
}

proptest! {
    #[test]
    fn map_sends_endpoints_to_endpoints(
        a in -1e6..1e6f64,
        len in 1e-3..1e6f64,
        c in -1e6..1e6f64,
        d in -1e6..1e6f64,
    ) {
        let b = a + len;
        prop_assert!(relative_eq!(map(a, (a, b), (c, d)), c, epsilon = 1e-6, max_relative = 1e-9));
        prop_assert!(relative_eq!(map(b, (a, b), (c, d)), d, epsilon = 1e-6, max_relative = 1e-9));
    }

    #[test]
    fn map_onto_same_interval_is_identity(a in -1e3..1e3f64, len in 1e-2..1e3f64, t in 0.0..1.0f64) {
        let b = a + len;
        let v = a + t * len;
        prop_assert!(relative_eq!(map(v, (a, b), (a, b)), v, epsilon = 1e-9, max_relative = 1e-9));
    }

    #[test]
    fn map_preserves_affine_combinations(
        a in -1e3..1e3f64,
        len in 1e-2..1e3f64,
        c in -1e3..1e3f64,
        d in -1e3..1e3f64,
        s in -2.0..2.0f64,
        t in -2.0..2.0f64,
        alpha in 0.0..1.0f64,
    ) {
        let from = (a, a + len);
        let (u, w) = (a + s * len, a + t * len);
        let mixed = map(alpha * u + (1.0 - alpha) * w, from, (c, d));
        let combined = alpha * map(u, from, (c, d)) + (1.0 - alpha) * map(w, from, (c, d));
        prop_assert!(
            relative_eq!(mixed, combined, epsilon = 1e-6, max_relative = 1e-9),
            "{} != {}", mixed, combined
        );
    }

    #[test]
    fn map_is_monotonic(a in -1e3..1e3f64, len in 1e-2..1e3f64, t1 in 0.0..1.0f64, t2 in 0.0..1.0f64) {
        let b = a + len;
        let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let v1 = map(a + lo * len, (a, b), (0.0, 800.0));
        let v2 = map(a + hi * len, (a, b), (0.0, 800.0));
        prop_assert!(v1 <= v2 + 1e-9);
    }

    #[test]
    fn nice_step_fits_target(span in 1e-6..1e9f64, ideal in 1.0..50.0f64) {
        let step = nice_step(span, ideal).unwrap();
        prop_assert!(STEP_BASES.contains(&step.base));
        prop_assert!(span / step.value() <= ideal);
        prop_assert!(step.value() >= 1.0);
    }

    #[test]
    fn map_coords_stays_in_padded_area(
        plane in plane_strategy(),
        x in -1e4..1e4f64,
        y in -1e4..1e4f64,
    ) {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut canvas = MathCanvas::new(&mut surface, Some(plane)).unwrap();
        canvas.set_padding(Padding::new(50.0, 10.0, 30.0, 25.0));

        let p = canvas.map_coords(&surface, Point::new(x, y));
        prop_assert!(p.x >= 50.5 && p.x <= 770.5, "x = {}", p.x);
        prop_assert!(p.y >= 10.5 && p.y <= 575.5, "y = {}", p.y);
        prop_assert_eq!(p.x.fract(), 0.5);
        prop_assert_eq!(p.y.fract(), 0.5);
    }

    #[test]
    fn plotter_plane_covers_main_series(
        data in prop::collection::vec((-1e3..1e3f64, -1e3..1e3f64), 2..50),
    ) {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut plotter = Plotter::new(&mut surface, &GridSettingsPatch::default()).unwrap();
        plotter.set_mode(Mode::Performance);
        let points: Vec<Point> = data.into_iter().map(Point::from).collect();
        plotter.add_data_context(DataContext::new(points.clone()).main());
        plotter.plot(&mut surface).unwrap();

        let plane = plotter.canvas().plane();
        for p in &points {
            prop_assert!(p.x >= plane.xmin && p.x <= plane.xmax);
            prop_assert!(p.y >= plane.ymin && p.y <= plane.ymax);
        }
        let xs: Vec<f64> = plotter.data_contexts()[0].data.iter().map(|p| p.x).collect();
        prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
    }
}

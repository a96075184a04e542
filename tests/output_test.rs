//! File output through the raster and SVG surfaces.
//!
//! Run: cargo test --test output_test

#![allow(clippy::unwrap_used)]

use std::fs::File;

use mathcanvas::prelude::*;

fn png_info(path: &std::path::Path) -> (u32, u32) {
    let decoder = png::Decoder::new(File::open(path).unwrap());
    let reader = decoder.read_info().unwrap();
    let info = reader.info();
    (info.width, info.height)
}

fn parabola() -> DataContext {
    DataContext::new((-10..=10).map(|i| Point::new(f64::from(i), f64::from(i * i))).collect())
        .main()
}

#[test]
fn raster_plot_saves_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot.png");

    let mut surface = RasterSurface::new(400, 300).unwrap();
    let mut plotter = Plotter::new(&mut surface, &GridSettingsPatch::default()).unwrap();
    plotter.add_data_context(parabola());
    plotter.plot(&mut surface).unwrap();
    surface.save_png(&path).unwrap();

    assert_eq!(png_info(&path), (400, 300));
}

#[test]
fn raster_backing_follows_pixel_ratio() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hidpi.png");

    let mut surface = RasterSurface::with_pixel_ratio(200, 100, 2.0).unwrap();
    let grid = Grid::new(
        &mut surface,
        Some(Plane::new(0.0, 10.0, -5.0, 5.0)),
        &GridSettingsPatch::default(),
    )
    .unwrap();
    grid.draw_grid(&mut surface).unwrap();
    surface.save_png(&path).unwrap();

    assert_eq!(png_info(&path), (400, 200));
}

#[test]
fn raster_grid_background_is_opaque() {
    let mut surface = RasterSurface::new(200, 100).unwrap();
    let grid = Grid::new(
        &mut surface,
        Some(Plane::new(0.0, 10.0, -5.0, 5.0)),
        &GridSettingsPatch::default(),
    )
    .unwrap();
    grid.draw_grid(&mut surface).unwrap();

    let pixel = surface.framebuffer().get_pixel(3, 3).unwrap();
    assert_eq!(pixel.a, 255);

    grid.clear(&mut surface);
    assert_eq!(surface.framebuffer().get_pixel(3, 3).unwrap(), Rgba::TRANSPARENT);
}

#[test]
fn raster_rejects_zero_size() {
    assert!(matches!(
        RasterSurface::new(0, 10),
        Err(Error::InvalidDimensions { .. })
    ));
}

#[test]
fn svg_plot_saves_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot.svg");

    let mut surface = SvgSurface::new(400, 300);
    let mut plotter = Plotter::new(&mut surface, &GridSettingsPatch::default()).unwrap();
    plotter.add_data_context(parabola().color(Rgba::BLUE));
    plotter.plot(&mut surface).unwrap();
    surface.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, surface.render());
    assert!(content.starts_with("<svg"));
    assert!(content.contains("<path"));
    assert!(content.contains("<text"));
}

#[test]
fn svg_full_clear_discards_elements() {
    let mut surface = SvgSurface::new(200, 100);
    let canvas = MathCanvas::new(&mut surface, None).unwrap();
    canvas
        .line(
            &mut surface,
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            &LineStyle::default(),
        )
        .unwrap();
    assert!(surface.render().contains("<path"));

    canvas.clear(&mut surface);
    assert!(!surface.render().contains("<path"));
}

#[test]
fn config_renders_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("chart.yaml");
    std::fs::write(
        &config_path,
        "width: 320\nheight: 240\nseries:\n  - main: true\n    data: [{x: 0, y: 0}, {x: 1, y: 2}, {x: 2, y: 1}]\n",
    )
    .unwrap();

    let config = ChartConfig::load(&config_path).unwrap();
    let mut surface = RasterSurface::with_pixel_ratio(config.width, config.height, config.pixel_ratio)
        .unwrap();
    let mut plotter = config.plotter(&mut surface).unwrap();
    plotter.plot(&mut surface).unwrap();

    let out = dir.path().join("chart.png");
    surface.save_png(&out).unwrap();
    assert_eq!(png_info(&out), (320, 240));
}

// Integration tests for complete render passes
//
// These tests drive the public API the way a presentation layer would:
// build a viewport, render it on the CPU backend and inspect the frame.

use glam::Vec2;
use mandelbrot_chimera::{
    dispatch::{DispatchOptions, Schedule},
    mapper::width_buffer,
    render_pass, CpuRenderer, FrameExchange, Renderer, SceneTransform, Viewport,
};
use pretty_assertions::assert_eq;

fn renderer() -> CpuRenderer {
    CpuRenderer::new(4, DispatchOptions::default()).unwrap()
}

#[test]
fn frame_is_symmetric_about_the_real_axis() {
    let viewport = Viewport::new(1.0, 100, Vec2::ZERO, Vec2::new(2.0, 2.0));
    let (width, height) = (64, 64);
    let pixels = renderer().render(&viewport, width, height).unwrap();

    // rows r and height - r map to conjugate imaginary coordinates
    for row in 1..height {
        assert_eq!(pixels.row(row), pixels.row(height - row), "row {row}");
    }
}

#[test]
fn real_axis_mapping_is_mirrored_for_a_centered_view() {
    let params = Viewport::new(1.0, 100, Vec2::ZERO, Vec2::new(2.0, 2.0)).to_params();
    let columns = width_buffer(&params, 64);
    for column in 1..64 {
        assert_eq!(columns[column], -columns[64 - column]);
    }
}

#[test]
fn identical_viewports_render_identical_frames() {
    let viewport = Viewport::new(3.7, 180, Vec2::new(-0.745, 0.113), Vec2::new(2.0, 1.125));
    let first = renderer().render(&viewport, 160, 90).unwrap();
    let second = renderer().render(&viewport, 160, 90).unwrap();
    assert_eq!(first.as_slice(), second.as_slice());

    let striped = CpuRenderer::new(
        3,
        DispatchOptions {
            schedule: Schedule::Static,
            rows_per_task: 1,
        },
    )
    .unwrap()
    .render(&viewport, 160, 90)
    .unwrap();
    assert_eq!(first.as_slice(), striped.as_slice());
}

#[test]
fn every_pixel_is_encoded_within_the_cap() {
    let cap = 40;
    let viewport = Viewport::default().with_iteration_cap(cap);
    let pixels = renderer().render(&viewport, 75, 31).unwrap();

    assert_eq!(pixels.len(), 75 * 31);
    for row in 0..31 {
        for column in 0..75 {
            let [r, g, b, a] = pixels.rgba(column, row).unwrap();
            assert_eq!(a, 255);
            assert!(r == g && g == b);
            assert!(u32::from(r) <= cap);
        }
    }
}

#[test]
fn scene_drives_successive_passes() {
    let renderer = renderer();
    let exchange = FrameExchange::new();
    let mut scene = SceneTransform::default();

    assert!(render_pass(&renderer, &exchange, scene.viewport(96, 54, 64), 96, 54).unwrap());
    let first = exchange.front().unwrap();

    scene.zoom_by(4.0);
    scene.pan(Vec2::new(40.0, -10.0));
    assert!(render_pass(&renderer, &exchange, scene.viewport(96, 54, 64), 96, 54).unwrap());
    let second = exchange.front().unwrap();

    assert!(second.generation > first.generation);
    assert_eq!(second.viewport.scale, 4.0);
    assert_ne!(first.pixels, second.pixels);
}

use dotfield_wasm::field::{cover_scale, cover_uv};
use dotfield_wasm::viewport::{pointer_to_trail_uv, CanvasRect};
use glam::Vec2;

fn approx_eq2(a: Vec2, b: Vec2, eps: f32) -> bool {
    (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
}

#[test]
fn cover_fit_keeps_center_fixed() {
    for res in [(1920.0, 1080.0), (1080.0, 1920.0), (512.0, 512.0)] {
        let res = Vec2::new(res.0, res.1);
        let center = cover_uv(Vec2::splat(0.5), res);
        assert!(approx_eq2(center, Vec2::splat(0.5), 1e-6), "res={:?} center={:?}", res, center);
    }
}

#[test]
fn cover_fit_spans_longest_axis_and_crops_shortest() {
    // Wide: x spans the full range, y a centred sub-range.
    let wide = Vec2::new(1024.0, 768.0);
    let bottom_left = cover_uv(Vec2::ZERO, wide);
    let top_right = cover_uv(Vec2::ONE, wide);
    assert!(approx_eq2(bottom_left, Vec2::new(0.0, 0.125), 1e-6));
    assert!(approx_eq2(top_right, Vec2::new(1.0, 0.875), 1e-6));

    // Tall: the same, transposed.
    let tall = Vec2::new(768.0, 1024.0);
    assert!(approx_eq2(cover_uv(Vec2::ZERO, tall), Vec2::new(0.125, 0.0), 1e-6));
    assert!(approx_eq2(cover_uv(Vec2::ONE, tall), Vec2::new(0.875, 1.0), 1e-6));
}

#[test]
fn cover_fit_preserves_aspect_of_distances() {
    // One CSS pixel step is the same cover-space distance along either axis.
    let res = Vec2::new(1920.0, 1080.0);
    let origin = cover_uv(Vec2::splat(0.5), res);
    let dx = cover_uv(Vec2::new(0.5 + 1.0 / res.x, 0.5), res) - origin;
    let dy = cover_uv(Vec2::new(0.5, 0.5 + 1.0 / res.y), res) - origin;
    assert!((dx.length() - dy.length()).abs() < 1e-6);
}

#[test]
fn cover_scale_handles_empty_resolution() {
    assert_eq!(cover_scale(Vec2::ZERO), Vec2::ONE);
}

#[test]
fn pointer_mapping_agrees_with_shader_cover_fit() {
    let rect = CanvasRect {
        left: 0.0,
        top: 0.0,
        width: 1280.0,
        height: 720.0,
    };
    let res = Vec2::new(rect.width as f32, rect.height as f32);
    let samples = [(0.0, 0.0), (640.0, 360.0), (100.0, 700.0), (1279.0, 1.0), (900.0, 250.0)];

    for &(x, y) in &samples {
        let trail_uv = pointer_to_trail_uv(x, y, &rect).unwrap();
        let screen_uv = Vec2::new((x / rect.width) as f32, 1.0 - (y / rect.height) as f32);
        let shader_uv = cover_uv(screen_uv, res);
        assert!(
            approx_eq2(trail_uv, shader_uv, 1e-5),
            "pointer ({x}, {y}) -> {:?}, shader {:?}",
            trail_uv,
            shader_uv
        );
    }
}

use std::f32::consts::PI;

use dotfield_wasm::config::DotFieldConfig;
use dotfield_wasm::controller::{render_parameters, RenderParameters};
use dotfield_wasm::field::{
    evaluate, fract, grid_cell, render, rotate, shade, NoTrail, FOCAL_POINT,
};
use dotfield_wasm::viewport::{DeviceProfile, ViewportState};
use dotfield_wasm::{Rgb, TrailConfig, TrailField};
use glam::Vec2;

fn params(resolution: Vec2) -> RenderParameters {
    RenderParameters {
        time: 0.0,
        resolution,
        dot_color: Rgb::WHITE,
        bg_color: Rgb::from_u32(0x050505),
        dot_opacity: 0.05,
        grid_size: 100.0,
        rotation: 0.0,
    }
}

#[test]
fn rotation_is_undone_by_its_negation() {
    let points = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.25, 0.8),
        Vec2::new(0.5, 0.5),
        Vec2::new(0.9, 0.1),
    ];
    let angles = [0.0, 0.3, -1.2, PI, 2.5 * PI, 37.0];
    for &p in &points {
        for &a in &angles {
            let back = rotate(rotate(p, a), -a);
            assert!((back - p).length() < 1e-5, "p={p:?} a={a} back={back:?}");
        }
    }
}

#[test]
fn rotation_pivots_on_center() {
    for a in [0.1, 1.0, 4.0] {
        assert!((rotate(Vec2::splat(0.5), a) - Vec2::splat(0.5)).length() < 1e-6);
    }
}

#[test]
fn grid_fraction_stays_below_one() {
    for grid_size in [1.0, 7.0, 60.0, 100.0, 333.3] {
        for i in 0..=64 {
            for j in 0..=64 {
                let uv = Vec2::new(i as f32 / 64.0, j as f32 / 64.0);
                let local = fract(uv * grid_size);
                assert!(local.x >= 0.0 && local.x < 1.0, "uv={uv:?} g={grid_size} local={local:?}");
                assert!(local.y >= 0.0 && local.y < 1.0, "uv={uv:?} g={grid_size} local={local:?}");

                let (cell_local, _) = grid_cell(uv, grid_size, 0.0);
                assert!(cell_local.x < 1.0 && cell_local.y < 1.0);
            }
        }
    }
}

#[test]
fn cell_center_lands_in_its_own_cell() {
    let rotation = 0.7;
    let grid_size = 40.0;
    let uv = Vec2::new(0.33, 0.61);
    let rotated = rotate(uv, rotation);
    let (_, center) = grid_cell(rotated, grid_size, rotation);
    // Re-rotating the centre must land in the same cell.
    let cell = (rotated * grid_size).floor();
    let center_cell = (rotate(center, rotation) * grid_size).floor();
    assert_eq!(cell, center_cell);
}

#[test]
fn zero_opacity_renders_background_everywhere() {
    let mut p = params(Vec2::new(640.0, 480.0));
    p.dot_opacity = 0.0;
    p.bg_color = Rgb::from_u32(0x204060);
    for time in [0.0, 1.3, 12.0] {
        p.time = time;
        for rgb in render(32, 24, &p, &1.0f32) {
            assert!(rgb.distance(p.bg_color) < 1e-4, "got {rgb:?}");
        }
    }
}

#[test]
fn full_opacity_dot_center_approaches_dot_color() {
    let mut p = params(Vec2::new(1000.0, 1000.0));
    p.dot_opacity = 1.0;

    // Centre of the bottom-left cell, far from the focal point and at the
    // bottom of the screen, so both masks are ~1.
    let uv = Vec2::splat(0.005);
    let distance = (uv - FOCAL_POINT).length();
    // Pick the time at which the wave sits at its minimum here.
    p.time = (1.5 * PI - 10.0 * distance).rem_euclid(2.0 * PI) / 2.0;

    let sample = evaluate(uv, &p, &NoTrail);
    assert!(sample.wave < -0.999, "wave={}", sample.wave);
    assert!(sample.dot > 0.999);

    let rgb = shade(uv, &p, &NoTrail);
    assert!(rgb.distance(p.dot_color) < 0.01, "got {rgb:?}");
}

#[test]
fn default_scene_masks_focal_point_and_origin_to_background() {
    let config = DotFieldConfig::default();
    let viewport = ViewportState::new(1024.0, 768.0, 1.0, 0.0);
    let profile = DeviceProfile::detect(&viewport, &config);
    let p = render_parameters(&profile, &viewport, 0.0, &config);
    assert_eq!(p.resolution, Vec2::new(1024.0, 768.0));

    // The focal point lies above the frame; its projection is the top edge.
    let at_focal = Vec2::new(0.7, 1.0);
    let sample = evaluate(at_focal, &p, &NoTrail);
    assert!(sample.focal_distance < 0.5, "focal distance {}", sample.focal_distance);
    assert_eq!(sample.mask, 0.0);
    assert_eq!(sample.coverage, 0.0);

    let focal = shade(at_focal, &p, &NoTrail);
    let origin = shade(Vec2::ZERO, &p, &NoTrail);
    assert!(focal.distance(config.bg_color) < 1e-4, "focal {focal:?}");
    assert!(origin.distance(config.bg_color) < 0.02, "origin {origin:?}");
}

#[test]
fn dots_appear_in_the_unmasked_corner() {
    let mut p = params(Vec2::new(1000.0, 1000.0));
    p.dot_opacity = 1.0;
    p.time = 0.0;
    let frame = render(100, 100, &p, &NoTrail);
    let brightest = frame
        .iter()
        .map(|rgb| rgb.distance(p.bg_color))
        .fold(0.0f32, f32::max);
    assert!(brightest > 0.2, "brightest={brightest}");
}

#[test]
fn pointer_trail_brightens_nearby_dots() {
    let mut p = params(Vec2::new(1000.0, 1000.0));
    p.time = 0.4;
    let uv = Vec2::splat(0.105);

    let mut trail = TrailField::new(TrailConfig::default());
    trail.record_move(uv, 1_000.0);
    trail.tick(1_000.0);

    let without = evaluate(uv, &p, &NoTrail);
    let with = evaluate(uv, &p, &trail);
    assert!(with.trail > 0.0);
    assert!(with.coverage > without.coverage);
    assert!(shade(uv, &p, &trail).distance(p.dot_color) < shade(uv, &p, &NoTrail).distance(p.dot_color));
}

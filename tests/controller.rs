use dotfield_wasm::config::{DotFieldConfig, DotFieldOptions};
use dotfield_wasm::controller::{render_parameters, scroll_rotation, Controller, Dirty};
use dotfield_wasm::viewport::{DeviceProfile, ViewportState, CONSTRAINED_GRID_CAP};
use dotfield_wasm::Rgb;
use glam::Vec2;

fn desktop() -> ViewportState {
    ViewportState::new(1440.0, 900.0, 1.5, 0.0)
}

#[test]
fn parameters_are_a_pure_function_of_inputs() {
    let config = DotFieldConfig::default();
    let viewport = ViewportState::new(1024.0, 768.0, 2.0, 1234.0);
    let profile = DeviceProfile::detect(&viewport, &config);

    let a = render_parameters(&profile, &viewport, 3.25, &config);
    let b = render_parameters(&profile, &viewport, 3.25, &config);
    assert_eq!(a, b);
}

#[test]
fn desktop_profile_caps_pixel_ratio_and_keeps_antialias() {
    let config = DotFieldConfig::default();
    let hidpi = ViewportState::new(1920.0, 1080.0, 3.0, 0.0);
    let profile = DeviceProfile::detect(&hidpi, &config);
    assert!(!profile.constrained);
    assert_eq!(profile.pixel_ratio(&hidpi), 2.0);
    assert!(profile.antialias);

    let profile = DeviceProfile::detect(&desktop(), &config);
    assert_eq!(profile.pixel_ratio(&desktop()), 1.5);
    assert_eq!(profile.grid_size(100.0), 100.0);

    let broken = ViewportState::new(1920.0, 1080.0, f64::NAN, 0.0);
    assert_eq!(profile.pixel_ratio(&broken), 1.0);
}

#[test]
fn narrow_viewport_is_constrained() {
    let config = DotFieldConfig::default();
    let viewport = ViewportState::new(375.0, 812.0, 3.0, 0.0);
    let profile = DeviceProfile::detect(&viewport, &config);
    assert!(profile.constrained);
    assert_eq!(profile.pixel_ratio(&viewport), 1.0);
    assert!(!profile.antialias);

    let params = render_parameters(&profile, &viewport, 0.0, &config);
    assert!(params.grid_size <= CONSTRAINED_GRID_CAP);
    assert_eq!(params.resolution, Vec2::new(375.0, 812.0));

    // Requests under the cap pass through.
    let sparse = DotFieldOptions {
        grid_size: Some(40.0),
        ..Default::default()
    }
    .resolve();
    assert_eq!(render_parameters(&profile, &viewport, 0.0, &sparse).grid_size, 40.0);
}

#[test]
fn breakpoint_is_configurable() {
    let config = DotFieldOptions {
        mobile_breakpoint: Some(1500.0),
        ..Default::default()
    }
    .resolve();
    assert!(DeviceProfile::detect(&desktop(), &config).constrained);
}

#[test]
fn resolution_scales_css_size_by_pixel_ratio() {
    let config = DotFieldConfig::default();
    let viewport = desktop();
    let profile = DeviceProfile::detect(&viewport, &config);
    let params = render_parameters(&profile, &viewport, 0.0, &config);
    assert_eq!(params.resolution, Vec2::new(2160.0, 1350.0));
}

#[test]
fn pixel_ratio_change_after_mount_resizes_the_surface() {
    let config = DotFieldConfig::default();
    let mounted = ViewportState::new(1440.0, 900.0, 1.0, 0.0);
    let mut controller = Controller::new(DeviceProfile::detect(&mounted, &config), config);
    let (params, _) = controller.frame(&mounted, 0.0);
    assert_eq!(params.resolution, Vec2::new(1440.0, 900.0));

    // Window dragged onto a HiDPI monitor.
    let hidpi = ViewportState {
        device_pixel_ratio: 2.0,
        ..mounted
    };
    let (params, dirty) = controller.frame(&hidpi, 0.016);
    assert!(dirty.resolution);
    assert_eq!(params.resolution.x, 2880.0);
    assert_eq!(params.resolution, Vec2::new(2880.0, 1800.0));

    // Past the cap only the cap applies.
    let (params, dirty) = controller.frame(&ViewportState { device_pixel_ratio: 3.0, ..mounted }, 0.032);
    assert!(!dirty.resolution);
    assert_eq!(params.resolution, Vec2::new(2880.0, 1800.0));
}

#[test]
fn constrained_profile_ignores_pixel_ratio_changes() {
    let config = DotFieldConfig::default();
    let phone = ViewportState::new(375.0, 812.0, 3.0, 0.0);
    let mut controller = Controller::new(DeviceProfile::detect(&phone, &config), config);
    controller.frame(&phone, 0.0);

    let zoomed = ViewportState {
        device_pixel_ratio: 2.0,
        ..phone
    };
    let (params, dirty) = controller.frame(&zoomed, 0.016);
    assert!(!dirty.resolution);
    assert_eq!(params.resolution, Vec2::new(375.0, 812.0));
}

#[test]
fn rotation_follows_scroll_without_wrapping() {
    assert_eq!(scroll_rotation(0.0, 0.0), 0.0);
    assert!((scroll_rotation(0.5, 1000.0) - 0.8).abs() < 1e-6);
    let far = scroll_rotation(0.0, 1_000_000.0);
    assert!((far - 300.0).abs() < 1e-3, "far={far}");
}

#[test]
fn first_frame_uploads_everything_then_only_changes() {
    let config = DotFieldConfig::default();
    let viewport = desktop();
    let mut controller = Controller::new(DeviceProfile::detect(&viewport, &config), config);

    let (_, dirty) = controller.frame(&viewport, 0.0);
    assert_eq!(dirty, Dirty::ALL);

    let (_, dirty) = controller.frame(&viewport, 0.016);
    assert!(!dirty.any());

    let scrolled = ViewportState {
        scroll_y: 500.0,
        ..viewport
    };
    let (params, dirty) = controller.frame(&scrolled, 0.032);
    assert_eq!(
        dirty,
        Dirty {
            rotation: true,
            ..Dirty::default()
        }
    );
    assert!((params.rotation - 0.15).abs() < 1e-6);

    let resized = ViewportState {
        width: 1280.0,
        ..scrolled
    };
    let (_, dirty) = controller.frame(&resized, 0.048);
    assert!(dirty.resolution && !dirty.rotation && !dirty.colors);
}

#[test]
fn config_changes_mark_their_uniforms() {
    let config = DotFieldConfig::default();
    let viewport = desktop();
    let mut controller = Controller::new(DeviceProfile::detect(&viewport, &config), config);
    controller.frame(&viewport, 0.0);

    controller.set_config(DotFieldConfig {
        dot_color: Rgb::from_u32(0xff8800),
        dot_opacity: 0.2,
        ..config
    });
    let (params, dirty) = controller.frame(&viewport, 0.1);
    assert!(dirty.colors && dirty.opacity);
    assert!(!dirty.grid && !dirty.resolution);
    assert_eq!(params.dot_opacity, 0.2);

    controller.invalidate();
    let (_, dirty) = controller.frame(&viewport, 0.2);
    assert_eq!(dirty, Dirty::ALL);
}

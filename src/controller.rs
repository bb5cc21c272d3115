//! Derives the per-frame uniform set from the environment.

use glam::Vec2;

use crate::color::Rgb;
use crate::config::DotFieldConfig;
use crate::viewport::{DeviceProfile, ViewportState};

/// Radians of rotation per CSS pixel scrolled.
pub const SCROLL_ROTATION_RATE: f32 = 0.0003;

/// Uniform values for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParameters {
    /// Seconds since the first frame.
    pub time: f32,
    /// Device pixels.
    pub resolution: Vec2,
    pub dot_color: Rgb,
    pub bg_color: Rgb,
    pub dot_opacity: f32,
    pub grid_size: f32,
    pub rotation: f32,
}

/// Rotation grows without bound as the page scrolls.
pub fn scroll_rotation(base: f32, scroll_y: f64) -> f32 {
    base + scroll_y as f32 * SCROLL_ROTATION_RATE
}

pub fn render_parameters(
    profile: &DeviceProfile,
    viewport: &ViewportState,
    time: f32,
    config: &DotFieldConfig,
) -> RenderParameters {
    let (width, height) = profile.surface_size(viewport);
    RenderParameters {
        time,
        resolution: Vec2::new(width as f32, height as f32),
        dot_color: config.dot_color,
        bg_color: config.bg_color,
        dot_opacity: config.dot_opacity,
        grid_size: profile.grid_size(config.grid_size),
        rotation: scroll_rotation(config.rotation, viewport.scroll_y),
    }
}

/// Uniform groups that changed since the previous frame. `time` is always sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dirty {
    pub colors: bool,
    pub opacity: bool,
    pub grid: bool,
    pub rotation: bool,
    pub resolution: bool,
}

impl Dirty {
    pub const ALL: Dirty = Dirty {
        colors: true,
        opacity: true,
        grid: true,
        rotation: true,
        resolution: true,
    };

    pub fn any(&self) -> bool {
        self.colors || self.opacity || self.grid || self.rotation || self.resolution
    }

    fn between(prev: &RenderParameters, next: &RenderParameters) -> Self {
        Self {
            colors: prev.dot_color != next.dot_color || prev.bg_color != next.bg_color,
            opacity: prev.dot_opacity != next.dot_opacity,
            grid: prev.grid_size != next.grid_size,
            rotation: prev.rotation != next.rotation,
            resolution: prev.resolution != next.resolution,
        }
    }
}

/// Holds the mount-time profile and caller config, and remembers the last
/// parameters so unchanged uniforms are not re-uploaded.
pub struct Controller {
    profile: DeviceProfile,
    config: DotFieldConfig,
    last: Option<RenderParameters>,
}

impl Controller {
    pub fn new(profile: DeviceProfile, config: DotFieldConfig) -> Self {
        Self {
            profile,
            config,
            last: None,
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn config(&self) -> &DotFieldConfig {
        &self.config
    }

    /// Swaps the caller config; the next frame reports whatever it changed.
    pub fn set_config(&mut self, config: DotFieldConfig) {
        self.config = config;
    }

    /// Forgets the memoised parameters, e.g. after the GL program is rebuilt.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn frame(&mut self, viewport: &ViewportState, time: f32) -> (RenderParameters, Dirty) {
        let next = render_parameters(&self.profile, viewport, time, &self.config);
        let dirty = match &self.last {
            Some(prev) => Dirty::between(prev, &next),
            None => Dirty::ALL,
        };
        self.last = Some(next);
        (next, dirty)
    }
}

use glam::Vec2;

use crate::config::DotFieldConfig;
use crate::field::cover_scale;

/// Grid density ceiling on constrained devices.
pub const CONSTRAINED_GRID_CAP: f32 = 60.0;
/// Highest device pixel ratio rendered at.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Snapshot of the browser viewport. Owned by the page; we only sample it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    /// CSS pixels.
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
    pub scroll_y: f64,
}

impl ViewportState {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, scroll_y: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
            scroll_y,
        }
    }
}

/// Rendering budget chosen once at mount. The pixel ratio is not part of it:
/// it follows the live device pixel ratio so zoom and monitor changes resize
/// the backing store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceProfile {
    pub constrained: bool,
    pub antialias: bool,
    pub grid_size_cap: Option<f32>,
}

impl DeviceProfile {
    pub fn detect(viewport: &ViewportState, config: &DotFieldConfig) -> Self {
        let constrained = viewport.width < config.mobile_breakpoint;
        Self {
            constrained,
            antialias: !constrained,
            grid_size_cap: constrained.then_some(CONSTRAINED_GRID_CAP),
        }
    }

    pub fn grid_size(&self, requested: f32) -> f32 {
        match self.grid_size_cap {
            Some(cap) => requested.min(cap),
            None => requested,
        }
    }

    /// Render scale for the current frame: 1 when constrained, otherwise the
    /// device pixel ratio capped at [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self, viewport: &ViewportState) -> f64 {
        if self.constrained {
            return 1.0;
        }
        let dpr = viewport.device_pixel_ratio;
        if dpr.is_finite() && dpr > 0.0 {
            dpr.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        }
    }

    /// Backing-store size for a canvas of the given CSS size, at least 1×1.
    pub fn surface_size(&self, viewport: &ViewportState) -> (u32, u32) {
        let ratio = self.pixel_ratio(viewport);
        let scale = |css: f64| (css * ratio).round().max(1.0) as u32;
        (scale(viewport.width), scale(viewport.height))
    }
}

/// CSS-pixel rectangle of the canvas on the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Maps a pointer position in client coordinates to trail space: screen UV
/// with y up, pushed through the unclamped cover-fit so it lines up with the
/// cell centers the shader samples.
pub fn pointer_to_trail_uv(client_x: f64, client_y: f64, rect: &CanvasRect) -> Option<Vec2> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let screen = Vec2::new(
        ((client_x - rect.left) / rect.width) as f32,
        (1.0 - (client_y - rect.top) / rect.height) as f32,
    );
    let scale = cover_scale(Vec2::new(rect.width as f32, rect.height as f32));
    Some((screen - 0.5) * scale + 0.5)
}

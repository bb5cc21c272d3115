//! Caller-facing options and their sanitised form.
//!
//! Options arrive from JavaScript as a loose object. Anything missing takes its
//! default, anything malformed is replaced by its default with a warning, and
//! numeric ranges are clamped so the shader never sees a zero or non-finite
//! grid size.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

pub const DEFAULT_DOT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_BG_COLOR: &str = "#050505";
pub const DEFAULT_DOT_OPACITY: f32 = 0.05;
pub const DEFAULT_GRID_SIZE: f32 = 100.0;
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 768.0;

/// Smallest grid size the controller will pass on.
pub const MIN_GRID_SIZE: f32 = 1.0;

pub const DEFAULT_TRAIL_SIZE: u32 = 512;
pub const DEFAULT_TRAIL_RADIUS: f32 = 0.1;
pub const DEFAULT_TRAIL_MAX_AGE_MS: f64 = 400.0;
pub const DEFAULT_TRAIL_INTENSITY: f32 = 0.2;
pub const MIN_TRAIL_SIZE: u32 = 16;
pub const MAX_TRAIL_SIZE: u32 = 2048;

/// Raw options as supplied by the embedding page. Keys are camelCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DotFieldOptions {
    pub dot_color: Option<String>,
    pub bg_color: Option<String>,
    pub dot_opacity: Option<f32>,
    pub grid_size: Option<f32>,
    pub rotation: Option<f32>,
    pub mobile_breakpoint: Option<f64>,
    pub trail_size: Option<u32>,
    pub trail_radius: Option<f32>,
    pub trail_max_age: Option<f64>,
    pub trail_intensity: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailConfig {
    /// Texel buffer edge length.
    pub size: u32,
    /// Spatial reach of a fresh sample, in trail UV units.
    pub radius: f32,
    pub max_age_ms: f64,
    /// Peak value a single sample writes.
    pub intensity: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_TRAIL_SIZE,
            radius: DEFAULT_TRAIL_RADIUS,
            max_age_ms: DEFAULT_TRAIL_MAX_AGE_MS,
            intensity: DEFAULT_TRAIL_INTENSITY,
        }
    }
}

/// Sanitised configuration. Every field is in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotFieldConfig {
    pub dot_color: Rgb,
    pub bg_color: Rgb,
    pub dot_opacity: f32,
    pub grid_size: f32,
    /// Base rotation in radians, before the scroll-linked drift.
    pub rotation: f32,
    pub mobile_breakpoint: f64,
    pub trail: TrailConfig,
}

impl Default for DotFieldConfig {
    fn default() -> Self {
        Self {
            dot_color: Rgb::WHITE,
            bg_color: Rgb::from_u32(0x050505),
            dot_opacity: DEFAULT_DOT_OPACITY,
            grid_size: DEFAULT_GRID_SIZE,
            rotation: 0.0,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            trail: TrailConfig::default(),
        }
    }
}

impl DotFieldOptions {
    /// Resolves options into a usable configuration. Problems are logged and
    /// replaced by defaults rather than reported to the caller.
    pub fn resolve(&self) -> DotFieldConfig {
        let defaults = DotFieldConfig::default();

        let color = |value: &Option<String>, fallback: Rgb, name: &str| match value {
            Some(hex) => Rgb::from_hex(hex).unwrap_or_else(|err| {
                log::warn!("{name}: {err}; using default");
                fallback
            }),
            None => fallback,
        };

        let dot_opacity = finite_or(self.dot_opacity, defaults.dot_opacity).clamp(0.0, 1.0);
        let grid_size = finite_or(self.grid_size, defaults.grid_size).max(MIN_GRID_SIZE);
        let rotation = finite_or(self.rotation, defaults.rotation);

        let mobile_breakpoint = self
            .mobile_breakpoint
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(defaults.mobile_breakpoint);

        let trail = TrailConfig {
            size: self
                .trail_size
                .unwrap_or(DEFAULT_TRAIL_SIZE)
                .clamp(MIN_TRAIL_SIZE, MAX_TRAIL_SIZE),
            radius: finite_or(self.trail_radius, DEFAULT_TRAIL_RADIUS).max(0.0),
            max_age_ms: self
                .trail_max_age
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(DEFAULT_TRAIL_MAX_AGE_MS),
            intensity: finite_or(self.trail_intensity, DEFAULT_TRAIL_INTENSITY).clamp(0.0, 1.0),
        };

        DotFieldConfig {
            dot_color: color(&self.dot_color, defaults.dot_color, "dotColor"),
            bg_color: color(&self.bg_color, defaults.bg_color, "bgColor"),
            dot_opacity,
            grid_size,
            rotation,
            mobile_breakpoint,
            trail,
        }
    }
}

fn finite_or(value: Option<f32>, fallback: f32) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

//! CPU reference of the dot-field fragment program.
//!
//! Mirrors `shaders::FRAGMENT_SHADER` operation for operation, including the
//! GLSL conventions (column-major `mat2`, `fract`, `smoothstep` with reversed
//! edges) so the GPU output can be reasoned about and tested on the host.

use glam::{Vec2, Vec3};

use crate::color::Rgb;
use crate::controller::RenderParameters;

/// Point the vignette and wave radiate from, in cover-fit UV space.
pub const FOCAL_POINT: Vec2 = Vec2::new(0.7, 1.1);
pub const MAX_DOT_RADIUS: f32 = 0.3;
/// Edge width of the anti-aliased dot rim, in cell units.
pub const DOT_EDGE: f32 = 0.05;

/// Anything the shader can read trail intensity from.
pub trait TrailSampler {
    /// Intensity at `uv` in trail space, `0.0` where nothing is live.
    fn sample(&self, uv: Vec2) -> f32;
}

/// No pointer activity.
pub struct NoTrail;

impl TrailSampler for NoTrail {
    fn sample(&self, _uv: Vec2) -> f32 {
        0.0
    }
}

/// A constant intensity everywhere.
impl TrailSampler for f32 {
    fn sample(&self, _uv: Vec2) -> f32 {
        *self
    }
}

pub fn fract(v: Vec2) -> Vec2 {
    v - v.floor()
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Per-axis scale that maps screen UV onto a square of side `max(w, h)`.
pub fn cover_scale(resolution: Vec2) -> Vec2 {
    let longest = resolution.x.max(resolution.y);
    if longest > 0.0 {
        resolution / longest
    } else {
        Vec2::ONE
    }
}

pub fn cover_uv(screen_uv: Vec2, resolution: Vec2) -> Vec2 {
    ((screen_uv - 0.5) * cover_scale(resolution) + 0.5).clamp(Vec2::ZERO, Vec2::ONE)
}

/// Rotation about `(0.5, 0.5)` using the shader's `mat2(c, -s, s, c)`.
pub fn rotate(uv: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    let p = uv - 0.5;
    Vec2::new(c * p.x + s * p.y, -s * p.x + c * p.y) + 0.5
}

/// Signed distance from `p` to a circle of radius `r` centred in the cell.
pub fn sdf_circle(p: Vec2, r: f32) -> f32 {
    (p - 0.5).length() - r
}

/// Local coordinate within the cell and that cell's centre in unrotated space.
pub fn grid_cell(rotated_uv: Vec2, grid_size: f32, rotation: f32) -> (Vec2, Vec2) {
    let scaled = rotated_uv * grid_size;
    let local = fract(scaled);
    let center = rotate((scaled.floor() + 0.5) / grid_size, -rotation);
    (local, center)
}

/// Every intermediate term of one pixel, exposed for inspection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
    pub uv: Vec2,
    pub grid_uv: Vec2,
    pub cell_center: Vec2,
    pub focal_distance: f32,
    pub mask: f32,
    pub wave: f32,
    pub trail: f32,
    pub dot: f32,
    /// Blend factor from background to dot color, before clamping.
    pub coverage: f32,
}

pub fn evaluate(screen_uv: Vec2, params: &RenderParameters, trail: &dyn TrailSampler) -> FieldSample {
    let uv = cover_uv(screen_uv, params.resolution);
    let rotated = rotate(uv, params.rotation);
    let (grid_uv, cell_center) = grid_cell(rotated, params.grid_size, params.rotation);

    let screen_mask = smoothstep(0.0, 1.0, 1.0 - uv.y);
    let focal_distance = (uv - FOCAL_POINT).length();
    let focal_mask = smoothstep(0.5, 1.0, focal_distance);
    let mask = screen_mask * focal_mask;

    let wave = (params.time * 2.0 + focal_distance * 10.0).sin();
    let trail = trail.sample(cell_center);
    let scale_influence = (trail * 0.5).max(wave * 0.3);

    let radius = (focal_distance.powi(2) * MAX_DOT_RADIUS).min(MAX_DOT_RADIUS);
    let sdf = sdf_circle(grid_uv, radius * (1.0 + scale_influence * 0.5));
    let dot = smoothstep(DOT_EDGE, 0.0, sdf);

    let opacity_influence = (trail * 50.0).max(wave * 0.5);
    let coverage = dot * mask * params.dot_opacity * (1.0 + opacity_influence);

    FieldSample {
        uv,
        grid_uv,
        cell_center,
        focal_distance,
        mask,
        wave,
        trail,
        dot,
        coverage,
    }
}

/// Display color of one pixel at `screen_uv` (`gl_FragCoord / resolution`).
pub fn shade(screen_uv: Vec2, params: &RenderParameters, trail: &dyn TrailSampler) -> Rgb {
    let sample = evaluate(screen_uv, params, trail);
    let linear = mix(
        params.bg_color.to_linear(),
        params.dot_color.to_linear(),
        sample.coverage,
    );
    Rgb::from_linear(linear)
}

/// Shades a whole frame at `width × height`, rows bottom to top like
/// `gl_FragCoord`, sampling pixel centres.
pub fn render(width: u32, height: u32, params: &RenderParameters, trail: &dyn TrailSampler) -> Vec<Rgb> {
    let size = Vec2::new(width as f32, height as f32);
    let mut out = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let frag = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            out.push(shade(frag / size, params, trail));
        }
    }
    out
}

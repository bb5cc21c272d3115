//! sRGB colors parsed from CSS-style hex strings.
//!
//! Colors are authored in sRGB but the shader mixes in linear light, so every
//! color crosses the transfer function twice per pixel: once when uniforms are
//! built and once when the fragment is written out.

use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color `{0}` is not a hex color (expected #RRGGBB or #RGB)")]
    InvalidHex(String),
}

/// An sRGB-encoded color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub Vec3);

impl Rgb {
    pub const WHITE: Rgb = Rgb(Vec3::ONE);

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb(Vec3::new(r, g, b))
    }

    /// Parses `#RRGGBB`, `#RGB`, and the same forms prefixed with `0x` or bare.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bad = || ColorError::InvalidHex(input.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }

        let value = u32::from_str_radix(digits, 16).map_err(|_| bad())?;
        match digits.len() {
            6 => Ok(Self::from_u32(value)),
            3 => {
                // #abc expands to #aabbcc
                let r = (value >> 8) & 0xF;
                let g = (value >> 4) & 0xF;
                let b = value & 0xF;
                Ok(Self::from_u32((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
            }
            _ => Err(bad()),
        }
    }

    pub fn from_u32(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Rgb::new(channel(16), channel(8), channel(0))
    }

    pub fn to_linear(self) -> Vec3 {
        Vec3::new(
            srgb_to_linear(self.0.x),
            srgb_to_linear(self.0.y),
            srgb_to_linear(self.0.z),
        )
    }

    /// Encodes a linear-light color for display, clamping out-of-gamut values
    /// the way a unorm framebuffer would.
    pub fn from_linear(linear: Vec3) -> Self {
        let c = linear.clamp(Vec3::ZERO, Vec3::ONE);
        Rgb::new(
            linear_to_srgb(c.x),
            linear_to_srgb(c.y),
            linear_to_srgb(c.z),
        )
    }

    /// Euclidean distance between two colors in encoded space.
    pub fn distance(self, other: Rgb) -> f32 {
        self.0.distance(other.0)
    }
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

pub fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(0.416_666_66) - 0.055
    }
}

//! Linear RGBA colour used for material parameters and solid textures.
//!
//! Stored as four `f32` values in linear light (0.0 – 1.0).  Material
//! presets and the 1×1 fallback textures are expressed with the constants
//! below so shading code never has to spell out raw floats.
//!
//! # Example
//! ```rust,ignore
//! use ferrous_core::Color;
//!
//! let gold  = Color::rgb(1.0, 0.71, 0.29);
//! let pixel = Color::FLAT_NORMAL.to_rgba8(); // [128, 128, 255, 255]
//! ```

/// Linear-space RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    // ── Constructors ────────────────────────────────────────────────────────

    /// Opaque colour from red, green, blue components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour from all four components.
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Grey level `v` on all three channels.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    // ── Conversions ─────────────────────────────────────────────────────────

    /// Returns `[r, g, b]` (alpha discarded).  This is the layout of every
    /// `vec3<f32>` colour uniform in the built-in shaders.
    #[inline]
    pub fn to_rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Quantises to 8-bit channels, clamping out-of-range values.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Convert to a `wgpu::Color` for use as a clear value.
    #[cfg(feature = "gpu")]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    // ── Palette ─────────────────────────────────────────────────────────────

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED:   Self = Self::rgb(1.0, 0.0, 0.0);

    /// Tangent-space `+Z` encoded into `[0, 1]`: the neutral normal map texel.
    pub const FLAT_NORMAL: Self = Self::rgb(0.5, 0.5, 1.0);

    /// Clear colour used by the off-screen targets.
    pub const SKY: Self = Self::rgb(0.1, 0.2, 0.3);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_normal_quantises_to_mid_blue() {
        assert_eq!(Color::FLAT_NORMAL.to_rgba8(), [128, 128, 255, 255]);
    }

    #[test]
    fn quantisation_clamps() {
        assert_eq!(Color::rgba(2.0, -1.0, 0.0, 1.0).to_rgba8(), [255, 0, 0, 255]);
    }
}

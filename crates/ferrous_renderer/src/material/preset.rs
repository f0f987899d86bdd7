//! Named material presets.
//!
//! Colours are linear base colours (albedo for dielectrics, F0 for metals)
//! taken from common PBR reference charts.

use std::fmt;
use std::str::FromStr;

use ferrous_core::Color;
use thiserror::Error;

use crate::material::{Material, ShadingModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialPreset {
    Charcoal,
    Grass,
    Sand,
    Ice,
    Snow,
    Iron,
    Silver,
    Aluminium,
    Gold,
    Copper,
    Chromium,
    Nickel,
    Titanium,
    Cobalt,
    Platinum,
}

impl MaterialPreset {
    pub const ALL: [MaterialPreset; 15] = [
        MaterialPreset::Charcoal,
        MaterialPreset::Grass,
        MaterialPreset::Sand,
        MaterialPreset::Ice,
        MaterialPreset::Snow,
        MaterialPreset::Iron,
        MaterialPreset::Silver,
        MaterialPreset::Aluminium,
        MaterialPreset::Gold,
        MaterialPreset::Copper,
        MaterialPreset::Chromium,
        MaterialPreset::Nickel,
        MaterialPreset::Titanium,
        MaterialPreset::Cobalt,
        MaterialPreset::Platinum,
    ];

    /// snake_case name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            MaterialPreset::Charcoal => "charcoal",
            MaterialPreset::Grass => "grass",
            MaterialPreset::Sand => "sand",
            MaterialPreset::Ice => "ice",
            MaterialPreset::Snow => "snow",
            MaterialPreset::Iron => "iron",
            MaterialPreset::Silver => "silver",
            MaterialPreset::Aluminium => "aluminium",
            MaterialPreset::Gold => "gold",
            MaterialPreset::Copper => "copper",
            MaterialPreset::Chromium => "chromium",
            MaterialPreset::Nickel => "nickel",
            MaterialPreset::Titanium => "titanium",
            MaterialPreset::Cobalt => "cobalt",
            MaterialPreset::Platinum => "platinum",
        }
    }

    pub fn is_metal(self) -> bool {
        !matches!(
            self,
            MaterialPreset::Charcoal
                | MaterialPreset::Grass
                | MaterialPreset::Sand
                | MaterialPreset::Ice
                | MaterialPreset::Snow
        )
    }

    pub fn base_color(self) -> Color {
        match self {
            MaterialPreset::Charcoal => Color::splat(0.02),
            MaterialPreset::Grass => Color::rgb(0.21, 0.37, 0.08),
            MaterialPreset::Sand => Color::rgb(0.76, 0.70, 0.50),
            MaterialPreset::Ice => Color::rgb(0.56, 0.57, 0.58),
            MaterialPreset::Snow => Color::splat(0.81),
            MaterialPreset::Iron => Color::rgb(0.56, 0.57, 0.58),
            MaterialPreset::Silver => Color::rgb(0.95, 0.93, 0.88),
            MaterialPreset::Aluminium => Color::rgb(0.91, 0.92, 0.92),
            MaterialPreset::Gold => Color::rgb(1.00, 0.71, 0.29),
            MaterialPreset::Copper => Color::rgb(0.95, 0.64, 0.54),
            MaterialPreset::Chromium => Color::rgb(0.55, 0.56, 0.55),
            MaterialPreset::Nickel => Color::rgb(0.66, 0.61, 0.53),
            MaterialPreset::Titanium => Color::rgb(0.54, 0.50, 0.45),
            MaterialPreset::Cobalt => Color::rgb(0.66, 0.69, 0.70),
            MaterialPreset::Platinum => Color::rgb(0.67, 0.64, 0.59),
        }
    }

    /// Builds the material for this preset; see [`recover_material`].
    pub fn material(self, roughness: f32) -> Material {
        recover_material(self, roughness)
    }
}

/// Maps a preset and a roughness factor to a Cook-Torrance material.
///
/// Pure and deterministic; no GPU work happens until the material is
/// initialised against a program.  `roughness` is clamped to `[0, 1]`.
pub fn recover_material(preset: MaterialPreset, roughness: f32) -> Material {
    let roughness = if roughness.is_nan() { 1.0 } else { roughness.clamp(0.0, 1.0) };
    Material::new(
        preset.name(),
        ShadingModel::CookTorrance {
            base_color: preset.base_color(),
            metallic: if preset.is_metal() { 1.0 } else { 0.0 },
            roughness,
            emissive: Color::BLACK,
        },
    )
}

impl fmt::Display for MaterialPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown material preset `{0}`")]
pub struct UnknownPreset(pub String);

impl FromStr for MaterialPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(material: &Material) -> (Color, f32, f32) {
        match material.model() {
            ShadingModel::CookTorrance { base_color, metallic, roughness, .. } => {
                (*base_color, *metallic, *roughness)
            }
            other => panic!("unexpected model {other:?}"),
        }
    }

    #[test]
    fn presets_are_deterministic() {
        for preset in MaterialPreset::ALL {
            assert_eq!(params(&recover_material(preset, 0.3)), params(&recover_material(preset, 0.3)));
        }
    }

    #[test]
    fn metals_and_dielectrics() {
        assert_eq!(params(&recover_material(MaterialPreset::Gold, 0.5)).1, 1.0);
        assert_eq!(params(&recover_material(MaterialPreset::Sand, 0.5)).1, 0.0);
        assert_eq!(params(&recover_material(MaterialPreset::Gold, 0.5)).0, Color::rgb(1.0, 0.71, 0.29));
    }

    #[test]
    fn roughness_is_clamped() {
        assert_eq!(params(&recover_material(MaterialPreset::Iron, 2.5)).2, 1.0);
        assert_eq!(params(&recover_material(MaterialPreset::Iron, -1.0)).2, 0.0);
    }

    #[test]
    fn names_round_trip() {
        for preset in MaterialPreset::ALL {
            assert_eq!(preset.name().parse::<MaterialPreset>(), Ok(preset));
        }
        assert!("unobtainium".parse::<MaterialPreset>().is_err());
    }
}

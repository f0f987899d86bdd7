//! Materials: shading parameters plus the textures a shading model samples.
//!
//! A [`Material`] is created on the CPU (from a preset or a parsed material
//! description) and becomes *initialised* once its textures are on the GPU.
//! Only initialised materials can bind their attributes into a program.

pub mod preset;
pub mod table;

use std::collections::BTreeMap;

use ferrous_core::{Color, ImageData};
use ferrous_gpu::UniformValue;

use crate::error::{ProgramError, RenderError};
use crate::resources::Texture;
use crate::shader::ShaderProgram;

/// Uniform block the shading parameters are written into.
const MATERIAL_BLOCK: &str = "material";

pub use preset::{recover_material, MaterialPreset, UnknownPreset};
pub use table::MaterialTable;

/// Texture roles a material can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    BaseColor,
    Normal,
    Metallic,
    Roughness,
    AmbientOcclusion,
    Emissive,
    Ambient,
    Specular,
    Opacity,
    Bump,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 10] = [
        TextureSlot::BaseColor,
        TextureSlot::Normal,
        TextureSlot::Metallic,
        TextureSlot::Roughness,
        TextureSlot::AmbientOcclusion,
        TextureSlot::Emissive,
        TextureSlot::Ambient,
        TextureSlot::Specular,
        TextureSlot::Opacity,
        TextureSlot::Bump,
    ];

    /// Name of the texture variable in the built-in shaders.
    pub fn uniform_name(self) -> &'static str {
        match self {
            TextureSlot::BaseColor => "base_color_map",
            TextureSlot::Normal => "normal_map",
            TextureSlot::Metallic => "metallic_map",
            TextureSlot::Roughness => "roughness_map",
            TextureSlot::AmbientOcclusion => "ambient_occlusion_map",
            TextureSlot::Emissive => "emissive_map",
            TextureSlot::Ambient => "ambient_map",
            TextureSlot::Specular => "specular_map",
            TextureSlot::Opacity => "opacity_map",
            TextureSlot::Bump => "bump_map",
        }
    }

    /// Slot whose texture variable is called `name`.
    pub fn from_uniform_name(name: &str) -> Option<TextureSlot> {
        TextureSlot::ALL.into_iter().find(|slot| slot.uniform_name() == name)
    }

    /// Texel used when a material has no texture for this slot.  Scalar maps
    /// store their value in the red channel, so "full" is red.
    pub fn default_color(self) -> Color {
        match self {
            TextureSlot::Normal | TextureSlot::Bump => Color::FLAT_NORMAL,
            TextureSlot::Metallic | TextureSlot::Roughness | TextureSlot::AmbientOcclusion => {
                Color::RED
            }
            _ => Color::WHITE,
        }
    }

    pub fn default_image(self) -> ImageData {
        ImageData::solid(self.default_color())
    }
}

/// How a material is shaded.
#[derive(Debug, Clone, PartialEq)]
pub enum ShadingModel {
    /// Metallic/roughness PBR.
    CookTorrance {
        base_color: Color,
        metallic: f32,
        roughness: f32,
        emissive: Color,
    },
    BlinnPhong {
        diffuse: Color,
        ambient: Color,
        specular: Color,
        emissive: Color,
        shininess: f32,
        /// 0 is opaque.
        transparency: f32,
    },
}

impl Default for ShadingModel {
    fn default() -> Self {
        ShadingModel::CookTorrance {
            base_color: Color::WHITE,
            metallic: 0.0,
            roughness: 1.0,
            emissive: Color::BLACK,
        }
    }
}

impl ShadingModel {
    /// Slots the matching built-in fragment shader samples.
    pub fn sampled_slots(&self) -> &'static [TextureSlot] {
        match self {
            ShadingModel::CookTorrance { .. } => &[
                TextureSlot::BaseColor,
                TextureSlot::Metallic,
                TextureSlot::Roughness,
                TextureSlot::AmbientOcclusion,
            ],
            ShadingModel::BlinnPhong { .. } => &[
                TextureSlot::BaseColor,
                TextureSlot::Ambient,
                TextureSlot::Specular,
            ],
        }
    }

    fn uniforms(&self) -> Vec<(&'static str, UniformValue)> {
        match *self {
            ShadingModel::CookTorrance { base_color, metallic, roughness, emissive } => vec![
                ("material.base_color", base_color.to_rgb_array().into()),
                ("material.metallic", metallic.into()),
                ("material.roughness", roughness.into()),
                ("material.emissive", emissive.to_rgb_array().into()),
            ],
            ShadingModel::BlinnPhong {
                diffuse,
                ambient,
                specular,
                emissive,
                shininess,
                transparency,
            } => vec![
                ("material.diffuse", diffuse.to_rgb_array().into()),
                ("material.ambient", ambient.to_rgb_array().into()),
                ("material.specular", specular.to_rgb_array().into()),
                ("material.emissive", emissive.to_rgb_array().into()),
                ("material.shininess", shininess.into()),
                ("material.transparency", transparency.into()),
            ],
        }
    }
}

/// Shading parameters plus textures.
pub struct Material {
    name: String,
    model: ShadingModel,
    /// Images supplied by the material description, by slot.
    images: BTreeMap<TextureSlot, ImageData>,
    textures: BTreeMap<TextureSlot, Texture>,
    initialized: bool,
}

impl Material {
    pub fn new(name: impl Into<String>, model: ShadingModel) -> Self {
        Self {
            name: name.into(),
            model,
            images: BTreeMap::new(),
            textures: BTreeMap::new(),
            initialized: false,
        }
    }

    pub fn with_texture(mut self, slot: TextureSlot, image: ImageData) -> Self {
        self.set_texture(slot, image);
        self
    }

    /// Sets the image of `slot`.  An initialised material uploads it again
    /// on the next [`init_textures`](Self::init_textures).
    pub fn set_texture(&mut self, slot: TextureSlot, image: ImageData) {
        self.images.insert(slot, image);
        self.initialized = false;
    }

    /// Creates and uploads the GPU textures for every slot the model or
    /// `program` samples, plus every supplied slot.  An initialised material
    /// only uploads the slots it is still missing, so a material shared by
    /// several programs uploads each texture once.
    pub fn init_textures(&mut self, program: &ShaderProgram) -> Result<(), RenderError> {
        if !self.initialized {
            self.textures.clear();
        }
        let mut slots: Vec<TextureSlot> = self.model.sampled_slots().to_vec();
        slots.extend(self.images.keys().copied());
        slots.extend(program_slots(program));
        slots.sort();
        slots.dedup();
        slots.retain(|slot| !self.textures.contains_key(slot));

        let device = program.device();
        for slot in &slots {
            let texture = match self.images.get(slot) {
                Some(image) => Texture::from_image(device, image)?,
                None => Texture::from_image(device, &slot.default_image())?,
            };
            self.textures.insert(*slot, texture);
        }
        if !slots.is_empty() {
            log::debug!("material `{}`: {} textures uploaded", self.name, slots.len());
        }
        self.initialized = true;
        Ok(())
    }

    /// Writes the shading parameters into `program` and binds a texture to
    /// every unit the program samples.
    ///
    /// Members of the program's material block that this model does not
    /// define are zeroed, and units without a texture of this material get
    /// the slot default, so nothing carries over from the previous draw.
    pub fn bind_attributes(&self, program: &ShaderProgram) -> Result<(), RenderError> {
        if !self.initialized {
            log::error!("material `{}` bound before its textures were initialised", self.name);
            return Err(RenderError::Precondition(format!(
                "material `{}` is not initialised",
                self.name
            )));
        }
        let Some(reflection) = program.reflection() else {
            return Err(ProgramError::NotLinked.into());
        };

        let supplied = self.model.uniforms();
        for (name, value) in &supplied {
            program.set_uniform(name, *value)?;
        }
        if let Some(block) = reflection.uniforms.iter().find(|u| u.name == MATERIAL_BLOCK) {
            for member in &block.members {
                let name = format!("{MATERIAL_BLOCK}.{}", member.name);
                if supplied.iter().any(|(n, _)| *n == name) {
                    continue;
                }
                if let Some(zero) = UniformValue::zeroed(member.size) {
                    program.set_uniform(&name, zero)?;
                }
            }
        }

        for (unit, sampled) in reflection.textures.iter().enumerate() {
            let Some(slot) = TextureSlot::from_uniform_name(&sampled.name) else {
                log::trace!("texture `{}` is not a material slot", sampled.name);
                continue;
            };
            match self.textures.get(&slot) {
                Some(texture) => texture.bind(unit as u32)?,
                None => {
                    log::error!(
                        "material `{}` has no {slot:?} texture for program {:?}",
                        self.name,
                        program.id()
                    );
                    return Err(RenderError::Precondition(format!(
                        "material `{}` was not loaded with program {:?}",
                        self.name,
                        program.id()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &ShadingModel {
        &self.model
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&Texture> {
        self.textures.get(&slot)
    }

    pub fn image(&self, slot: TextureSlot) -> Option<&ImageData> {
        self.images.get(&slot)
    }
}

/// Material slots among the textures `program` samples.
fn program_slots(program: &ShaderProgram) -> impl Iterator<Item = TextureSlot> + '_ {
    program
        .reflection()
        .into_iter()
        .flat_map(|r| r.textures.iter())
        .filter_map(|t| TextureSlot::from_uniform_name(&t.name))
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("textures", &self.textures.keys().collect::<Vec<_>>())
            .field("initialized", &self.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_textures_match_their_slot() {
        assert_eq!(TextureSlot::BaseColor.default_image().pixels(), &[255, 255, 255, 255]);
        assert_eq!(TextureSlot::Normal.default_image().pixels(), &[128, 128, 255, 255]);
        assert_eq!(TextureSlot::Roughness.default_image().pixels(), &[255, 0, 0, 255]);
    }

    #[test]
    fn setting_a_texture_requires_reinitialisation() {
        let material = Material::new("test", ShadingModel::default())
            .with_texture(TextureSlot::Emissive, ImageData::solid(Color::BLACK));
        assert!(!material.is_initialized());
        assert!(material.image(TextureSlot::Emissive).is_some());
    }
}

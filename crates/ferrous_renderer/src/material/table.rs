use crate::error::RenderError;
use crate::material::Material;
use crate::shader::ShaderProgram;

/// Materials of one mesh, addressed by index from its submeshes.
#[derive(Debug, Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a material and returns its index.
    pub fn push(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Drops every entry and leaves `material` as the only one, at index 0.
    pub fn replace_all(&mut self, material: Material) {
        self.materials.clear();
        self.materials.push(material);
    }

    /// Uploads the textures every entry still lacks for `program`.
    pub fn init_textures(&mut self, program: &ShaderProgram) -> Result<(), RenderError> {
        for material in &mut self.materials {
            material.init_textures(program)?;
        }
        Ok(())
    }

    /// Binds entry `index` into `program`.
    pub fn bind_attributes(&self, index: usize, program: &ShaderProgram) -> Result<(), RenderError> {
        let material = self.materials.get(index).ok_or_else(|| {
            RenderError::Precondition(format!(
                "material index {index} out of range ({} materials)",
                self.materials.len()
            ))
        })?;
        log::trace!("binding material `{}`", material.name());
        material.bind_attributes(program)
    }

    pub fn get(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Material> {
        self.materials.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Material> {
        self.materials.iter()
    }
}

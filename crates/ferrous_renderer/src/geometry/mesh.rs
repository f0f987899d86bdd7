//! A drawable mesh: submeshes plus the material table they index into.

use ferrous_gpu::{DeviceRef, GpuError, Primitive};

use crate::error::RenderError;
use crate::geometry::{Aabb, MeshDescriptor, Submesh, SubmeshDescriptor};
use crate::loader::ImageLoader;
use crate::material::{recover_material, Material, MaterialPreset, MaterialTable};
use crate::shader::ShaderProgram;
use crate::traits::{DrawStats, Drawable, Loadable};

pub struct Mesh {
    device: DeviceRef,
    submeshes: Vec<Submesh>,
    materials: MaterialTable,
}

impl Mesh {
    pub fn new(device: &DeviceRef) -> Self {
        Self {
            device: device.clone(),
            submeshes: Vec::new(),
            materials: MaterialTable::new(),
        }
    }

    /// Builds a mesh from a parsed description.  Texture references are
    /// decoded through `loader`; a texture that cannot be loaded falls back
    /// to the slot's default with a warning.
    pub fn from_descriptor(
        device: &DeviceRef,
        desc: MeshDescriptor,
        loader: &dyn ImageLoader,
    ) -> Result<Self, GpuError> {
        let mut mesh = Self::new(device);
        for submesh in desc.submeshes {
            mesh.add_submesh(submesh)?;
        }
        for material in desc.materials {
            let mut built = Material::new(material.name, material.model);
            for (slot, path) in material.textures {
                match loader.load(&path) {
                    Ok(image) => built.set_texture(slot, image),
                    Err(e) => log::warn!("{e}; using the default {slot:?} texture"),
                }
            }
            mesh.add_material(built);
        }
        log::debug!(
            "mesh built: {} submeshes, {} vertices, {} triangles, {} materials",
            mesh.submeshes.len(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.materials.len()
        );
        Ok(mesh)
    }

    /// Appends a submesh and returns its index.
    pub fn add_submesh(&mut self, desc: SubmeshDescriptor) -> Result<usize, GpuError> {
        self.submeshes.push(Submesh::new(&self.device, desc)?);
        Ok(self.submeshes.len() - 1)
    }

    /// Appends a material and returns its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material)
    }

    /// Replaces the whole material table with the material of `preset` and
    /// points every submesh at it.  Earlier materials are dropped, not merged.
    pub fn set_material(&mut self, preset: MaterialPreset, roughness: f32) {
        self.materials.replace_all(recover_material(preset, roughness));
        for submesh in &mut self.submeshes {
            submesh.set_material_index(Some(0));
        }
    }

    /// Switches every submesh to `mode`.
    pub fn set_render_mode(&mut self, mode: Primitive) {
        for submesh in &mut self.submeshes {
            submesh.set_render_mode(mode);
        }
    }

    /// Uploads every submesh, then initialises the material textures.
    pub fn load(&mut self, program: &ShaderProgram) -> Result<(), RenderError> {
        for submesh in &mut self.submeshes {
            submesh.load()?;
        }
        self.materials.init_textures(program)
    }

    /// Draws every submesh in order with `program`.
    ///
    /// A submesh without a material (or in a mesh whose table is empty)
    /// draws with the current state.  A submesh whose material index is out
    /// of range, whose material is not loaded, or that is not loaded itself
    /// is reported and skipped; the rest of the mesh still draws.  Only
    /// device errors end the draw early.
    pub fn draw(&self, program: &ShaderProgram) -> Result<DrawStats, RenderError> {
        if !program.is_linked() {
            log::error!("mesh drawn with unlinked program {:?}", program.id());
            return Err(RenderError::Precondition(
                "mesh drawn with an unlinked program".to_string(),
            ));
        }
        program.use_program()?;

        let mut stats = DrawStats::default();
        for (i, submesh) in self.submeshes.iter().enumerate() {
            if let Some(index) = submesh.material_index() {
                if index < self.materials.len() {
                    if let Err(e) = self.materials.bind_attributes(index, program) {
                        skip_or_fail(i, e, &mut stats)?;
                        continue;
                    }
                } else if !self.materials.is_empty() {
                    log::error!(
                        "submesh {i} refers to material {index}, mesh has {}",
                        self.materials.len()
                    );
                    stats.skipped += 1;
                    continue;
                }
            }
            match submesh.draw() {
                Ok(0) => {}
                Ok(elements) => {
                    stats.draw_calls += 1;
                    stats.elements += u64::from(elements);
                }
                Err(e) => skip_or_fail(i, e, &mut stats)?,
            }
        }
        Ok(stats)
    }

    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    pub fn submeshes_mut(&mut self) -> &mut [Submesh] {
        &mut self.submeshes
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut MaterialTable {
        &mut self.materials
    }

    pub fn vertex_count(&self) -> usize {
        self.submeshes.iter().map(Submesh::vertex_count).sum()
    }

    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(Submesh::index_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    /// True once every submesh is uploaded and every material initialised.
    pub fn is_loaded(&self) -> bool {
        self.submeshes.iter().all(Submesh::is_loaded)
            && self.materials.iter().all(Material::is_initialized)
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        self.submeshes
            .iter()
            .filter_map(Submesh::bounding_box)
            .reduce(Aabb::union)
    }
}

/// Counts a precondition failure of submesh `index` as skipped; anything
/// else is returned.
fn skip_or_fail(index: usize, err: RenderError, stats: &mut DrawStats) -> Result<(), RenderError> {
    match err {
        RenderError::Precondition(reason) => {
            log::error!("submesh {index} skipped: {reason}");
            stats.skipped += 1;
            Ok(())
        }
        other => Err(other),
    }
}

impl Loadable for Mesh {
    fn load(&mut self, program: &ShaderProgram) -> Result<(), RenderError> {
        Mesh::load(self, program)
    }

    fn is_loaded(&self) -> bool {
        Mesh::is_loaded(self)
    }
}

impl Drawable for Mesh {
    fn draw(&self, program: &ShaderProgram) -> Result<DrawStats, RenderError> {
        Mesh::draw(self, program)
    }
}

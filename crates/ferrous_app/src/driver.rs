//! Per-frame orchestration: keep meshes loaded against the current program
//! link, set the camera and draw everything.

use ferrous_gpu::{DeviceRef, StageKind, UniformValue};
use ferrous_renderer::glam::{Mat4, Vec3};
use ferrous_renderer::{
    DrawStats, Mesh, MemorySource, ProgramError, RenderError, ShaderProgram, ShaderRegistry,
    ShaderSource,
};

/// Built-in stage names inside [`MemorySource::builtin`].
pub const BUILTIN_VERTEX: &str = "common.vert.wgsl";
pub const BUILTIN_FRAGMENT: &str = "cook_torrance.frag.wgsl";

struct DrivenMesh {
    mesh: Mesh,
    model: Mat4,
    /// Program generation the mesh was last loaded against.
    loaded_for: Option<u64>,
}

pub struct FrameDriver {
    registry: ShaderRegistry,
    program: ShaderProgram,
    meshes: Vec<DrivenMesh>,
    frames: u64,
}

impl FrameDriver {
    /// Compiles the stages named `vertex` and `fragment` through `reader`
    /// and links them into the driver's program.
    pub fn new(
        device: DeviceRef,
        vertex: &str,
        fragment: &str,
        reader: &dyn ShaderSource,
    ) -> Result<Self, ProgramError> {
        let mut registry = ShaderRegistry::new(device);
        let mut keys = Vec::with_capacity(2);
        for (kind, origin) in [(StageKind::Vertex, vertex), (StageKind::Fragment, fragment)] {
            let key = registry.add_origin(kind, origin, reader)?;
            if let Some(stage) = registry.get(key).filter(|s| !s.is_compiled()) {
                log::warn!("{kind} shader `{origin}` failed to compile");
                return Err(ProgramError::Compile {
                    stage: kind,
                    log: stage.log().to_string(),
                });
            }
            keys.push(key);
        }

        let program = ShaderProgram::with_stages(&registry, &keys).inspect_err(|e| {
            log::warn!("{e}");
        })?;
        log::info!("frame driver ready: `{vertex}` + `{fragment}`");
        Ok(Self {
            registry,
            program,
            meshes: Vec::new(),
            frames: 0,
        })
    }

    /// Driver running the built-in Cook-Torrance program.
    pub fn builtin(device: DeviceRef) -> Result<Self, ProgramError> {
        Self::new(device, BUILTIN_VERTEX, BUILTIN_FRAGMENT, &MemorySource::builtin())
    }

    /// Adds a mesh drawn with `model` as its model matrix.  It is loaded on
    /// the next frame.
    pub fn add_mesh(&mut self, mesh: Mesh, model: Mat4) -> usize {
        self.meshes.push(DrivenMesh {
            mesh,
            model,
            loaded_for: None,
        });
        self.meshes.len() - 1
    }

    pub fn set_model(&mut self, index: usize, model: Mat4) -> bool {
        match self.meshes.get_mut(index) {
            Some(m) => {
                m.model = model;
                true
            }
            None => false,
        }
    }

    /// Draws one frame.
    ///
    /// Meshes not yet loaded against the current link are loaded first.
    /// Any error stops the frame; what was drawn before it stays drawn.
    pub fn frame(&mut self, view_proj: Mat4, eye: Vec3) -> Result<DrawStats, RenderError> {
        let generation = self.program.generation();
        for driven in &mut self.meshes {
            if driven.loaded_for != Some(generation) {
                driven.mesh.load(&self.program)?;
                driven.loaded_for = Some(generation);
            }
        }

        self.program.use_program()?;
        self.program.set_uniform("camera.view_proj", view_proj)?;
        self.program
            .set_uniform("camera.eye", UniformValue::Vec4(eye.extend(1.0).to_array()))?;

        let mut stats = DrawStats::default();
        for driven in &self.meshes {
            self.program.set_uniform("camera.model", driven.model)?;
            stats += driven.mesh.draw(&self.program)?;
        }
        self.frames += 1;
        log::trace!(
            "frame {}: {} draws, {} elements, {} skipped",
            self.frames,
            stats.draw_calls,
            stats.elements,
            stats.skipped
        );
        Ok(stats)
    }

    /// Re-reads and relinks the program's stages.  On failure the previous
    /// program keeps drawing and the diagnostic is returned.
    pub fn reload_shaders(&mut self, reader: &dyn ShaderSource) -> Result<(), ProgramError> {
        match self.program.update_shaders(&mut self.registry, reader) {
            Ok(()) => {
                log::info!("shaders reloaded (generation {})", self.program.generation());
                Ok(())
            }
            Err(e) => {
                log::warn!("shader reload failed, keeping the previous program: {e}");
                Err(e)
            }
        }
    }

    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index).map(|m| &m.mesh)
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut Mesh> {
        self.meshes.get_mut(index).map(|m| &mut m.mesh)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn registry(&self) -> &ShaderRegistry {
        &self.registry
    }

    pub fn device(&self) -> &DeviceRef {
        self.registry.device()
    }

    /// Frames drawn successfully so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ferrous_gpu::{HeadlessDevice, RenderDevice, ResourceKind};
    use ferrous_renderer::{primitives, shaders, MaterialPreset};

    use super::*;

    fn driver() -> (Rc<HeadlessDevice>, FrameDriver) {
        let headless = Rc::new(HeadlessDevice::new());
        let driver = FrameDriver::builtin(headless.clone()).unwrap();
        (headless, driver)
    }

    fn gold_cube(device: &DeviceRef) -> Mesh {
        let mut mesh = Mesh::new(device);
        mesh.add_submesh(primitives::cube()).unwrap();
        mesh.set_material(MaterialPreset::Gold, 0.3);
        mesh
    }

    #[test]
    fn draws_a_cube() {
        let (headless, mut driver) = driver();
        let cube = gold_cube(driver.device());
        driver.add_mesh(cube, Mat4::from_translation(Vec3::X));

        let stats = driver.frame(Mat4::IDENTITY, Vec3::new(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.elements, 36);
        assert_eq!(driver.frame_count(), 1);

        let draws = headless.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].program, driver.program().id());
        let model = draws[0].uniform_f32s("camera.model").unwrap();
        assert_eq!(&model[12..15], &[1.0, 0.0, 0.0]);
        assert_eq!(draws[0].uniform_f32s("camera.eye").unwrap(), vec![0.0, 0.0, 5.0, 1.0]);
        assert!(draws[0].uniforms.contains_key("material.base_color"));
    }

    #[test]
    fn meshes_load_once_per_link() {
        let (headless, mut driver) = driver();
        let cube = gold_cube(driver.device());
        driver.add_mesh(cube, Mat4::IDENTITY);

        driver.frame(Mat4::IDENTITY, Vec3::ZERO).unwrap();
        let textures = headless.live_count(ResourceKind::Texture);
        let uploads = headless.stats().uploaded_bytes;
        driver.frame(Mat4::IDENTITY, Vec3::ZERO).unwrap();
        assert_eq!(headless.stats().uploaded_bytes, uploads);
        assert_eq!(headless.live_count(ResourceKind::Texture), textures);
    }

    #[test]
    fn successful_reload_relinks_and_reloads() {
        let (headless, mut driver) = driver();
        let cube = gold_cube(driver.device());
        driver.add_mesh(cube, Mat4::IDENTITY);
        driver.frame(Mat4::IDENTITY, Vec3::ZERO).unwrap();
        let old_program = driver.program().id();
        let uploads = headless.stats().uploaded_bytes;

        driver.reload_shaders(&MemorySource::builtin()).unwrap();
        assert_ne!(driver.program().id(), old_program);
        assert!(!headless.is_live(old_program));

        headless.take_draws();
        driver.frame(Mat4::IDENTITY, Vec3::ZERO).unwrap();
        assert!(headless.stats().uploaded_bytes > uploads);
        assert_eq!(headless.draws()[0].program, driver.program().id());
    }

    #[test]
    fn failed_reload_keeps_drawing() {
        let (headless, mut driver) = driver();
        let cube = gold_cube(driver.device());
        driver.add_mesh(cube, Mat4::IDENTITY);
        driver.frame(Mat4::IDENTITY, Vec3::ZERO).unwrap();
        let program = driver.program().id();

        let mut broken = MemorySource::builtin();
        broken.insert(BUILTIN_FRAGMENT, "fn fs_main( {");
        let err = driver.reload_shaders(&broken).unwrap_err();
        assert!(matches!(err, ProgramError::Compile { stage: StageKind::Fragment, .. }));
        assert_eq!(driver.program().id(), program);

        headless.take_draws();
        let stats = driver.frame(Mat4::IDENTITY, Vec3::ZERO).unwrap();
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(headless.draws()[0].program, program);
    }

    #[test]
    fn missing_stage_text_is_a_compile_error() {
        let headless = Rc::new(HeadlessDevice::new());
        let mut source = MemorySource::new();
        source.insert(BUILTIN_VERTEX, shaders::COMMON_VERT);
        let err = FrameDriver::new(headless, BUILTIN_VERTEX, "nowhere.frag.wgsl", &source)
            .err()
            .unwrap();
        assert!(matches!(err, ProgramError::Compile { stage: StageKind::Fragment, .. }));
    }

    #[test]
    fn lost_context_surfaces_as_error() {
        let (headless, mut driver) = driver();
        let cube = gold_cube(driver.device());
        driver.add_mesh(cube, Mat4::IDENTITY);
        headless.lose_context();
        assert!(driver.frame(Mat4::IDENTITY, Vec3::ZERO).is_err());
        assert_eq!(driver.frame_count(), 0);
    }
}

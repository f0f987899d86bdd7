//! Linked shader programs.
//!
//! Linking copies the compiled state of the attached stages into the program
//! object, so once linked a program does not depend on its stages staying
//! alive.  The stage keys are kept only to re-link or hot-reload.

use ferrous_gpu::{
    DeviceRef, GpuError, GpuHandle, ProgramReflection, ResourceId, ResourceKind, UniformSlot,
    UniformValue,
};

use crate::error::{ProgramError, RenderError};
use crate::shader::registry::{ShaderRegistry, StageKey};
use crate::shader::source::ShaderSource;

pub struct ShaderProgram {
    handle: GpuHandle,
    stages: Vec<StageKey>,
    reflection: Option<ProgramReflection>,
    log: String,
    /// Bumped on every successful link.
    generation: u64,
}

impl ShaderProgram {
    /// Acquires an empty, unlinked program.
    pub fn new(device: &DeviceRef) -> Result<Self, GpuError> {
        Ok(Self {
            handle: GpuHandle::acquire(device, ResourceKind::Program)?,
            stages: Vec::new(),
            reflection: None,
            log: String::new(),
            generation: 0,
        })
    }

    /// Creates a program from `stages` and links it.
    pub fn with_stages(registry: &ShaderRegistry, stages: &[StageKey]) -> Result<Self, ProgramError> {
        let mut program = Self::new(registry.device())?;
        for key in stages {
            program.attach(*key);
        }
        program.link(registry)?;
        Ok(program)
    }

    /// Records a stage for the next link.  Attaching the same key twice is
    /// a no-op.
    pub fn attach(&mut self, stage: StageKey) {
        if !self.stages.contains(&stage) {
            self.stages.push(stage);
        }
    }

    pub fn detach(&mut self, stage: StageKey) {
        self.stages.retain(|k| *k != stage);
    }

    /// Links the attached stages.  On failure the link log is kept and the
    /// program becomes unusable until the next successful link.
    pub fn link(&mut self, registry: &ShaderRegistry) -> Result<(), ProgramError> {
        let ids = match self.stage_ids(registry) {
            Ok(ids) => ids,
            Err(err) => {
                self.reflection = None;
                self.log = err.to_string();
                return Err(err);
            }
        };
        match self.handle.device().link_program(self.handle.id(), &ids) {
            Ok(reflection) => {
                self.accept(reflection);
                Ok(())
            }
            Err(log) => {
                self.reflection = None;
                self.log = log.clone();
                Err(ProgramError::Link { log })
            }
        }
    }

    /// Recompiles every attached stage and relinks, all or nothing.
    ///
    /// Candidate stages and a candidate program object are built next to the
    /// current ones.  Only when every stage compiles and the candidate links
    /// are they swapped in; otherwise the registry and this program are left
    /// exactly as they were, still usable if they were before, and the
    /// diagnostic is kept in [`link_log`](Self::link_log).
    pub fn update_shaders(
        &mut self,
        registry: &mut ShaderRegistry,
        reader: &dyn ShaderSource,
    ) -> Result<(), ProgramError> {
        let result = self.rebuild(registry, reader);
        if let Err(err) = &result {
            self.log = err.to_string();
        }
        result
    }

    fn rebuild(
        &mut self,
        registry: &mut ShaderRegistry,
        reader: &dyn ShaderSource,
    ) -> Result<(), ProgramError> {
        let mut candidates = Vec::with_capacity(self.stages.len());
        for key in &self.stages {
            let stage = registry.get(*key).ok_or(ProgramError::MissingStage(*key))?;
            candidates.push((*key, stage.recompiled(reader)?));
        }

        let handle = GpuHandle::acquire(self.handle.device(), ResourceKind::Program)?;
        let ids: Vec<ResourceId> = candidates.iter().map(|(_, s)| s.id()).collect();
        let reflection = self
            .handle
            .device()
            .link_program(handle.id(), &ids)
            .map_err(|log| ProgramError::Link { log })?;

        for (key, stage) in candidates {
            if let Some(slot) = registry.get_mut(key) {
                *slot = stage;
            }
        }
        self.handle = handle;
        self.accept(reflection);
        log::debug!("reloaded program {:?} ({} stages)", self.handle.id(), self.stages.len());
        Ok(())
    }

    /// Makes this program current.  Refused, and logged, if it is not linked.
    pub fn use_program(&self) -> Result<(), ProgramError> {
        if !self.is_linked() {
            log::error!("use of unlinked program {:?}", self.handle.id());
            return Err(ProgramError::NotLinked);
        }
        self.handle.device().use_program(self.handle.id())?;
        Ok(())
    }

    /// Writes a uniform by `"block"` or `"block.member"` name.  `Ok(false)`
    /// when the program has no such uniform.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) -> Result<bool, RenderError> {
        if !self.is_linked() {
            return Err(ProgramError::NotLinked.into());
        }
        let written = self
            .handle
            .device()
            .set_uniform(self.handle.id(), name, value.into())?;
        if !written {
            log::trace!("program {:?} has no uniform `{name}`", self.handle.id());
        }
        Ok(written)
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformSlot> {
        self.reflection.as_ref()?.uniform(name)
    }

    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.reflection.as_ref()?.attribute_location(name)
    }

    /// Texture unit assigned to the texture variable `name`.
    pub fn texture_unit(&self, name: &str) -> Option<u32> {
        self.reflection.as_ref()?.texture_unit(name)
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.reflection.is_some()
    }

    /// Diagnostic of the last failed link or reload; empty after a success.
    pub fn link_log(&self) -> &str {
        &self.log
    }

    pub fn stages(&self) -> &[StageKey] {
        &self.stages
    }

    pub fn reflection(&self) -> Option<&ProgramReflection> {
        self.reflection.as_ref()
    }

    /// Changes whenever the program is successfully (re)linked.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn device(&self) -> &DeviceRef {
        self.handle.device()
    }

    #[inline]
    pub fn id(&self) -> ResourceId {
        self.handle.id()
    }

    fn stage_ids(&self, registry: &ShaderRegistry) -> Result<Vec<ResourceId>, ProgramError> {
        self.stages
            .iter()
            .map(|key| {
                registry
                    .get(*key)
                    .map(|stage| stage.id())
                    .ok_or(ProgramError::MissingStage(*key))
            })
            .collect()
    }

    fn accept(&mut self, reflection: ProgramReflection) {
        log::debug!(
            "linked program {:?}: {} uniform blocks, {} textures",
            self.handle.id(),
            reflection.uniforms.len(),
            reflection.textures.len()
        );
        self.reflection = Some(reflection);
        self.log.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ferrous_gpu::{HeadlessDevice, StageKind};

    use super::*;
    use crate::geometry::{primitives, Mesh};
    use crate::shader::MemorySource;
    use crate::shaders;

    fn registry() -> (Rc<HeadlessDevice>, ShaderRegistry) {
        let headless = Rc::new(HeadlessDevice::new());
        let device: DeviceRef = headless.clone();
        (headless, ShaderRegistry::new(device))
    }

    #[test]
    fn link_then_use() {
        let (headless, mut registry) = registry();
        let vs = registry.add_source(StageKind::Vertex, shaders::COMMON_VERT).unwrap();
        let fs = registry.add_source(StageKind::Fragment, shaders::COOK_TORRANCE_FRAG).unwrap();
        let program = ShaderProgram::with_stages(&registry, &[vs, fs]).unwrap();

        assert!(program.is_linked());
        assert_eq!(program.generation(), 1);
        program.use_program().unwrap();
        assert_eq!(headless.current_program(), Some(program.id()));
        assert_eq!(program.attribute_location("texcoords"), Some(1));
        assert_eq!(program.texture_unit("base_color_map"), Some(0));
        assert!(program.uniform_location("camera.view_proj").is_some());
        assert!(program.uniform_location("material.roughness").is_some());
    }

    #[test]
    fn unlinked_program_refuses_use() {
        let (_, registry) = registry();
        let program = ShaderProgram::new(registry.device()).unwrap();
        assert_eq!(program.use_program(), Err(ProgramError::NotLinked));
        assert!(matches!(
            program.set_uniform("camera.model", glam::Mat4::IDENTITY),
            Err(RenderError::Program(ProgramError::NotLinked))
        ));
    }

    #[test]
    fn failed_link_keeps_the_log() {
        let (_, mut registry) = registry();
        let fs = registry.add_source(StageKind::Fragment, shaders::BLINN_PHONG_FRAG).unwrap();
        let mut program = ShaderProgram::new(registry.device()).unwrap();
        program.attach(fs);
        let err = program.link(&registry).unwrap_err();
        assert!(matches!(err, ProgramError::Link { .. }));
        assert!(!program.is_linked());
        assert!(program.link_log().contains("vertex stage"));
    }

    #[test]
    fn program_outlives_its_stages() {
        let (_, mut registry) = registry();
        let vs = registry.add_source(StageKind::Vertex, shaders::COMMON_VERT).unwrap();
        let fs = registry.add_source(StageKind::Fragment, shaders::BLINN_PHONG_FRAG).unwrap();
        let mut program = ShaderProgram::with_stages(&registry, &[vs, fs]).unwrap();

        registry.remove(vs);
        registry.remove(fs);
        program.use_program().unwrap();

        let err = program.update_shaders(&mut registry, &MemorySource::new()).unwrap_err();
        assert_eq!(err, ProgramError::MissingStage(vs));
        assert!(program.is_linked());
    }

    #[test]
    fn failed_relink_makes_the_program_unusable() {
        let (_, mut registry) = registry();
        let vs = registry.add_source(StageKind::Vertex, shaders::COMMON_VERT).unwrap();
        let fs = registry.add_source(StageKind::Fragment, shaders::COOK_TORRANCE_FRAG).unwrap();
        let mut program = ShaderProgram::with_stages(&registry, &[vs, fs]).unwrap();
        program.use_program().unwrap();

        program.detach(vs);
        assert!(matches!(program.link(&registry), Err(ProgramError::Link { .. })));
        assert_eq!(program.use_program(), Err(ProgramError::NotLinked));

        let mut mesh = Mesh::new(registry.device());
        mesh.add_submesh(primitives::cube()).unwrap();
        assert!(matches!(mesh.draw(&program), Err(RenderError::Precondition(_))));

        program.attach(vs);
        program.link(&registry).unwrap();
        mesh.load(&program).unwrap();
        assert_eq!(mesh.draw(&program).unwrap().draw_calls, 1);
    }

    #[test]
    fn failed_reload_is_logged_on_the_program() {
        let (_, mut registry) = registry();
        let mut source = MemorySource::new();
        source.insert("lit.vert.wgsl", shaders::COMMON_VERT);
        source.insert("lit.frag.wgsl", shaders::COOK_TORRANCE_FRAG);
        let vs = registry.add_origin(StageKind::Vertex, "lit.vert.wgsl", &source).unwrap();
        let fs = registry.add_origin(StageKind::Fragment, "lit.frag.wgsl", &source).unwrap();
        let mut program = ShaderProgram::with_stages(&registry, &[vs, fs]).unwrap();
        assert!(program.link_log().is_empty());

        source.insert("lit.frag.wgsl", "fn fs_main( {");
        let err = program.update_shaders(&mut registry, &source).unwrap_err();
        assert_eq!(program.link_log(), err.to_string());
        assert!(program.is_linked());
        assert_eq!(program.generation(), 1);

        source.insert("lit.frag.wgsl", shaders::COOK_TORRANCE_FRAG);
        program.update_shaders(&mut registry, &source).unwrap();
        assert!(program.link_log().is_empty());
    }

    #[test]
    fn attach_is_idempotent() {
        let (_, mut registry) = registry();
        let vs = registry.add_source(StageKind::Vertex, shaders::COMMON_VERT).unwrap();
        let mut program = ShaderProgram::new(registry.device()).unwrap();
        program.attach(vs);
        program.attach(vs);
        assert_eq!(program.stages(), &[vs]);
        program.detach(vs);
        assert!(program.stages().is_empty());
    }
}

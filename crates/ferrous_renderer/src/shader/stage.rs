use ferrous_gpu::{DeviceRef, GpuError, GpuHandle, ResourceId, ResourceKind, StageKind, StageReflection};

use crate::error::ProgramError;
use crate::shader::source::ShaderSource;

/// One compiled (or failed) shader stage.
///
/// A failed compile keeps the handle and the compiler log around for
/// inspection, but the stage cannot be linked.
pub struct ShaderStage {
    handle: GpuHandle,
    kind: StageKind,
    source: String,
    origin: Option<String>,
    reflection: Option<StageReflection>,
    log: String,
}

impl ShaderStage {
    /// Acquires an uncompiled stage of `kind`.
    pub fn new(device: &DeviceRef, kind: StageKind) -> Result<Self, GpuError> {
        Ok(Self {
            handle: GpuHandle::acquire(device, ResourceKind::ShaderStage(kind))?,
            kind,
            source: String::new(),
            origin: None,
            reflection: None,
            log: String::new(),
        })
    }

    /// Acquires a stage and compiles `source`.  Only resource creation can
    /// fail here; compile errors are kept in [`log`](Self::log).
    pub fn from_source(
        device: &DeviceRef,
        kind: StageKind,
        source: impl Into<String>,
    ) -> Result<Self, GpuError> {
        let mut stage = Self::new(device, kind)?;
        // the outcome is recorded on the stage
        let _ = stage.compile(source);
        Ok(stage)
    }

    /// Like [`from_source`](Self::from_source), reading the text of `origin`
    /// through `reader`.  The origin is remembered for reloads.
    pub fn from_origin(
        device: &DeviceRef,
        kind: StageKind,
        origin: &str,
        reader: &dyn ShaderSource,
    ) -> Result<Self, GpuError> {
        let mut stage = Self::from_source(device, kind, read_or_empty(reader, origin))?;
        stage.origin = Some(origin.to_string());
        Ok(stage)
    }

    /// Compiles `source` for this stage's kind, replacing the previous result.
    pub fn compile(&mut self, source: impl Into<String>) -> Result<(), ProgramError> {
        self.source = source.into();
        match self.handle.device().compile_stage(self.handle.id(), &self.source) {
            Ok(reflection) => {
                log::debug!("compiled {} stage {:?}", self.kind, self.handle.id());
                self.reflection = Some(reflection);
                self.log.clear();
                Ok(())
            }
            Err(log) => {
                self.reflection = None;
                self.log = log.clone();
                Err(ProgramError::Compile { stage: self.kind, log })
            }
        }
    }

    /// A fresh stage of the same kind and origin compiled from the current
    /// text of the origin (or this stage's source when it has none).
    pub(crate) fn recompiled(&self, reader: &dyn ShaderSource) -> Result<Self, ProgramError> {
        let source = match &self.origin {
            Some(origin) => read_or_empty(reader, origin),
            None => self.source.clone(),
        };
        let mut stage = Self::new(self.handle.device(), self.kind)?;
        stage.origin = self.origin.clone();
        stage.compile(source)?;
        Ok(stage)
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.reflection.is_some()
    }

    /// Compiler log of the last failed compile; empty after a success.
    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn reflection(&self) -> Option<&StageReflection> {
        self.reflection.as_ref()
    }

    #[inline]
    pub fn id(&self) -> ResourceId {
        self.handle.id()
    }
}

/// Unreadable sources become empty text, which then fails to compile.
fn read_or_empty(reader: &dyn ShaderSource, origin: &str) -> String {
    reader.read(origin).unwrap_or_else(|e| {
        log::warn!("cannot read shader `{origin}`: {e}");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ferrous_gpu::HeadlessDevice;

    use super::*;
    use crate::shader::MemorySource;
    use crate::shaders;

    fn device() -> DeviceRef {
        Rc::new(HeadlessDevice::new())
    }

    #[test]
    fn builtin_vertex_shader_compiles() {
        let stage = ShaderStage::from_source(&device(), StageKind::Vertex, shaders::COMMON_VERT).unwrap();
        assert!(stage.is_compiled(), "{}", stage.log());
        assert!(stage.log().is_empty());
    }

    #[test]
    fn empty_source_is_a_compile_failure() {
        let mut stage = ShaderStage::new(&device(), StageKind::Fragment).unwrap();
        let err = stage.compile("").unwrap_err();
        assert!(matches!(err, ProgramError::Compile { stage: StageKind::Fragment, .. }));
        assert!(!stage.is_compiled());
        assert!(!stage.log().is_empty());
    }

    #[test]
    fn missing_origin_compiles_as_empty() {
        let stage =
            ShaderStage::from_origin(&device(), StageKind::Vertex, "nope.wgsl", &MemorySource::new())
                .unwrap();
        assert!(!stage.is_compiled());
        assert_eq!(stage.origin(), Some("nope.wgsl"));
        assert_eq!(stage.source(), "");
    }

    #[test]
    fn recompiling_clears_the_log() {
        let mut stage = ShaderStage::from_source(&device(), StageKind::Vertex, "fn (").unwrap();
        assert!(!stage.is_compiled());
        stage.compile(shaders::COMMON_VERT).unwrap();
        assert!(stage.is_compiled());
        assert!(stage.log().is_empty());
    }
}

//! Per-context arena of shader stages.
//!
//! Programs refer to their stages by [`StageKey`] instead of borrowing them,
//! so a stage can be recompiled, replaced or removed without leaving a
//! dangling reference behind.  A program that was linked keeps working when
//! its stages go away; only its next re-link notices.

use ferrous_gpu::{DeviceRef, GpuError, StageKind};
use slotmap::{new_key_type, SlotMap};

use crate::shader::source::ShaderSource;
use crate::shader::stage::ShaderStage;

new_key_type! {
    /// Key of a stage inside a [`ShaderRegistry`].
    pub struct StageKey;
}

pub struct ShaderRegistry {
    device: DeviceRef,
    stages: SlotMap<StageKey, ShaderStage>,
}

impl ShaderRegistry {
    pub fn new(device: DeviceRef) -> Self {
        Self {
            device,
            stages: SlotMap::with_key(),
        }
    }

    pub fn device(&self) -> &DeviceRef {
        &self.device
    }

    pub fn insert(&mut self, stage: ShaderStage) -> StageKey {
        self.stages.insert(stage)
    }

    /// Creates and compiles a stage from text.  Compile failures are kept on
    /// the stage; check [`ShaderStage::is_compiled`].
    pub fn add_source(&mut self, kind: StageKind, source: &str) -> Result<StageKey, GpuError> {
        let stage = ShaderStage::from_source(&self.device, kind, source)?;
        Ok(self.insert(stage))
    }

    /// Creates and compiles a stage from a named origin.
    pub fn add_origin(
        &mut self,
        kind: StageKind,
        origin: &str,
        reader: &dyn ShaderSource,
    ) -> Result<StageKey, GpuError> {
        let stage = ShaderStage::from_origin(&self.device, kind, origin, reader)?;
        Ok(self.insert(stage))
    }

    pub fn get(&self, key: StageKey) -> Option<&ShaderStage> {
        self.stages.get(key)
    }

    pub fn get_mut(&mut self, key: StageKey) -> Option<&mut ShaderStage> {
        self.stages.get_mut(key)
    }

    /// Removes a stage, releasing its handle.
    pub fn remove(&mut self, key: StageKey) -> Option<ShaderStage> {
        self.stages.remove(key)
    }

    pub fn contains(&self, key: StageKey) -> bool {
        self.stages.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StageKey, &ShaderStage)> {
        self.stages.iter()
    }
}

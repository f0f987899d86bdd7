use ferrous_gpu::{GpuError, StageKind};
use thiserror::Error;

use crate::shader::StageKey;

/// Shader compile and link failures.
///
/// These are diagnostics, not crashes: the program or stage that produced
/// one keeps its previous state and the caller decides whether a frame can
/// go on without it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProgramError {
    /// `use` or a uniform write on a program whose last link did not succeed.
    #[error("shader program is not linked")]
    NotLinked,

    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: StageKind, log: String },

    #[error("shader program failed to link:\n{log}")]
    Link { log: String },

    /// A stage key the program refers to is no longer in the registry.
    #[error("shader stage {0:?} is not in the registry")]
    MissingStage(StageKey),

    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Errors of the resource and draw path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// An operation was called in the wrong state (draw before load, an
    /// out-of-range material index, ...).  Nothing was sent to the GPU.
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Program(#[from] ProgramError),
}

/// A texture referenced by a material description could not be read.
#[derive(Debug, Error)]
#[error("cannot load texture `{path}`: {reason}")]
pub struct LoadError {
    pub path: String,
    pub reason: String,
}

use thiserror::Error;

use crate::handle::{ResourceId, ResourceKind};

/// Failures reported by a [`RenderDevice`](crate::RenderDevice).
///
/// Compile and link problems are *not* listed here: they are diagnostics
/// returned as strings by `compile_stage` / `link_program`, so the caller
/// decides whether they are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GpuError {
    /// No current context; nothing can be created or drawn.
    #[error("no GPU context is current on this thread")]
    ContextUnavailable,

    #[error("failed to create {kind:?}: {reason}")]
    ResourceCreation { kind: ResourceKind, reason: String },

    #[error("out of GPU memory uploading {requested} bytes ({available} available)")]
    OutOfMemory { requested: usize, available: usize },

    #[error("unknown or released resource {0:?}")]
    UnknownResource(ResourceId),

    /// The id exists but names a different kind of object.
    #[error("resource {id:?} is a {actual:?}, expected {expected}")]
    WrongKind {
        id: ResourceId,
        expected: &'static str,
        actual: ResourceKind,
    },

    #[error("program {0:?} is not linked")]
    ProgramNotLinked(ResourceId),

    #[error("no program is in use")]
    NoProgramInUse,

    #[error("vertex array {0:?} has no buffers configured")]
    VertexArrayNotConfigured(ResourceId),

    #[error("uniform `{name}` expects {expected} bytes, got {actual}")]
    UniformMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    #[error("texture unit {unit} exceeds the {max} units available")]
    TextureUnitOutOfRange { unit: u32, max: u32 },

    #[error("{0}")]
    Backend(String),
}

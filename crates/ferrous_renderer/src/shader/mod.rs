pub mod program;
pub mod registry;
pub mod source;
pub mod stage;

pub use program::ShaderProgram;
pub use registry::{ShaderRegistry, StageKey};
pub use source::{MemorySource, ShaderSource};
pub use stage::ShaderStage;

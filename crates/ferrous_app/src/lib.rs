//! `ferrous_app`: the application layer around the renderer core.
//!
//! Loads a TOML configuration, installs the `fern` logger, builds a device
//! for the configured backend and drives frames through [`FrameDriver`].

pub mod config;
pub mod driver;
pub mod frame_end;
pub mod logging;
pub mod source;

pub use config::{AppConfig, Backend, ConfigError, LogConfig, MaterialConfig, RendererConfig, ShaderConfig};
pub use driver::FrameDriver;
pub use frame_end::FrameEnd;
pub use source::FileShaderSource;

//! Application configuration, read from a TOML file.
//!
//! ```toml
//! [renderer]
//! backend = "wgpu"      # or "headless"
//! width = 1280
//! height = 720
//! sample_count = 4
//! frames = 10
//!
//! [shaders]
//! vertex = "shaders/common.vert.wgsl"
//! fragment = "shaders/cook_torrance.frag.wgsl"
//!
//! [material]
//! preset = "gold"
//! roughness = 0.3
//!
//! [log]
//! level = "debug"
//! file = "ferrous.log"
//! ```
//!
//! Every table and key is optional.  The file is deserialized into a raw,
//! stringly-typed form first and then checked into an [`AppConfig`], so bad
//! values come back as [`ConfigError::Invalid`] with a readable message.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ferrous_renderer::MaterialPreset;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which [`RenderDevice`](ferrous_gpu::RenderDevice) the application runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// CPU-emulated context; nothing reaches a GPU.
    #[default]
    Headless,
    /// Real wgpu device rendering into an off-screen target.
    Wgpu,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "headless" => Ok(Backend::Headless),
            "wgpu" => Ok(Backend::Wgpu),
            other => Err(ConfigError::Invalid(format!(
                "unknown backend `{other}` (expected `headless` or `wgpu`)"
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Headless => "headless",
            Backend::Wgpu => "wgpu",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub backend: Backend,
    pub width: u32,
    pub height: u32,
    /// MSAA sample count of the wgpu target.
    pub sample_count: u32,
    /// Frames to run before exiting.
    pub frames: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Headless,
            width: 800,
            height: 600,
            sample_count: 1,
            frames: 3,
        }
    }
}

/// Shader files; `None` selects the built-in stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderConfig {
    pub vertex: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialConfig {
    /// `None` keeps the mesh's own materials.
    pub preset: Option<MaterialPreset>,
    pub roughness: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            preset: None,
            roughness: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Also append log lines to this file.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub renderer: RendererConfig,
    pub shaders: ShaderConfig,
    pub material: MaterialConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        raw.try_into()
    }

    /// Reads and checks the configuration at `path`.  Relative shader paths
    /// stay relative to the working directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

// ── raw TOML shape ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    renderer: RawRenderer,
    shaders: RawShaders,
    material: RawMaterial,
    log: RawLog,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawRenderer {
    backend: String,
    width: u32,
    height: u32,
    sample_count: u32,
    frames: u32,
}

impl Default for RawRenderer {
    fn default() -> Self {
        let defaults = RendererConfig::default();
        Self {
            backend: defaults.backend.to_string(),
            width: defaults.width,
            height: defaults.height,
            sample_count: defaults.sample_count,
            frames: defaults.frames,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawShaders {
    vertex: Option<PathBuf>,
    fragment: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawMaterial {
    preset: Option<String>,
    roughness: f32,
}

impl Default for RawMaterial {
    fn default() -> Self {
        Self {
            preset: None,
            roughness: MaterialConfig::default().roughness,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawLog {
    level: String,
    file: Option<PathBuf>,
}

impl Default for RawLog {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let r = raw.renderer;
        if r.width == 0 || r.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "target size {}x{} must be non-zero",
                r.width, r.height
            )));
        }
        if !matches!(r.sample_count, 1 | 2 | 4 | 8) {
            return Err(ConfigError::Invalid(format!(
                "sample_count {} is not one of 1, 2, 4, 8",
                r.sample_count
            )));
        }

        let roughness = raw.material.roughness;
        if !(0.0..=1.0).contains(&roughness) {
            return Err(ConfigError::Invalid(format!(
                "roughness {roughness} is outside [0, 1]"
            )));
        }
        let preset = raw
            .material
            .preset
            .as_deref()
            .map(MaterialPreset::from_str)
            .transpose()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let level = LevelFilter::from_str(&raw.log.level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level `{}`", raw.log.level)))?;

        Ok(AppConfig {
            renderer: RendererConfig {
                backend: r.backend.parse()?,
                width: r.width,
                height: r.height,
                sample_count: r.sample_count,
                frames: r.frames,
            },
            shaders: ShaderConfig {
                vertex: raw.shaders.vertex,
                fragment: raw.shaders.fragment,
            },
            material: MaterialConfig { preset, roughness },
            log: LogConfig {
                level,
                file: raw.log.file,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn full_file() {
        let config = AppConfig::from_toml_str(
            r#"
            [renderer]
            backend = "wgpu"
            width = 1280
            height = 720
            sample_count = 4
            frames = 10

            [shaders]
            fragment = "shaders/custom.frag.wgsl"

            [material]
            preset = "gold"
            roughness = 0.25

            [log]
            level = "debug"
            file = "ferrous.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.renderer.backend, Backend::Wgpu);
        assert_eq!((config.renderer.width, config.renderer.height), (1280, 720));
        assert_eq!(config.renderer.sample_count, 4);
        assert_eq!(config.renderer.frames, 10);
        assert_eq!(config.shaders.vertex, None);
        assert_eq!(config.shaders.fragment, Some(PathBuf::from("shaders/custom.frag.wgsl")));
        assert_eq!(config.material.preset, Some(MaterialPreset::Gold));
        assert_eq!(config.material.roughness, 0.25);
        assert_eq!(config.log.level, LevelFilter::Debug);
        assert_eq!(config.log.file, Some(PathBuf::from("ferrous.log")));
    }

    #[test]
    fn unknown_backend_is_invalid() {
        let err = AppConfig::from_toml_str("[renderer]\nbackend = \"vulkan\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("vulkan")));
    }

    #[test]
    fn roughness_out_of_range_is_invalid() {
        for value in ["1.5", "-0.1", "nan"] {
            let text = format!("[material]\nroughness = {value}");
            assert!(
                matches!(AppConfig::from_toml_str(&text), Err(ConfigError::Invalid(_))),
                "roughness {value}"
            );
        }
    }

    #[test]
    fn unknown_preset_and_level_are_invalid() {
        assert!(matches!(
            AppConfig::from_toml_str("[material]\npreset = \"mithril\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[log]\nlevel = \"loud\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn bad_target_is_invalid() {
        assert!(matches!(
            AppConfig::from_toml_str("[renderer]\nwidth = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[renderer]\nsample_count = 3"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[renderer\nwidth = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[renderer]\nwidht = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io() {
        let err = AppConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

//! Shader text read from disk.

use std::io;
use std::path::{Path, PathBuf};

use ferrous_renderer::{MemorySource, ShaderSource};

/// Resolves shader origins as paths relative to `root` (absolute origins
/// are used as they are).
///
/// With a fallback, origins with no file on disk are looked up there, so a
/// file next to the working directory overrides a built-in stage of the
/// same name.
#[derive(Debug, Clone)]
pub struct FileShaderSource {
    root: PathBuf,
    fallback: Option<MemorySource>,
}

impl FileShaderSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: MemorySource) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, origin: &str) -> PathBuf {
        self.root.join(origin)
    }
}

impl Default for FileShaderSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ShaderSource for FileShaderSource {
    fn read(&self, origin: &str) -> io::Result<String> {
        let path = self.resolve(origin);
        match (std::fs::read_to_string(&path), &self.fallback) {
            (Ok(text), _) => {
                log::debug!("read shader {}", path.display());
                Ok(text)
            }
            (Err(e), Some(fallback)) if e.kind() == io::ErrorKind::NotFound => fallback.read(origin),
            (Err(e), _) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("ferrous_shader_src_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("flat.frag.wgsl"), "// empty").unwrap();

        let source = FileShaderSource::new(&dir);
        assert_eq!(source.read("flat.frag.wgsl").unwrap(), "// empty");
        assert_eq!(
            source.read("missing.wgsl").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        let mut builtin = MemorySource::new();
        builtin.insert("flat.frag.wgsl", "// builtin");
        builtin.insert("other.frag.wgsl", "// other");
        let layered = FileShaderSource::new(&dir).with_fallback(builtin);
        assert_eq!(layered.read("flat.frag.wgsl").unwrap(), "// empty");
        assert_eq!(layered.read("other.frag.wgsl").unwrap(), "// other");
        assert!(layered.read("missing.wgsl").is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

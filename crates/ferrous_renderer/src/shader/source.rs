//! Shader source storage.
//!
//! Stages that were created from a named origin re-read their text through a
//! [`ShaderSource`] when the program is hot-reloaded.  Reading is the
//! application's business; the renderer only needs the text.

use std::collections::HashMap;
use std::io;

use crate::shaders;

/// Supplies raw shader text by name or path.
pub trait ShaderSource {
    fn read(&self, origin: &str) -> io::Result<String>;
}

/// Shader text held in memory, keyed by origin.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in WGSL programs under their file names.
    pub fn builtin() -> Self {
        let mut source = Self::new();
        for (origin, text) in shaders::ALL {
            source.insert(*origin, *text);
        }
        source
    }

    pub fn insert(&mut self, origin: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(origin.into(), text.into());
    }

    pub fn remove(&mut self, origin: &str) -> Option<String> {
        self.sources.remove(origin)
    }
}

impl ShaderSource for MemorySource {
    fn read(&self, origin: &str) -> io::Result<String> {
        self.sources.get(origin).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no shader named `{origin}`"))
        })
    }
}

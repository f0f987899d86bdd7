//! Image decoding seam for material textures.

use ferrous_core::ImageData;

use crate::error::LoadError;

/// Turns a texture reference from a material description into pixels.
pub trait ImageLoader {
    fn load(&self, path: &str) -> Result<ImageData, LoadError>;
}

/// Loader for descriptions without textures; every lookup fails, so every
/// slot gets its default texture.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageLoader for NoImages {
    fn load(&self, path: &str) -> Result<ImageData, LoadError> {
        Err(LoadError {
            path: path.to_string(),
            reason: "no image loader configured".to_string(),
        })
    }
}

#[cfg(feature = "image")]
pub use file::ImageFileLoader;

#[cfg(feature = "image")]
mod file {
    use std::path::PathBuf;

    use ferrous_core::ImageData;

    use super::ImageLoader;
    use crate::error::LoadError;

    /// Decodes PNG/JPEG files relative to a root directory.
    #[derive(Debug, Clone)]
    pub struct ImageFileLoader {
        root: PathBuf,
    }

    impl ImageFileLoader {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }
    }

    impl ImageLoader for ImageFileLoader {
        fn load(&self, path: &str) -> Result<ImageData, LoadError> {
            let fail = |reason: String| LoadError { path: path.to_string(), reason };
            let decoded = image::open(self.root.join(path))
                .map_err(|e| fail(e.to_string()))?
                .to_rgba8();
            let (width, height) = decoded.dimensions();
            ImageData::new(width, height, decoded.into_raw()).map_err(|e| fail(e.to_string()))
        }
    }
}

//! Texture System

use crate::image_io::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shared cache of loaded texture images.
pub struct TextureSystem {
    /// Base directory for relative paths.
    root: PathBuf,

    /// Images loaded so far keyed by resolved path.
    images: Mutex<HashMap<PathBuf, Arc<RGBImage>>>,
}

impl TextureSystem {
    /// Create a new `TextureSystem`.
    ///
    /// * `root` - Base directory for relative paths.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            images: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the base directory for relative paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path relative paths resolve to.
    ///
    /// * `path` - Absolute path or path relative to the root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Get an image from the cache, loading it on first use.
    ///
    /// * `path` - Absolute path or path relative to the root.
    pub fn load(&self, path: &Path) -> Result<Arc<RGBImage>, String> {
        let resolved = self.resolve(path);
        let mut images = self
            .images
            .lock()
            .map_err(|_| "TextureSystem::load(): unable to access image cache".to_string())?;
        match images.get(&resolved) {
            Some(img) => Ok(Arc::clone(img)),
            None => {
                let img = Arc::new(read_image(&resolved)?);
                images.insert(resolved, Arc::clone(&img));
                Ok(img)
            }
        }
    }

    /// Returns a new per-worker handle.
    pub fn handle(self: &Arc<Self>) -> TextureHandle {
        TextureHandle {
            system: Arc::clone(self),
            images: HashMap::new(),
        }
    }
}

/// A worker's view of the texture system. Lookups hit a private cache before
/// touching the shared one; handles are never shared between threads.
pub struct TextureHandle {
    /// The shared system.
    system: Arc<TextureSystem>,

    /// Images this worker has already used.
    images: HashMap<PathBuf, Arc<RGBImage>>,
}

impl TextureHandle {
    /// Get an image.
    ///
    /// * `path` - Absolute path or path relative to the root.
    pub fn image(&mut self, path: &Path) -> Result<Arc<RGBImage>, String> {
        if let Some(img) = self.images.get(path) {
            return Ok(Arc::clone(img));
        }
        let img = self.system.load(path)?;
        self.images.insert(path.to_path_buf(), Arc::clone(&img));
        Ok(img)
    }
}

//! Path-keyed texture cache.
//!
//! A [`TexturePool`] is owned by whoever loads models and passed to the
//! loaders by reference, so sharing textures between meshes is explicit and
//! every texture lives exactly as long as its pool.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info};

use super::texture_resource::TextureResource;
use crate::error::Result;

/// Role of a texture in the lighting model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Emission,
}

impl TextureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "diffuse",
            TextureKind::Specular => "specular",
            TextureKind::Emission => "emission",
        }
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Handle to a pooled texture. Cloning shares the underlying resource.
#[derive(Debug)]
pub struct Texture<R> {
    pub id: TextureId,
    pub kind: TextureKind,
    pub path: PathBuf,
    pub resource: Arc<R>,
}

impl<R> Clone for Texture<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            path: self.path.clone(),
            resource: Arc::clone(&self.resource),
        }
    }
}

/// Owned texture cache keyed by file path.
pub struct TexturePool<R = TextureResource> {
    textures: Vec<Texture<R>>,
    by_path: HashMap<PathBuf, usize>,
    next_id: u32,
}

impl<R> TexturePool<R> {
    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
            by_path: HashMap::new(),
            next_id: 1,
        }
    }

    /// Returns the cached texture for `path`, or creates it with `loader`.
    ///
    /// A cached texture is returned as is even when it was first loaded with a
    /// different kind. Nothing is cached when the loader fails.
    pub fn load_with<F>(&mut self, path: &Path, kind: TextureKind, loader: F) -> Result<Texture<R>>
    where
        F: FnOnce(&Path) -> Result<R>,
    {
        if let Some(&index) = self.by_path.get(path) {
            let texture = &self.textures[index];
            debug!(
                "Reusing texture {} '{}' for {}",
                texture.id.0,
                path.display(),
                kind
            );
            return Ok(texture.clone());
        }

        let resource = loader(path)?;
        let texture = Texture {
            id: TextureId(self.next_id),
            kind,
            path: path.to_path_buf(),
            resource: Arc::new(resource),
        };
        self.next_id += 1;

        info!(
            "Loaded {} texture {} from '{}'",
            kind,
            texture.id.0,
            path.display()
        );
        self.by_path.insert(texture.path.clone(), self.textures.len());
        self.textures.push(texture.clone());
        Ok(texture)
    }

    pub fn get(&self, path: &Path) -> Option<&Texture<R>> {
        self.by_path.get(path).map(|&index| &self.textures[index])
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Drops the pool's references. Handles held elsewhere stay valid.
    pub fn clear(&mut self) {
        self.release_all();
        self.by_path.clear();
    }

    fn release_all(&mut self) {
        for texture in self.textures.drain(..) {
            debug!(
                "Releasing {} texture {} '{}'",
                texture.kind,
                texture.id.0,
                texture.path.display()
            );
        }
    }
}

impl TexturePool<TextureResource> {
    /// Loads an image file through the pool as a GPU texture.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        kind: TextureKind,
    ) -> Result<Texture<TextureResource>> {
        self.load_with(path, kind, |path| {
            TextureResource::from_image_file(device, queue, path)
        })
    }
}

impl<R> Default for TexturePool<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Drop for TexturePool<R> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlintError;
    use std::cell::Cell;

    #[test]
    fn same_path_is_loaded_once() {
        let mut pool = TexturePool::<String>::new();
        let calls = Cell::new(0);
        let loader = |path: &Path| {
            calls.set(calls.get() + 1);
            Ok(path.display().to_string())
        };

        let first = pool
            .load_with(Path::new("wood.png"), TextureKind::Diffuse, loader)
            .unwrap();
        let second = pool
            .load_with(Path::new("wood.png"), TextureKind::Diffuse, loader)
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(pool.len(), 1);
        assert_eq!(first.id, second.id);
        assert!(Arc::ptr_eq(&first.resource, &second.resource));
    }

    #[test]
    fn ids_increase_per_new_path() {
        let mut pool = TexturePool::<u8>::new();
        let a = pool
            .load_with(Path::new("a.png"), TextureKind::Diffuse, |_| Ok(1))
            .unwrap();
        let b = pool
            .load_with(Path::new("b.png"), TextureKind::Specular, |_| Ok(2))
            .unwrap();

        assert_eq!(a.id, TextureId(1));
        assert_eq!(b.id, TextureId(2));
        assert_eq!(pool.get(Path::new("b.png")).map(|t| t.kind), Some(TextureKind::Specular));
    }

    #[test]
    fn cached_texture_keeps_its_first_kind() {
        let mut pool = TexturePool::<u8>::new();
        pool.load_with(Path::new("shared.png"), TextureKind::Diffuse, |_| Ok(0))
            .unwrap();
        let again = pool
            .load_with(Path::new("shared.png"), TextureKind::Emission, |_| Ok(9))
            .unwrap();

        assert_eq!(again.kind, TextureKind::Diffuse);
        assert_eq!(*again.resource, 0);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut pool = TexturePool::<u8>::new();
        let result = pool.load_with(Path::new("broken.png"), TextureKind::Diffuse, |path| {
            Err(GlintError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.display().to_string(),
            )))
        });

        assert!(result.is_err());
        assert!(pool.is_empty());
        assert!(pool.get(Path::new("broken.png")).is_none());
    }

    #[test]
    fn handles_outlive_clear() {
        let mut pool = TexturePool::<String>::new();
        let texture = pool
            .load_with(Path::new("keep.png"), TextureKind::Diffuse, |_| {
                Ok("pixels".to_string())
            })
            .unwrap();

        pool.clear();

        assert!(pool.is_empty());
        assert_eq!(texture.resource.as_str(), "pixels");
        assert_eq!(Arc::strong_count(&texture.resource), 1);
    }

    #[test]
    fn kind_names() {
        assert_eq!(TextureKind::Diffuse.as_str(), "diffuse");
        assert_eq!(TextureKind::Specular.as_str(), "specular");
        assert_eq!(TextureKind::Emission.to_string(), "emission");
    }
}

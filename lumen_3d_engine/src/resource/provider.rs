/// Resource providers - the byte source behind every asset load
///
/// Shaders (and their `@include`s) and motion files are fetched by path
/// through a `ResourceProvider`. Paths use `/` separators and are relative
/// to whatever root the provider was built with.

use std::path::PathBuf;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};

/// Path -> bytes capability
pub trait ResourceProvider: Send + Sync {
    /// Read the full content of a resource
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Returns true if `path` can be read
    fn exists(&self, path: &str) -> bool {
        self.read(path).is_ok()
    }
}

// ===== IN-MEMORY PROVIDER =====

/// Provider backed by an in-memory path -> bytes map
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceProvider {
    files: FxHashMap<String, Vec<u8>>,
}

impl MemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    /// Builder-style `insert`
    pub fn with(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    /// Remove a resource, returning its bytes
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceProvider for MemoryResourceProvider {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

// ===== FILESYSTEM PROVIDER =====

/// Provider reading files under a root directory
#[derive(Debug, Clone)]
pub struct FileResourceProvider {
    root: PathBuf,
}

impl FileResourceProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory all paths are resolved against
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.replace('\\', "/"))
    }
}

impl ResourceProvider for FileResourceProvider {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        std::fs::read(self.resolve(path))
            .map_err(|e| Error::ResourceNotFound(format!("{} ({})", path, e)))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;

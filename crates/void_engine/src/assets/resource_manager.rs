//! Resource Manager - CPU-side resource caching and lifecycle
//!
//! Every resource is keyed by the path it was loaded from. A second request
//! for the same path returns the cached `Arc` instead of touching the disk.
//! Ownership: the `Engine` owns the manager; callers hold `Arc<T>` handles
//! that stay valid after `unload_all`.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Resource Manager errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// File contents are malformed
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Offending path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// File parsed but describes an unusable resource
    #[error("Invalid resource {path}: {message}")]
    Invalid {
        /// Offending path
        path: PathBuf,
        /// Validation message
        message: String,
    },

    /// Path is already cached as a different resource type
    #[error("{path} is cached as {cached}, not {requested}")]
    TypeMismatch {
        /// Offending path
        path: PathBuf,
        /// Type of the cached resource
        cached: &'static str,
        /// Type requested by the caller
        requested: &'static str,
    },
}

/// A resource that can be loaded from a file
pub trait Resource: Any + Send + Sync + Sized {
    /// Load the resource from `path`
    fn load(path: &Path) -> Result<Self, ResourceError>;
}

struct CachedResource {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// Path-keyed cache of shared resources
#[derive(Default)]
pub struct ResourceManager {
    resources: HashMap<PathBuf, CachedResource>,
}

impl ResourceManager {
    /// Create an empty resource manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached resource at `path`, loading it on first use
    pub fn load<T: Resource>(&mut self, path: impl AsRef<Path>) -> Result<Arc<T>, ResourceError> {
        let path = path.as_ref();

        if let Some(cached) = self.resources.get(path) {
            return Arc::clone(&cached.value)
                .downcast::<T>()
                .map_err(|_| ResourceError::TypeMismatch {
                    path: path.to_path_buf(),
                    cached: cached.type_name,
                    requested: type_name::<T>(),
                });
        }

        let resource = Arc::new(T::load(path)?);
        log::debug!("Loaded {} from {}", type_name::<T>(), path.display());
        self.resources.insert(
            path.to_path_buf(),
            CachedResource {
                type_name: type_name::<T>(),
                value: Arc::clone(&resource) as Arc<dyn Any + Send + Sync>,
            },
        );
        Ok(resource)
    }

    /// Whether a resource is cached for `path`
    pub fn is_loaded(&self, path: impl AsRef<Path>) -> bool {
        self.resources.contains_key(path.as_ref())
    }

    /// Drop the cached entry for `path`; returns whether one existed
    pub fn unload(&mut self, path: impl AsRef<Path>) -> bool {
        self.resources.remove(path.as_ref()).is_some()
    }

    /// Drop every cached entry
    pub fn unload_all(&mut self) {
        if !self.resources.is_empty() {
            log::info!("Unloading {} resource(s)", self.resources.len());
        }
        self.resources.clear();
    }

    /// Number of cached resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

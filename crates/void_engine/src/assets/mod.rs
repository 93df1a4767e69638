//! Asset management
//!
//! Resources are loaded from disk once and shared through `Arc` handles.
//! Loading failures are reported as [`ResourceError`] values.

pub mod resource_manager;

pub use resource_manager::{Resource, ResourceError, ResourceManager};

use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and deserialize a RON document, the format used for game data files
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ResourceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|e| ResourceError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

//! Remembered user id.
//!
//! Quick join offers the user id of the last successful login. The id lives
//! in a one-line file when a path is configured and only in memory
//! otherwise.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// User cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the cache file failed.
    #[error("user cache {path}: {source}")]
    Io {
        /// Cache file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// User id cache, optionally backed by a file.
#[derive(Debug, Default)]
pub struct UserCache {
    path: Option<PathBuf>,
    user_id: Option<String>,
}

impl UserCache {
    /// Cache that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the cache from `path`. A missing file means nothing is cached.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let user_id = match fs::read_to_string(&path) {
            Ok(text) => Some(text.trim().to_string()).filter(|id| !id.is_empty()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), cached = user_id.is_some(), "user cache loaded");
        Ok(Self { path: Some(path), user_id })
    }

    /// Cached user id.
    pub fn get(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Remember `user_id`, or forget with `None`.
    ///
    /// The in-memory value changes even when the file write fails.
    pub fn store(&mut self, user_id: Option<&str>) -> Result<(), CacheError> {
        self.user_id = user_id.map(ToString::to_string);

        let Some(path) = &self.path else {
            return Ok(());
        };

        let result = match user_id {
            Some(id) => fs::write(path, id),
            None => match fs::remove_file(path) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        result.map_err(|source| CacheError::Io { path: path.clone(), source })
    }
}

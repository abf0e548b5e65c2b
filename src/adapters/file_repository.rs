// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed durable cache.
//!
//! This module provides a [`ConfigRepository`] that keeps one pretty-printed JSON
//! document per component in a directory. Entries are replaced by writing a
//! temporary file next to the target and renaming it into place, so concurrent
//! readers see either the previous entry or the new one.

use crate::domain::{ConfigError, ConfigRoot, Result};
use crate::ports::ConfigRepository;
use directories::ProjectDirs;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Bytes kept verbatim in entry file names.
const FILE_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

const ENTRY_EXTENSION: &str = "json";

/// Durable cache storing one JSON file per component.
///
/// # Examples
///
/// ```rust
/// use remcfg::adapters::FileConfigRepository;
/// use remcfg::domain::{ConfigNode, ConfigRoot};
/// use remcfg::ports::ConfigRepository;
///
/// # fn main() -> remcfg::domain::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let repository = FileConfigRepository::new(dir.path());
///
/// let root = ConfigRoot::new("foo", None, ConfigNode::branch("foo", vec![
///     ConfigNode::leaf("N1", "V1"),
/// ]));
/// repository.save("foo", &root)?;
/// assert_eq!(repository.load("foo")?, Some(root));
/// assert_eq!(repository.load("bar")?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct FileConfigRepository {
    directory: PathBuf,
}

impl FileConfigRepository {
    /// Creates a repository rooted at `directory`; it is created on first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Creates a repository in the OS cache directory for `application_name`.
    ///
    /// See [`default_directory`](Self::default_directory).
    pub fn from_default_location(application_name: &str) -> Self {
        Self::new(Self::default_directory(application_name))
    }

    /// The OS cache directory for `application_name`, e.g.
    /// `~/.cache/<application_name>` on Linux. Falls back to
    /// `<temp dir>/<application_name>` when no home directory is known.
    pub fn default_directory(application_name: &str) -> PathBuf {
        match ProjectDirs::from("", "", application_name) {
            Some(dirs) => dirs.cache_dir().to_path_buf(),
            None => {
                tracing::debug!(
                    "No home directory; caching configuration under the temp directory"
                );
                std::env::temp_dir().join(application_name)
            }
        }
    }

    /// Directory holding the entries.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File that holds the entry for `component`.
    pub fn entry_path(&self, component: &str) -> PathBuf {
        let name = utf8_percent_encode(component, FILE_NAME).to_string();
        self.directory.join(format!("{name}.{ENTRY_EXTENSION}"))
    }

    fn write_atomically(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.directory)?;
        let mut file = tempfile::Builder::new()
            .prefix(".remcfg-")
            .suffix(".tmp")
            .tempfile_in(&self.directory)?;
        file.write_all(contents)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ConfigRepository for FileConfigRepository {
    fn load(&self, component: &str) -> Result<Option<ConfigRoot>> {
        let path = self.entry_path(component);
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No cache entry for '{}' at {}", component, path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(ConfigError::CacheError {
                    message: format!("Failed to read cache entry {}", path.display()),
                    source: Some(Box::new(e)),
                })
            }
        };

        let config = serde_json::from_slice(&contents).map_err(|e| ConfigError::ParseError {
            message: format!("Corrupt cache entry {}", path.display()),
            source: Some(Box::new(e)),
        })?;
        tracing::debug!("Loaded cache entry for '{}' from {}", component, path.display());
        Ok(Some(config))
    }

    fn save(&self, component: &str, config: &ConfigRoot) -> Result<()> {
        let path = self.entry_path(component);
        let contents = serde_json::to_vec_pretty(config).map_err(|e| ConfigError::CacheError {
            message: format!("Failed to serialize cache entry for '{}'", component),
            source: Some(Box::new(e)),
        })?;

        self.write_atomically(&path, &contents)
            .map_err(|e| ConfigError::CacheError {
                message: format!("Failed to write cache entry {}", path.display()),
                source: Some(Box::new(e)),
            })?;
        tracing::debug!("Saved cache entry for '{}' to {}", component, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigNode;
    use tempfile::TempDir;

    fn root(component: &str, value: &str) -> ConfigRoot {
        ConfigRoot::new(
            component,
            None,
            ConfigNode::branch(component, vec![ConfigNode::leaf("N1", value)]),
        )
    }

    #[test]
    fn test_missing_entry_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let repository = FileConfigRepository::new(dir.path().join("not-yet-created"));
        assert_eq!(repository.load("foo").unwrap(), None);
    }

    #[test]
    fn test_save_creates_directory_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let repository = FileConfigRepository::new(dir.path().join("nested").join("cache"));
        let saved = root("foo", "V1");
        repository.save("foo", &saved).unwrap();

        let loaded = repository.load("foo").unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.flatten(), saved.flatten());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let repository = FileConfigRepository::new(dir.path());
        repository.save("foo", &root("foo", "old")).unwrap();
        repository.save("foo", &root("foo", "new")).unwrap();

        let loaded = repository.load("foo").unwrap().unwrap();
        assert_eq!(loaded.flatten().get("foo.N1").unwrap().as_str(), "new");
    }

    #[test]
    fn test_components_are_independent() {
        let dir = TempDir::new().unwrap();
        let repository = FileConfigRepository::new(dir.path());
        repository.save("foo", &root("foo", "a")).unwrap();
        repository.save("bar", &root("bar", "b")).unwrap();

        assert_eq!(repository.load("foo").unwrap(), Some(root("foo", "a")));
        assert_eq!(repository.load("bar").unwrap(), Some(root("bar", "b")));
    }

    #[test]
    fn test_corrupt_entry_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let repository = FileConfigRepository::new(dir.path());
        fs::write(repository.entry_path("foo"), "{ not json").unwrap();

        let err = repository.load("foo").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_entry_file_name_is_encoded() {
        let repository = FileConfigRepository::new("/cache");
        assert_eq!(
            repository.entry_path("sample.app"),
            Path::new("/cache").join("sample.app.json")
        );
        assert_eq!(
            repository.entry_path("a/b c"),
            Path::new("/cache").join("a%2Fb%20c.json")
        );
    }

    #[test]
    fn test_save_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let repository = FileConfigRepository::new(dir.path());
        repository.save("foo", &root("foo", "V1")).unwrap();
        repository.save("foo", &root("foo", "V2")).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["foo.json"]);
    }

    #[test]
    fn test_default_directory_ends_with_application_name() {
        let path = FileConfigRepository::default_directory("remcfg-test");
        assert!(path
            .components()
            .any(|c| c.as_os_str().to_string_lossy().contains("remcfg-test")));
    }
}

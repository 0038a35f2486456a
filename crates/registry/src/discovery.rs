//! Filesystem scan for driver sources.

use crate::error::{RegistryError, RegistryErrorExt};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Drivers found under the driver root, keyed by base name.
///
/// Paths are relative to the driver root and always use `/` separators so the
/// generated build fragment is identical on every host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredDrivers {
    drivers: BTreeMap<String, String>,
}

impl DiscoveredDrivers {
    /// Recursively scans `root` for files ending in `.<extension>`.
    ///
    /// The walk is sorted by file name, so the result does not depend on directory
    /// iteration order. Symbolic links to files count as sources; symbolic links to
    /// directories are not descended into.
    ///
    /// # Errors
    /// * [`RegistryError::Io`] if `root` is not a directory.
    /// * [`RegistryError::Walk`] if part of the tree cannot be read.
    /// * [`RegistryError::DuplicateDriverName`] if two files share a base name.
    pub fn scan(root: impl AsRef<Path>, extension: &str) -> Result<Self, RegistryError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(RegistryError::Io {
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "driver root is not a directory",
                ),
                context: Some(root.display().to_string().into()),
            });
        }

        let mut discovered = Self::default();
        let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();

        for entry in walker {
            let entry = entry.context(format!("Scanning {}", root.display()))?;
            if !is_source_file(&entry) || entry.path().extension() != Some(OsStr::new(extension)) {
                continue;
            }

            let relative = entry.path().strip_prefix(root).map_err(|e| RegistryError::Internal {
                message: e.to_string().into(),
                context: Some(format!("Walked outside {}", root.display()).into()),
            })?;
            trace!(path = %relative.display(), "Found driver source");
            discovered.insert(relative)?;
        }

        debug!(root = %root.display(), drivers = discovered.len(), "Driver scan complete");
        Ok(discovered)
    }

    /// Builds the set from paths already relative to the driver root.
    ///
    /// # Errors
    /// Same duplicate and naming rules as [`DiscoveredDrivers::scan`].
    pub fn from_relative_paths<I, P>(paths: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut discovered = Self::default();
        for path in paths {
            discovered.insert(path.as_ref())?;
        }
        Ok(discovered)
    }

    fn insert(&mut self, relative: &Path) -> Result<(), RegistryError> {
        let name = relative
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| format!("Driver file name is not valid UTF-8: {}", relative.display()))?
            .to_owned();
        let rendered = render_relative(relative)?;

        if let Some(first) = self.drivers.get(&name) {
            return Err(RegistryError::DuplicateDriverName {
                first: PathBuf::from(first),
                second: PathBuf::from(rendered),
                name,
                context: None,
            });
        }

        self.drivers.insert(name, rendered);
        Ok(())
    }

    /// Relative source path for a driver name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.drivers.get(name).map(String::as_str)
    }

    /// `(name, relative path)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.drivers.iter().map(|(name, path)| (name.as_str(), path.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

fn is_source_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn render_relative(path: &Path) -> Result<String, RegistryError> {
    let mut parts = Vec::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            let part = part
                .to_str()
                .ok_or_else(|| format!("Driver path is not valid UTF-8: {}", path.display()))?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

//! The declarative registry: which drivers exist and whether each one is enabled.

use crate::error::{RegistryError, RegistryErrorExt};
use crate::layout::is_identifier;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    drivers: IndexMap<String, bool>,
}

/// Driver name to enabled flag, in declaration order.
///
/// Order is significant: it drives the order of both generated artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: IndexMap<String, bool>,
}

impl Registry {
    /// Reads and parses the registry document at `path`.
    ///
    /// # Errors
    /// * [`RegistryError::ConfigNotFound`] if the file does not exist.
    /// * [`RegistryError::Io`] if it exists but cannot be read.
    /// * [`RegistryError::ConfigParse`] / [`RegistryError::InvalidDriverName`] as in
    ///   [`Registry::from_toml`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RegistryError::ConfigNotFound { path: path.to_path_buf(), context: None });
            },
            Err(err) => {
                return Err(RegistryError::Io {
                    source: err,
                    context: Some(format!("Failed to read registry {}", path.display()).into()),
                });
            },
        };

        let registry = Self::from_toml(&raw).context(path.display().to_string())?;
        debug!(path = %path.display(), entries = registry.len(), "Registry loaded");
        Ok(registry)
    }

    /// Parses a registry document: a `[drivers]` table of `name = bool` pairs.
    ///
    /// # Errors
    /// * [`RegistryError::ConfigParse`] if the TOML is malformed, `[drivers]` is
    ///   missing, or a value is not a boolean.
    /// * [`RegistryError::InvalidDriverName`] if a name cannot become a macro.
    pub fn from_toml(raw: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument = toml::from_str(raw)?;
        Self::from_entries(document.drivers)
    }

    /// Builds a registry from `(name, enabled)` pairs, keeping their order.
    ///
    /// A repeated name keeps its first position and takes the last flag.
    ///
    /// # Errors
    /// * [`RegistryError::InvalidDriverName`] for the first invalid name.
    /// * [`RegistryError::ConflictingDriverNames`] if two names differ only in case.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let mut map = IndexMap::new();
        let mut macros: HashMap<String, String> = HashMap::new();
        for (name, enabled) in entries {
            let name = name.into();
            if !is_identifier(&name) {
                return Err(RegistryError::InvalidDriverName { name, context: None });
            }
            let first = macros.entry(name.to_ascii_uppercase()).or_insert_with(|| name.clone());
            if *first != name {
                return Err(RegistryError::ConflictingDriverNames {
                    first: first.clone(),
                    second: name,
                    context: None,
                });
            }
            map.insert(name, enabled);
        }
        Ok(Self { entries: map })
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    /// Names of the enabled entries, in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.iter().filter_map(|(name, enabled)| enabled.then_some(name))
    }

    /// `None` if the name is not declared.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.entries.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

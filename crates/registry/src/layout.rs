//! Project layout and output conventions.
//!
//! The defaults reproduce the classic kernel tree: `drivers/registry.toml`, `*.c`
//! sources under `drivers/`, and `drivers_enabled.{mk,h}` written next to them. A
//! project can override any of them with an optional `drvreg.toml` at its root.

use crate::error::{RegistryError, RegistryErrorExt};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the optional layout document at the project root.
pub const LAYOUT_FILE: &str = "drvreg.toml";

/// Where things live and how the generated artifacts are spelled.
///
/// Relative `driver_dir` is resolved against the project root; `registry`,
/// `build_fragment` and `header` are resolved against the driver root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub driver_dir: PathBuf,
    pub registry: PathBuf,
    /// Source file extension, without the dot.
    pub extension: String,
    pub build_fragment: PathBuf,
    pub header: PathBuf,
    pub build_variable: String,
    pub macro_prefix: String,
    pub include_guard: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            driver_dir: PathBuf::from("drivers"),
            registry: PathBuf::from("registry.toml"),
            extension: "c".to_owned(),
            build_fragment: PathBuf::from("drivers_enabled.mk"),
            header: PathBuf::from("drivers_enabled.h"),
            build_variable: "DRIVERS".to_owned(),
            macro_prefix: "DRIVER_".to_owned(),
            include_guard: "DRIVERS_ENABLED_H".to_owned(),
        }
    }
}

impl Layout {
    /// Loads a layout document, falling back to defaults for every missing key.
    ///
    /// With `required = false` a missing file yields [`Layout::default`].
    ///
    /// # Errors
    /// Returns [`RegistryError::Layout`] if the file is required but missing, is not
    /// valid TOML, has mistyped keys, or names invalid identifiers.
    pub fn load(path: impl AsRef<Path>, required: bool) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        debug!(path = %path.display(), required, "Loading layout");

        let layout = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .build()
            .context(format!("Failed to read layout {}", path.display()))?
            .try_deserialize::<Self>()
            .context(format!("Failed to deserialize layout {}", path.display()))?;

        layout.validated().context(format!("Invalid layout {}", path.display()))
    }

    /// Normalizes the extension and checks that every emitted identifier is valid C.
    ///
    /// # Errors
    /// Returns [`RegistryError::Layout`] naming the first offending setting.
    pub fn validated(mut self) -> Result<Self, RegistryError> {
        self.extension = self.extension.trim_start_matches('.').to_owned();
        if self.extension.is_empty() {
            return Err(invalid("extension", "must not be empty"));
        }

        for (key, value) in [
            ("build_variable", &self.build_variable),
            ("include_guard", &self.include_guard),
        ] {
            if !is_identifier(value) {
                return Err(invalid(key, "must be a valid identifier"));
            }
        }

        // An empty prefix is allowed; names are validated on their own.
        if !self.macro_prefix.is_empty() && !is_identifier(&self.macro_prefix) {
            return Err(invalid("macro_prefix", "must be empty or a valid identifier"));
        }

        Ok(self)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn invalid(key: &str, reason: &str) -> RegistryError {
    RegistryError::Layout {
        source: config::ConfigError::Message(format!("`{key}` {reason}")),
        context: None,
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project tree with a `drivers/` directory.
pub struct Project {
    _tmp: TempDir,
    root: PathBuf,
}

impl Project {
    /// Creates the project and writes an empty file for every relative source path.
    ///
    /// # Panics
    /// * If the temporary tree cannot be created.
    #[must_use]
    pub fn with_sources(sources: &[&str]) -> Self {
        let tmp = TempDir::new().expect("temp dir");
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("drivers")).expect("drivers dir");
        let project = Self { _tmp: tmp, root };
        for source in sources {
            project.write(&format!("drivers/{source}"), "");
        }
        project
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn drivers(&self) -> PathBuf {
        self.root.join("drivers")
    }

    /// # Panics
    /// * If the file cannot be written.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir");
        }
        fs::write(path, contents).expect("write fixture");
    }

    /// # Panics
    /// * If the registry cannot be written.
    pub fn registry(&self, body: &str) {
        self.write("drivers/registry.toml", &format!("[drivers]\n{body}"));
    }

    pub fn fragment(&self) -> Option<String> {
        fs::read_to_string(self.drivers().join("drivers_enabled.mk")).ok()
    }

    pub fn header(&self) -> Option<String> {
        fs::read_to_string(self.drivers().join("drivers_enabled.h")).ok()
    }
}

//! The end-to-end pipeline: load, discover, resolve, render, then commit.

use crate::discovery::DiscoveredDrivers;
use crate::emit::{render_build_fragment, render_header};
use crate::error::RegistryError;
use crate::layout::Layout;
use crate::output::{purge_stale, write_all_atomic};
use crate::registry::Registry;
use crate::resolve::{ResolvedConfig, resolve};
use private::Sealed;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Fluent builder for [`Generator`].
///
/// The project root is mandatory; everything else falls back to the [`Layout`].
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct GeneratorBuilder<S: Sealed = NoRoot> {
    state: S,
    layout: Layout,
    driver_root: Option<PathBuf>,
    registry: Option<PathBuf>,
}

#[allow(private_bounds)]
impl<S: Sealed> GeneratorBuilder<S> {
    #[must_use = "Sets the layout used to derive paths and output spelling"]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use = "Overrides the directory scanned for driver sources"]
    pub fn driver_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.driver_root = Some(path.into());
        self
    }

    #[must_use = "Overrides the registry document path"]
    pub fn registry(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry = Some(path.into());
        self
    }
}

impl GeneratorBuilder<NoRoot> {
    #[must_use = "Creates a new generator builder with the default layout"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the project root every relative layout path is resolved against"]
    pub fn project_root(self, path: impl Into<PathBuf>) -> GeneratorBuilder<WithRoot> {
        GeneratorBuilder {
            state: WithRoot(path.into()),
            layout: self.layout,
            driver_root: self.driver_root,
            registry: self.registry,
        }
    }
}

impl GeneratorBuilder<WithRoot> {
    /// Validates the layout and fixes every path the run will touch.
    ///
    /// Explicit overrides win; otherwise the driver root is
    /// `<project root>/<layout.driver_dir>` and the registry is
    /// `<driver root>/<layout.registry>`.
    ///
    /// # Errors
    /// Returns [`RegistryError::Layout`] if the layout names invalid identifiers.
    pub fn build(self) -> Result<Generator, RegistryError> {
        let layout = self.layout.validated()?;
        let root = self.state.0;

        let driver_root = self.driver_root.unwrap_or_else(|| root.join(&layout.driver_dir));
        let registry = self.registry.unwrap_or_else(|| driver_root.join(&layout.registry));
        let build_fragment = driver_root.join(&layout.build_fragment);
        let header = driver_root.join(&layout.header);

        Ok(Generator { layout, driver_root, registry, build_fragment, header })
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub build_fragment: PathBuf,
    pub header: PathBuf,
    pub enabled: usize,
    pub total: usize,
}

/// Resolves a registry against a driver tree and writes both artifacts.
///
/// # Example
///
/// ```rust
/// use drvreg_registry::Generator;
/// use std::fs;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let tmp = tempfile::tempdir()?;
/// # let root = tmp.path();
/// fs::create_dir_all(root.join("drivers/vt"))?;
/// fs::write(root.join("drivers/fb.c"), "")?;
/// fs::write(root.join("drivers/vt/vt.c"), "")?;
/// fs::write(root.join("drivers/registry.toml"), "[drivers]\nfb = true\nvt = false\n")?;
///
/// let report = Generator::builder().project_root(root).build()?.run()?;
///
/// assert_eq!(report.enabled, 1);
/// assert!(fs::read_to_string(&report.build_fragment)?.ends_with("DRIVERS := fb.c\n"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    layout: Layout,
    driver_root: PathBuf,
    registry: PathBuf,
    build_fragment: PathBuf,
    header: PathBuf,
}

impl Generator {
    #[must_use = "The generator is not configured until you call .build()"]
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn driver_root(&self) -> &Path {
        &self.driver_root
    }

    #[must_use]
    pub fn registry_path(&self) -> &Path {
        &self.registry
    }

    #[must_use]
    pub fn build_fragment_path(&self) -> &Path {
        &self.build_fragment
    }

    #[must_use]
    pub fn header_path(&self) -> &Path {
        &self.header
    }

    /// Loads the registry, scans the driver root and resolves them. Writes nothing.
    ///
    /// The registry is read before the scan, so a missing registry aborts before any
    /// directory is walked.
    ///
    /// # Errors
    /// Any load, scan or resolution error; see [`RegistryError`].
    pub fn resolve(&self) -> Result<ResolvedConfig, RegistryError> {
        let registry = Registry::load(&self.registry)?;
        let discovered = DiscoveredDrivers::scan(&self.driver_root, &self.layout.extension)?;
        resolve(&registry, &discovered)
    }

    /// Runs the whole pipeline and atomically replaces both outputs.
    ///
    /// Nothing is written unless resolution and rendering succeed for both files.
    ///
    /// # Errors
    /// Any error from [`Generator::resolve`], rendering, or the atomic write.
    pub fn run(&self) -> Result<GenerationReport, RegistryError> {
        let resolved = self.resolve()?;

        let fragment = render_build_fragment(&resolved, &self.layout)?;
        let header = render_header(&resolved, &self.layout)?;

        purge_stale(&self.build_fragment);
        purge_stale(&self.header);
        write_all_atomic([
            (self.build_fragment.as_path(), fragment.as_str()),
            (self.header.as_path(), header.as_str()),
        ])?;

        let report = GenerationReport {
            build_fragment: self.build_fragment.clone(),
            header: self.header.clone(),
            enabled: resolved.enabled_count(),
            total: resolved.len(),
        };
        info!(
            enabled = report.enabled,
            total = report.total,
            fragment = %report.build_fragment.display(),
            header = %report.header.display(),
            "Generated driver configuration"
        );

        Ok(report)
    }
}

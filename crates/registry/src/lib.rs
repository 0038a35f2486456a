//! # Driver Registry
//!
//! Turns a declarative driver registry into the two artifacts a kernel build
//! consumes: a Makefile fragment listing the driver sources to compile, and a C
//! header with one `0`/`1` macro per known driver.
//!
//! # Pipeline
//!
//! 1.  **Load** ([`Registry`]): `[drivers]` table of `name = bool`, order preserved.
//! 2.  **Discover** ([`DiscoveredDrivers`]): sorted recursive scan of the driver root;
//!     a base name seen twice is an error.
//! 3.  **Resolve** ([`resolve()`]): every enabled entry must have a source file.
//! 4.  **Emit** ([`render_build_fragment`], [`render_header`]): pure text rendering.
//! 5.  **Commit** ([`write_all_atomic`]): temp file + `fsync` + `rename` for each output,
//!     after both are staged.
//!
//! Any failure aborts the run before the outputs are touched.
//!
//! ```rust
//! use drvreg_registry::{DiscoveredDrivers, Layout, Registry, render_header, resolve};
//!
//! let registry = Registry::from_toml("[drivers]\nfb = true\nnvme = false\n")?;
//! let discovered = DiscoveredDrivers::from_relative_paths(["fb.c", "nvme.c"])?;
//! let resolved = resolve(&registry, &discovered)?;
//!
//! let header = render_header(&resolved, &Layout::default())?;
//! assert!(header.contains("#define DRIVER_FB 1\n#define DRIVER_NVME 0\n"));
//! # Ok::<(), drvreg_registry::RegistryError>(())
//! ```

mod discovery;
mod emit;
mod error;
mod generator;
mod layout;
mod output;
mod registry;
mod resolve;

pub use discovery::DiscoveredDrivers;
pub use emit::{macro_name, render_build_fragment, render_header};
pub use error::{RegistryError, RegistryErrorExt};
pub use generator::{GenerationReport, Generator, GeneratorBuilder};
pub use layout::{LAYOUT_FILE, Layout};
pub use output::{StagedFile, write_all_atomic};
pub use registry::Registry;
pub use resolve::{ResolvedConfig, ResolvedDriver, resolve};

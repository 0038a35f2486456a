//! Text rendering of the build fragment and the enable header.
//!
//! Both renderers are pure: same resolution and layout in, same bytes out.

use crate::error::RegistryError;
use crate::layout::Layout;
use crate::resolve::ResolvedConfig;
use std::fmt::{self, Write};

const DISCLAIMER: &str = "Auto-generated. Do not edit.";

/// Renders the Makefile fragment assigning the enabled sources to the build variable.
///
/// ```text
/// # Auto-generated. Do not edit.
/// DRIVERS := fb.c vt/vt.c
/// ```
///
/// # Errors
/// Returns [`RegistryError::Internal`] if formatting fails.
pub fn render_build_fragment(
    resolved: &ResolvedConfig,
    layout: &Layout,
) -> Result<String, RegistryError> {
    let mut out = String::new();
    write_build_fragment(&mut out, resolved, layout)
        .map_err(|_| RegistryError::from("Failed to render build fragment"))?;
    Ok(out)
}

/// Renders the C header with one `0`/`1` macro per registry entry.
///
/// ```text
/// // Auto-generated. Do not edit.
/// #ifndef DRIVERS_ENABLED_H
/// #define DRIVERS_ENABLED_H
///
/// #define DRIVER_FB 1
/// #define DRIVER_NVME 0
///
/// #endif
/// ```
///
/// # Errors
/// Returns [`RegistryError::Internal`] if formatting fails.
pub fn render_header(resolved: &ResolvedConfig, layout: &Layout) -> Result<String, RegistryError> {
    let mut out = String::new();
    write_header(&mut out, resolved, layout)
        .map_err(|_| RegistryError::from("Failed to render enable header"))?;
    Ok(out)
}

/// `prefix` followed by the ASCII upper-cased driver name.
#[must_use]
pub fn macro_name(prefix: &str, driver: &str) -> String {
    format!("{prefix}{}", driver.to_ascii_uppercase())
}

fn write_build_fragment(
    w: &mut impl Write,
    resolved: &ResolvedConfig,
    layout: &Layout,
) -> fmt::Result {
    let sources = resolved.enabled_sources().collect::<Vec<_>>().join(" ");
    writeln!(w, "# {DISCLAIMER}")?;
    writeln!(w, "{} := {sources}", layout.build_variable)
}

fn write_header(w: &mut impl Write, resolved: &ResolvedConfig, layout: &Layout) -> fmt::Result {
    let guard = &layout.include_guard;

    writeln!(w, "// {DISCLAIMER}")?;
    writeln!(w, "#ifndef {guard}")?;
    writeln!(w, "#define {guard}")?;
    writeln!(w)?;
    for driver in resolved.drivers() {
        let value = u8::from(driver.is_enabled());
        writeln!(w, "#define {} {value}", macro_name(&layout.macro_prefix, &driver.name))?;
    }
    writeln!(w)?;
    writeln!(w, "#endif")
}

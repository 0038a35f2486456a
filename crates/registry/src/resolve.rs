//! Cross-checks declared intent (registry) against discovered reality (filesystem).

use crate::discovery::DiscoveredDrivers;
use crate::error::RegistryError;
use crate::registry::Registry;
use tracing::debug;

/// One registry entry after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDriver {
    pub name: String,
    /// Relative source path; `Some` exactly when the driver is enabled.
    pub source: Option<String>,
}

impl ResolvedDriver {
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.source.is_some()
    }
}

/// Every registry entry in declaration order, with enabled entries bound to sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    drivers: Vec<ResolvedDriver>,
}

impl ResolvedConfig {
    #[must_use]
    pub fn drivers(&self) -> &[ResolvedDriver] {
        &self.drivers
    }

    /// Relative source paths of enabled drivers, in registry order.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().filter_map(|driver| driver.source.as_deref())
    }

    /// Names of enabled drivers, in registry order.
    pub fn enabled_names(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().filter(|d| d.is_enabled()).map(|d| d.name.as_str())
    }

    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.drivers.iter().filter(|d| d.is_enabled()).count()
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

/// Binds every enabled registry entry to its discovered source.
///
/// Disabled entries are kept without a source. Discovered drivers that the registry
/// does not mention are ignored.
///
/// # Errors
/// Returns [`RegistryError::DriverNotFound`] for the first enabled entry (in registry
/// order) that has no discovered source. Nothing is resolved partially.
pub fn resolve(
    registry: &Registry,
    discovered: &DiscoveredDrivers,
) -> Result<ResolvedConfig, RegistryError> {
    let mut drivers = Vec::with_capacity(registry.len());

    for (name, enabled) in registry.iter() {
        let source = if enabled {
            let path = discovered.get(name).ok_or_else(|| RegistryError::DriverNotFound {
                name: name.to_owned(),
                context: None,
            })?;
            debug!(driver = name, source = path, "Driver enabled");
            Some(path.to_owned())
        } else {
            debug!(driver = name, "Driver disabled");
            None
        };
        drivers.push(ResolvedDriver { name: name.to_owned(), source });
    }

    Ok(ResolvedConfig { drivers })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovered() -> DiscoveredDrivers {
        DiscoveredDrivers::from_relative_paths(["path/a.c", "path/b.c", "path/c.c"]).unwrap()
    }

    #[test]
    fn test_enabled_entries_bind_to_sources() {
        let registry = Registry::from_entries([("a", true), ("b", false), ("c", true)]).unwrap();
        let resolved = resolve(&registry, &discovered()).unwrap();

        assert_eq!(resolved.enabled_sources().collect::<Vec<_>>(), ["path/a.c", "path/c.c"]);
        assert_eq!(resolved.enabled_names().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(resolved.enabled_count(), 2);
        assert_eq!(resolved.len(), 3);
        assert!(!resolved.drivers()[1].is_enabled());
    }

    #[test]
    fn test_missing_enabled_driver_fails() {
        let registry = Registry::from_entries([("a", true), ("uart", true)]).unwrap();
        let err = resolve(&registry, &discovered()).unwrap_err();

        assert!(matches!(err, RegistryError::DriverNotFound { ref name, .. } if name == "uart"));
        assert_eq!(err.to_string(), "Driver 'uart' not found in drivers directory");
    }

    #[test]
    fn test_missing_disabled_driver_is_fine() {
        let registry = Registry::from_entries([("uart", false)]).unwrap();
        let resolved = resolve(&registry, &discovered()).unwrap();

        assert_eq!(resolved.enabled_count(), 0);
        assert_eq!(resolved.drivers()[0].name, "uart");
    }

    #[test]
    fn test_first_missing_driver_in_registry_order_is_reported() {
        let registry = Registry::from_entries([("zeta", true), ("alpha", true)]).unwrap();
        let err = resolve(&registry, &DiscoveredDrivers::default()).unwrap_err();

        assert!(matches!(err, RegistryError::DriverNotFound { ref name, .. } if name == "zeta"));
    }
}

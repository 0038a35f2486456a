use std::borrow::Cow;
use std::path::PathBuf;

/// A specialized [`RegistryError`] enum of this crate.
///
/// Every variant is fatal: the generator stops at the first one and writes nothing.
#[drvreg_derive::drvreg_error]
pub enum RegistryError {
    /// The registry document does not exist at the expected path.
    #[error("Registry not found{}: {}", format_context(.context), .path.display())]
    ConfigNotFound { path: PathBuf, context: Option<Cow<'static, str>> },

    /// The registry document is not valid TOML or does not match the `[drivers]` shape.
    #[error("Malformed registry{}: {}", format_context(.context), .source.message())]
    ConfigParse { source: toml::de::Error, context: Option<Cow<'static, str>> },

    /// A declared name cannot be turned into a preprocessor macro.
    #[error("Invalid driver name{}: '{name}' (expected [A-Za-z_][A-Za-z0-9_]*)", format_context(.context))]
    InvalidDriverName { name: String, context: Option<Cow<'static, str>> },

    /// Two declared names differ only in case and would define the same macro.
    #[error("Driver names '{first}' and '{second}' collide after upper-casing{}", format_context(.context))]
    ConflictingDriverNames { first: String, second: String, context: Option<Cow<'static, str>> },

    /// An enabled registry entry has no source file under the driver root.
    #[error("Driver '{name}' not found in drivers directory{}", format_context(.context))]
    DriverNotFound { name: String, context: Option<Cow<'static, str>> },

    /// Two source files in the driver tree share the same base name.
    #[error(
        "Duplicate driver name '{name}'{}: {} and {}",
        format_context(.context),
        .first.display(),
        .second.display()
    )]
    DuplicateDriverName {
        name: String,
        first: PathBuf,
        second: PathBuf,
        context: Option<Cow<'static, str>>,
    },

    /// The optional layout file could not be read or deserialized.
    #[error("Layout error{}: {source}", format_context(.context))]
    Layout { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The driver tree could not be walked.
    #[error("Driver scan failed{}: {source}", format_context(.context))]
    Walk { source: walkdir::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Derive
//!
//! Attribute macros shared across the drvreg workspace.
//!
//! The only macro today is [`macro@drvreg_error`], which turns a plain enum into the
//! error type every library crate exposes.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns an enum into a `thiserror`-backed error type with context support.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless either derive is already present.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>`, and for
///   `Result<T, Source>` of every variant that wraps a `source` field.
/// * `From<Source>` for every such variant, so `?` works on upstream errors.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant is declared.
/// * A private `format_context` helper for use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// * Every variant uses named fields; tuple and unit variants are rejected.
/// * A `context` field, when present, is `Option<Cow<'static, str>>`.
/// * Variants with a `source` field also carry `context` and no other fields.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[drvreg_derive::drvreg_error]
/// pub enum ScanError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &std::path::Path) -> Result<String, ScanError> {
///     std::fs::read_to_string(path).context(format!("Reading {}", path.display()))
/// }
/// ```
#[proc_macro_attribute]
pub fn drvreg_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

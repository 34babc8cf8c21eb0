#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the storefront admin workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! sfa-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns an enum into a context-aware error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>`, and for
///   `Result<T, Source>` of every variant that wraps a `source` field.
/// * `From<Source>` for every variant with a `source` field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant exists.
/// * A private `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Only enums with named-field variants are accepted.
/// 2. A `context` field must be `Option<Cow<'static, str>>`.
/// 3. Variants with a `source` field must also carry `context`.
///
/// # Example
///
/// ```rust,ignore
/// use sfa_derive::sfa_error;
/// use std::borrow::Cow;
///
/// #[sfa_error]
/// pub enum LoadError {
///     #[error("I/O error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &std::path::Path) -> Result<Vec<u8>, LoadError> {
///     std::fs::read(path).context(format!("reading {}", path.display()))
/// }
/// ```
#[proc_macro_attribute]
pub fn sfa_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).unwrap_or_else(syn::Error::into_compile_error).into()
}

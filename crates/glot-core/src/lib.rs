#![forbid(unsafe_code)]

//! Shared vocabulary for the glot localization engine.
//!
//! # Role in glot
//! `glot-core` is the dependency floor of the workspace. It defines the
//! types every other crate speaks: languages and their lookup service,
//! the call-scoped argument value model, argument format metadata, render
//! targets, the color markup grammar and its dialect transcoders, the
//! persistence interface, and configuration.
//!
//! # This crate provides
//! - [`Language`] and [`LanguageService`] for language identity, alias
//!   lookup, and fallback chains.
//! - [`ArgValue`] — a capability record over a borrowed runtime value
//!   (display, self-localizing, enum-variant capabilities via safe
//!   downcast).
//! - [`ArgumentFormat`] and [`ValueFormatParams`] — per-argument
//!   directives and the ephemeral parameter bundle handed to converters.
//! - [`MarkupDialect`] plus the bundled plain/rich-text/terminal
//!   transcoders.
//! - [`TranslationStore`] — the persistence seam, with an in-memory
//!   implementation for tests and embedding.
//!
//! # How it fits in the system
//! `glot-plural` consumes [`ArgValue`] for its one/not-one rule,
//! `glot-convert` dispatches on the value's runtime type and capability
//! set, and `glot` wires everything together behind its `Localization`
//! service. Nothing here performs I/O on the formatting path.

pub mod argument;
pub mod color;
pub mod config;
pub mod dialect;
pub mod error;
pub mod format;
pub mod language;
pub mod store;

pub use argument::{ArgSource, ArgValue, Localize, NO_ARGS, VariantName};
pub use color::Rgba;
pub use config::{LocalizationConfig, NullText};
pub use dialect::{
    ColorWrapper, MarkupDialect, PlainDialect, RichTextDialect, TerminalDialect,
};
pub use error::{ConfigError, StoreError};
pub use format::{ArgType, ArgumentFormat, Dialect, FormatAddon, RenderFlags, ValueFormatParams};
pub use language::{Language, LanguageService, StaticLanguages};
pub use store::{ArgumentDoc, MemoryStore, SaveEntry, StoredRow, TranslationStore};

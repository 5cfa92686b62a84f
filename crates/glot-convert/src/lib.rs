#![forbid(unsafe_code)]

//! Type-directed value-to-text conversion for the glot localization
//! engine.
//!
//! # Role in glot
//! When a translation weaves an argument into a placeholder, something
//! has to turn the runtime value into display text. This crate owns that
//! dispatch: a registry of converters ordered by priority, specialized
//! providers for open type families, a separate list for enumeration
//! values, a per-type resolution cache, and post-processing addons.
//!
//! # This crate provides
//! - [`ConverterRegistry`] — registration, resolution, caching, and the
//!   `format` entry points.
//! - [`ValueConverter`] / [`ConverterProvider`] — the conversion seams.
//! - [`DisplayConverter`] and [`VariantNameConverter`] — the built-in
//!   fallbacks.
//! - Addons: [`Surround`], [`CaseAddon`], [`ColorAddon`].
//!
//! # How it fits in the system
//! `glot`'s `Translation::translate` calls [`ConverterRegistry::format`]
//! once per woven argument. The registry is an owned object injected into
//! the localization service; there is no process-wide converter state.

pub mod addon;
pub mod builtin;
pub mod registry;

pub use addon::{CaseAddon, ColorAddon, Surround, TextCase};
pub use builtin::{DisplayConverter, VariantNameConverter, humanize_variant};
pub use registry::{
    ConverterProvider, ConverterRegistry, ConverterScope, RegistrationError, ValueConverter,
};

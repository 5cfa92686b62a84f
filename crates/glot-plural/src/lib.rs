#![forbid(unsafe_code)]

//! Count-sensitive pluralization for the glot localization engine.
//!
//! # Role in glot
//! Authored text binds word spans to positional arguments with
//! pluralization markers (`item{0:p}`). This crate extracts those markers
//! into representation-local lists, decides one/not-one for a runtime
//! value, and substitutes the bound spans without rescanning or
//! reallocating more than once.
//!
//! # This crate provides
//! - [`extract_markers`] — clean text plus a [`PluralMarker`] list.
//! - [`is_one`] — the one/not-one rule over [`ArgValue`](glot_core::ArgValue).
//! - [`PluralizationEngine`] — per-language handlers plus the
//!   span-substitution pass.
//! - [`EnglishPluralizer`] — the preinstalled English handler.
//!
//! # How it fits in the system
//! `glot` extracts markers once per representation when a translation
//! value is (re)built, and runs the engine on every arity>0 render before
//! placeholder weaving. Nothing here allocates when no marker fires.

pub mod engine;
pub mod english;
pub mod marker;
pub mod one;

pub use engine::{IdentityPluralizer, PluralizationEngine, Pluralizer};
pub use english::EnglishPluralizer;
pub use marker::{PluralMarker, extract_markers, max_argument_index};
pub use one::is_one;

#![forbid(unsafe_code)]

//! Localized message templates with multi-target rendering.
//!
//! # Role in glot
//! This is the umbrella crate: it owns the template types and wires the
//! member crates together behind one service object.
//!
//! # Primary responsibilities
//! - **[`Translation`]**: a keyed template with one value per language,
//!   fallback resolution, argument coercion, and rendering.
//! - **[`TranslationValue`]**: the per-language snapshot — three
//!   representations, color windows, and marker lists, all precomputed.
//! - **[`TranslationCollection`]**: discovery, persistence round-trips,
//!   and reload for a named set of translations.
//! - **[`Localization`]**: the injected service bundle — configuration,
//!   languages, store, converters, pluralizers, dialects.
//!
//! # How it fits in the system
//! `glot-core` supplies the shared vocabulary, `glot-plural` the
//! count-sensitive span substitution, and `glot-convert` the
//! type-directed value formatting. Applications build a [`Localization`],
//! declare collections, and call [`Translation::translate`].
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use glot::{
//!     ArgType, ArgValue, ArgumentFormat, Language, Localization, LocalizationConfig,
//!     MemoryStore, StaticLanguages, TranslateRequest, TranslationCollection, TranslationEntry,
//! };
//!
//! let languages = Arc::new(StaticLanguages::new([Language::new("en", "English")]));
//! let services = Localization::new(
//!     LocalizationConfig::new("en", "en-US"),
//!     languages,
//!     Arc::new(MemoryStore::new()),
//! )
//! .unwrap();
//!
//! let collection = TranslationCollection::new(
//!     "chat",
//!     services,
//!     vec![
//!         TranslationEntry::new("items", "You have {0} item{0:p}")
//!             .argument(ArgumentFormat::new().named("count").expecting(ArgType::Int)),
//!     ],
//! );
//!
//! let items = collection.get("items").unwrap();
//! let five = 5_i32;
//! let text = items
//!     .translate(&TranslateRequest::new(), &[ArgValue::display(&five)])
//!     .unwrap();
//! assert_eq!(text, "You have 5 items");
//! ```

pub mod collection;
pub mod services;
pub mod translation;
pub mod value;

mod weave;

pub use collection::{TranslationCollection, TranslationEntry};
pub use services::{Localization, LocalizationBuilder};
pub use translation::{TranslateError, TranslateRequest, Translation};
pub use value::{TranslationValue, ValueTable};

pub use glot_convert as convert;
pub use glot_core as core;
pub use glot_plural as plural;

pub use glot_convert::{
    CaseAddon, ColorAddon, ConverterProvider, ConverterRegistry, ConverterScope,
    DisplayConverter, RegistrationError, Surround, TextCase, ValueConverter, VariantNameConverter,
};
pub use glot_core::{
    ArgSource, ArgType, ArgValue, ArgumentFormat, ConfigError, Dialect, FormatAddon, Language,
    LanguageService, Localize, LocalizationConfig, MarkupDialect, MemoryStore, NO_ARGS, NullText,
    RenderFlags, Rgba, StaticLanguages, StoreError, TranslationStore, ValueFormatParams,
    VariantName,
};
pub use glot_plural::{PluralMarker, PluralizationEngine, Pluralizer, extract_markers, is_one};

//! Message templates: per-language values, fallback, and rendering.

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use glot_core::{ArgType, ArgValue, ArgumentFormat, Language, RenderFlags, ValueFormatParams};
use thiserror::Error;

use crate::services::Localization;
use crate::value::{TranslationValue, ValueTable};
use crate::weave::weave;

/// Failures surfaced to translation callers.
///
/// Missing translations are never an error: resolution always lands on a
/// value. These cover programmer misuse only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    /// A supplied value has no coercion path to its slot's declared type.
    #[error("argument {index}: `{supplied}` cannot be coerced to {expected}")]
    ArgumentKindMismatch {
        /// Position of the offending argument.
        index: usize,
        /// Diagnostic name of the supplied type.
        supplied: &'static str,
        /// The slot's declared type.
        expected: ArgType,
    },

    /// The translation was used before [`Translation::initialize`].
    #[error("translation used before initialization")]
    Uninitialized,

    /// [`Translation::initialize`] was called twice.
    #[error("translation initialized twice")]
    AlreadyInitialized,
}

/// Call-scoped rendering options.
#[derive(Clone, Copy, Default)]
pub struct TranslateRequest<'a> {
    /// Target language; the configured default when absent.
    pub language: Option<&'a Language>,
    /// Culture override; the configured culture when absent.
    pub culture: Option<&'a str>,
    /// Render-target selection.
    pub flags: RenderFlags,
}

impl<'a> TranslateRequest<'a> {
    /// Default language, plain markup, full text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render for a specific language.
    #[must_use]
    pub fn in_language(mut self, language: &'a Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Override the culture identifier.
    #[must_use]
    pub fn with_culture(mut self, culture: &'a str) -> Self {
        self.culture = Some(culture);
        self
    }

    /// Select a render target.
    #[must_use]
    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }
}

struct Inner {
    key: String,
    description: Option<String>,
    formats: Vec<ArgumentFormat>,
    default_text: String,
    table: Arc<ValueTable>,
    collection: String,
    services: Arc<Localization>,
    original: ArcSwap<TranslationValue>,
}

/// A named message template owning one value per language.
///
/// Created as an empty shell and wired up exactly once by
/// [`initialize`](Self::initialize) — usually by its owning collection.
/// Every other member fails with [`TranslateError::Uninitialized`] until
/// then. After initialization the shared table always holds the default
/// language's row, equal to [`original`](Self::original).
pub struct Translation {
    inner: OnceLock<Inner>,
}

impl Translation {
    /// An uninitialized shell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// One-time wiring: key, argument metadata, the shared value table,
    /// the owning collection's name, and the service handle. Builds the
    /// default-language value from `default_text` and registers it in
    /// the table.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &self,
        key: impl Into<String>,
        description: Option<String>,
        formats: Vec<ArgumentFormat>,
        default_text: &str,
        table: Arc<ValueTable>,
        collection: &str,
        services: Arc<Localization>,
    ) -> Result<(), TranslateError> {
        let key = key.into();
        let original = Arc::new(services.make_value(default_text));
        let default_language = services.default_language().name.clone();
        let inner = Inner {
            key: key.clone(),
            description,
            formats,
            default_text: default_text.to_string(),
            table: Arc::clone(&table),
            collection: collection.to_string(),
            services,
            original: ArcSwap::new(Arc::clone(&original)),
        };
        self.inner
            .set(inner)
            .map_err(|_| TranslateError::AlreadyInitialized)?;
        table.insert(&default_language, &key, original);
        Ok(())
    }

    fn inner(&self) -> Result<&Inner, TranslateError> {
        self.inner.get().ok_or(TranslateError::Uninitialized)
    }

    /// The translation's stable key.
    pub fn key(&self) -> Result<&str, TranslateError> {
        Ok(&self.inner()?.key)
    }

    /// Translator-facing description, if declared.
    pub fn description(&self) -> Result<Option<&str>, TranslateError> {
        Ok(self.inner()?.description.as_deref())
    }

    /// Declared argument count.
    pub fn arity(&self) -> Result<usize, TranslateError> {
        Ok(self.inner()?.formats.len())
    }

    /// Declared per-argument directives.
    pub fn argument_formats(&self) -> Result<&[ArgumentFormat], TranslateError> {
        Ok(&self.inner()?.formats)
    }

    /// The authored default-language text, markers and all.
    pub fn default_text(&self) -> Result<&str, TranslateError> {
        Ok(&self.inner()?.default_text)
    }

    /// Name of the owning collection.
    pub fn collection(&self) -> Result<&str, TranslateError> {
        Ok(&self.inner()?.collection)
    }

    /// The default-language value.
    pub fn original(&self) -> Result<Arc<TranslationValue>, TranslateError> {
        Ok(self.inner()?.original.load_full())
    }

    /// Swap the default-language value. The caller keeps the table row in
    /// step; see `TranslationCollection`.
    pub(crate) fn set_original(&self, value: Arc<TranslationValue>) -> Result<(), TranslateError> {
        self.inner()?.original.store(value);
        Ok(())
    }

    /// Resolve the value for a language: exact row, else the language's
    /// configured fallback row, else the default-language original.
    /// Always lands on a value for an initialized translation.
    pub fn value_for_language(
        &self,
        language: Option<&Language>,
    ) -> Result<Arc<TranslationValue>, TranslateError> {
        let inner = self.inner()?;
        let language = language.unwrap_or_else(|| inner.services.default_language());
        if let Some(value) = inner.table.get(&language.name, &inner.key) {
            return Ok(value);
        }
        if let Some(fallback) = &language.fallback
            && let Some(value) = inner.table.get(fallback, &inner.key)
        {
            return Ok(value);
        }
        Ok(inner.original.load_full())
    }

    /// Create or replace the row for a language, recomputing every
    /// derived form. Updating the default language also swaps
    /// [`original`](Self::original).
    pub fn update_value(&self, text: &str, language: &Language) -> Result<(), TranslateError> {
        let inner = self.inner()?;
        let value = Arc::new(inner.services.make_value(text));
        inner
            .table
            .insert(&language.name, &inner.key, Arc::clone(&value));
        if language.name == inner.services.default_language().name {
            inner.original.store(value);
        }
        Ok(())
    }

    /// Render the translation.
    ///
    /// Coerces each supplied value to its slot's declared type, resolves
    /// the language's value, applies pluralization markers, then weaves
    /// converter-formatted arguments into the placeholders. Arity-0
    /// translations return the resolved representation verbatim.
    pub fn translate(
        &self,
        request: &TranslateRequest<'_>,
        values: &[ArgValue<'_>],
    ) -> Result<String, TranslateError> {
        let inner = self.inner()?;
        let services = &inner.services;
        let language = request
            .language
            .unwrap_or_else(|| services.default_language());
        let culture = request.culture.unwrap_or_else(|| services.culture());

        let value = self.value_for_language(Some(language))?;
        let text = value.span(request.flags);
        if inner.formats.is_empty() {
            return Ok(text.to_string());
        }

        let coerced = coerce_all(inner, request, language, culture, values)?;

        let markers = value.markers_for(request.flags);
        let in_range = values.len().min(inner.formats.len());
        let pluralized = services.pluralizers().apply(
            text,
            &markers,
            0,
            in_range,
            &values,
            &language.name,
            culture,
        );

        let woven = weave(&pluralized, |index, directive| {
            if index >= inner.formats.len() {
                return None;
            }
            let raw = values.get(index).copied()?;
            match &coerced[index] {
                Coerced::Pre(text) => Some(text.clone()),
                other => {
                    let slot = &inner.formats[index];
                    let directed;
                    let format = match directive {
                        Some(d) => {
                            directed = ArgumentFormat {
                                name: slot.name.clone(),
                                expected: slot.expected,
                                format: Some(d.to_string()),
                                addons: slot.addons.clone(),
                            };
                            &directed
                        }
                        None => slot,
                    };
                    let params = ValueFormatParams {
                        index,
                        culture,
                        language,
                        flags: request.flags,
                        format,
                        args: &values,
                        arg_count: inner.formats.len(),
                    };
                    let converters = services.converters();
                    Some(match other {
                        Coerced::AsIs => converters.format(raw, &params),
                        Coerced::Int(v) => converters.format(ArgValue::display(v), &params),
                        Coerced::Float(v) => converters.format(ArgValue::display(v), &params),
                        Coerced::Bool(v) => converters.format(ArgValue::display(v), &params),
                        Coerced::Pre(_) => unreachable!("handled above"),
                    })
                }
            }
        });

        Ok(woven)
    }
}

impl Default for Translation {
    fn default() -> Self {
        Self::new()
    }
}

/// A supplied value after coercion to its slot's declared type.
enum Coerced {
    /// Compatible as supplied; the registry formats the raw value.
    AsIs,
    /// Declared text: already formatted through the registry.
    Pre(String),
    /// Converted integer.
    Int(i64),
    /// Converted float.
    Float(f64),
    /// Converted boolean.
    Bool(bool),
}

fn coerce_all(
    inner: &Inner,
    request: &TranslateRequest<'_>,
    language: &Language,
    culture: &str,
    values: &[ArgValue<'_>],
) -> Result<Vec<Coerced>, TranslateError> {
    let mut coerced = Vec::with_capacity(inner.formats.len());
    for (index, slot) in inner.formats.iter().enumerate() {
        let Some(value) = values.get(index).copied() else {
            // Unsupplied slots never render; their tokens stay intact.
            coerced.push(Coerced::AsIs);
            continue;
        };
        if value.is_null() {
            // Null renders the configured sentinel whatever the slot
            // declares.
            coerced.push(Coerced::AsIs);
            continue;
        }
        let entry = match slot.expected {
            ArgType::Any => Coerced::AsIs,
            ArgType::Text => {
                let params = ValueFormatParams {
                    index,
                    culture,
                    language,
                    flags: request.flags,
                    format: slot,
                    args: &values,
                    arg_count: inner.formats.len(),
                };
                Coerced::Pre(inner.services.converters().format(value, &params))
            }
            ArgType::Bool => coerce_bool(value).ok_or_else(|| mismatch(index, value, slot))?,
            ArgType::Int => coerce_int(value).ok_or_else(|| mismatch(index, value, slot))?,
            ArgType::Float => coerce_float(value).ok_or_else(|| mismatch(index, value, slot))?,
        };
        coerced.push(entry);
    }
    Ok(coerced)
}

fn mismatch(index: usize, value: ArgValue<'_>, slot: &ArgumentFormat) -> TranslateError {
    TranslateError::ArgumentKindMismatch {
        index,
        supplied: value.type_name(),
        expected: slot.expected,
    }
}

fn as_i64(value: ArgValue<'_>) -> Option<i64> {
    macro_rules! narrow {
        ($($ty:ty),*) => {
            $(
                if let Some(v) = value.downcast_ref::<$ty>() {
                    return i64::try_from(*v).ok();
                }
            )*
        };
    }
    if let Some(v) = value.downcast_ref::<i64>() {
        return Some(*v);
    }
    narrow!(i8, i16, i32, i128, isize, u8, u16, u32, u64, u128, usize);
    None
}

fn as_str(value: ArgValue<'_>) -> Option<&str> {
    if let Some(v) = value.downcast_ref::<&str>() {
        return Some(v);
    }
    value.downcast_ref::<String>().map(String::as_str)
}

fn coerce_int(value: ArgValue<'_>) -> Option<Coerced> {
    if let Some(v) = as_i64(value) {
        return Some(Coerced::Int(v));
    }
    if let Some(v) = value.downcast_ref::<bool>() {
        return Some(Coerced::Int(i64::from(*v)));
    }
    let float = value
        .downcast_ref::<f64>()
        .copied()
        .or_else(|| value.downcast_ref::<f32>().map(|v| f64::from(*v)));
    if let Some(v) = float {
        let rounded = v.round();
        if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded <= i64::MAX as f64 {
            return Some(Coerced::Int(rounded as i64));
        }
        return None;
    }
    as_str(value).and_then(|s| s.trim().parse::<i64>().ok().map(Coerced::Int))
}

fn coerce_float(value: ArgValue<'_>) -> Option<Coerced> {
    if let Some(v) = value.downcast_ref::<f64>() {
        return Some(Coerced::Float(*v));
    }
    if let Some(v) = value.downcast_ref::<f32>() {
        return Some(Coerced::Float(f64::from(*v)));
    }
    if let Some(v) = as_i64(value) {
        #[allow(clippy::cast_precision_loss)]
        return Some(Coerced::Float(v as f64));
    }
    if let Some(v) = value.downcast_ref::<bool>() {
        return Some(Coerced::Float(if *v { 1.0 } else { 0.0 }));
    }
    as_str(value).and_then(|s| s.trim().parse::<f64>().ok().map(Coerced::Float))
}

fn coerce_bool(value: ArgValue<'_>) -> Option<Coerced> {
    if let Some(v) = value.downcast_ref::<bool>() {
        return Some(Coerced::Bool(*v));
    }
    if let Some(v) = as_i64(value) {
        return match v {
            0 => Some(Coerced::Bool(false)),
            1 => Some(Coerced::Bool(true)),
            _ => None,
        };
    }
    match as_str(value)?.trim() {
        s if s.eq_ignore_ascii_case("true") || s == "1" => Some(Coerced::Bool(true)),
        s if s.eq_ignore_ascii_case("false") || s == "0" => Some(Coerced::Bool(false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glot_core::{LocalizationConfig, MemoryStore, StaticLanguages};

    fn service() -> Arc<Localization> {
        let languages = Arc::new(StaticLanguages::new([
            Language::new("en", "English"),
            Language::new("es", "Spanish").fallback("en"),
            Language::new("fr", "French"),
        ]));
        Localization::new(
            LocalizationConfig::new("en", "en-US"),
            languages,
            Arc::new(MemoryStore::new()),
        )
        .unwrap()
    }

    fn translation(
        services: &Arc<Localization>,
        table: &Arc<ValueTable>,
        default_text: &str,
        formats: Vec<ArgumentFormat>,
    ) -> Translation {
        let t = Translation::new();
        t.initialize(
            "key",
            None,
            formats,
            default_text,
            Arc::clone(table),
            "tests",
            Arc::clone(services),
        )
        .unwrap();
        t
    }

    #[test]
    fn members_fail_before_initialize() {
        let t = Translation::new();
        assert_eq!(t.key().unwrap_err(), TranslateError::Uninitialized);
        assert_eq!(
            t.value_for_language(None).unwrap_err(),
            TranslateError::Uninitialized
        );
        assert_eq!(
            t.translate(&TranslateRequest::new(), &[]).unwrap_err(),
            TranslateError::Uninitialized
        );
    }

    #[test]
    fn initialize_is_one_time() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(&services, &table, "Hello", Vec::new());
        let again = t.initialize(
            "key",
            None,
            Vec::new(),
            "Hello",
            table,
            "tests",
            services,
        );
        assert_eq!(again.unwrap_err(), TranslateError::AlreadyInitialized);
    }

    #[test]
    fn initialize_registers_the_default_row() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(&services, &table, "Hello", Vec::new());
        let row = table.get("en", "key").unwrap();
        assert_eq!(row.raw(), "Hello");
        assert!(Arc::ptr_eq(&row, &t.original().unwrap()));
    }

    #[test]
    fn resolution_prefers_exact_then_fallback_then_original() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(&services, &table, "Hello", Vec::new());

        let es = services.languages().find("es").unwrap();
        let en = services.languages().find("en").unwrap();
        let fr = services.languages().find("fr").unwrap();

        // "es" has no row; its fallback "en" row exists and differs from
        // nothing yet — update "en" so the distinction is observable.
        t.update_value("Hello there", &en).unwrap();
        assert_eq!(
            t.value_for_language(Some(&es)).unwrap().raw(),
            "Hello there"
        );

        t.update_value("Hola", &es).unwrap();
        assert_eq!(t.value_for_language(Some(&es)).unwrap().raw(), "Hola");

        // "fr" has no row and no fallback: original.
        assert_eq!(
            t.value_for_language(Some(&fr)).unwrap().raw(),
            "Hello there"
        );
    }

    #[test]
    fn updating_the_default_language_swaps_original() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(&services, &table, "Hello", Vec::new());
        let en = services.languages().find("en").unwrap();
        t.update_value("Howdy", &en).unwrap();
        assert_eq!(t.original().unwrap().raw(), "Howdy");
        assert_eq!(table.get("en", "key").unwrap().raw(), "Howdy");
    }

    #[test]
    fn arity_zero_renders_verbatim() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(&services, &table, "[#ff0000]ready[/]", Vec::new());
        assert_eq!(
            t.translate(&TranslateRequest::new(), &[]).unwrap(),
            "[#ff0000]ready[/]"
        );
        let stripped = TranslateRequest::new().with_flags(RenderFlags::plain().stripped());
        assert_eq!(t.translate(&stripped, &[]).unwrap(), "ready");
    }

    #[test]
    fn items_scenario_singular_and_plural() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(
            &services,
            &table,
            "You have {0} item{0:p}",
            vec![ArgumentFormat::new().named("count").expecting(ArgType::Int)],
        );

        let one = 1_i32;
        let five = 5_i32;
        assert_eq!(
            t.translate(&TranslateRequest::new(), &[ArgValue::display(&one)])
                .unwrap(),
            "You have 1 item"
        );
        assert_eq!(
            t.translate(&TranslateRequest::new(), &[ArgValue::display(&five)])
                .unwrap(),
            "You have 5 items"
        );
    }

    #[test]
    fn coercion_failures_name_the_index() {
        struct Widget;
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(
            &services,
            &table,
            "{0}",
            vec![ArgumentFormat::new().expecting(ArgType::Int)],
        );
        let w = Widget;
        let err = t
            .translate(&TranslateRequest::new(), &[ArgValue::opaque(&w)])
            .unwrap_err();
        assert!(matches!(
            err,
            TranslateError::ArgumentKindMismatch {
                index: 0,
                expected: ArgType::Int,
                ..
            }
        ));
    }

    #[test]
    fn coercion_converts_across_kinds() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(
            &services,
            &table,
            "{0} {1} {2}",
            vec![
                ArgumentFormat::new().expecting(ArgType::Int),
                ArgumentFormat::new().expecting(ArgType::Float),
                ArgumentFormat::new().expecting(ArgType::Bool),
            ],
        );
        let count = "12";
        let ratio = 3_i32;
        let flag = "true";
        let out = t
            .translate(
                &TranslateRequest::new(),
                &[
                    ArgValue::display(&count),
                    ArgValue::display(&ratio),
                    ArgValue::display(&flag),
                ],
            )
            .unwrap();
        assert_eq!(out, "12 3 true");
    }

    #[test]
    fn declared_text_formats_through_the_registry() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(
            &services,
            &table,
            "{0}",
            vec![ArgumentFormat::new().expecting(ArgType::Text)],
        );
        struct Widget;
        let w = Widget;
        // Text slots accept anything: the registry's fallback renders
        // the type name.
        let out = t
            .translate(&TranslateRequest::new(), &[ArgValue::opaque(&w)])
            .unwrap();
        assert!(out.contains("Widget"));
    }

    #[test]
    fn unsupplied_placeholder_stays_intact() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(
            &services,
            &table,
            "{0} and {1}",
            vec![ArgumentFormat::new(), ArgumentFormat::new()],
        );
        let a = 1_i32;
        let out = t
            .translate(&TranslateRequest::new(), &[ArgValue::display(&a)])
            .unwrap();
        assert_eq!(out, "1 and {1}");
    }

    #[test]
    fn null_argument_renders_the_sentinel() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(
            &services,
            &table,
            "{0}",
            vec![ArgumentFormat::new().expecting(ArgType::Int)],
        );
        assert_eq!(
            t.translate(&TranslateRequest::new(), &[ArgValue::null()])
                .unwrap(),
            "null"
        );
        let rich = TranslateRequest::new().with_flags(RenderFlags::rich());
        assert!(
            t.translate(&rich, &[ArgValue::null()])
                .unwrap()
                .contains("color")
        );
    }

    #[test]
    fn per_token_directive_overrides_the_slot() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(
            &services,
            &table,
            "{0:x}",
            vec![ArgumentFormat::new().expecting(ArgType::Int)],
        );
        let n = 255_i32;
        assert_eq!(
            t.translate(&TranslateRequest::new(), &[ArgValue::display(&n)])
                .unwrap(),
            "ff"
        );
    }

    #[test]
    fn rendering_follows_the_requested_dialect() {
        let services = service();
        let table = Arc::new(ValueTable::new());
        let t = translation(
            &services,
            &table,
            "[#ff0000]{0} item{0:p}[/]",
            vec![ArgumentFormat::new().expecting(ArgType::Int)],
        );
        let five = 5_i32;
        let rich = TranslateRequest::new().with_flags(RenderFlags::rich());
        assert_eq!(
            t.translate(&rich, &[ArgValue::display(&five)]).unwrap(),
            "<color=#ff0000>5 items</color>"
        );
        let stripped = TranslateRequest::new().with_flags(RenderFlags::terminal().stripped());
        assert_eq!(
            t.translate(&stripped, &[ArgValue::display(&five)]).unwrap(),
            "5 items"
        );
    }
}

//! Converter registration, resolution, and caching.

use std::any::TypeId;
use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use glot_core::{ArgValue, NullText, ValueFormatParams};
use thiserror::Error;

use crate::builtin::{DisplayConverter, VariantNameConverter, humanize_variant};

/// Which registration API a converter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterScope {
    /// Registered through [`ConverterRegistry::add_converter`].
    General,
    /// Registered through [`ConverterRegistry::add_enum_converter`];
    /// dispatched only for values with the variant capability.
    EnumOnly,
}

/// Turns one runtime value into display text.
pub trait ValueConverter: Send + Sync {
    /// Which registration API this converter belongs to.
    fn scope(&self) -> ConverterScope {
        ConverterScope::General
    }

    /// Whether this converter handles values of the given type.
    fn can_convert(&self, value_type: TypeId) -> bool;

    /// Produce the display text.
    fn format(&self, value: ArgValue<'_>, params: &ValueFormatParams<'_>) -> String;
}

/// An open converter family: asked per concrete type whether it applies,
/// then asked to instantiate a converter closed over that type.
pub trait ConverterProvider: Send + Sync {
    /// Which registration API this provider belongs to.
    fn scope(&self) -> ConverterScope {
        ConverterScope::General
    }

    /// Whether the family covers the given type.
    fn can_convert(&self, value_type: TypeId) -> bool;

    /// Instantiate the converter for the given type. `None` declines,
    /// and resolution moves on to the next candidate.
    fn instantiate(&self, value_type: TypeId) -> Option<Arc<dyn ValueConverter>>;
}

/// Rejected registrations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// An enum-only converter was handed to the general API.
    #[error("enum-only converter registered through the general API")]
    EnumThroughGeneral,

    /// A general converter was handed to the enum API.
    #[error("general converter registered through the enum API")]
    GeneralThroughEnum,
}

enum Registration {
    Converter(Arc<dyn ValueConverter>),
    Provider(Arc<dyn ConverterProvider>),
}

struct Entry {
    registration: Registration,
    priority: i32,
}

/// Priority-ordered converter registry with a per-type resolution cache.
///
/// Two lists are kept: general converters and enum-only converters.
/// Resolution for a type scans the matching list in descending priority;
/// the first candidate that accepts (or instantiates) wins and is cached
/// under the type. Any registration clears the cache, so the very next
/// lookup observes the change; evicted converters are dropped once their
/// in-flight uses finish.
pub struct ConverterRegistry {
    general: RwLock<Vec<Entry>>,
    enums: RwLock<Vec<Entry>>,
    cache: RwLock<AHashMap<TypeId, Arc<dyn ValueConverter>>>,
    fallback: Arc<dyn ValueConverter>,
    enum_fallback: Arc<dyn ValueConverter>,
    null_text: NullText,
}

impl ConverterRegistry {
    /// Registry with the built-in fallbacks and the given null rendering.
    #[must_use]
    pub fn new(null_text: NullText) -> Self {
        Self {
            general: RwLock::new(Vec::new()),
            enums: RwLock::new(Vec::new()),
            cache: RwLock::new(AHashMap::new()),
            fallback: Arc::new(DisplayConverter),
            enum_fallback: Arc::new(VariantNameConverter),
            null_text,
        }
    }

    /// Register a general converter. Fails when the converter declares
    /// enum-only scope.
    pub fn add_converter(
        &self,
        converter: Arc<dyn ValueConverter>,
        priority: i32,
    ) -> Result<(), RegistrationError> {
        if converter.scope() == ConverterScope::EnumOnly {
            return Err(RegistrationError::EnumThroughGeneral);
        }
        self.insert(&self.general, Registration::Converter(converter), priority);
        Ok(())
    }

    /// Register an enum-only converter. Fails when the converter declares
    /// general scope.
    pub fn add_enum_converter(
        &self,
        converter: Arc<dyn ValueConverter>,
        priority: i32,
    ) -> Result<(), RegistrationError> {
        if converter.scope() == ConverterScope::General {
            return Err(RegistrationError::GeneralThroughEnum);
        }
        self.insert(&self.enums, Registration::Converter(converter), priority);
        Ok(())
    }

    /// Register a general converter provider.
    pub fn add_provider(
        &self,
        provider: Arc<dyn ConverterProvider>,
        priority: i32,
    ) -> Result<(), RegistrationError> {
        if provider.scope() == ConverterScope::EnumOnly {
            return Err(RegistrationError::EnumThroughGeneral);
        }
        self.insert(&self.general, Registration::Provider(provider), priority);
        Ok(())
    }

    /// Register an enum-only converter provider.
    pub fn add_enum_provider(
        &self,
        provider: Arc<dyn ConverterProvider>,
        priority: i32,
    ) -> Result<(), RegistrationError> {
        if provider.scope() == ConverterScope::General {
            return Err(RegistrationError::GeneralThroughEnum);
        }
        self.insert(&self.enums, Registration::Provider(provider), priority);
        Ok(())
    }

    /// Insert preserving descending priority; equal priorities keep
    /// their registration order. Every change invalidates the cache.
    fn insert(&self, list: &RwLock<Vec<Entry>>, registration: Registration, priority: i32) {
        {
            let mut list = list.write().expect("converter registry poisoned");
            let at = list
                .iter()
                .position(|e| e.priority < priority)
                .unwrap_or(list.len());
            list.insert(
                at,
                Entry {
                    registration,
                    priority,
                },
            );
        }
        self.cache
            .write()
            .expect("converter registry poisoned")
            .clear();
        tracing::debug!(priority, "converter registered; resolution cache cleared");
    }

    /// Format a value.
    ///
    /// The null sentinel renders as the configured null text for the
    /// requested target. Self-localizing values delegate directly and
    /// cannot be overridden by registered converters. Both of those
    /// short-circuit the addon pass; addons decorate converter output
    /// only, in declared order.
    #[must_use]
    pub fn format(&self, value: ArgValue<'_>, params: &ValueFormatParams<'_>) -> String {
        self.format_resolved(value, params, value.type_id())
    }

    /// Format a value, dispatching as if it were of `value_type`.
    #[must_use]
    pub fn format_as(
        &self,
        value: ArgValue<'_>,
        params: &ValueFormatParams<'_>,
        value_type: TypeId,
    ) -> String {
        self.format_resolved(value, params, value_type)
    }

    fn format_resolved(
        &self,
        value: ArgValue<'_>,
        params: &ValueFormatParams<'_>,
        value_type: TypeId,
    ) -> String {
        if value.is_null() {
            return self.null_text.for_flags(params.flags).to_string();
        }
        if let Some(localize) = value.as_localize() {
            return localize.localize(params);
        }
        let mut text = self
            .resolve(value_type, value.as_variant().is_some())
            .format(value, params);
        for addon in &params.format.addons {
            text = addon.apply(text, &value);
        }
        text
    }

    /// Format an enumeration case's display text through the enum path.
    /// Values without the variant capability fall back to [`format`].
    ///
    /// [`format`]: Self::format
    #[must_use]
    pub fn format_enum(&self, value: ArgValue<'_>, params: &ValueFormatParams<'_>) -> String {
        if value.as_variant().is_none() {
            return self.format(value, params);
        }
        let mut text = self.resolve(value.type_id(), true).format(value, params);
        for addon in &params.format.addons {
            text = addon.apply(text, &value);
        }
        text
    }

    /// Display name of an enumeration type, humanized.
    #[must_use]
    pub fn format_enum_name(&self, value: ArgValue<'_>) -> String {
        match value.as_variant() {
            Some(variant) => humanize_variant(variant.enum_name()),
            None => value.type_name().to_string(),
        }
    }

    /// Resolve the converter for a type: cache, then the enum list for
    /// variant-capable values, then the general list, then the built-in
    /// fallback. The winner is cached.
    fn resolve(&self, value_type: TypeId, enumeration: bool) -> Arc<dyn ValueConverter> {
        if let Some(hit) = self
            .cache
            .read()
            .expect("converter registry poisoned")
            .get(&value_type)
        {
            return Arc::clone(hit);
        }

        let mut resolved = None;
        if enumeration {
            resolved = self.scan(&self.enums, value_type);
        }
        if resolved.is_none() {
            resolved = self.scan(&self.general, value_type);
        }
        let resolved = resolved.unwrap_or_else(|| {
            if enumeration {
                Arc::clone(&self.enum_fallback)
            } else {
                Arc::clone(&self.fallback)
            }
        });

        self.cache
            .write()
            .expect("converter registry poisoned")
            .insert(value_type, Arc::clone(&resolved));
        resolved
    }

    fn scan(&self, list: &RwLock<Vec<Entry>>, value_type: TypeId) -> Option<Arc<dyn ValueConverter>> {
        let list = list.read().expect("converter registry poisoned");
        for entry in list.iter() {
            match &entry.registration {
                Registration::Converter(converter) => {
                    if converter.can_convert(value_type) {
                        return Some(Arc::clone(converter));
                    }
                }
                Registration::Provider(provider) => {
                    if provider.can_convert(value_type)
                        && let Some(instance) = provider.instantiate(value_type)
                    {
                        return Some(instance);
                    }
                }
            }
        }
        None
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new(NullText::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glot_core::{ArgumentFormat, Language, Localize, NO_ARGS, RenderFlags, VariantName};

    struct Tagged(&'static str);

    impl ValueConverter for Tagged {
        fn can_convert(&self, value_type: TypeId) -> bool {
            value_type == TypeId::of::<u16>()
        }

        fn format(&self, _value: ArgValue<'_>, _params: &ValueFormatParams<'_>) -> String {
            self.0.to_string()
        }
    }

    struct EnumTagged(&'static str);

    impl ValueConverter for EnumTagged {
        fn scope(&self) -> ConverterScope {
            ConverterScope::EnumOnly
        }

        fn can_convert(&self, _value_type: TypeId) -> bool {
            true
        }

        fn format(&self, _value: ArgValue<'_>, _params: &ValueFormatParams<'_>) -> String {
            self.0.to_string()
        }
    }

    fn with_params<R>(f: impl FnOnce(&ValueFormatParams<'_>) -> R) -> R {
        let language = Language::new("en", "English");
        let format = ArgumentFormat::new();
        let params = ValueFormatParams {
            index: 0,
            culture: "en-US",
            language: &language,
            flags: RenderFlags::plain(),
            format: &format,
            args: &NO_ARGS,
            arg_count: 0,
        };
        f(&params)
    }

    #[test]
    fn higher_priority_wins_and_cache_follows_registration() {
        let registry = ConverterRegistry::default();
        let value = 7_u16;

        registry
            .add_converter(Arc::new(Tagged("low")), 10)
            .unwrap();
        with_params(|params| {
            assert_eq!(registry.format(ArgValue::display(&value), params), "low");
        });

        // Registering a higher priority converter must be visible on the
        // very next call.
        registry
            .add_converter(Arc::new(Tagged("high")), 20)
            .unwrap();
        with_params(|params| {
            assert_eq!(registry.format(ArgValue::display(&value), params), "high");
        });
    }

    #[test]
    fn equal_priority_keeps_registration_order() {
        let registry = ConverterRegistry::default();
        registry
            .add_converter(Arc::new(Tagged("first")), 10)
            .unwrap();
        registry
            .add_converter(Arc::new(Tagged("second")), 10)
            .unwrap();
        let value = 7_u16;
        with_params(|params| {
            assert_eq!(registry.format(ArgValue::display(&value), params), "first");
        });
    }

    #[test]
    fn scope_cross_registration_fails_both_ways() {
        let registry = ConverterRegistry::default();
        assert_eq!(
            registry.add_converter(Arc::new(EnumTagged("x")), 0),
            Err(RegistrationError::EnumThroughGeneral)
        );
        assert_eq!(
            registry.add_enum_converter(Arc::new(Tagged("x")), 0),
            Err(RegistrationError::GeneralThroughEnum)
        );
    }

    #[test]
    fn null_renders_the_configured_sentinel() {
        let registry = ConverterRegistry::default();
        with_params(|params| {
            assert_eq!(registry.format(ArgValue::null(), params), "null");
        });

        let language = Language::new("en", "English");
        let format = ArgumentFormat::new();
        let params = ValueFormatParams {
            index: 0,
            culture: "en-US",
            language: &language,
            flags: RenderFlags::rich(),
            format: &format,
            args: &NO_ARGS,
            arg_count: 0,
        };
        assert!(registry.format(ArgValue::null(), &params).contains("color"));
    }

    #[test]
    fn localize_capability_is_not_overridable() {
        struct SelfMade;
        impl Localize for SelfMade {
            fn localize(&self, _params: &ValueFormatParams<'_>) -> String {
                "made myself".to_string()
            }
        }

        struct Always(&'static str);
        impl ValueConverter for Always {
            fn can_convert(&self, _value_type: TypeId) -> bool {
                true
            }
            fn format(&self, _value: ArgValue<'_>, _params: &ValueFormatParams<'_>) -> String {
                self.0.to_string()
            }
        }

        let registry = ConverterRegistry::default();
        registry
            .add_converter(Arc::new(Always("overridden")), 1000)
            .unwrap();
        let v = SelfMade;
        with_params(|params| {
            assert_eq!(
                registry.format(ArgValue::localizing(&v), params),
                "made myself"
            );
        });
    }

    #[test]
    fn providers_specialize_per_type() {
        struct FloatProvider;
        impl ConverterProvider for FloatProvider {
            fn can_convert(&self, value_type: TypeId) -> bool {
                value_type == TypeId::of::<f64>()
            }
            fn instantiate(&self, _value_type: TypeId) -> Option<Arc<dyn ValueConverter>> {
                struct Fixed;
                impl ValueConverter for Fixed {
                    fn can_convert(&self, _t: TypeId) -> bool {
                        true
                    }
                    fn format(&self, value: ArgValue<'_>, _p: &ValueFormatParams<'_>) -> String {
                        value
                            .downcast_ref::<f64>()
                            .map_or_else(String::new, |v| format!("{v:.1}"))
                    }
                }
                Some(Arc::new(Fixed))
            }
        }

        let registry = ConverterRegistry::default();
        registry.add_provider(Arc::new(FloatProvider), 5).unwrap();
        let x = 2.5_f64;
        let n = 3_i32;
        with_params(|params| {
            assert_eq!(registry.format(ArgValue::display(&x), params), "2.5");
            // Other types skip the provider and hit the display fallback.
            assert_eq!(registry.format(ArgValue::display(&n), params), "3");
        });
    }

    #[derive(Debug)]
    enum Outcome {
        NotFound,
    }

    impl VariantName for Outcome {
        fn variant_name(&self) -> &'static str {
            match self {
                Outcome::NotFound => "NotFound",
            }
        }
        fn enum_name(&self) -> &'static str {
            "RequestOutcome"
        }
    }

    #[test]
    fn enum_values_take_the_enum_path() {
        let registry = ConverterRegistry::default();
        let v = Outcome::NotFound;
        with_params(|params| {
            assert_eq!(
                registry.format(ArgValue::enumeration(&v), params),
                "Not Found"
            );
            assert_eq!(
                registry.format_enum_name(ArgValue::enumeration(&v)),
                "Request Outcome"
            );
        });

        registry
            .add_enum_converter(Arc::new(EnumTagged("enum!")), 50)
            .unwrap();
        with_params(|params| {
            assert_eq!(registry.format(ArgValue::enumeration(&v), params), "enum!");
            assert_eq!(registry.format_enum(ArgValue::enumeration(&v), params), "enum!");
        });
    }
}

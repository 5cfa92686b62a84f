//! The localization service façade.

use std::sync::Arc;

use glot_convert::ConverterRegistry;
use glot_core::{
    ConfigError, Language, LanguageService, LocalizationConfig, MarkupDialect, RichTextDialect,
    TerminalDialect, TranslationStore,
};
use glot_plural::PluralizationEngine;

use crate::value::TranslationValue;

/// Everything a translation needs to render: configuration, the language
/// service, the persistence store, the converter registry, the
/// pluralization engine, and the dialect transcoders.
///
/// An owned object with explicit construction; there is no process-wide
/// registry state. Collections and translations hold it behind an `Arc`.
pub struct Localization {
    config: LocalizationConfig,
    languages: Arc<dyn LanguageService>,
    store: Arc<dyn TranslationStore>,
    converters: ConverterRegistry,
    pluralizers: PluralizationEngine,
    rich: Arc<dyn MarkupDialect>,
    terminal: Arc<dyn MarkupDialect>,
    default_language: Arc<Language>,
}

impl std::fmt::Debug for Localization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localization")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Localization {
    /// Start building a service.
    #[must_use]
    pub fn builder(
        config: LocalizationConfig,
        languages: Arc<dyn LanguageService>,
        store: Arc<dyn TranslationStore>,
    ) -> LocalizationBuilder {
        LocalizationBuilder {
            config,
            languages,
            store,
            rich: Arc::new(RichTextDialect),
            terminal: Arc::new(TerminalDialect),
        }
    }

    /// Build a service with the bundled dialect transcoders.
    pub fn new(
        config: LocalizationConfig,
        languages: Arc<dyn LanguageService>,
        store: Arc<dyn TranslationStore>,
    ) -> Result<Arc<Self>, ConfigError> {
        Self::builder(config, languages, store).build()
    }

    /// The service configuration.
    #[must_use]
    pub fn config(&self) -> &LocalizationConfig {
        &self.config
    }

    /// The configured culture identifier.
    #[must_use]
    pub fn culture(&self) -> &str {
        &self.config.culture
    }

    /// The resolved default language.
    #[must_use]
    pub fn default_language(&self) -> &Arc<Language> {
        &self.default_language
    }

    /// The language service.
    #[must_use]
    pub fn languages(&self) -> &Arc<dyn LanguageService> {
        &self.languages
    }

    /// The persistence store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TranslationStore> {
        &self.store
    }

    /// The converter registry.
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// The pluralization engine.
    #[must_use]
    pub fn pluralizers(&self) -> &PluralizationEngine {
        &self.pluralizers
    }

    /// Build a [`TranslationValue`] through the service's dialects.
    #[must_use]
    pub fn make_value(&self, raw: &str) -> TranslationValue {
        TranslationValue::new(raw, &*self.rich, &*self.terminal)
    }
}

/// Builder for [`Localization`], for swapping the dialect transcoders.
pub struct LocalizationBuilder {
    config: LocalizationConfig,
    languages: Arc<dyn LanguageService>,
    store: Arc<dyn TranslationStore>,
    rich: Arc<dyn MarkupDialect>,
    terminal: Arc<dyn MarkupDialect>,
}

impl LocalizationBuilder {
    /// Replace the rich-text transcoder.
    #[must_use]
    pub fn rich_dialect(mut self, dialect: Arc<dyn MarkupDialect>) -> Self {
        self.rich = dialect;
        self
    }

    /// Replace the terminal transcoder.
    #[must_use]
    pub fn terminal_dialect(mut self, dialect: Arc<dyn MarkupDialect>) -> Self {
        self.terminal = dialect;
        self
    }

    /// Validate the configuration and build the service.
    pub fn build(self) -> Result<Arc<Localization>, ConfigError> {
        self.config.validate(&*self.languages)?;
        let default_language = self
            .languages
            .find(&self.config.default_language)
            .ok_or_else(|| {
                ConfigError::UnknownDefaultLanguage(self.config.default_language.clone())
            })?;
        let converters = ConverterRegistry::new(self.config.null_text.clone());
        Ok(Arc::new(Localization {
            config: self.config,
            languages: self.languages,
            store: self.store,
            converters,
            pluralizers: PluralizationEngine::new(),
            rich: self.rich,
            terminal: self.terminal,
            default_language,
        }))
    }
}

//! Engine configuration.

use crate::error::ConfigError;
use crate::format::{Dialect, RenderFlags};
use crate::language::LanguageService;

/// The text substituted for a null argument, per render target.
///
/// The color-stripped forms always use the plain variant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NullText {
    /// Plain-markup variant.
    pub plain: String,
    /// Rich-text variant.
    pub rich: String,
    /// Terminal-escape variant.
    pub terminal: String,
}

impl NullText {
    /// Select the variant for the given render flags.
    #[must_use]
    pub fn for_flags(&self, flags: RenderFlags) -> &str {
        if flags.color_stripped {
            return &self.plain;
        }
        match flags.dialect {
            Dialect::Plain => &self.plain,
            Dialect::Rich => &self.rich,
            Dialect::Terminal => &self.terminal,
        }
    }
}

impl Default for NullText {
    fn default() -> Self {
        Self {
            plain: "null".to_string(),
            rich: "<color=#808080>null</color>".to_string(),
            terminal: "\u{1b}[90mnull\u{1b}[0m".to_string(),
        }
    }
}

/// Configuration for a localization service.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalizationConfig {
    /// Name of the language used when a caller does not name one, and
    /// the language of every translation's authored default text.
    pub default_language: String,
    /// Culture identifier handed to converters and pluralizers,
    /// e.g. `"en-US"`.
    pub culture: String,
    /// Null-argument rendering.
    #[cfg_attr(feature = "serde", serde(default))]
    pub null_text: NullText,
}

impl LocalizationConfig {
    /// Create a configuration with default null-text rendering.
    #[must_use]
    pub fn new(default_language: impl Into<String>, culture: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            culture: culture.into(),
            null_text: NullText::default(),
        }
    }

    /// Check the configuration against a language service.
    ///
    /// Fails when the default language cannot be resolved or the culture
    /// identifier is empty. Called once at service construction, never on
    /// the formatting path.
    pub fn validate(&self, languages: &dyn LanguageService) -> Result<(), ConfigError> {
        if self.culture.trim().is_empty() {
            return Err(ConfigError::EmptyCulture);
        }
        if languages.find(&self.default_language).is_none() {
            return Err(ConfigError::UnknownDefaultLanguage(
                self.default_language.clone(),
            ));
        }
        Ok(())
    }
}

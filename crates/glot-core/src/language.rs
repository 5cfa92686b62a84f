//! Language identity and the lookup service.

use std::sync::Arc;

use arc_swap::ArcSwap;

/// One language known to the engine.
///
/// Languages are referenced by `name` everywhere else in the workspace;
/// the fallback algorithm consumes `fallback` purely as a name string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// Unique name, e.g. `"en"`.
    pub name: String,
    /// Human-readable name, e.g. `"English"`.
    pub display_name: String,
    /// Alternate names accepted by lookup.
    pub aliases: Vec<String>,
    /// Name of the language whose translations substitute for missing
    /// rows of this one.
    pub fallback: Option<String>,
}

impl Language {
    /// Create a language with no aliases and no fallback.
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            aliases: Vec::new(),
            fallback: None,
        }
    }

    /// Add an alias accepted by lookup.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the fallback translation language name.
    #[must_use]
    pub fn fallback(mut self, name: impl Into<String>) -> Self {
        self.fallback = Some(name.into());
        self
    }
}

/// Enumerates known languages and resolves names to them.
pub trait LanguageService: Send + Sync {
    /// All known languages.
    fn all(&self) -> Vec<Arc<Language>>;

    /// Resolve a query to a language: exact name first, then alias, then
    /// unique name prefix. Comparisons ignore ASCII case.
    fn find(&self, query: &str) -> Option<Arc<Language>>;
}

/// An in-memory language list.
///
/// The list lives behind an [`ArcSwap`], so lookups on the formatting
/// path are lock-free loads and an external refresh (a configuration
/// file change, say) replaces the whole list atomically.
pub struct StaticLanguages {
    list: ArcSwap<Vec<Arc<Language>>>,
}

impl StaticLanguages {
    /// Build the service from an initial language list.
    #[must_use]
    pub fn new(languages: impl IntoIterator<Item = Language>) -> Self {
        Self {
            list: ArcSwap::from_pointee(languages.into_iter().map(Arc::new).collect()),
        }
    }

    /// Atomically replace the entire language list. In-flight readers
    /// keep the list they already loaded.
    pub fn replace_all(&self, languages: impl IntoIterator<Item = Language>) {
        self.list
            .store(Arc::new(languages.into_iter().map(Arc::new).collect()));
    }
}

impl LanguageService for StaticLanguages {
    fn all(&self) -> Vec<Arc<Language>> {
        self.list.load().as_ref().clone()
    }

    fn find(&self, query: &str) -> Option<Arc<Language>> {
        let list = self.list.load();

        if let Some(exact) = list
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(query))
        {
            return Some(Arc::clone(exact));
        }

        if let Some(aliased) = list
            .iter()
            .find(|l| l.aliases.iter().any(|a| a.eq_ignore_ascii_case(query)))
        {
            return Some(Arc::clone(aliased));
        }

        // Partial match must be unambiguous.
        let mut matches = list.iter().filter(|l| {
            l.name.len() >= query.len()
                && l.name.is_char_boundary(query.len())
                && l.name[..query.len()].eq_ignore_ascii_case(query)
        });
        let first = matches.next()?;
        if matches.next().is_some() {
            tracing::debug!(query, "language prefix is ambiguous; no match");
            return None;
        }
        Some(Arc::clone(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> StaticLanguages {
        StaticLanguages::new([
            Language::new("en", "English"),
            Language::new("es", "Spanish").fallback("en"),
            Language::new("de", "German").alias("deutsch"),
            Language::new("debug", "Debug pseudo-locale"),
        ])
    }

    #[test]
    fn exact_name_wins() {
        let s = service();
        assert_eq!(s.find("es").map(|l| l.display_name.clone()).as_deref(), Some("Spanish"));
        assert_eq!(s.find("EN").map(|l| l.name.clone()).as_deref(), Some("en"));
    }

    #[test]
    fn alias_resolves() {
        let s = service();
        assert_eq!(s.find("Deutsch").map(|l| l.name.clone()).as_deref(), Some("de"));
    }

    #[test]
    fn ambiguous_prefix_resolves_to_nothing() {
        let s = service();
        // "de" matches exactly; "deb" is a unique prefix; "d" is ambiguous.
        assert!(s.find("deb").is_some());
        assert!(s.find("d").is_none());
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(service().find("fr").is_none());
    }

    #[test]
    fn replace_all_swaps_the_list() {
        let s = service();
        s.replace_all([Language::new("fr", "French")]);
        assert!(s.find("en").is_none());
        assert!(s.find("fr").is_some());
        assert_eq!(s.all().len(), 1);
    }
}

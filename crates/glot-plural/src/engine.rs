//! Per-language handlers and the span-substitution pass.

use std::borrow::Cow;
use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use glot_core::ArgSource;
use smallvec::SmallVec;

use crate::english::EnglishPluralizer;
use crate::marker::PluralMarker;
use crate::one::is_one;

/// Turns a singular span into its plural form for one language.
pub trait Pluralizer: Send + Sync {
    /// Pluralize `span`. An empty return value asks the engine to also
    /// collapse one space adjacent to the span.
    fn pluralize(&self, span: &str, culture: &str) -> String;
}

/// Handler for languages with no registered pluralizer: spans are
/// returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPluralizer;

impl Pluralizer for IdentityPluralizer {
    fn pluralize(&self, span: &str, _culture: &str) -> String {
        span.to_string()
    }
}

/// Per-language pluralization handlers plus the substitution pass.
///
/// English is preinstalled under `"en"` and `"english"`. Lookup ignores
/// ASCII case; an unregistered language resolves to the identity handler.
pub struct PluralizationEngine {
    handlers: RwLock<AHashMap<String, Arc<dyn Pluralizer>>>,
    identity: Arc<dyn Pluralizer>,
}

impl PluralizationEngine {
    /// Engine with the English handler preinstalled.
    #[must_use]
    pub fn new() -> Self {
        let mut handlers: AHashMap<String, Arc<dyn Pluralizer>> = AHashMap::new();
        let english: Arc<dyn Pluralizer> = Arc::new(EnglishPluralizer);
        handlers.insert("en".to_string(), Arc::clone(&english));
        handlers.insert("english".to_string(), english);
        Self {
            handlers: RwLock::new(handlers),
            identity: Arc::new(IdentityPluralizer),
        }
    }

    /// Register (or replace) the handler for a language. The previous
    /// handler is dropped once its in-flight uses finish.
    pub fn register(&self, language: &str, handler: Arc<dyn Pluralizer>) {
        self.handlers
            .write()
            .expect("pluralizer registry poisoned")
            .insert(language.to_ascii_lowercase(), handler);
    }

    /// Resolve the handler for a language.
    #[must_use]
    pub fn handler_for(&self, language: &str) -> Arc<dyn Pluralizer> {
        self.handlers
            .read()
            .expect("pluralizer registry poisoned")
            .get(&language.to_ascii_lowercase())
            .map_or_else(|| Arc::clone(&self.identity), Arc::clone)
    }

    /// Apply pluralization markers to `text`.
    ///
    /// Markers referencing an argument outside
    /// `[argument_offset, argument_offset + argument_count)` are ignored.
    /// Texts where no marker fires come back borrowed, untouched. A single
    /// firing marker takes a one-splice fast path; multiple firings lay
    /// their replacement words out in one scratch buffer and build the
    /// output in a single left-to-right pass.
    #[must_use]
    pub fn apply<'t>(
        &self,
        text: &'t str,
        markers: &[PluralMarker],
        argument_offset: usize,
        argument_count: usize,
        args: &dyn ArgSource<'_>,
        language: &str,
        culture: &str,
    ) -> Cow<'t, str> {
        let mut firing: SmallVec<[&PluralMarker; 8]> = SmallVec::new();
        for marker in markers {
            if marker.arg < argument_offset || marker.arg >= argument_offset + argument_count {
                continue;
            }
            if marker.start + marker.len > text.len() || marker.len == 0 {
                tracing::debug!(arg = marker.arg, "marker span out of bounds; skipped");
                continue;
            }
            let one = args.arg(marker.arg).is_some_and(is_one);
            if !one != marker.inverted {
                firing.push(marker);
            }
        }

        if firing.is_empty() {
            return Cow::Borrowed(text);
        }

        // Substitution walks left to right regardless of marker order.
        firing.sort_by_key(|m| m.start);

        let handler = self.handler_for(language);

        if firing.len() == 1 {
            let marker = firing[0];
            let span = &text[marker.start..marker.start + marker.len];
            let word = handler.pluralize(span, culture);
            let mut out = String::with_capacity(text.len() + word.len());
            push_segment(&mut out, &text[..marker.start], word.is_empty());
            out.push_str(&word);
            out.push_str(&text[marker.start + marker.len..]);
            return Cow::Owned(out);
        }

        // Replacement words share one scratch buffer; each marker keeps a
        // range into it.
        let mut scratch: SmallVec<[u8; 256]> = SmallVec::new();
        let mut spans: SmallVec<[(usize, usize, usize, usize); 8]> = SmallVec::new();
        for marker in &firing {
            let span = &text[marker.start..marker.start + marker.len];
            let word = handler.pluralize(span, culture);
            let at = scratch.len();
            scratch.extend_from_slice(word.as_bytes());
            spans.push((marker.start, marker.len, at, word.len()));
        }

        let mut out = String::with_capacity(text.len() + scratch.len());
        let mut cursor = 0;
        for (start, len, at, word_len) in spans {
            if start < cursor {
                // Overlapping markers bound the same span; first wins.
                continue;
            }
            push_segment(&mut out, &text[cursor..start], word_len == 0);
            if let Ok(word) = std::str::from_utf8(&scratch[at..at + word_len]) {
                out.push_str(word);
            }
            cursor = start + len;
        }
        out.push_str(&text[cursor..]);
        Cow::Owned(out)
    }
}

impl Default for PluralizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy a segment preceding a replacement, dropping one trailing space
/// when the replacement is empty.
fn push_segment(out: &mut String, segment: &str, replacement_empty: bool) {
    if replacement_empty {
        if let Some(trimmed) = segment.strip_suffix(' ') {
            out.push_str(trimmed);
            return;
        }
    }
    out.push_str(segment);
}

//! Per-language translation values and the shared value table.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::{Arc, Mutex};

use ahash::AHashMap;
use arc_swap::ArcSwap;
use glot_core::{Dialect, MarkupDialect, PlainDialect, RenderFlags, Rgba};
use glot_plural::{PluralMarker, extract_markers};

/// One representation of a value: clean text, its marker list, and the
/// color-stripped window.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Repr {
    text: String,
    markers: Vec<PluralMarker>,
    window: Range<usize>,
}

impl Repr {
    fn build(dialect_text: &str, dialect: &dyn MarkupDialect) -> Self {
        let (text, markers) = extract_markers(dialect_text);
        let window = dialect
            .leading_wrapper(&text)
            .map_or(0..text.len(), |w| w.inner);
        Self {
            text,
            markers,
            window,
        }
    }
}

/// One language's text for one translation key, with every derived form
/// precomputed.
///
/// A value is an immutable snapshot: the raw authored text, the three
/// representations (plain markup, rich-text dialect, terminal escapes),
/// each with its own representation-local marker list and color-stripped
/// window, and the leading wrapper's color (opaque white when the text
/// has none). Updates build a fresh value and swap the `Arc`, so readers
/// never observe partially-updated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationValue {
    raw: String,
    color: Rgba,
    plain: Repr,
    rich: Repr,
    terminal: Repr,
}

impl TranslationValue {
    /// Build every derived form from raw authored text.
    ///
    /// Markers are extracted per representation *after* dialect
    /// transcoding, because tag expansion shifts their offsets.
    #[must_use]
    pub fn new(raw: &str, rich: &dyn MarkupDialect, terminal: &dyn MarkupDialect) -> Self {
        let plain_repr = Repr::build(raw, &PlainDialect);
        let rich_repr = Repr::build(&rich.transcode(raw), rich);
        let terminal_repr = Repr::build(&terminal.transcode(raw), terminal);
        let color = PlainDialect
            .leading_wrapper(&plain_repr.text)
            .map_or(Rgba::WHITE, |w| w.color);
        Self {
            raw: raw.to_string(),
            color,
            plain: plain_repr,
            rich: rich_repr,
            terminal: terminal_repr,
        }
    }

    fn repr(&self, dialect: Dialect) -> &Repr {
        match dialect {
            Dialect::Plain => &self.plain,
            Dialect::Rich => &self.rich,
            Dialect::Terminal => &self.terminal,
        }
    }

    /// The raw authored text, markers and all. This is what persistence
    /// round-trips.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The leading wrapper's color, or opaque white.
    #[must_use]
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Select one of the six precomputed forms. Color-stripped forms are
    /// subslices of the stored text; nothing is allocated.
    #[must_use]
    pub fn span(&self, flags: RenderFlags) -> &str {
        let repr = self.repr(flags.dialect);
        if flags.color_stripped {
            &repr.text[repr.window.clone()]
        } else {
            &repr.text
        }
    }

    /// The marker list matching [`span`](Self::span) for the same flags.
    ///
    /// For color-stripped forms the offsets are rebased onto the window;
    /// markers outside it are dropped.
    #[must_use]
    pub fn markers_for(&self, flags: RenderFlags) -> Cow<'_, [PluralMarker]> {
        let repr = self.repr(flags.dialect);
        if !flags.color_stripped || repr.window == (0..repr.text.len()) {
            return Cow::Borrowed(&repr.markers);
        }
        let window = &repr.window;
        Cow::Owned(
            repr.markers
                .iter()
                .filter(|m| m.start >= window.start && m.start + m.len <= window.end)
                .map(|m| PluralMarker {
                    start: m.start - window.start,
                    ..*m
                })
                .collect(),
        )
    }
}

/// The shared `(language, key) → value` table a collection owns.
///
/// Reads on the formatting path are lock-free [`ArcSwap`] loads. Writes
/// read-copy-update the map under a writer lock; reload batches its rows
/// into one swap.
pub struct ValueTable {
    map: ArcSwap<AHashMap<String, AHashMap<String, Arc<TranslationValue>>>>,
    writer: Mutex<()>,
}

impl ValueTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: ArcSwap::from_pointee(AHashMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Look up the value for a language and key.
    #[must_use]
    pub fn get(&self, language: &str, key: &str) -> Option<Arc<TranslationValue>> {
        let map = self.map.load();
        map.get(language).and_then(|rows| rows.get(key)).map(Arc::clone)
    }

    /// Insert or replace one row.
    pub fn insert(&self, language: &str, key: &str, value: Arc<TranslationValue>) {
        self.insert_many([(language.to_string(), key.to_string(), value)]);
    }

    /// Insert or replace many rows in one atomic swap.
    pub fn insert_many(
        &self,
        rows: impl IntoIterator<Item = (String, String, Arc<TranslationValue>)>,
    ) {
        let _writer = self.writer.lock().expect("value table writer poisoned");
        let mut next = (*self.map.load_full()).clone();
        for (language, key, value) in rows {
            next.entry(language).or_default().insert(key, value);
        }
        self.map.store(Arc::new(next));
    }

    /// Number of rows across all languages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.load().values().map(|m| m.len()).sum()
    }

    /// Whether the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

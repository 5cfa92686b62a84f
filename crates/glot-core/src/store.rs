//! Persistence seam for translation collections.
//!
//! The engine never touches files itself; a [`TranslationStore`] loads and
//! saves raw per-language text keyed by collection and key. The bundled
//! [`MemoryStore`] backs tests and embedded use.

use std::sync::Mutex;

use ahash::AHashMap;

use crate::error::StoreError;
use crate::format::ArgType;

/// One persisted row: the raw authored text of a key in a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    /// Language name the row belongs to.
    pub language: String,
    /// Translation key within the collection.
    pub key: String,
    /// Raw markup text.
    pub text: String,
}

/// Documentation for one argument slot, emitted as store comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDoc {
    /// Slot position.
    pub index: usize,
    /// Display name, if declared.
    pub name: Option<String>,
    /// Declared type.
    pub expected: ArgType,
    /// Explicit format string, if declared.
    pub format: Option<String>,
    /// Names of the slot's addons, in application order.
    pub addons: Vec<&'static str>,
}

/// One translation handed to [`TranslationStore::save`].
///
/// Carries both the current text and the authored default so the store
/// can echo the default as a comment when the stored value differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    /// Translation key.
    pub key: String,
    /// Current text for the saved language.
    pub text: String,
    /// Authored default-language text.
    pub default_text: String,
    /// Optional translator-facing description.
    pub description: Option<String>,
    /// Per-argument documentation.
    pub arguments: Vec<ArgumentDoc>,
}

/// Loads and saves raw translation text for a collection.
///
/// Both operations are off the per-request formatting path; the engine
/// calls them only during collection discovery and reload.
pub trait TranslationStore: Send + Sync {
    /// Load every persisted row of the collection.
    fn load(&self, collection: &str) -> Result<Vec<StoredRow>, StoreError>;

    /// Persist the given entries for one language. `all_languages` asks
    /// the store to also write the other languages' files from the rows
    /// it already holds.
    fn save(
        &self,
        collection: &str,
        entries: &[SaveEntry],
        language: &str,
        all_languages: bool,
    ) -> Result<(), StoreError>;
}

/// A record of one [`MemoryStore`] save call, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedBatch {
    /// Collection that was saved.
    pub collection: String,
    /// Language that was saved.
    pub language: String,
    /// Whether every language was requested.
    pub all_languages: bool,
    /// The entries handed to the store.
    pub entries: Vec<SaveEntry>,
}

/// An in-memory [`TranslationStore`].
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<AHashMap<String, Vec<StoredRow>>>,
    saves: Mutex<Vec<SavedBatch>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row, replacing any existing row with the same language and
    /// key.
    pub fn insert(
        &self,
        collection: impl Into<String>,
        language: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        let row = StoredRow {
            language: language.into(),
            key: key.into(),
            text: text.into(),
        };
        let mut rows = self.rows.lock().expect("memory store poisoned");
        let bucket = rows.entry(collection.into()).or_default();
        if let Some(existing) = bucket
            .iter_mut()
            .find(|r| r.language == row.language && r.key == row.key)
        {
            *existing = row;
        } else {
            bucket.push(row);
        }
    }

    /// Every save call made so far, oldest first.
    #[must_use]
    pub fn saves(&self) -> Vec<SavedBatch> {
        self.saves.lock().expect("memory store poisoned").clone()
    }
}

impl TranslationStore for MemoryStore {
    fn load(&self, collection: &str) -> Result<Vec<StoredRow>, StoreError> {
        Ok(self
            .rows
            .lock()
            .expect("memory store poisoned")
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn save(
        &self,
        collection: &str,
        entries: &[SaveEntry],
        language: &str,
        all_languages: bool,
    ) -> Result<(), StoreError> {
        self.saves.lock().expect("memory store poisoned").push(SavedBatch {
            collection: collection.to_string(),
            language: language.to_string(),
            all_languages,
            entries: entries.to_vec(),
        });
        Ok(())
    }
}

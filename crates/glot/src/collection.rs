//! Discoverable sets of translations sharing one persisted store.

use std::sync::{Arc, OnceLock};

use ahash::AHashMap;
use glot_core::{ArgumentDoc, ArgumentFormat, SaveEntry, StoreError, StoredRow};
use glot_plural::max_argument_index;

use crate::services::Localization;
use crate::translation::Translation;
use crate::value::ValueTable;

/// One declared translation slot of a collection.
#[derive(Debug, Clone)]
pub struct TranslationEntry {
    slot: String,
    key_override: Option<String>,
    default_text: String,
    description: Option<String>,
    formats: Vec<ArgumentFormat>,
}

impl TranslationEntry {
    /// Declare a slot with its authored default-language text. The slot
    /// name doubles as the stable key unless [`key`](Self::key)
    /// overrides it.
    #[must_use]
    pub fn new(slot: impl Into<String>, default_text: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            key_override: None,
            default_text: default_text.into(),
            description: None,
            formats: Vec::new(),
        }
    }

    /// Override the stable key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key_override = Some(key.into());
        self
    }

    /// Attach a translator-facing description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare the next argument slot.
    #[must_use]
    pub fn argument(mut self, format: ArgumentFormat) -> Self {
        self.formats.push(format);
        self
    }
}

struct CollectionState {
    table: Arc<ValueTable>,
    translations: AHashMap<String, Arc<Translation>>,
    order: Vec<String>,
}

/// A named set of translations discovered once and backed by one store.
///
/// Discovery runs on first use behind a [`OnceLock`]: every declared
/// slot gets its stable key, its translation is initialized into the
/// shared value table, persisted rows are loaded and applied, and the
/// defaults are re-saved best-effort (a save failure is logged, never
/// fatal). The key set never changes afterwards; [`reload`](Self::reload)
/// updates values only.
pub struct TranslationCollection {
    name: String,
    entries: Vec<TranslationEntry>,
    services: Arc<Localization>,
    state: OnceLock<CollectionState>,
}

impl TranslationCollection {
    /// Declare a collection. Nothing touches the store until first use.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        services: Arc<Localization>,
        entries: Vec<TranslationEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            entries,
            services,
            state: OnceLock::new(),
        }
    }

    /// The collection's identity, as the store sees it.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &CollectionState {
        self.state.get_or_init(|| self.discover())
    }

    fn discover(&self) -> CollectionState {
        let table = Arc::new(ValueTable::new());
        let mut translations = AHashMap::with_capacity(self.entries.len());
        let mut order = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let key = entry
                .key_override
                .clone()
                .unwrap_or_else(|| entry.slot.clone());
            if translations.contains_key(&key) {
                tracing::warn!(collection = %self.name, key = %key, "duplicate translation key; slot skipped");
                continue;
            }
            let translation = Arc::new(Translation::new());
            if let Err(error) = translation.initialize(
                &key,
                entry.description.clone(),
                entry.formats.clone(),
                &entry.default_text,
                Arc::clone(&table),
                &self.name,
                Arc::clone(&self.services),
            ) {
                tracing::warn!(collection = %self.name, key = %key, %error, "translation failed to initialize");
                continue;
            }
            translations.insert(key.clone(), translation);
            order.push(key);
        }

        let state = CollectionState {
            table,
            translations,
            order,
        };

        match self.services.store().load(&self.name) {
            Ok(rows) => self.apply_rows(&state, rows),
            Err(error) => {
                tracing::warn!(collection = %self.name, %error, "failed to load persisted translations");
            }
        }

        if let Err(error) = self.save_defaults(&state) {
            tracing::warn!(collection = %self.name, %error, "failed to re-save default translations");
        }

        state
    }

    /// Apply persisted rows to existing translations. Unknown keys,
    /// unknown languages, and rows referencing arguments beyond a
    /// translation's arity are logged and skipped; the whole batch lands
    /// in one table swap.
    fn apply_rows(&self, state: &CollectionState, rows: Vec<StoredRow>) {
        let default_language = &self.services.default_language().name;
        let mut updates = Vec::with_capacity(rows.len());

        for row in rows {
            let Some(translation) = state.translations.get(&row.key) else {
                tracing::warn!(collection = %self.name, key = %row.key, "stored row references an unknown key; skipped");
                continue;
            };
            let Some(language) = self.services.languages().find(&row.language) else {
                tracing::warn!(collection = %self.name, language = %row.language, "stored row references an unknown language; skipped");
                continue;
            };
            let arity = translation.arity().unwrap_or(0);
            if let Some(max) = max_argument_index(&row.text)
                && max >= arity
            {
                tracing::warn!(
                    collection = %self.name,
                    key = %row.key,
                    argument = max,
                    arity,
                    "stored row references an argument beyond the declared arity; skipped"
                );
                continue;
            }

            let value = Arc::new(self.services.make_value(&row.text));
            if &language.name == default_language {
                let _ = translation.set_original(Arc::clone(&value));
            }
            updates.push((language.name.clone(), row.key, value));
        }

        state.table.insert_many(updates);
    }

    /// Re-load the store and apply updates by key. Never creates keys.
    pub fn reload(&self) -> Result<(), StoreError> {
        let state = self.state();
        let rows = self.services.store().load(&self.name)?;
        self.apply_rows(state, rows);
        Ok(())
    }

    /// Look up a translation by key, discovering on first use.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<Translation>> {
        self.state().translations.get(key).map(Arc::clone)
    }

    /// Every translation, in declaration order.
    #[must_use]
    pub fn translations(&self) -> Vec<Arc<Translation>> {
        let state = self.state();
        state
            .order
            .iter()
            .filter_map(|key| state.translations.get(key).map(Arc::clone))
            .collect()
    }

    /// Number of discovered translations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().translations.len()
    }

    /// Whether the collection discovered no translations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The shared value table. Exposed for diagnostics and tests.
    #[must_use]
    pub fn table(&self) -> Arc<ValueTable> {
        Arc::clone(&self.state().table)
    }

    fn save_defaults(&self, state: &CollectionState) -> Result<(), StoreError> {
        let default_language = &self.services.default_language().name;
        let mut entries = Vec::with_capacity(state.order.len());

        for key in &state.order {
            let Some(translation) = state.translations.get(key) else {
                continue;
            };
            let text = state
                .table
                .get(default_language, key)
                .map(|v| v.raw().to_string())
                .unwrap_or_default();
            let arguments = translation
                .argument_formats()
                .unwrap_or(&[])
                .iter()
                .enumerate()
                .map(|(index, format)| ArgumentDoc {
                    index,
                    name: format.name.clone(),
                    expected: format.expected,
                    format: format.format.clone(),
                    addons: format.addons.iter().map(|a| a.name()).collect(),
                })
                .collect();
            entries.push(SaveEntry {
                key: key.clone(),
                text,
                default_text: translation.default_text().unwrap_or("").to_string(),
                description: translation.description().unwrap_or(None).map(str::to_string),
                arguments,
            });
        }

        self.services
            .store()
            .save(&self.name, &entries, default_language, true)
    }
}

/*!
 * Persistent translation cache.
 *
 * Lookup keys are the trimmed, lowercased source text so casing and edge
 * whitespace differences share one entry; the original source spelling is
 * kept alongside the translation for export and persistence. The map lives
 * behind a shared lock so controller and pipeline can hold the same cache.
 */

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::catalog::Catalog;

const CACHE_FILE_NAME: &str = "translation_cache.csv";

/// One cached source/translation pair
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheEntry {
    source_text: String,
    translated_text: String,
}

/// Normalized lookup key for a source text.
fn normalize(source_text: &str) -> String {
    source_text.trim().to_lowercase()
}

/// In-memory cache of past translations, optionally persisted to disk
#[derive(Debug, Clone, Default)]
pub struct TranslationCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    enabled: bool,
}

impl TranslationCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            enabled,
        }
    }

    /// Load persisted entries from the cache directory. A missing directory
    /// disables caching for the run; an unreadable or absent cache file
    /// degrades to an empty cache.
    pub fn load(directory: &Path, delimiter: &str) -> Self {
        if !directory.is_dir() {
            warn!(
                "Translation cache directory does not exist, caching disabled: {}",
                directory.display()
            );
            return Self::new(false);
        }
        let path = directory.join(CACHE_FILE_NAME);
        if !path.is_file() {
            info!("No cache file yet at {}, starting empty", path.display());
            return Self::new(true);
        }
        match Catalog::read_cache_rows(&path, delimiter) {
            Ok(rows) => {
                let cache = Self::new(true);
                for (source_text, translated_text) in rows {
                    cache.put(&source_text, &translated_text);
                }
                info!(
                    "Loaded {} cache entries from {}",
                    cache.len(),
                    path.display()
                );
                cache
            }
            Err(e) => {
                warn!(
                    "Failed to load translation cache from {}: {}",
                    path.display(),
                    e
                );
                Self::new(true)
            }
        }
    }

    /// Look up a translation for the source text, ignoring case and edge
    /// whitespace.
    pub fn try_get(&self, source_text: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let hit = self
            .entries
            .read()
            .get(&normalize(source_text))
            .map(|entry| entry.translated_text.clone());
        if hit.is_some() {
            debug!("Cache hit for '{}'", preview(source_text));
        }
        hit
    }

    /// Insert a mapping, last write wins. Empty translations are never
    /// stored.
    pub fn put(&self, source_text: &str, translated_text: &str) {
        if !self.enabled || translated_text.is_empty() {
            return;
        }
        self.entries.write().insert(
            normalize(source_text),
            CacheEntry {
                source_text: source_text.to_string(),
                translated_text: translated_text.to_string(),
            },
        );
    }

    /// Export all pairs with their original source spelling, sorted for
    /// stable output. Used for persistence and glossary seeding.
    pub fn all(&self) -> Vec<(String, String)> {
        let mut rows: Vec<(String, String)> = self
            .entries
            .read()
            .values()
            .map(|entry| (entry.source_text.clone(), entry.translated_text.clone()))
            .collect();
        rows.sort();
        rows
    }

    /// Persist the full cache to the cache directory.
    pub fn save(&self, directory: &Path, delimiter: &str) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let path = directory.join(CACHE_FILE_NAME);
        let rows = self.all();
        Catalog::write_cache_rows(&path, &rows, delimiter)?;
        info!("Saved {} cache entries to {}", rows.len(), path.display());
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= 40 {
        text.to_string()
    } else {
        let head: String = text.chars().take(40).collect();
        format!("{}...", head)
    }
}

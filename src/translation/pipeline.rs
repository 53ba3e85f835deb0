/*!
 * Per-entry translation pipeline.
 *
 * Each catalog entry passes through a fixed sequence: skip checks, wrapper
 * removal, segmentation, per-unit cache/protect/translate/refine, then
 * reassembly with the output normalizers. A provider failure never aborts
 * the entry; the affected unit keeps its source text and stays out of the
 * cache so a later run can retry it.
 */

use std::sync::Arc;

use log::{debug, info};

use crate::catalog::LanguageEntry;
use crate::providers::{MarkerStyle, Refiner, TranslateRequest, Translator};
use crate::translation::cache::TranslationCache;
use crate::translation::formatting;
use crate::translation::protect::Protector;
use crate::translation::segment::Segmenter;

/// Keys that must never be sent to a provider.
const SKIP_KEYS: &[&str] = &["quest.authors", "quest.authors_short"];

/// Everything the per-entry sequence needs to know
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Source language code, e.g. `en`
    pub source_language: String,
    /// Target language code, e.g. `de`
    pub target_language: String,
    /// Display name of the source language, the sentinel value
    pub source_language_name: String,
    /// Display name of the target language, the sentinel replacement
    pub target_language_name: String,
    /// Whether units are sent to the translator at all
    pub translate: bool,
    /// Refinement trigger keywords for regular keys
    pub llm_keywords_default: Vec<String>,
    /// Refinement trigger keywords for activation-category keys
    pub llm_keywords_activation: Vec<String>,
    /// Key prefix selecting the activation keyword set
    pub activation_prefix: String,
}

/// Orchestrates the transform sequence over catalog entries
pub struct Pipeline {
    settings: PipelineSettings,
    translator: Option<Arc<dyn Translator>>,
    refiner: Option<Arc<dyn Refiner>>,
    cache: TranslationCache,
    protector: Protector,
}

impl Pipeline {
    pub fn new(
        settings: PipelineSettings,
        translator: Option<Arc<dyn Translator>>,
        refiner: Option<Arc<dyn Refiner>>,
        cache: TranslationCache,
    ) -> Self {
        let marker = translator
            .as_ref()
            .map(|t| t.marker_style())
            .unwrap_or(MarkerStyle::KeepTag);
        Self {
            settings,
            translator,
            refiner,
            cache,
            protector: Protector::new(marker),
        }
    }

    /// Run the full sequence over one entry, replacing its value.
    pub async fn process_entry(&self, entry: &mut LanguageEntry) {
        entry.value = self.transform_value(&entry.key, &entry.value).await;
    }

    /// The per-entry sequence on a raw value.
    pub async fn transform_value(&self, key: &str, value: &str) -> String {
        if value == self.settings.source_language_name {
            return self.settings.target_language_name.clone();
        }
        if SKIP_KEYS.contains(&key) {
            info!("Skipping protected key: {}", key);
            return value.to_string();
        }

        // Placeholders are identified on the source value; after
        // reassembly they are re-applied positionally over whatever the
        // provider produced.
        let placeholders = Protector::identify_placeholders(value);

        let (core, wrap) = formatting::unwrap_value(value);
        let spaced = formatting::add_space_after_breaks(&core);
        let units = Segmenter::split(&spaced);

        let mut transformed = Vec::with_capacity(units.len());
        for unit in &units {
            transformed.push(self.transform_unit(key, unit).await);
        }

        let mut result = Segmenter::join(&transformed);
        result = formatting::rewrap_value(&result, wrap);
        result = formatting::ensure_three_pipes(&result);
        result = Protector::remap_placeholders(&result, &placeholders);
        result = formatting::localize_quotes(&result, &self.settings.target_language);
        result = formatting::fix_bare_backslashes(&result);
        result = formatting::collapse_space_between_breaks(&result);
        result = formatting::strip_glossary_placeholder(&result);
        result
    }

    /// One unit: cache lookup, protected provider call, marker restore,
    /// optional refinement, cache write.
    async fn transform_unit(&self, key: &str, unit: &str) -> String {
        if !Segmenter::is_translatable(unit) {
            return unit.to_string();
        }
        if let Some(cached) = self.cache.try_get(unit) {
            return cached;
        }

        let mut working = unit.to_string();
        let mut translation_failed = false;

        if self.settings.translate {
            if let Some(translator) = &self.translator {
                let protected = self
                    .protector
                    .protect_inline_tags(&self.protector.protect(&working));
                let request = TranslateRequest {
                    text: protected,
                    key_hint: key.to_string(),
                    source_language: self.settings.source_language.clone(),
                    target_language: self.settings.target_language.clone(),
                };
                let result = translator.translate(request).await;
                translation_failed = result.failed;
                working = Protector::restore(&result.text);
                if translation_failed {
                    debug!("Translation failed for key {}, keeping source unit", key);
                }
            }
        }

        if !translation_failed {
            if let Some(refiner) = &self.refiner {
                if self.should_refine(key, &working) {
                    let refined = refiner.refine(key, &working).await;
                    if !refined.failed && !refined.text.is_empty() {
                        working = refined.text;
                    }
                }
            }
            self.cache.put(unit, &working);
        }
        working
    }

    /// Refinement gate: never for single-token results, and only when a
    /// configured trigger keyword for the key's category matches.
    fn should_refine(&self, key: &str, text: &str) -> bool {
        if text.split_whitespace().nth(1).is_none() {
            return false;
        }
        let keywords = if !self.settings.activation_prefix.is_empty()
            && key.starts_with(&self.settings.activation_prefix)
        {
            &self.settings.llm_keywords_activation
        } else {
            &self.settings.llm_keywords_default
        };
        let lowered = text.to_lowercase();
        keywords
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()))
    }
}

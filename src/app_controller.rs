/*!
 * Application controller.
 *
 * Wires configuration, catalogs, cache and providers into per-file runs.
 * Files are processed whole: a file either completes and gets its output
 * written, or fails with no output; cache progress persists either way
 * only after a successful file.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use url::Url;
use walkdir::WalkDir;

use crate::app_config::{Config, TranslationProvider};
use crate::catalog::Catalog;
use crate::providers::azure::Azure;
use crate::providers::deepl::{DeepL, DeepLOptions};
use crate::providers::deepseek::DeepSeek;
use crate::providers::{Refiner, Translator};
use crate::translation::cache::TranslationCache;
use crate::translation::pipeline::{Pipeline, PipelineSettings};
use crate::translation::retry::RetryPolicy;

/// Drives the translation run described by a configuration
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a controller after validating the configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Translate every file matched by the configured input name.
    pub async fn run(&self) -> Result<()> {
        let files = self.resolve_input_files()?;
        if files.is_empty() {
            return Err(anyhow!(
                "No input files matched {:?} in {}",
                self.config.file_io.input_file,
                self.config.file_io.input_path
            ));
        }
        for file in files {
            self.process_file(&file).await?;
        }
        Ok(())
    }

    /// Resolve the input set: a single name, or every file with the
    /// wildcard's extension directly under the input path.
    fn resolve_input_files(&self) -> Result<Vec<PathBuf>> {
        let input_path = Path::new(&self.config.file_io.input_path);
        let name = self.config.file_io.input_file.trim();
        let Some(pattern) = name.strip_prefix('*') else {
            return Ok(vec![input_path.join(name)]);
        };
        let extension = pattern.trim_start_matches('.');
        if extension.is_empty() {
            return Err(anyhow!("Wildcard input {:?} has no extension", name));
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(input_path).max_depth(1) {
            let entry = entry.with_context(|| {
                format!("Failed to read input directory {}", input_path.display())
            })?;
            let path = entry.path();
            let matches = path
                .extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false);
            if path.is_file() && matches {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    async fn process_file(&self, file: &Path) -> Result<()> {
        info!("Start translating {}", file.display());
        let delimiter = &self.config.file_io.delimiter;
        let mut entries = Catalog::read_entries(file, delimiter)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let cache = if self.config.cache.enabled {
            TranslationCache::load(Path::new(&self.config.cache.directory), delimiter)
        } else {
            TranslationCache::new(false)
        };

        let translator = if self.config.translation.enabled {
            Some(self.build_translator(&cache).await?)
        } else {
            None
        };
        let refiner = self.build_refiner();

        let settings = PipelineSettings {
            source_language: self.config.translation.source_language.clone(),
            target_language: self.config.translation.target_language.clone(),
            source_language_name: self.config.translation.source_language_name()?,
            target_language_name: self.config.translation.target_language_name()?,
            translate: self.config.translation.enabled,
            llm_keywords_default: self.config.llm.keywords_default.clone(),
            llm_keywords_activation: self.config.llm.keywords_activation.clone(),
            activation_prefix: self.config.llm.activation_prefix.clone(),
        };
        let pipeline = Pipeline::new(settings, translator, refiner, cache.clone());

        let progress = ProgressBar::new(entries.len() as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
        {
            progress.set_style(style);
        }
        for entry in entries.iter_mut() {
            progress.set_message(entry.key.clone());
            pipeline.process_entry(entry).await;
            progress.inc(1);
        }
        progress.finish_and_clear();

        let output = Catalog::derive_output_path(
            file,
            Path::new(&self.config.file_io.output_path),
            &self.config.file_io.output_suffix,
        );
        Catalog::write_entries(&output, &entries, delimiter)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Wrote {} entries to {}", entries.len(), output.display());

        if self.config.cache.enabled && cache.is_enabled() {
            if let Err(e) = cache.save(Path::new(&self.config.cache.directory), delimiter) {
                warn!("Failed to save translation cache: {}", e);
            }
        }
        Ok(())
    }

    async fn build_translator(&self, cache: &TranslationCache) -> Result<Arc<dyn Translator>> {
        let retry = self.config.translation.common.retry_policy();
        match self.config.translation.provider {
            TranslationProvider::DeepL => {
                let deepl_config = &self.config.translation.deepl;
                let options = DeepLOptions {
                    glossary_id: None,
                    formality: non_empty(&deepl_config.formality),
                    context_default: non_empty(&deepl_config.context_default),
                    context_activation: non_empty(&deepl_config.context_activation),
                    activation_prefix: self.config.llm.activation_prefix.clone(),
                };
                let mut client = DeepL::new(
                    deepl_config.api_mode,
                    &self.config.secrets.deepl_api_key,
                    options,
                    retry,
                );
                if !deepl_config.endpoint.trim().is_empty() {
                    Url::parse(&deepl_config.endpoint).with_context(|| {
                        format!("Invalid DeepL endpoint: {}", deepl_config.endpoint)
                    })?;
                    client = client.with_base_url(deepl_config.endpoint.trim());
                }
                if let Some(glossary_id) = self.setup_glossary(&client, cache).await? {
                    client.set_glossary_id(glossary_id);
                }
                Ok(Arc::new(client))
            }
            TranslationProvider::Azure => {
                let azure_config = &self.config.translation.azure;
                Url::parse(&azure_config.endpoint).with_context(|| {
                    format!("Invalid Azure endpoint: {}", azure_config.endpoint)
                })?;
                Ok(Arc::new(Azure::new(
                    &azure_config.endpoint,
                    &self.config.secrets.azure_api_key,
                    &azure_config.region,
                    non_empty(&azure_config.category_id),
                    retry,
                )))
            }
        }
    }

    /// Resolve the provider glossary before any entry is translated:
    /// either rebuild it from the glossary file (plus cache pairs when
    /// seeding is on), or reuse the first existing one.
    async fn setup_glossary(
        &self,
        client: &DeepL,
        cache: &TranslationCache,
    ) -> Result<Option<String>> {
        let deepl_config = &self.config.translation.deepl;
        if !deepl_config.update_glossary {
            return Ok(client.get_glossary().await?);
        }
        if deepl_config.glossary_file.trim().is_empty() {
            warn!("Glossary update requested but no glossary file configured");
            return Ok(None);
        }
        let source_name = self.config.translation.source_language_name()?;
        let target_name = self.config.translation.target_language_name()?;
        let mut pairs = Catalog::read_glossary_pairs(
            Path::new(&deepl_config.glossary_file),
            &source_name,
            &target_name,
            &self.config.file_io.delimiter,
        )
        .with_context(|| format!("Failed to read glossary {}", deepl_config.glossary_file))?;
        if self.config.cache.seed_glossary {
            pairs.extend(cache.all());
        }
        if pairs.is_empty() {
            warn!("Glossary file produced no usable pairs, skipping upload");
            return Ok(None);
        }
        let glossary_id = client
            .update_glossary(
                deepl_config.delete_existing_glossaries,
                &self.config.translation.source_language,
                &self.config.translation.target_language,
                &pairs,
            )
            .await?;
        Ok(Some(glossary_id))
    }

    fn build_refiner(&self) -> Option<Arc<dyn Refiner>> {
        if !self.config.llm.enabled {
            return None;
        }
        Some(Arc::new(DeepSeek::new(
            &self.config.secrets.deepseek_api_key,
            &self.config.llm.prompt,
            RetryPolicy::new(
                self.config.llm.retry_count,
                self.config.translation.common.retry_backoff_ms,
            ),
        )))
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

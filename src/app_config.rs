/*!
 * Application configuration.
 *
 * Loaded from a JSON file (conf.json by default) and validated up front:
 * any inconsistency that would surface mid-file, like a missing API key
 * for the enabled provider, aborts before the first row is touched.
 */

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::language_utils;
use crate::providers::deepl::DeepLApiMode;
use crate::translation::retry::RetryPolicy;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API keys, kept in one place so they stay out of the other sections
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Machine translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// LLM refinement settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Translation cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Input/output file settings
    #[serde(default)]
    pub file_io: FileIoConfig,

    /// Log level for the application
    #[serde(default)]
    pub log_level: LogLevel,
}

/// API keys for the external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    #[serde(default)]
    pub deepl_api_key: String,
    #[serde(default)]
    pub azure_api_key: String,
    #[serde(default)]
    pub deepseek_api_key: String,
}

/// Which machine-translation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    #[default]
    DeepL,
    Azure,
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeepL => write!(f, "deepl"),
            Self::Azure => write!(f, "azure"),
        }
    }
}

/// Machine translation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Whether provider calls happen at all; when off, entries still run
    /// through the normalizers
    #[serde(default)]
    pub enabled: bool,

    /// Active provider
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Source language code
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Source language display name; empty means derive from the code
    #[serde(default)]
    pub source_language_name: String,

    /// Target language display name; empty means derive from the code
    #[serde(default)]
    pub target_language_name: String,

    /// DeepL-specific settings
    #[serde(default)]
    pub deepl: DeepLConfig,

    /// Azure-specific settings
    #[serde(default)]
    pub azure: AzureConfig,

    /// Retry settings shared by all providers
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: TranslationProvider::default(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            source_language_name: String::new(),
            target_language_name: String::new(),
            deepl: DeepLConfig::default(),
            azure: AzureConfig::default(),
            common: TranslationCommonConfig::default(),
        }
    }
}

impl TranslationConfig {
    /// Configured source display name, falling back to the ISO name.
    pub fn source_language_name(&self) -> Result<String> {
        if !self.source_language_name.trim().is_empty() {
            return Ok(self.source_language_name.clone());
        }
        language_utils::get_language_name(&self.source_language)
    }

    /// Configured target display name, falling back to the ISO name.
    pub fn target_language_name(&self) -> Result<String> {
        if !self.target_language_name.trim().is_empty() {
            return Ok(self.target_language_name.clone());
        }
        language_utils::get_language_name(&self.target_language)
    }
}

/// DeepL-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLConfig {
    /// Free or paid API host
    #[serde(default)]
    pub api_mode: DeepLApiMode,

    /// Optional endpoint override, e.g. a proxy
    #[serde(default)]
    pub endpoint: String,

    /// `formality` request parameter; empty means omit
    #[serde(default)]
    pub formality: String,

    /// Rebuild the account glossary from the glossary file before
    /// translating
    #[serde(default)]
    pub update_glossary: bool,

    /// Delete existing glossaries before uploading a fresh one
    #[serde(default = "default_true")]
    pub delete_existing_glossaries: bool,

    /// CSV file with per-language glossary columns
    #[serde(default)]
    pub glossary_file: String,

    /// Context sentence for regular keys; empty means omit
    #[serde(default)]
    pub context_default: String,

    /// Context sentence for activation-category keys; empty means omit
    #[serde(default)]
    pub context_activation: String,
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            api_mode: DeepLApiMode::default(),
            endpoint: String::new(),
            formality: String::new(),
            update_glossary: false,
            delete_existing_glossaries: default_true(),
            glossary_file: String::new(),
            context_default: String::new(),
            context_activation: String::new(),
        }
    }
}

/// Azure-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Translator endpoint
    #[serde(default = "default_azure_endpoint")]
    pub endpoint: String,

    /// Subscription region header value
    #[serde(default = "default_azure_region")]
    pub region: String,

    /// Custom category id for a trained model; empty means none
    #[serde(default)]
    pub category_id: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: default_azure_endpoint(),
            region: default_azure_region(),
            category_id: String::new(),
        }
    }
}

/// Retry settings shared by all providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationCommonConfig {
    /// Total attempts including the first call
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds, doubled per retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl TranslationCommonConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_count, self.retry_backoff_ms)
    }
}

/// LLM refinement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether refinement runs after translation
    #[serde(default)]
    pub enabled: bool,

    /// System prompt for the refinement model
    #[serde(default)]
    pub prompt: String,

    /// Trigger keywords for regular keys
    #[serde(default)]
    pub keywords_default: Vec<String>,

    /// Trigger keywords for activation-category keys
    #[serde(default)]
    pub keywords_activation: Vec<String>,

    /// Key prefix selecting the activation keyword set and context
    #[serde(default = "default_activation_prefix")]
    pub activation_prefix: String,

    /// Total refinement attempts including the first call
    #[serde(default = "default_llm_retry_count")]
    pub retry_count: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prompt: String::new(),
            keywords_default: Vec::new(),
            keywords_activation: Vec::new(),
            activation_prefix: default_activation_prefix(),
            retry_count: default_llm_retry_count(),
        }
    }
}

/// Translation cache settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Whether past translations are reused and persisted
    #[serde(default)]
    pub enabled: bool,

    /// Directory holding the cache file
    #[serde(default)]
    pub directory: String,

    /// Export cache pairs into the provider glossary on update
    #[serde(default)]
    pub seed_glossary: bool,
}

/// Input/output file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileIoConfig {
    /// Directory the input file(s) live in
    #[serde(default = "default_io_path")]
    pub input_path: String,

    /// Input file name, or a `*.ext` wildcard
    #[serde(default)]
    pub input_file: String,

    /// Directory output files are written to
    #[serde(default = "default_io_path")]
    pub output_path: String,

    /// Suffix inserted before the output file extension
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Column delimiter of the language files
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for FileIoConfig {
    fn default() -> Self {
        Self {
            input_path: default_io_path(),
            input_file: String::new(),
            output_path: default_io_path(),
            output_suffix: default_output_suffix(),
            delimiter: default_delimiter(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open config file: {}", path.as_ref().display()))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Check the configuration for inconsistencies that must abort the run
    /// before any file is touched.
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.translation.source_language)
            .context("Invalid source language code")?;
        language_utils::validate_language_code(&self.translation.target_language)
            .context("Invalid target language code")?;

        if self.translation.enabled {
            let key_missing = match self.translation.provider {
                TranslationProvider::DeepL => self.secrets.deepl_api_key.trim().is_empty(),
                TranslationProvider::Azure => self.secrets.azure_api_key.trim().is_empty(),
            };
            if key_missing {
                return Err(anyhow!(
                    "Translation is enabled but the {} API key is missing",
                    self.translation.provider
                ));
            }
        }
        if self.llm.enabled {
            if self.secrets.deepseek_api_key.trim().is_empty() {
                return Err(anyhow!(
                    "LLM refinement is enabled but the DeepSeek API key is missing"
                ));
            }
            if self.llm.prompt.trim().is_empty() {
                return Err(anyhow!("LLM refinement is enabled but the prompt is empty"));
            }
        }
        if self.cache.enabled && self.cache.directory.trim().is_empty() {
            return Err(anyhow!("Caching is enabled but no cache directory is set"));
        }
        if self.file_io.input_file.trim().is_empty() {
            return Err(anyhow!("No input file configured"));
        }
        if self.file_io.delimiter.is_empty() {
            return Err(anyhow!("The delimiter must not be empty"));
        }
        Ok(())
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "de".to_string()
}

fn default_azure_endpoint() -> String {
    crate::providers::azure::DEFAULT_AZURE_ENDPOINT.to_string()
}

fn default_azure_region() -> String {
    "westeurope".to_string()
}

fn default_retry_count() -> u32 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_llm_retry_count() -> u32 {
    3
}

fn default_activation_prefix() -> String {
    "Activation".to_string()
}

fn default_io_path() -> String {
    ".".to_string()
}

fn default_output_suffix() -> String {
    "_translated".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

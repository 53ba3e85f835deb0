/*!
 * Translation provider implementations.
 *
 * Providers implement the `Translator` trait (machine translation) or the
 * `Refiner` trait (LLM post-editing). A provider never fails loudly: after
 * its retry budget is spent it returns the original text flagged
 * `failed: true` so the pipeline can degrade gracefully.
 *
 * - `deepl`: DeepL API client with glossary management
 * - `azure`: Azure Cognitive Translator client
 * - `deepseek`: DeepSeek chat-completions refiner
 * - `mock`: configurable in-memory providers for tests
 */

use std::fmt::Debug;

use async_trait::async_trait;

/// Outcome of a provider call. When `failed` is set, `text` carries the
/// input unchanged and must not be cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub text: String,
    pub failed: bool,
}

impl ProviderResult {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }

    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: true,
        }
    }
}

/// No-translate marker syntax understood by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// `<keep>...</keep>` wrapper, honored via XML tag handling
    KeepTag,
    /// `<mstrans:dictionary translation="...">...</mstrans:dictionary>`
    DictionaryTag,
}

/// One translation request routed to a provider
#[derive(Debug, Clone)]
pub struct TranslateRequest {
    /// Unit text, already marker-protected
    pub text: String,
    /// Localization key the unit came from, used for context selection
    pub key_hint: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

/// Machine-translation seam
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate one unit. Exhausted retries and hard API errors degrade
    /// to `failed: true` with the input text.
    async fn translate(&self, request: TranslateRequest) -> ProviderResult;

    /// Marker syntax the protector must use for this provider.
    fn marker_style(&self) -> MarkerStyle;
}

/// LLM post-editing seam
#[async_trait]
pub trait Refiner: Send + Sync + Debug {
    /// Refine an already-translated unit; `failed: true` keeps the input.
    async fn refine(&self, key_hint: &str, text: &str) -> ProviderResult;
}

pub mod azure;
pub mod deepl;
pub mod deepseek;
pub mod mock;

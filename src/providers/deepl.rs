/*!
 * DeepL API client.
 *
 * Form-encoded calls against the free or paid host. Protected spans travel
 * as `<keep>` tags via XML tag handling. Throttling (429) and overload
 * (503) responses are retried with exponential backoff; a 456 means the
 * account character quota is spent, so the call degrades immediately.
 * Also manages the account glossary used for term pinning.
 */

use std::sync::Arc;

use log::{error, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{MarkerStyle, ProviderResult, TranslateRequest, Translator};
use crate::translation::formatting::GLOSSARY_PLACEHOLDER_CHAR;
use crate::translation::retry::{Delay, RetryPolicy, TokioDelay};

const FREE_API_HOST: &str = "https://api-free.deepl.com";
const PAID_API_HOST: &str = "https://api.deepl.com";
const GLOSSARY_NAME: &str = "autoloc-glossary";

/// DeepL subscription tier, which selects the API host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeepLApiMode {
    #[default]
    Free,
    Paid,
}

impl DeepLApiMode {
    fn host(self) -> &'static str {
        match self {
            Self::Free => FREE_API_HOST,
            Self::Paid => PAID_API_HOST,
        }
    }
}

/// Optional request tuning for the translate endpoint
#[derive(Debug, Clone, Default)]
pub struct DeepLOptions {
    /// Glossary to pin terminology with, set after glossary setup
    pub glossary_id: Option<String>,
    /// `formality` request parameter, e.g. `prefer_less`
    pub formality: Option<String>,
    /// Context sentence for regular keys
    pub context_default: Option<String>,
    /// Context sentence for keys in the activation category
    pub context_activation: Option<String>,
    /// Key prefix that selects the activation context
    pub activation_prefix: String,
}

/// Client for the DeepL translation API
#[derive(Debug)]
pub struct DeepL {
    client: Client,
    base_url: String,
    api_key: String,
    options: DeepLOptions,
    retry: RetryPolicy,
    delay: Arc<dyn Delay>,
}

impl DeepL {
    pub fn new(
        api_mode: DeepLApiMode,
        api_key: impl Into<String>,
        options: DeepLOptions,
        retry: RetryPolicy,
    ) -> Self {
        Self::with_delay(api_mode, api_key, options, retry, Arc::new(TokioDelay))
    }

    /// Create a client with an injected delay, for tests that must not
    /// actually wait out the backoff schedule.
    pub fn with_delay(
        api_mode: DeepLApiMode,
        api_key: impl Into<String>,
        options: DeepLOptions,
        retry: RetryPolicy,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: api_mode.host().to_string(),
            api_key: api_key.into(),
            options,
            retry,
            delay,
        }
    }

    /// Point the client at a different host, e.g. a configured proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn set_glossary_id(&mut self, glossary_id: impl Into<String>) {
        self.options.glossary_id = Some(glossary_id.into());
    }

    fn auth_value(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    /// Context parameter for a key: activation-category keys get the
    /// activation context when one is configured, everything else falls
    /// back to the default context.
    fn context_for(&self, key_hint: &str) -> Option<&str> {
        if !self.options.activation_prefix.is_empty()
            && key_hint.starts_with(&self.options.activation_prefix)
        {
            if let Some(context) = &self.options.context_activation {
                return Some(context);
            }
        }
        self.options.context_default.as_deref()
    }

    /// Encode leading/trailing whitespace with the Open Box character so
    /// it survives the TSV glossary upload.
    fn encode_whitespace(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return input.to_string();
        }
        let leading = input.chars().take_while(|c| c.is_whitespace()).count();
        let trailing = input.chars().rev().take_while(|c| c.is_whitespace()).count();
        let mut encoded = String::with_capacity(input.len());
        for _ in 0..leading {
            encoded.push(GLOSSARY_PLACEHOLDER_CHAR);
        }
        encoded.push_str(trimmed);
        for _ in 0..trailing {
            encoded.push(GLOSSARY_PLACEHOLDER_CHAR);
        }
        encoded
    }

    async fn list_glossaries(&self) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v2/glossaries", self.base_url))
            .header("Authorization", self.auth_value())
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }
        let parsed: GlossaryListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(parsed
            .glossaries
            .into_iter()
            .map(|glossary| glossary.glossary_id)
            .collect())
    }

    /// First glossary registered on the account, if any.
    pub async fn get_glossary(&self) -> Result<Option<String>, ProviderError> {
        Ok(self.list_glossaries().await?.into_iter().next())
    }

    /// Upload a fresh glossary from term pairs, optionally deleting every
    /// existing glossary first. Returns the new glossary id.
    pub async fn update_glossary(
        &self,
        delete_existing: bool,
        source_language: &str,
        target_language: &str,
        pairs: &[(String, String)],
    ) -> Result<String, ProviderError> {
        if delete_existing {
            for glossary_id in self.list_glossaries().await? {
                info!("Deleting existing glossary {}", glossary_id);
                let response = self
                    .client
                    .delete(format!("{}/v2/glossaries/{}", self.base_url, glossary_id))
                    .header("Authorization", self.auth_value())
                    .send()
                    .await
                    .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ProviderError::ApiError {
                        status_code: status.as_u16(),
                        message: format!("failed to delete glossary {}", glossary_id),
                    });
                }
            }
        }

        let entries: String = pairs
            .iter()
            .map(|(source, target)| {
                format!(
                    "{}\t{}",
                    Self::encode_whitespace(source),
                    Self::encode_whitespace(target)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let form = vec![
            ("name", GLOSSARY_NAME.to_string()),
            ("source_lang", source_language.to_uppercase()),
            ("target_lang", target_language.to_uppercase()),
            ("entries", entries),
            ("entries_format", "tsv".to_string()),
        ];
        info!("Uploading glossary with {} entries", pairs.len());
        let response = self
            .client
            .post(format!("{}/v2/glossaries", self.base_url))
            .header("Authorization", self.auth_value())
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }
        let created: GlossaryResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(created.glossary_id)
    }
}

#[async_trait::async_trait]
impl Translator for DeepL {
    async fn translate(&self, request: TranslateRequest) -> ProviderResult {
        let url = format!("{}/v2/translate", self.base_url);
        let mut retry_ordinal: u32 = 0;
        loop {
            let mut form: Vec<(&str, String)> = vec![
                ("text", request.text.clone()),
                ("source_lang", request.source_language.to_uppercase()),
                ("target_lang", request.target_language.to_uppercase()),
                ("tag_handling", "xml".to_string()),
                ("ignore_tags", "keep".to_string()),
                ("model_type", "quality_optimized".to_string()),
            ];
            if let Some(glossary_id) = &self.options.glossary_id {
                form.push(("glossary_id", glossary_id.clone()));
            }
            if let Some(formality) = &self.options.formality {
                form.push(("formality", formality.clone()));
            }
            if let Some(context) = self.context_for(&request.key_hint) {
                form.push(("context", context.to_string()));
            }

            let response = self
                .client
                .post(&url)
                .header("Authorization", self.auth_value())
                .form(&form)
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 429 || status == 503 {
                        if retry_ordinal + 1 >= self.retry.max_attempts() {
                            error!(
                                "DeepL still throttling after {} attempts, keeping original text",
                                self.retry.max_attempts()
                            );
                            return ProviderResult::fallback(request.text);
                        }
                        warn!(
                            "DeepL throttled ({}), attempt {}/{}",
                            status,
                            retry_ordinal + 1,
                            self.retry.max_attempts()
                        );
                        self.delay.sleep(self.retry.delay_for(retry_ordinal)).await;
                        retry_ordinal += 1;
                        continue;
                    }
                    if status == 456 {
                        error!("DeepL character quota exhausted, keeping original text");
                        return ProviderResult::fallback(request.text);
                    }
                    if !response.status().is_success() {
                        let message = response.text().await.unwrap_or_default();
                        error!("DeepL API error ({}): {}", status, message);
                        return ProviderResult::fallback(request.text);
                    }
                    match response.json::<TranslationResponse>().await {
                        Ok(parsed) => {
                            return match parsed.translations.into_iter().next() {
                                Some(translation) => ProviderResult::ok(translation.text),
                                None => {
                                    error!("DeepL returned no translations");
                                    ProviderResult::fallback(request.text)
                                }
                            };
                        }
                        Err(e) => {
                            error!("Failed to parse DeepL response: {}", e);
                            return ProviderResult::fallback(request.text);
                        }
                    }
                }
                Err(e) => {
                    if retry_ordinal + 1 >= self.retry.max_attempts() {
                        error!(
                            "DeepL request failed after {} attempts: {}",
                            self.retry.max_attempts(),
                            e
                        );
                        return ProviderResult::fallback(request.text);
                    }
                    warn!(
                        "DeepL request error (attempt {}/{}): {}",
                        retry_ordinal + 1,
                        self.retry.max_attempts(),
                        e
                    );
                    self.delay.sleep(self.retry.delay_for(retry_ordinal)).await;
                    retry_ordinal += 1;
                }
            }
        }
    }

    fn marker_style(&self) -> MarkerStyle {
        MarkerStyle::KeepTag
    }
}

/// Response from the translate endpoint
#[derive(Debug, Deserialize)]
struct TranslationResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GlossaryResponse {
    glossary_id: String,
}

#[derive(Debug, Deserialize)]
struct GlossaryListResponse {
    #[serde(default)]
    glossaries: Vec<GlossaryResponse>,
}

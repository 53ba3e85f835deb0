/*!
 * Azure Cognitive Translator client.
 *
 * JSON calls with subscription key and region headers. Requests go out
 * with `textType=html` so protected spans travel as
 * `mstrans:dictionary` elements; an optional custom category id selects a
 * trained model. Throttling and server errors are retried with backoff,
 * a 403 means the subscription quota is spent and degrades immediately.
 */

use std::sync::Arc;

use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::providers::{MarkerStyle, ProviderResult, TranslateRequest, Translator};
use crate::translation::retry::{Delay, RetryPolicy, TokioDelay};

pub const DEFAULT_AZURE_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

/// Client for the Azure Cognitive Translator API
#[derive(Debug)]
pub struct Azure {
    client: Client,
    endpoint: String,
    api_key: String,
    region: String,
    category_id: Option<String>,
    retry: RetryPolicy,
    delay: Arc<dyn Delay>,
}

impl Azure {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        region: impl Into<String>,
        category_id: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self::with_delay(endpoint, api_key, region, category_id, retry, Arc::new(TokioDelay))
    }

    /// Create a client with an injected delay, for tests that must not
    /// actually wait out the backoff schedule.
    pub fn with_delay(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        region: impl Into<String>,
        category_id: Option<String>,
        retry: RetryPolicy,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            region: region.into(),
            category_id,
            retry,
            delay,
        }
    }

    fn translate_url(&self, source_language: &str, target_language: &str) -> String {
        let mut url = format!(
            "{}/translate?api-version=3.0&from={}&to={}&textType=html",
            self.endpoint, source_language, target_language
        );
        if let Some(category_id) = &self.category_id {
            url.push_str("&category=");
            url.push_str(category_id);
        }
        url
    }
}

#[async_trait::async_trait]
impl Translator for Azure {
    async fn translate(&self, request: TranslateRequest) -> ProviderResult {
        let url = self.translate_url(&request.source_language, &request.target_language);
        let body = vec![TranslateBody {
            text: &request.text,
        }];
        let mut retry_ordinal: u32 = 0;
        loop {
            let response = self
                .client
                .post(&url)
                .header("Ocp-Apim-Subscription-Key", &self.api_key)
                .header("Ocp-Apim-Subscription-Region", &self.region)
                .json(&body)
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 429 || status >= 500 {
                        if retry_ordinal + 1 >= self.retry.max_attempts() {
                            error!(
                                "Azure still failing ({}) after {} attempts, keeping original text",
                                status,
                                self.retry.max_attempts()
                            );
                            return ProviderResult::fallback(request.text);
                        }
                        warn!(
                            "Azure transient error ({}), attempt {}/{}",
                            status,
                            retry_ordinal + 1,
                            self.retry.max_attempts()
                        );
                        self.delay.sleep(self.retry.delay_for(retry_ordinal)).await;
                        retry_ordinal += 1;
                        continue;
                    }
                    if status == 403 {
                        error!("Azure subscription quota exhausted, keeping original text");
                        return ProviderResult::fallback(request.text);
                    }
                    if !response.status().is_success() {
                        let message = response.text().await.unwrap_or_default();
                        error!("Azure API error ({}): {}", status, message);
                        return ProviderResult::fallback(request.text);
                    }
                    match response.json::<Vec<TranslationItem>>().await {
                        Ok(items) => {
                            let translated = items
                                .into_iter()
                                .next()
                                .and_then(|item| item.translations.into_iter().next());
                            return match translated {
                                Some(translation) => ProviderResult::ok(translation.text),
                                None => {
                                    error!("Azure returned no translations");
                                    ProviderResult::fallback(request.text)
                                }
                            };
                        }
                        Err(e) => {
                            error!("Failed to parse Azure response: {}", e);
                            return ProviderResult::fallback(request.text);
                        }
                    }
                }
                Err(e) => {
                    if retry_ordinal + 1 >= self.retry.max_attempts() {
                        error!(
                            "Azure request failed after {} attempts: {}",
                            self.retry.max_attempts(),
                            e
                        );
                        return ProviderResult::fallback(request.text);
                    }
                    warn!(
                        "Azure request error (attempt {}/{}): {}",
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
        MarkerStyle::DictionaryTag
    }
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationItem {
    #[serde(default)]
    translations: Vec<AzureTranslation>,
}

#[derive(Debug, Deserialize)]
struct AzureTranslation {
    text: String,
}

/*!
 * DeepSeek chat-completions client used for LLM refinement.
 *
 * The system prompt comes from configuration; the user message carries the
 * localization key and the machine-translated text so the model can judge
 * register and terminology in context. Only throttling is retried.
 */

use std::sync::Arc;

use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::providers::{ProviderResult, Refiner};
use crate::translation::retry::{Delay, RetryPolicy, TokioDelay};

const API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const MODEL: &str = "deepseek-chat";

/// Client for the DeepSeek chat API
#[derive(Debug)]
pub struct DeepSeek {
    client: Client,
    api_key: String,
    prompt: String,
    retry: RetryPolicy,
    delay: Arc<dyn Delay>,
}

impl DeepSeek {
    pub fn new(api_key: impl Into<String>, prompt: impl Into<String>, retry: RetryPolicy) -> Self {
        Self::with_delay(api_key, prompt, retry, Arc::new(TokioDelay))
    }

    /// Create a client with an injected delay, for tests that must not
    /// actually wait out the backoff schedule.
    pub fn with_delay(
        api_key: impl Into<String>,
        prompt: impl Into<String>,
        retry: RetryPolicy,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            prompt: prompt.into(),
            retry,
            delay,
        }
    }
}

#[async_trait::async_trait]
impl Refiner for DeepSeek {
    async fn refine(&self, key_hint: &str, text: &str) -> ProviderResult {
        let user_content = format!("Key={}\nValue={}", key_hint, text);
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &user_content,
                },
            ],
        };
        let mut retry_ordinal: u32 = 0;
        loop {
            let response = self
                .client
                .post(API_URL)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 429 {
                        if retry_ordinal + 1 >= self.retry.max_attempts() {
                            error!(
                                "DeepSeek still throttling after {} attempts, keeping input text",
                                self.retry.max_attempts()
                            );
                            return ProviderResult::fallback(text);
                        }
                        warn!(
                            "DeepSeek throttled, attempt {}/{}",
                            retry_ordinal + 1,
                            self.retry.max_attempts()
                        );
                        self.delay.sleep(self.retry.delay_for(retry_ordinal)).await;
                        retry_ordinal += 1;
                        continue;
                    }
                    if !response.status().is_success() {
                        let message = response.text().await.unwrap_or_default();
                        error!("DeepSeek API error ({}): {}", status, message);
                        return ProviderResult::fallback(text);
                    }
                    match response.json::<ChatResponse>().await {
                        Ok(parsed) => {
                            let content = parsed
                                .choices
                                .into_iter()
                                .next()
                                .map(|choice| choice.message.content)
                                .unwrap_or_default();
                            let content = content.trim();
                            if content.is_empty() {
                                error!("DeepSeek returned an empty refinement");
                                return ProviderResult::fallback(text);
                            }
                            return ProviderResult::ok(content);
                        }
                        Err(e) => {
                            error!("Failed to parse DeepSeek response: {}", e);
                            return ProviderResult::fallback(text);
                        }
                    }
                }
                Err(e) => {
                    error!("DeepSeek request failed: {}", e);
                    return ProviderResult::fallback(text);
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

//! LLM-backed text completion
//!
//! OpenAI-style chat completions cover OpenAI, DeepSeek, Ollama and any
//! compatible server; Anthropic gets its own messages call.

use super::TextCompletion;
use crate::config::LlmConfig;
use crate::error::{PredictorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const OPENAI_URL: &str = "https://api.openai.com";
const DEEPSEEK_URL: &str = "https://api.deepseek.com";
const ANTHROPIC_URL: &str = "https://api.anthropic.com";
const OLLAMA_URL: &str = "http://localhost:11434";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Where completions come from
#[derive(Debug, Clone, PartialEq)]
pub enum LlmProvider {
    OpenAI {
        api_key: String,
        model: String,
        base_url: String,
    },
    DeepSeek {
        api_key: String,
        model: String,
    },
    Anthropic {
        api_key: String,
        model: String,
    },
    Ollama {
        model: String,
        base_url: String,
    },
    /// Any server speaking the OpenAI chat-completions protocol
    Compatible {
        api_key: Option<String>,
        model: String,
        base_url: String,
    },
}

impl LlmProvider {
    pub fn model(&self) -> &str {
        match self {
            LlmProvider::OpenAI { model, .. }
            | LlmProvider::DeepSeek { model, .. }
            | LlmProvider::Anthropic { model, .. }
            | LlmProvider::Ollama { model, .. }
            | LlmProvider::Compatible { model, .. } => model,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI { .. } => "openai",
            LlmProvider::DeepSeek { .. } => "deepseek",
            LlmProvider::Anthropic { .. } => "anthropic",
            LlmProvider::Ollama { .. } => "ollama",
            LlmProvider::Compatible { .. } => "compatible",
        }
    }
}

/// Chat model with fixed sampling settings
pub struct LlmModel {
    provider: LlmProvider,
    http: Client,
    max_tokens: u32,
    temperature: f64,
}

impl LlmModel {
    pub fn new(provider: LlmProvider) -> Self {
        Self::with_settings(provider, 1000, 0.7, Duration::from_secs(10))
    }

    pub fn with_settings(provider: LlmProvider, max_tokens: u32, temperature: f64, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            provider,
            http,
            max_tokens,
            temperature,
        }
    }

    pub fn openai(api_key: String) -> Self {
        Self::new(LlmProvider::OpenAI {
            api_key,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: OPENAI_URL.to_string(),
        })
    }

    pub fn deepseek(api_key: String) -> Self {
        Self::new(LlmProvider::DeepSeek {
            api_key,
            model: DEFAULT_DEEPSEEK_MODEL.to_string(),
        })
    }

    pub fn anthropic(api_key: String) -> Self {
        Self::new(LlmProvider::Anthropic {
            api_key,
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
        })
    }

    /// Build from the `[llm]` section. Hosted providers need a key.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let needs_key = || {
            if config.api_key.is_empty() {
                Err(PredictorError::LlmNotConfigured)
            } else {
                Ok(config.api_key.clone())
            }
        };
        let model_or = |default: &str| config.model.clone().unwrap_or_else(|| default.to_string());

        let provider = match config.provider.to_lowercase().as_str() {
            "openai" | "gpt" => LlmProvider::OpenAI {
                api_key: needs_key()?,
                model: model_or(DEFAULT_OPENAI_MODEL),
                base_url: config.base_url.clone().unwrap_or_else(|| OPENAI_URL.to_string()),
            },
            "deepseek" => LlmProvider::DeepSeek {
                api_key: needs_key()?,
                model: model_or(DEFAULT_DEEPSEEK_MODEL),
            },
            "anthropic" | "claude" => LlmProvider::Anthropic {
                api_key: needs_key()?,
                model: model_or(DEFAULT_ANTHROPIC_MODEL),
            },
            "ollama" => LlmProvider::Ollama {
                model: model_or(DEFAULT_OLLAMA_MODEL),
                base_url: config.base_url.clone().unwrap_or_else(|| OLLAMA_URL.to_string()),
            },
            "compatible" | "custom" => LlmProvider::Compatible {
                api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
                model: config
                    .model
                    .clone()
                    .ok_or_else(|| PredictorError::Internal("compatible provider needs a model".into()))?,
                base_url: config
                    .base_url
                    .clone()
                    .ok_or_else(|| PredictorError::Internal("compatible provider needs a base_url".into()))?,
            },
            other => {
                return Err(PredictorError::Internal(format!("Unknown LLM provider: {}", other)));
            }
        };

        Ok(Self::with_settings(
            provider,
            config.max_tokens,
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    /// Request body for chat-completion providers
    pub fn chat_request(&self, system: &str, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.provider.model(),
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature
        })
    }

    /// Request body for the Anthropic messages API
    pub fn messages_request(&self, system: &str, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.provider.model(),
            "system": system,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature
        })
    }

    async fn call_chat(&self, base_url: &str, api_key: Option<&str>, system: &str, prompt: &str) -> Result<String> {
        let mut req = self
            .http
            .post(format!("{}/v1/chat/completions", base_url.trim_end_matches('/')))
            .header("content-type", "application/json");

        if let Some(key) = api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp: serde_json::Value = req
            .json(&self.chat_request(system, prompt))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        chat_content(&resp)
    }

    async fn call_anthropic(&self, api_key: &str, system: &str, prompt: &str) -> Result<String> {
        let resp: serde_json::Value = self
            .http
            .post(format!("{}/v1/messages", ANTHROPIC_URL))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&self.messages_request(system, prompt))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        messages_content(&resp)
    }
}

/// Text of the first choice of a chat-completion response
pub fn chat_content(resp: &serde_json::Value) -> Result<String> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| PredictorError::Api("Empty LLM response".into()))
}

/// Text of the first content block of an Anthropic messages response
pub fn messages_content(resp: &serde_json::Value) -> Result<String> {
    resp["content"][0]["text"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| PredictorError::Api("Empty LLM response".into()))
}

#[async_trait]
impl TextCompletion for LlmModel {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        debug!("Requesting completion from {} ({})", self.provider.label(), self.provider.model());

        match &self.provider {
            LlmProvider::OpenAI { api_key, base_url, .. } => {
                self.call_chat(base_url, Some(api_key), system, prompt).await
            }
            LlmProvider::DeepSeek { api_key, .. } => {
                self.call_chat(DEEPSEEK_URL, Some(api_key), system, prompt).await
            }
            LlmProvider::Anthropic { api_key, .. } => self.call_anthropic(api_key, system, prompt).await,
            LlmProvider::Ollama { base_url, .. } => self.call_chat(base_url, None, system, prompt).await,
            LlmProvider::Compatible { api_key, base_url, .. } => {
                self.call_chat(base_url, api_key.as_deref(), system, prompt).await
            }
        }
    }
}

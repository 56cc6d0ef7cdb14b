//! Optional LLM analyst
//!
//! The scoring engine never depends on this: an analysis is extra text stored
//! next to the prompt, and every failure collapses into an [`AnalystOutcome`].

mod llm;

pub use llm::{chat_content, messages_content, LlmModel, LlmProvider};

use crate::config::LlmConfig;
use crate::error::Result;
use crate::predict::PredictionEngine;
use crate::prompts::{generate_prompt, PromptKind};
use crate::types::Game;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub const ANALYST_SYSTEM_PROMPT: &str = "You are an expert NFL analyst with deep knowledge of team statistics, player performance, and game dynamics. Provide detailed, data-driven predictions.";

/// Anything that turns a prompt into text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalystOutcome {
    Text(String),
    /// No `[llm]` section, or a hosted provider without a key
    NotConfigured,
    /// The request or response failed
    Unavailable(String),
}

impl AnalystOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            AnalystOutcome::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Prompt generation plus an optional completion backend
#[derive(Clone)]
pub struct Analyst {
    model: Option<Arc<dyn TextCompletion>>,
    engine: PredictionEngine,
}

impl Analyst {
    pub fn new(model: Option<Arc<dyn TextCompletion>>, engine: PredictionEngine) -> Self {
        Self { model, engine }
    }

    /// A bad `[llm]` section disables analysis instead of failing startup
    pub fn from_config(config: Option<&LlmConfig>, engine: PredictionEngine) -> Self {
        let model = config.and_then(|cfg| match LlmModel::from_config(cfg) {
            Ok(model) => {
                info!("LLM analyst enabled ({} / {})", model.provider().label(), model.provider().model());
                Some(Arc::new(model) as Arc<dyn TextCompletion>)
            }
            Err(e) => {
                warn!("LLM analyst disabled: {}", e);
                None
            }
        });
        Self::new(model, engine)
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn prompt(&self, game: &Game, kind: PromptKind) -> String {
        generate_prompt(self.engine.stats(), self.engine.history(), game, kind)
    }

    pub async fn analyze(&self, game: &Game, kind: PromptKind) -> AnalystOutcome {
        if !self.is_configured() {
            return AnalystOutcome::NotConfigured;
        }
        let prompt = self.prompt(game, kind);
        self.analyze_prompt(&prompt).await
    }

    pub async fn analyze_prompt(&self, prompt: &str) -> AnalystOutcome {
        let Some(model) = &self.model else {
            return AnalystOutcome::NotConfigured;
        };

        match model.complete(ANALYST_SYSTEM_PROMPT, prompt).await {
            Ok(text) => AnalystOutcome::Text(text),
            Err(e) => {
                warn!("AI analysis unavailable: {}", e);
                AnalystOutcome::Unavailable(e.to_string())
            }
        }
    }
}

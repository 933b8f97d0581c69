//! AI configuration service
//!
//! Holds the single stored provider configuration (API key and model).

use super::{optional_text, required_text};
use crate::config::DEFAULT_QWEN_MODEL;
use crate::database::{AiConfig, Repository, SaveAiConfigRequest};
use crate::error::Result;

#[derive(Clone)]
pub struct AiConfigService {
    repo: Repository,
}

impl AiConfigService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn get_config(&self) -> Result<Option<AiConfig>> {
        self.repo.get_ai_config().await
    }

    /// Insert or overwrite the configuration
    pub async fn save_config(&self, req: SaveAiConfigRequest) -> Result<AiConfig> {
        let api_key = required_text(req.api_key.as_deref(), "api_key")?;
        let model_type = optional_text(req.model_type.as_deref()).unwrap_or(DEFAULT_QWEN_MODEL);

        let config = self.repo.save_ai_config(api_key, model_type).await?;
        tracing::info!("AI config saved (model: {})", config.model_type);
        Ok(config)
    }
}

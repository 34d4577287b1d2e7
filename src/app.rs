//! Application state and service initialization
//!
//! Wires the web retriever and the model client into the profile and collateral
//! services from a loaded [`Config`].

use std::sync::Arc;

use crate::model::{Config, ProfileConfig};
use crate::retriever::{ContentExtractor, GenericWebRetriever};
use crate::service::{CollateralService, LlmClient, ModelClient, ModelError, ProfileAssembler};

/// Application state containing all services
pub struct AppState {
    /// Company profile generation
    pub profile_assembler: ProfileAssembler,
    /// Sales collateral generation
    pub collateral_service: CollateralService,
}

impl AppState {
    /// Build application state; fails when no model credentials are configured
    pub fn new(config: Config) -> Result<Self, AppError> {
        let api_key = config
            .openai_api_key
            .as_deref()
            .ok_or(AppError::MissingConfig("OPENAI_API_KEY"))?;

        let llm_client = LlmClient::new(api_key, config.model.as_str())?;
        let model_client: Arc<dyn ModelClient> = Arc::new(llm_client);

        let extractor: Arc<dyn ContentExtractor> = Arc::new(GenericWebRetriever::new(config.fetch));

        Ok(Self::from_parts(model_client, extractor, &config.profile))
    }

    /// Build application state around existing collaborators
    pub fn from_parts(
        model_client: Arc<dyn ModelClient>,
        extractor: Arc<dyn ContentExtractor>,
        profile: &ProfileConfig,
    ) -> Self {
        let profile_assembler =
            ProfileAssembler::from_config(Arc::clone(&model_client), extractor, profile);
        let collateral_service = CollateralService::new(model_client);

        Self {
            profile_assembler,
            collateral_service,
        }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Model client could not be created from the configuration
    #[error("Invalid model configuration: {0}")]
    ModelClient(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let config = Config {
            openai_api_key: None,
            ..Config::default()
        };
        assert!(matches!(
            AppState::new(config),
            Err(AppError::MissingConfig("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_model_client_error_keeps_detail() {
        let config = Config {
            openai_api_key: Some("   ".to_string()),
            ..Config::default()
        };
        match AppState::new(config) {
            Err(err @ AppError::ModelClient(ModelError::NotConfigured(_))) => {
                assert!(err.to_string().contains("OPENAI_API_KEY is empty"));
            }
            Err(other) => panic!("expected model client error, got {other:?}"),
            Ok(_) => panic!("expected model client error"),
        }
    }
}

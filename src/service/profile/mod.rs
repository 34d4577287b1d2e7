//! Company profile generation with provenance-checked claims
//!
//! Builds a prompt from fetched sources, calls the model, and turns its response
//! into a validated [`CompanyProfile`].

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::model::{
    AccountContext, Claim, CompanyProfile, ProfileConfig, ProfileGeneration, Source,
};
use crate::retriever::ContentExtractor;
use crate::service::llm::ModelClient;

pub mod error;
pub mod normalize;
pub mod parser;
pub mod prompts;
pub mod provenance;
pub mod retry;
pub mod validation;

pub use error::{ProfileGenerationError, Stage};
pub use parser::{ParseError, extract_json};
pub use provenance::{ProvenanceReport, coverage};
pub use retry::{RetryError, RetryPolicy, Sleeper, TokioSleeper};
pub use validation::{ClaimPolicy, UnsourcedPolicy, ValidationError, validate_claim};

use prompts::{build_profile_prompt, build_source_context};
use validation::{
    array, enforce_unsourced_ceiling, optional_string, required_string, string_list,
};

/// Extra URLs accepted next to the company URL
pub const MAX_EXTRA_URLS: usize = 2;

/// Orchestrates fetching, prompting, parsing, and validation for one account
pub struct ProfileAssembler {
    model_client: Arc<dyn ModelClient>,
    extractor: Arc<dyn ContentExtractor>,
    sleeper: Arc<dyn Sleeper>,
    retry: RetryPolicy,
    claim_policy: ClaimPolicy,
    unsourced_policy: UnsourcedPolicy,
}

impl ProfileAssembler {
    /// Create an assembler with default policies (strict claims, two model attempts)
    pub fn new(model_client: Arc<dyn ModelClient>, extractor: Arc<dyn ContentExtractor>) -> Self {
        Self {
            model_client,
            extractor,
            sleeper: Arc::new(TokioSleeper),
            retry: RetryPolicy::default(),
            claim_policy: ClaimPolicy::default(),
            unsourced_policy: UnsourcedPolicy::default(),
        }
    }

    /// Create an assembler configured from the `profile` config section
    pub fn from_config(
        model_client: Arc<dyn ModelClient>,
        extractor: Arc<dyn ContentExtractor>,
        config: &ProfileConfig,
    ) -> Self {
        tracing::info!(
            claim_policy = ?config.claim_policy,
            unsourced_claims = ?config.unsourced_claims,
            max_attempts = config.max_attempts,
            "Profile assembler initialized"
        );
        Self::new(model_client, extractor)
            .with_retry_policy(config.retry_policy())
            .with_claim_policy(config.claim_policy)
            .with_unsourced_policy(config.unsourced_claims)
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_claim_policy(mut self, policy: ClaimPolicy) -> Self {
        self.claim_policy = policy;
        self
    }

    pub fn with_unsourced_policy(mut self, policy: UnsourcedPolicy) -> Self {
        self.unsourced_policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Fetch the company URL and up to [`MAX_EXTRA_URLS`] extra URLs.
    ///
    /// More extra URLs than that is rejected before anything is fetched. A failed fetch
    /// is recorded as an errored source and does not stop the others.
    pub async fn fetch_sources(
        &self,
        company_url: &str,
        extra_urls: &[String],
    ) -> Result<Vec<Source>, ProfileGenerationError> {
        let extras: Vec<&str> = extra_urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .collect();
        if extras.len() > MAX_EXTRA_URLS {
            tracing::warn!(given = extras.len(), max = MAX_EXTRA_URLS, "Too many extra URLs");
            return Err(ProfileGenerationError::TooManyExtraUrls {
                given: extras.len(),
                max: MAX_EXTRA_URLS,
            });
        }

        let mut urls: Vec<&str> = vec![company_url.trim()];
        for url in extras {
            if !urls.contains(&url) {
                urls.push(url);
            }
        }

        let mut sources = Vec::with_capacity(urls.len());
        for url in urls {
            match self.extractor.fetch(url).await {
                Ok(content) => {
                    tracing::debug!(url = %url, title = %content.title, "Fetched source");
                    sources.push(Source::fetched(url, content.title, &content.text));
                }
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "Failed to fetch source");
                    sources.push(Source::failed(url, e.to_string()));
                }
            }
        }

        tracing::info!(
            total = sources.len(),
            successful = sources.iter().filter(|s| s.is_success()).count(),
            "Source fetching complete"
        );
        Ok(sources)
    }

    /// Assemble a profile and compute its provenance coverage
    pub async fn generate(
        &self,
        account: &AccountContext,
        sources: &[Source],
    ) -> Result<ProfileGeneration, ProfileGenerationError> {
        let start_time = std::time::Instant::now();
        let (profile, model_attempts) = self.assemble_counted(account, sources).await?;
        let report = ProvenanceReport::from_claims(&profile.claims);

        tracing::info!(
            account = %account.name,
            elapsed_ms = start_time.elapsed().as_millis(),
            claims = report.total,
            claims_with_source_url = report.with_source_url,
            sourced_claims = report.sourced,
            over_ceiling = report.over_ceiling,
            provenance_coverage = report.coverage,
            model_attempts = model_attempts,
            "Profile generated"
        );

        Ok(ProfileGeneration {
            provenance_coverage: report.coverage,
            profile,
            model_attempts,
        })
    }

    /// Assemble a company profile from the account's sources
    pub async fn assemble(
        &self,
        account: &AccountContext,
        sources: &[Source],
    ) -> Result<CompanyProfile, ProfileGenerationError> {
        self.assemble_counted(account, sources)
            .await
            .map(|(profile, _)| profile)
    }

    async fn assemble_counted(
        &self,
        account: &AccountContext,
        sources: &[Source],
    ) -> Result<(CompanyProfile, u32), ProfileGenerationError> {
        let usable: Vec<&Source> = sources.iter().filter(|s| s.is_success()).collect();
        if usable.is_empty() {
            tracing::warn!(
                account = %account.name,
                sources = sources.len(),
                "No successful sources, skipping model call"
            );
            return Err(ProfileGenerationError::NoSources);
        }

        let source_context = build_source_context(usable.iter().copied());
        let prompt = build_profile_prompt(account, &source_context);

        tracing::debug!(
            account = %account.name,
            sources = usable.len(),
            prompt_length = prompt.len(),
            "Requesting company profile from model"
        );

        let (response, attempts) = self
            .retry
            .run(self.sleeper.as_ref(), || self.model_client.complete(&prompt))
            .await
            .inspect_err(|e| {
                tracing::error!(account = %account.name, error = %e, "Model call failed");
            })?;

        let object = extract_json(&response).inspect_err(|e| {
            tracing::error!(
                account = %account.name,
                error = %e,
                response_length = response.len(),
                "Model response is not a JSON object"
            );
        })?;

        let profile = self.decode_profile(&object)?;
        Ok((profile, attempts))
    }

    /// Strict decode of the model's profile object
    fn decode_profile(
        &self,
        object: &Map<String, Value>,
    ) -> Result<CompanyProfile, ProfileGenerationError> {
        let field = ProfileGenerationError::profile_field;

        Ok(CompanyProfile {
            company_name: required_string(object, "company_name").map_err(field)?,
            industry: optional_string(object, "industry").map_err(field)?,
            size_hint: optional_string(object, "size_hint").map_err(field)?,
            products: string_list(object, "products").map_err(field)?,
            pain_points: string_list(object, "pain_points").map_err(field)?,
            recent_events: string_list(object, "recent_events").map_err(field)?,
            claims: self.validate_claims(array(object, "claims").map_err(field)?)?,
        })
    }

    /// Validate every claim under the configured policies
    fn validate_claims(&self, raw_claims: &[Value]) -> Result<Vec<Claim>, ProfileGenerationError> {
        let mut claims = Vec::with_capacity(raw_claims.len());
        let mut skipped = 0;

        for (index, raw) in raw_claims.iter().enumerate() {
            let result = validate_claim(raw)
                .and_then(|claim| enforce_unsourced_ceiling(claim, self.unsourced_policy));

            match (result, self.claim_policy) {
                (Ok(claim), _) => claims.push(claim),
                (Err(e), ClaimPolicy::Strict) => {
                    tracing::error!(
                        claim_index = index,
                        field = e.field(),
                        error = %e,
                        "Invalid claim, rejecting batch"
                    );
                    return Err(ProfileGenerationError::claim(index, e));
                }
                (Err(e), ClaimPolicy::SkipInvalid) => {
                    tracing::warn!(
                        claim_index = index,
                        field = e.field(),
                        error = %e,
                        "Skipping invalid claim"
                    );
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(
                skipped = skipped,
                kept = claims.len(),
                "Dropped invalid claims from batch"
            );
        }

        Ok(claims)
    }
}

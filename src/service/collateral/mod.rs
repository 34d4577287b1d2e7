//! Sales collateral generation
//!
//! Email drafts, pitch outlines and meeting summaries are generated from the claims of
//! an assembled profile. Only claims above a confidence threshold reach the prompts.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{
    AccountContext, Claim, CompanyProfile, EmailDraft, MeetingSummary, Persona, PitchOutline,
};
use crate::service::llm::ModelClient;
use crate::service::profile::{RetryPolicy, Sleeper, TokioSleeper, extract_json};

pub mod error;
pub mod prompts;

pub use error::CollateralError;

use prompts::{
    build_claim_context, build_email_prompt, build_meeting_summary_prompt, build_pitch_prompt,
};

/// Claims must be above this confidence to be used in emails and pitches
pub const OUTREACH_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Claims must be above this confidence to be shown as landing-page proof points
pub const PROOF_POINT_CONFIDENCE_THRESHOLD: f64 = 0.7;

const EMAIL_CLAIM_LIMIT: usize = 5;
const PITCH_CLAIM_LIMIT: usize = 8;
const PROOF_POINT_LIMIT: usize = 3;

const EMAIL_MAX_WORDS: usize = 200;
const EMAIL_MAX_CHARS: usize = 1000;
const PITCH_AGENDA_RANGE: std::ops::RangeInclusive<usize> = 6..=8;
const PITCH_OBJECTIONS: usize = 2;
const TRANSCRIPT_MAX_CHARS: usize = 8000;

/// Of the first `limit` claims, those above `threshold`
pub fn select_claims(claims: &[Claim], threshold: f64, limit: usize) -> Vec<&Claim> {
    claims
        .iter()
        .take(limit)
        .filter(|c| c.confidence > threshold)
        .collect()
}

/// Up to three high-confidence claims for landing-page proof points
pub fn proof_points(claims: &[Claim]) -> Vec<&Claim> {
    claims
        .iter()
        .filter(|c| c.confidence > PROOF_POINT_CONFIDENCE_THRESHOLD)
        .take(PROOF_POINT_LIMIT)
        .collect()
}

#[derive(Deserialize)]
struct GeneratedEmail {
    subject: String,
    body: String,
    cta: String,
}

/// Service for generating outreach collateral from profile claims
pub struct CollateralService {
    model_client: Arc<dyn ModelClient>,
    sleeper: Arc<dyn Sleeper>,
    retry: RetryPolicy,
}

impl CollateralService {
    /// Same default retry as profile generation: one retry after a one second wait
    pub fn new(model_client: Arc<dyn ModelClient>) -> Self {
        Self {
            model_client,
            sleeper: Arc::new(TokioSleeper),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Generate a persona-targeted email draft
    pub async fn generate_email(
        &self,
        account: &AccountContext,
        profile: &CompanyProfile,
        persona: Persona,
    ) -> Result<EmailDraft, CollateralError> {
        let claims = self.outreach_claims(profile, EMAIL_CLAIM_LIMIT)?;
        let context = build_claim_context(account, Some(profile), &claims);
        let generated: GeneratedEmail = self
            .request("email", &build_email_prompt(persona, &context))
            .await?;

        let draft = EmailDraft {
            persona,
            subject: non_empty("email", "subject", generated.subject)?,
            body: non_empty("email", "body", generated.body)?,
            cta: non_empty("email", "cta", generated.cta)?,
        };

        let words = draft.body.split_whitespace().count();
        let chars = draft.body.chars().count();
        if words > EMAIL_MAX_WORDS || chars > EMAIL_MAX_CHARS {
            return Err(CollateralError::Invalid {
                kind: "email",
                reason: format!(
                    "body has {} words and {} chars, limits are {} and {}",
                    words, chars, EMAIL_MAX_WORDS, EMAIL_MAX_CHARS
                ),
            });
        }

        tracing::info!(
            account = %account.name,
            persona = %persona,
            claims_used = claims.len(),
            body_words = words,
            "Email draft generated"
        );
        Ok(draft)
    }

    /// Generate a pitch outline with objection handling
    pub async fn generate_pitch(
        &self,
        account: &AccountContext,
        profile: &CompanyProfile,
    ) -> Result<PitchOutline, CollateralError> {
        let claims = self.outreach_claims(profile, PITCH_CLAIM_LIMIT)?;
        let context = build_claim_context(account, Some(profile), &claims);
        let pitch: PitchOutline = self
            .request("pitch", &build_pitch_prompt(account, &context))
            .await?;

        if !PITCH_AGENDA_RANGE.contains(&pitch.agenda.len()) {
            return Err(CollateralError::Invalid {
                kind: "pitch",
                reason: format!(
                    "agenda has {} items, expected {} to {}",
                    pitch.agenda.len(),
                    PITCH_AGENDA_RANGE.start(),
                    PITCH_AGENDA_RANGE.end()
                ),
            });
        }
        if pitch.objections.len() != PITCH_OBJECTIONS {
            return Err(CollateralError::Invalid {
                kind: "pitch",
                reason: format!(
                    "{} objections, expected exactly {}",
                    pitch.objections.len(),
                    PITCH_OBJECTIONS
                ),
            });
        }

        tracing::info!(
            account = %account.name,
            agenda_items = pitch.agenda.len(),
            claims_used = claims.len(),
            "Pitch outline generated"
        );
        Ok(pitch)
    }

    /// Summarize a meeting transcript into next steps, blockers and objections
    pub async fn generate_meeting_summary(
        &self,
        transcript: &str,
    ) -> Result<MeetingSummary, CollateralError> {
        let transcript: String = transcript.trim().chars().take(TRANSCRIPT_MAX_CHARS).collect();
        let mut summary: MeetingSummary = self
            .request("meeting summary", &build_meeting_summary_prompt(&transcript))
            .await?;
        summary.summary = non_empty("meeting summary", "summary", summary.summary)?;

        tracing::info!(
            next_steps = summary.next_steps.len(),
            blockers = summary.blockers.len(),
            objections = summary.objections.len(),
            "Meeting summary generated"
        );
        Ok(summary)
    }

    fn outreach_claims<'a>(
        &self,
        profile: &'a CompanyProfile,
        limit: usize,
    ) -> Result<Vec<&'a Claim>, CollateralError> {
        if profile.claims.is_empty() {
            return Err(CollateralError::NoClaims);
        }
        Ok(select_claims(
            &profile.claims,
            OUTREACH_CONFIDENCE_THRESHOLD,
            limit,
        ))
    }

    /// Call the model, extract its JSON object and decode it strictly into `T`
    async fn request<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        prompt: &str,
    ) -> Result<T, CollateralError> {
        let (response, attempts) = self
            .retry
            .run(self.sleeper.as_ref(), || self.model_client.complete(prompt))
            .await?;

        tracing::debug!(kind = kind, attempts = attempts, "Collateral response received");

        let object = extract_json(&response)?;
        serde_json::from_value(Value::Object(object)).map_err(|e| CollateralError::Invalid {
            kind,
            reason: e.to_string(),
        })
    }
}

fn non_empty(kind: &'static str, field: &str, value: String) -> Result<String, CollateralError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CollateralError::Invalid {
            kind,
            reason: format!("'{}' is empty", field),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::llm::ModelError;
    use crate::service::profile::retry::tests::RecordingSleeper;
    use crate::service::profile::tests::ScriptedModel;
    use std::time::Duration;

    fn claim(text: &str, confidence: f64) -> Claim {
        Claim {
            text: text.to_string(),
            source_url: Some("https://acme.test".to_string()),
            evidence_quote: Some(text.to_string()),
            confidence,
        }
    }

    fn account() -> AccountContext {
        AccountContext::new("Acme", "acme.test")
    }

    fn profile(claims: Vec<Claim>) -> CompanyProfile {
        CompanyProfile {
            company_name: "Acme".to_string(),
            industry: Some("Manufacturing".to_string()),
            size_hint: None,
            products: vec!["Anvil".to_string()],
            pain_points: vec![],
            recent_events: vec![],
            claims,
        }
    }

    #[test]
    fn test_select_claims_threshold_and_limit() {
        let claims = vec![
            claim("a", 0.9),
            claim("b", 0.5),
            claim("c", 0.6),
            claim("d", 0.95),
        ];
        let texts: Vec<&str> = select_claims(&claims, OUTREACH_CONFIDENCE_THRESHOLD, 3)
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[test]
    fn test_proof_points() {
        let claims = vec![
            claim("a", 0.71),
            claim("b", 0.7),
            claim("c", 0.8),
            claim("d", 0.9),
            claim("e", 0.99),
        ];
        let texts: Vec<&str> = proof_points(&claims).iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn test_email_uses_only_confident_claims() {
        let body = "word ".repeat(150);
        let response = serde_json::json!({
            "persona": "Exec",
            "subject": "Anvils at scale",
            "body": body,
            "cta": "Book a demo"
        })
        .to_string();
        let model = ScriptedModel::replying(&response);
        let service = CollateralService::new(model.clone());
        let profile = profile(vec![
            claim("Acme ships to 40 countries", 0.9),
            claim("Acme may be expanding", 0.3),
        ]);

        let draft = service
            .generate_email(&account(), &profile, Persona::Buyer)
            .await
            .unwrap();

        assert_eq!(draft.persona, Persona::Buyer);
        assert_eq!(draft.cta, "Book a demo");
        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("- Acme ships to 40 countries"));
        assert!(!prompt.contains("Acme may be expanding"));
        assert!(prompt.contains("Industry: Manufacturing"));
    }

    #[tokio::test]
    async fn test_email_body_word_limit() {
        let response = serde_json::json!({
            "subject": "Hi",
            "body": "word ".repeat(201),
            "cta": "Reply"
        })
        .to_string();
        let service = CollateralService::new(ScriptedModel::replying(&response));

        let err = service
            .generate_email(&account(), &profile(vec![claim("x", 0.9)]), Persona::Exec)
            .await
            .unwrap_err();
        assert!(matches!(err, CollateralError::Invalid { kind: "email", .. }));
    }

    #[tokio::test]
    async fn test_no_claims_skips_model() {
        let model = ScriptedModel::replying("{}");
        let service = CollateralService::new(model.clone());

        let err = service
            .generate_pitch(&account(), &profile(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, CollateralError::NoClaims));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_pitch_shape_is_enforced() {
        let objections = serde_json::json!([
            {"objection": "Budget", "response": "Phased rollout"},
            {"objection": "Integration", "response": "Open APIs"}
        ]);
        let valid = serde_json::json!({
            "agenda": ["1", "2", "3", "4", "5", "6"],
            "objections": objections
        })
        .to_string();
        let too_short = serde_json::json!({
            "agenda": ["1", "2", "3"],
            "objections": objections
        })
        .to_string();

        let service = CollateralService::new(ScriptedModel::replying(&format!("```json\n{valid}\n```")));
        let pitch = service
            .generate_pitch(&account(), &profile(vec![claim("x", 0.9)]))
            .await
            .unwrap();
        assert_eq!(pitch.agenda.len(), 6);
        assert_eq!(pitch.objections[1].response, "Open APIs");

        let service = CollateralService::new(ScriptedModel::replying(&too_short));
        let err = service
            .generate_pitch(&account(), &profile(vec![claim("x", 0.9)]))
            .await
            .unwrap_err();
        assert!(matches!(err, CollateralError::Invalid { kind: "pitch", .. }));
    }

    #[tokio::test]
    async fn test_meeting_summary() {
        let response = r#"{
            "summary": "Discussed rollout",
            "next_steps": [
                {"owner": "Dana", "task": "Send pricing", "due_date": "2026-11-02"},
                {"owner": "Lee", "task": "Security review", "due_date": null}
            ],
            "blockers": ["Budget freeze"]
        }"#;
        let model = ScriptedModel::replying(response);
        let service = CollateralService::new(model.clone());

        let summary = service
            .generate_meeting_summary(&"talk ".repeat(3000))
            .await
            .unwrap();

        assert_eq!(summary.next_steps.len(), 2);
        assert_eq!(
            summary.next_steps[0].due_date,
            chrono::NaiveDate::from_ymd_opt(2026, 11, 2)
        );
        assert_eq!(summary.next_steps[1].due_date, None);
        assert!(summary.objections.is_empty());
        assert!(!model.last_prompt().unwrap().contains(&"talk ".repeat(1700)));
    }

    #[tokio::test]
    async fn test_transient_model_failure_is_retried() {
        let model = ScriptedModel::new(vec![
            Err(ModelError::Transport("connection reset".to_string())),
            Ok(r#"{"summary": "ok"}"#.to_string()),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let service = CollateralService::new(model.clone()).with_sleeper(sleeper.clone());

        let summary = service.generate_meeting_summary("hello").await.unwrap();

        assert_eq!(summary.summary, "ok");
        assert_eq!(model.calls(), 2);
        assert_eq!(*sleeper.slept.lock().unwrap(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn test_model_failure_surfaces_after_retry() {
        let model = ScriptedModel::new(vec![
            Err(ModelError::Transport("reset".to_string())),
            Err(ModelError::Transport("reset".to_string())),
        ]);
        let service = CollateralService::new(model.clone())
            .with_sleeper(Arc::new(RecordingSleeper::default()));

        let err = service.generate_meeting_summary("hello").await.unwrap_err();

        assert!(matches!(err, CollateralError::Model(_)));
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_parse_failure_surfaces() {
        let service = CollateralService::new(ScriptedModel::replying("Sure! Here is your summary."));
        let err = service.generate_meeting_summary("hello").await.unwrap_err();
        assert!(matches!(err, CollateralError::Parse(_)));
    }
}

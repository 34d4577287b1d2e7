//! Validation of model-produced claim and profile records
//!
//! Decoding is strict: a field that is present with the wrong JSON type is an
//! error, never coerced. Absent optional fields fall back to empty values.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::parser::json_kind;
use crate::model::{Claim, UNSOURCED_CONFIDENCE_CEILING};

/// What to do with a batch that contains an invalid claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPolicy {
    /// Any invalid claim fails the whole profile
    #[default]
    Strict,
    /// Invalid claims are dropped and logged
    SkipInvalid,
}

/// How unsourced claims above [`UNSOURCED_CONFIDENCE_CEILING`] are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsourcedPolicy {
    /// Accept as returned; the prompt asks the model to stay under the ceiling
    #[default]
    Honor,
    /// Lower the confidence to the ceiling
    Cap,
    /// Treat the claim as invalid
    Reject,
}

/// Error type for claim and profile validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    Missing { field: &'static str },

    #[error("field '{field}' must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' must not be empty")]
    Empty { field: &'static str },

    #[error("field '{field}' must be within [0.0, 1.0], found {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error(
        "unsourced claim has confidence {value}, above the {ceiling} ceiling for claims without provenance"
    )]
    UnsourcedConfidence { value: f64, ceiling: f64 },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::Empty { field }
            | ValidationError::OutOfRange { field, .. } => field,
            ValidationError::UnsourcedConfidence { .. } => "confidence",
        }
    }
}

/// Validate one raw claim record
pub fn validate_claim(raw: &Value) -> Result<Claim, ValidationError> {
    let object = raw.as_object().ok_or(ValidationError::WrongType {
        field: "claim",
        expected: "an object",
        found: json_kind(raw),
    })?;

    let text = required_string(object, "text")?;
    let confidence = confidence(object)?;
    let source_url = optional_string(object, "source_url")?;
    let evidence_quote = optional_string(object, "evidence_quote")?;

    Ok(Claim {
        text,
        source_url,
        evidence_quote,
        confidence,
    })
}

/// Apply the unsourced-confidence policy to a validated claim
pub fn enforce_unsourced_ceiling(
    mut claim: Claim,
    policy: UnsourcedPolicy,
) -> Result<Claim, ValidationError> {
    if !claim.exceeds_unsourced_ceiling() {
        return Ok(claim);
    }

    match policy {
        UnsourcedPolicy::Honor => {
            tracing::warn!(
                confidence = claim.confidence,
                ceiling = UNSOURCED_CONFIDENCE_CEILING,
                claim = %truncate(&claim.text, 80),
                "Unsourced claim exceeds confidence ceiling"
            );
            Ok(claim)
        }
        UnsourcedPolicy::Cap => {
            tracing::debug!(
                confidence = claim.confidence,
                ceiling = UNSOURCED_CONFIDENCE_CEILING,
                "Capping confidence of unsourced claim"
            );
            claim.confidence = UNSOURCED_CONFIDENCE_CEILING;
            Ok(claim)
        }
        UnsourcedPolicy::Reject => Err(ValidationError::UnsourcedConfidence {
            value: claim.confidence,
            ceiling: UNSOURCED_CONFIDENCE_CEILING,
        }),
    }
}

/// Non-empty string field
pub fn required_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ValidationError::Missing { field }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::Empty { field }),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(wrong_type(field, "a string", other)),
    }
}

/// String-or-null field; blank strings read as absent
pub fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(wrong_type(field, "a string or null", other)),
    }
}

/// Array-of-strings field; absent or null reads as empty
pub fn string_list(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                other => Err(wrong_type(field, "an array of strings", other)),
            })
            .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
            .collect(),
        Some(other) => Err(wrong_type(field, "an array of strings", other)),
    }
}

/// Array field; absent or null reads as empty
pub fn array<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a [Value], ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(wrong_type(field, "an array", other)),
    }
}

fn confidence(object: &Map<String, Value>) -> Result<f64, ValidationError> {
    const FIELD: &str = "confidence";
    let value = match object.get(FIELD) {
        None | Some(Value::Null) => return Err(ValidationError::Missing { field: FIELD }),
        Some(Value::Number(n)) => n.as_f64().ok_or(ValidationError::WrongType {
            field: FIELD,
            expected: "a number",
            found: "a non-finite number",
        })?,
        Some(other) => return Err(wrong_type(FIELD, "a number", other)),
    };

    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: FIELD,
            value,
        });
    }
    Ok(value)
}

fn wrong_type(field: &'static str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::WrongType {
        field,
        expected,
        found: json_kind(found),
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_unsourced_claim() {
        let claim = validate_claim(&json!({
            "text": "test",
            "source_url": null,
            "evidence_quote": null,
            "confidence": 0.2
        }))
        .unwrap();

        assert_eq!(claim.text, "test");
        assert_eq!(claim.source_url, None);
        assert_eq!(claim.confidence, 0.2);
        assert!(!claim.is_sourced());
    }

    #[test]
    fn test_valid_sourced_claim() {
        let claim = validate_claim(&json!({
            "text": "Acme ships to 40 countries",
            "source_url": "https://acme.test/about",
            "evidence_quote": "We ship to 40 countries",
            "confidence": 0.9
        }))
        .unwrap();

        assert!(claim.is_sourced());
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let claim = validate_claim(&json!({"text": "t", "confidence": 1})).unwrap();
        assert_eq!(claim.evidence_quote, None);
        assert_eq!(claim.confidence, 1.0);
    }

    #[test]
    fn test_text_missing_or_empty() {
        let err = validate_claim(&json!({"confidence": 0.5})).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "text" });

        let err = validate_claim(&json!({"text": "  ", "confidence": 0.5})).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "text" });

        let err = validate_claim(&json!({"text": 7, "confidence": 0.5})).unwrap_err();
        assert_eq!(err.field(), "text");
    }

    #[test]
    fn test_confidence_out_of_range() {
        for value in [-0.01, 1.01, 5.0, -3.0] {
            let err = validate_claim(&json!({"text": "t", "confidence": value})).unwrap_err();
            assert!(
                matches!(err, ValidationError::OutOfRange { field: "confidence", .. }),
                "{value} should be out of range"
            );
        }
    }

    #[test]
    fn test_confidence_bounds_are_inclusive() {
        for value in [0.0, 1.0] {
            assert!(validate_claim(&json!({"text": "t", "confidence": value})).is_ok());
        }
    }

    #[test]
    fn test_confidence_must_be_numeric() {
        let err = validate_claim(&json!({"text": "t", "confidence": "0.5"})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType {
                field: "confidence",
                expected: "a number",
                found: "string"
            }
        );

        let err = validate_claim(&json!({"text": "t"})).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "confidence" });
    }

    #[test]
    fn test_provenance_type_mismatch() {
        let err = validate_claim(&json!({"text": "t", "confidence": 0.5, "source_url": 42}))
            .unwrap_err();
        assert_eq!(err.field(), "source_url");

        let err = validate_claim(&json!({
            "text": "t",
            "confidence": 0.5,
            "evidence_quote": ["a", "b"]
        }))
        .unwrap_err();
        assert_eq!(err.field(), "evidence_quote");
    }

    #[test]
    fn test_claim_must_be_object() {
        let err = validate_claim(&json!("Acme sells anvils")).unwrap_err();
        assert_eq!(err.field(), "claim");
    }

    #[test]
    fn test_unsourced_policies() {
        let claim = Claim {
            text: "Acme is growing fast".to_string(),
            source_url: None,
            evidence_quote: None,
            confidence: 0.8,
        };

        let honored = enforce_unsourced_ceiling(claim.clone(), UnsourcedPolicy::Honor).unwrap();
        assert_eq!(honored.confidence, 0.8);

        let capped = enforce_unsourced_ceiling(claim.clone(), UnsourcedPolicy::Cap).unwrap();
        assert_eq!(capped.confidence, UNSOURCED_CONFIDENCE_CEILING);

        let err = enforce_unsourced_ceiling(claim, UnsourcedPolicy::Reject).unwrap_err();
        assert_eq!(err.field(), "confidence");
    }

    #[test]
    fn test_sourced_claims_ignore_ceiling() {
        let claim = Claim {
            text: "Acme has 200 employees".to_string(),
            source_url: Some("https://acme.test".to_string()),
            evidence_quote: Some("our 200 employees".to_string()),
            confidence: 0.95,
        };
        let kept = enforce_unsourced_ceiling(claim, UnsourcedPolicy::Reject).unwrap();
        assert_eq!(kept.confidence, 0.95);
    }

    #[test]
    fn test_string_list() {
        let object = json!({"products": ["Anvil", " ", "Rocket"], "pain_points": "none"});
        let object = object.as_object().unwrap();

        assert_eq!(string_list(object, "products").unwrap(), vec!["Anvil", "Rocket"]);
        assert!(string_list(object, "recent_events").unwrap().is_empty());
        assert_eq!(string_list(object, "pain_points").unwrap_err().field(), "pain_points");
    }
}

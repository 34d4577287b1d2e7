use serde::{Deserialize, Serialize};

/// Confidence ceiling the generation prompt asks the model to respect for
/// claims that carry no provenance.
pub const UNSOURCED_CONFIDENCE_CEILING: f64 = 0.3;

// Describes one atomic assertion made about a prospect company
// - text: what we are claiming
// - source_url / evidence_quote: where it came from (provenance)
// - confidence: how strongly the model believes it, in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    pub source_url: Option<String>,
    pub evidence_quote: Option<String>,
    pub confidence: f64,
}

impl Claim {
    /// Claim points at a source URL; this is what provenance coverage counts.
    pub fn has_source_url(&self) -> bool {
        is_present(self.source_url.as_deref())
    }

    /// A claim is sourced when it carries both a source URL and an evidence quote.
    pub fn is_sourced(&self) -> bool {
        is_present(self.source_url.as_deref()) && is_present(self.evidence_quote.as_deref())
    }

    /// Unsourced claim whose confidence exceeds what the prompt allows for it.
    pub fn exceeds_unsourced_ceiling(&self) -> bool {
        !self.is_sourced() && self.confidence > UNSOURCED_CONFIDENCE_CEILING
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

use serde::{Deserialize, Serialize};

use super::claims::Claim;

/// Company profile assembled from one generation cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: Option<String>,
    pub size_hint: Option<String>,
    pub products: Vec<String>,
    pub pain_points: Vec<String>,
    pub recent_events: Vec<String>,
    pub claims: Vec<Claim>,
}

impl CompanyProfile {
    /// Fraction of claims with a source URL; 0.0 for an empty claim list
    pub fn provenance_coverage(&self) -> f64 {
        crate::service::profile::provenance::coverage(self)
    }

    pub fn sourced_claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter().filter(|c| c.is_sourced())
    }
}

/// Result of [`ProfileAssembler::generate`](crate::service::profile::ProfileAssembler::generate):
/// the profile plus the metrics a persistence layer records next to it.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileGeneration {
    pub profile: CompanyProfile,
    pub provenance_coverage: f64,
    pub model_attempts: u32,
}

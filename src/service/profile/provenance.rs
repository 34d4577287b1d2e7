//! Provenance coverage metrics over an assembled profile

use serde::Serialize;

use crate::model::{Claim, CompanyProfile};

/// Fraction of the profile's claims with a source URL; 0.0 when there are none
pub fn coverage(profile: &CompanyProfile) -> f64 {
    ProvenanceReport::from_claims(&profile.claims).coverage
}

/// Aggregate provenance figures for a claim batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvenanceReport {
    pub total: usize,
    /// Claims with a source URL, the coverage numerator
    pub with_source_url: usize,
    /// Claims with both a source URL and an evidence quote
    pub sourced: usize,
    pub unsourced: usize,
    /// Unsourced claims whose confidence is above the unsourced ceiling
    pub over_ceiling: usize,
    pub coverage: f64,
    pub mean_confidence: f64,
}

impl ProvenanceReport {
    pub fn from_claims(claims: &[Claim]) -> Self {
        let total = claims.len();
        let with_source_url = claims.iter().filter(|c| c.has_source_url()).count();
        let sourced = claims.iter().filter(|c| c.is_sourced()).count();
        let over_ceiling = claims.iter().filter(|c| c.exceeds_unsourced_ceiling()).count();

        let (coverage, mean_confidence) = if total == 0 {
            (0.0, 0.0)
        } else {
            let confidence_sum: f64 = claims.iter().map(|c| c.confidence).sum();
            (with_source_url as f64 / total as f64, confidence_sum / total as f64)
        };

        Self {
            total,
            with_source_url,
            sourced,
            unsourced: total - sourced,
            over_ceiling,
            coverage,
            mean_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(sourced: bool, confidence: f64) -> Claim {
        Claim {
            text: "claim".to_string(),
            source_url: sourced.then(|| "https://acme.test".to_string()),
            evidence_quote: sourced.then(|| "quote".to_string()),
            confidence,
        }
    }

    fn profile(claims: Vec<Claim>) -> CompanyProfile {
        CompanyProfile {
            company_name: "Acme".to_string(),
            industry: None,
            size_hint: None,
            products: vec![],
            pain_points: vec![],
            recent_events: vec![],
            claims,
        }
    }

    #[test]
    fn test_empty_profile_has_zero_coverage() {
        let value = coverage(&profile(vec![]));
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }

    #[test]
    fn test_all_sourced_is_full_coverage() {
        assert_eq!(coverage(&profile(vec![claim(true, 0.9), claim(true, 0.6)])), 1.0);
    }

    #[test]
    fn test_partial_coverage() {
        let p = profile(vec![claim(true, 0.9), claim(false, 0.2), claim(false, 0.1), claim(true, 0.8)]);
        assert_eq!(coverage(&p), 0.5);
        assert_eq!(p.provenance_coverage(), 0.5);
    }

    #[test]
    fn test_url_without_quote_counts_toward_coverage() {
        let mut first = claim(true, 0.9);
        first.evidence_quote = None;
        let mut second = claim(true, 0.4);
        second.evidence_quote = None;

        let p = profile(vec![first, second]);
        assert_eq!(coverage(&p), 1.0);

        let report = ProvenanceReport::from_claims(&p.claims);
        assert_eq!(report.with_source_url, 2);
        assert_eq!(report.sourced, 0);
    }

    #[test]
    fn test_quote_without_url_does_not_count() {
        let mut quoted = claim(false, 0.2);
        quoted.evidence_quote = Some("We sell anvils".to_string());
        assert_eq!(coverage(&profile(vec![quoted, claim(true, 0.9)])), 0.5);
    }

    #[test]
    fn test_removing_unsourced_never_lowers_coverage() {
        let mut claims = vec![
            claim(false, 0.2),
            claim(true, 0.9),
            claim(false, 0.3),
            claim(true, 0.7),
            claim(false, 0.1),
        ];
        let mut previous = coverage(&profile(claims.clone()));
        while let Some(pos) = claims.iter().position(|c| !c.is_sourced()) {
            claims.remove(pos);
            let current = coverage(&profile(claims.clone()));
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn test_report_counts() {
        let report = ProvenanceReport::from_claims(&[claim(true, 0.9), claim(false, 0.5), claim(false, 0.1)]);
        assert_eq!(report.total, 3);
        assert_eq!(report.with_source_url, 1);
        assert_eq!(report.sourced, 1);
        assert_eq!(report.unsourced, 2);
        assert_eq!(report.over_ceiling, 1);
        assert!((report.mean_confidence - 0.5).abs() < 1e-9);
    }
}

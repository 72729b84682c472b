//! Concern Synthesizer: flags gaps and inconsistencies in a finished analysis.
//!
//! The rules are fixed and evaluated in order, each adding at most one
//! concern:
//! 1. Opt-out available but no method → method unspecified
//! 2. Providers found but no contractual protection
//! 3. Training without retention
//! 4. Retention without a period
//! 5. Sharing without limitations
//! 6. Facets whose documents disagreed → conflict
//! 7. No evidence at all → nothing relevant found
//!
//! Rule 7 signals an extraction or coverage failure rather than a policy gap.

use crate::types::{push_unique, Analysis, Facet};

pub const OPT_OUT_METHOD_UNSPECIFIED: &str = "opt-out mentioned but method unspecified";
pub const THIRD_PARTY_UNPROTECTED: &str =
    "third-party AI use without explicit contractual protection";
pub const TRAINING_WITHOUT_RETENTION: &str = "training mentioned without retention policy";
pub const RETENTION_WITHOUT_PERIOD: &str = "retention mentioned without a specified period";
pub const SHARING_WITHOUT_LIMITATIONS: &str = "sharing mentioned without stated limitations";
pub const NO_RELEVANT_INFORMATION: &str =
    "analysis could not find relevant information in the provided documents";

/// Concern for a facet whose documents disagreed.
pub fn conflict_concern(facet: Facet) -> String {
    format!(
        "{} statements conflict across documents",
        facet.as_str().replace('_', " ")
    )
}

/// The Concern Synthesizer evaluates its rule list against an analysis.
pub struct ConcernSynthesizer;

impl ConcernSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Concerns raised by `analysis`, in rule order, without duplicates.
    ///
    /// `conflicts` lists facets whose contributing documents disagreed.
    pub fn synthesize(&self, analysis: &Analysis, conflicts: &[Facet]) -> Vec<String> {
        let mut concerns = Vec::new();

        if analysis.opt_out_available && analysis.opt_out_method.is_none() {
            push_unique(&mut concerns, OPT_OUT_METHOD_UNSPECIFIED);
        }
        if !analysis.third_party_providers.is_empty() && !analysis.contractual_protections {
            push_unique(&mut concerns, THIRD_PARTY_UNPROTECTED);
        }
        if analysis.model_training && !analysis.data_retention {
            push_unique(&mut concerns, TRAINING_WITHOUT_RETENTION);
        }
        if analysis.data_retention && analysis.retention_period.is_none() {
            push_unique(&mut concerns, RETENTION_WITHOUT_PERIOD);
        }
        if analysis.model_sharing && analysis.model_sharing_limitations.is_none() {
            push_unique(&mut concerns, SHARING_WITHOUT_LIMITATIONS);
        }
        for facet in conflicts {
            push_unique(&mut concerns, conflict_concern(*facet));
        }
        if !analysis.has_evidence() {
            push_unique(&mut concerns, NO_RELEVANT_INFORMATION);
        }

        concerns
    }
}

impl Default for ConcernSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Signal;
    use crate::evidence::EvidenceItem;
    use crate::types::DocumentCategory;
    use std::collections::BTreeMap;

    fn blank() -> Analysis {
        Analysis {
            opt_out_available: false,
            enterprise_opt_out: false,
            opt_out_method: None,
            opt_out_granularity: None,
            native_ai: None,
            third_party_providers: vec![],
            ai_features: vec![],
            data_retention: false,
            retention_period: None,
            model_training: false,
            model_sharing: false,
            model_sharing_limitations: None,
            contractual_protections: false,
            contractual_details: None,
            gdpr_compliant: None,
            ccpa_compliant: None,
            security_measures: vec![],
            security_certifications: vec![],
            ethical_considerations: vec![],
            concerns: vec![],
            document_coverage: BTreeMap::new(),
            confidence_levels: BTreeMap::new(),
            evidence: BTreeMap::new(),
            authoritative_sources: BTreeMap::new(),
        }
    }

    fn with_evidence(mut analysis: Analysis) -> Analysis {
        analysis.evidence.insert(
            Signal::OptOut,
            vec![EvidenceItem::new(
                Signal::OptOut,
                DocumentCategory::AdminGuide,
                "AI can be disabled",
                0,
                5,
            )],
        );
        analysis
    }

    #[test]
    fn test_no_evidence_gives_single_concern() {
        let concerns = ConcernSynthesizer::new().synthesize(&blank(), &[]);
        assert_eq!(concerns, vec![NO_RELEVANT_INFORMATION.to_string()]);
    }

    #[test]
    fn test_opt_out_without_method() {
        let mut analysis = with_evidence(blank());
        analysis.opt_out_available = true;
        let concerns = ConcernSynthesizer::new().synthesize(&analysis, &[]);
        assert_eq!(concerns, vec![OPT_OUT_METHOD_UNSPECIFIED.to_string()]);
    }

    #[test]
    fn test_providers_without_protection() {
        let mut analysis = with_evidence(blank());
        analysis.third_party_providers = vec!["OpenAI".to_string()];
        let concerns = ConcernSynthesizer::new().synthesize(&analysis, &[]);
        assert!(concerns.contains(&THIRD_PARTY_UNPROTECTED.to_string()));

        analysis.contractual_protections = true;
        let concerns = ConcernSynthesizer::new().synthesize(&analysis, &[]);
        assert!(concerns.is_empty());
    }

    #[test]
    fn test_data_usage_rules_in_order() {
        let mut analysis = with_evidence(blank());
        analysis.model_training = true;
        analysis.model_sharing = true;
        let concerns = ConcernSynthesizer::new().synthesize(&analysis, &[]);
        assert_eq!(
            concerns,
            vec![
                TRAINING_WITHOUT_RETENTION.to_string(),
                SHARING_WITHOUT_LIMITATIONS.to_string()
            ]
        );

        analysis.data_retention = true;
        let concerns = ConcernSynthesizer::new().synthesize(&analysis, &[]);
        assert_eq!(
            concerns,
            vec![
                RETENTION_WITHOUT_PERIOD.to_string(),
                SHARING_WITHOUT_LIMITATIONS.to_string()
            ]
        );
    }

    #[test]
    fn test_conflict_concern_text() {
        assert_eq!(
            conflict_concern(Facet::ModelSharing),
            "model sharing statements conflict across documents"
        );
        let analysis = with_evidence(blank());
        let concerns = ConcernSynthesizer::new()
            .synthesize(&analysis, &[Facet::ModelSharing, Facet::ModelSharing]);
        assert_eq!(concerns.len(), 1);
    }
}

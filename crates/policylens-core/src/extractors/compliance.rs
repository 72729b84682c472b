//! Compliance Extractor
//!
//! **Question**: Does the vendor affirm GDPR or CCPA compliance?
//!
//! Coarser than the other extractors: a regulation mention counts when a
//! compliance-affirming term appears anywhere in the same document. There is
//! no relevance filter. The context window is only used for the evidence
//! snippet around the first mention.

use crate::catalog::{PatternCatalog, PatternRule, Signal};
use crate::config::AnalysisConfig;
use crate::context::extract_context;
use crate::document::DocumentSet;
use crate::evidence::{EvidenceItem, EvidenceLog};

use super::{scan_order, Extractor, ExtractorKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplianceFinding {
    /// `Some(true)` once affirmed; `None` when never affirmed
    pub gdpr: Option<bool>,
    pub ccpa: Option<bool>,
    pub evidence: EvidenceLog,
}

pub struct ComplianceExtractor;

impl ComplianceExtractor {
    pub fn new() -> Self {
        Self
    }

    fn affirmed(
        docs: &DocumentSet,
        rule: &PatternRule,
        config: &AnalysisConfig,
        evidence: &mut EvidenceLog,
    ) -> Option<bool> {
        let affirmation = PatternCatalog::global().lookup(Signal::ComplianceAffirmation);
        let window = config.window();
        let mut affirmed = None;

        for category in scan_order(rule, config.priority_resolution) {
            let Some(text) = docs.text(category) else {
                continue;
            };
            let Some(m) = rule.matcher.find(text) else {
                continue;
            };
            if !affirmation.is_match(text) {
                continue;
            }

            affirmed = Some(true);
            let context = extract_context(text, m.start(), m.end(), window.before, window.after);
            evidence.record(EvidenceItem::new(
                rule.signal,
                category,
                context,
                m.start(),
                m.end(),
            ));
        }

        affirmed
    }
}

impl Default for ComplianceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for ComplianceExtractor {
    type Finding = ComplianceFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Compliance
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> ComplianceFinding {
        let catalog = PatternCatalog::global();
        let mut evidence = EvidenceLog::new();

        let gdpr = Self::affirmed(docs, catalog.lookup(Signal::Gdpr), config, &mut evidence);
        let ccpa = Self::affirmed(docs, catalog.lookup(Signal::Ccpa), config, &mut evidence);

        ComplianceFinding {
            gdpr,
            ccpa,
            evidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentCategory;

    fn extract(docs: &DocumentSet) -> ComplianceFinding {
        ComplianceExtractor::new().extract(docs, &AnalysisConfig::default())
    }

    #[test]
    fn test_affirmation_anywhere_in_document() {
        let docs = DocumentSet::new().with(
            DocumentCategory::GdprCompliance,
            "This page describes the GDPR.\n\nSection 9. We are fully compliant with applicable law.",
        );
        let finding = extract(&docs);

        assert_eq!(finding.gdpr, Some(true));
        assert_eq!(finding.ccpa, None);
        assert_eq!(finding.evidence.items(Signal::Gdpr).len(), 1);
    }

    #[test]
    fn test_mention_without_affirmation() {
        let docs = DocumentSet::new().with(
            DocumentCategory::PrivacyPolicy,
            "California Consumer Privacy Act rights are described below.",
        );
        let finding = extract(&docs);

        assert_eq!(finding.ccpa, None);
        assert!(finding.evidence.is_empty());
    }

    #[test]
    fn test_one_evidence_item_per_affirming_category() {
        let text = "We comply with the GDPR and the CCPA. GDPR requests go to our DPO.";
        let docs = DocumentSet::new()
            .with(DocumentCategory::PrivacyPolicy, text)
            .with(DocumentCategory::DataProcessing, text);
        let finding = extract(&docs);

        assert_eq!(finding.gdpr, Some(true));
        assert_eq!(finding.ccpa, Some(true));
        assert_eq!(finding.evidence.items(Signal::Gdpr).len(), 2);
        assert_eq!(finding.evidence.items(Signal::Ccpa).len(), 2);
    }

    #[test]
    fn test_other_categories_are_not_scanned() {
        let docs = DocumentSet::new().with(
            DocumentCategory::TermsOfService,
            "We comply with the GDPR.",
        );
        assert_eq!(extract(&docs).gdpr, None);
    }
}

//! Security Extractor
//!
//! **Question**: What security measures and certifications does the vendor
//! claim for AI and customer data?
//!
//! Measures come from the vocabulary, looked up inside each relevant
//! security context. Certifications are matched over the full text and need
//! no relevance filter.

use crate::catalog::{vocabulary, PatternCatalog, Signal};
use crate::config::AnalysisConfig;
use crate::context::{extract_context, normalize_whitespace};
use crate::document::DocumentSet;
use crate::evidence::{EvidenceItem, EvidenceLog};
use crate::types::push_unique;

use super::{scan, scan_order, Extractor, ExtractorKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityFinding {
    pub measures: Vec<String>,
    pub certifications: Vec<String>,
    pub evidence: EvidenceLog,
}

pub struct SecurityExtractor;

impl SecurityExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SecurityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for SecurityExtractor {
    type Finding = SecurityFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Security
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> SecurityFinding {
        let catalog = PatternCatalog::global();
        let mut finding = SecurityFinding::default();

        let security = catalog.lookup(Signal::Security);
        for hit in scan(docs, security, config.window(), config.priority_resolution) {
            finding.evidence.record(hit.evidence(Signal::Security));
            for measure in vocabulary::security_measures_in(hit.context) {
                push_unique(&mut finding.measures, measure);
            }
        }

        let certification = catalog.lookup(Signal::Certification);
        let window = config.window();
        for category in scan_order(certification, config.priority_resolution) {
            let Some(text) = docs.text(category) else {
                continue;
            };
            for m in certification.matcher.find_iter(text) {
                push_unique(&mut finding.certifications, normalize_whitespace(m.as_str()));
                let context = extract_context(text, m.start(), m.end(), window.before, window.after);
                finding.evidence.record(EvidenceItem::new(
                    Signal::Certification,
                    category,
                    context,
                    m.start(),
                    m.end(),
                ));
            }
        }

        finding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentCategory;

    fn extract(docs: &DocumentSet) -> SecurityFinding {
        SecurityExtractor::new().extract(docs, &AnalysisConfig::default())
    }

    #[test]
    fn test_measures_from_security_context() {
        let docs = DocumentSet::new().with(
            DocumentCategory::DataSecurity,
            "Customer data is encrypted at rest and in transit, with strict access controls \
             and continuous monitoring.",
        );
        let finding = extract(&docs);

        assert_eq!(
            finding.measures,
            vec!["encryption".to_string(), "access controls".to_string(), "monitoring".to_string()]
        );
        assert!(!finding.evidence.items(Signal::Security).is_empty());
    }

    #[test]
    fn test_certifications_normalized_and_unique() {
        let docs = DocumentSet::new()
            .with(
                DocumentCategory::DataSecurity,
                "We maintain SOC 2\nType II and ISO 27001 certification.",
            )
            .with(DocumentCategory::PrivacyPolicy, "Our SOC 2 Type II report is available.");
        let finding = extract(&docs);

        assert_eq!(
            finding.certifications,
            vec!["SOC 2 Type II".to_string(), "ISO 27001".to_string()]
        );
        assert_eq!(finding.evidence.items(Signal::Certification).len(), 3);
    }

    #[test]
    fn test_security_word_outside_ai_or_data() {
        let docs = DocumentSet::new().with(
            DocumentCategory::PrivacyPolicy,
            "Our office building has 24/7 security guards.",
        );
        let finding = extract(&docs);
        assert!(finding.measures.is_empty());
        assert!(finding.evidence.is_empty());
    }
}

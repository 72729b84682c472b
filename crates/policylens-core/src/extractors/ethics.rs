//! Ethics Extractor
//!
//! **Question**: What ethical commitments does the vendor make about its AI?
//!
//! Stores the whole sentence around each match, so repeated terms in one
//! sentence yield a single consideration.

use crate::catalog::{PatternCatalog, Signal};
use crate::config::AnalysisConfig;
use crate::context::{normalize_whitespace, sentence_at};
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;
use crate::types::push_unique;

use super::{scan, Extractor, ExtractorKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EthicsFinding {
    pub considerations: Vec<String>,
    pub evidence: EvidenceLog,
}

pub struct EthicsExtractor;

impl EthicsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EthicsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for EthicsExtractor {
    type Finding = EthicsFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Ethics
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> EthicsFinding {
        let rule = PatternCatalog::global().lookup(Signal::Ethical);
        let mut finding = EthicsFinding::default();

        for hit in scan(docs, rule, config.window(), config.priority_resolution) {
            finding.evidence.record(hit.evidence(Signal::Ethical));
            let sentence = normalize_whitespace(sentence_at(hit.text, hit.start));
            push_unique(&mut finding.considerations, sentence);
        }

        finding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentCategory;

    #[test]
    fn test_one_consideration_per_sentence() {
        let docs = DocumentSet::new().with(
            DocumentCategory::AiEthics,
            "We test for bias and fairness before release. Our models are explainable.\n\
             Questions? Write to us.",
        );
        let finding = EthicsExtractor::new().extract(&docs, &AnalysisConfig::default());

        assert_eq!(
            finding.considerations,
            vec![
                "We test for bias and fairness before release.".to_string(),
                "Our models are explainable.".to_string()
            ]
        );
        // bias, fairness, explainable
        assert_eq!(finding.evidence.items(Signal::Ethical).len(), 3);
    }

    #[test]
    fn test_only_ethics_categories() {
        let docs = DocumentSet::new().with(
            DocumentCategory::TermsOfService,
            "We are committed to fairness.",
        );
        let finding = EthicsExtractor::new().extract(&docs, &AnalysisConfig::default());
        assert!(finding.considerations.is_empty());
    }
}

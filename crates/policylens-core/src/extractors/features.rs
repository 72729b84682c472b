//! AI Feature Extractor
//!
//! **Question**: Which AI features does the vendor advertise?
//!
//! Looks for enumerations such as "capabilities include summarization,
//! translation and drafting" and collects each listed item. Uses its own
//! context window: a little before the phrase, and enough after it to hold
//! the list.

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::{PatternCatalog, Signal};
use crate::config::{AnalysisConfig, Window};
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;
use crate::types::push_unique;

use super::{scan, Extractor, ExtractorKind};

const FEATURE_WINDOW: Window = Window {
    before: 50,
    after: 150,
};

/// Items this short are connectives or noise.
const MIN_ITEM_CHARS: usize = 4;

lazy_static! {
    static ref LIST_SEPARATOR: Regex = Regex::new(r"(?i),|\band\b").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFinding {
    pub features: Vec<String>,
    pub evidence: EvidenceLog,
}

pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for FeatureExtractor {
    type Finding = FeatureFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Features
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> FeatureFinding {
        let rule = PatternCatalog::global().lookup(Signal::AiFeature);
        let mut finding = FeatureFinding::default();

        for hit in scan(docs, rule, FEATURE_WINDOW, config.priority_resolution) {
            finding.evidence.record(hit.evidence(Signal::AiFeature));
            if let Some(list) = hit.capture {
                for item in split_list(list) {
                    push_unique(&mut finding.features, item);
                }
            }
        }

        finding
    }
}

/// Split an enumeration on commas and "and".
pub fn split_list(list: &str) -> Vec<String> {
    LIST_SEPARATOR
        .split(list)
        .map(|item| item.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|item| item.chars().count() >= MIN_ITEM_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentCategory;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("smart replies, meeting summaries and document search"),
            vec!["smart replies", "meeting summaries", "document search"]
        );
        assert_eq!(split_list("OCR, Q&A, and translation"), vec!["translation"]);
    }

    #[test]
    fn test_features_from_ai_trust_page() {
        let docs = DocumentSet::new().with(
            DocumentCategory::AiTrust,
            "Our AI capabilities include smart replies, meeting summaries and document search. \
             Each feature can be disabled.",
        );
        let finding = FeatureExtractor::new().extract(&docs, &AnalysisConfig::default());

        assert_eq!(
            finding.features,
            vec![
                "smart replies".to_string(),
                "meeting summaries".to_string(),
                "document search".to_string()
            ]
        );
        assert_eq!(finding.evidence.items(Signal::AiFeature).len(), 1);
    }

    #[test]
    fn test_non_ai_feature_list_is_ignored() {
        let docs = DocumentSet::new().with(
            DocumentCategory::TermsOfService,
            "Premium features include extra storage and priority support.",
        );
        let finding = FeatureExtractor::new().extract(&docs, &AnalysisConfig::default());
        assert!(finding.features.is_empty());
    }
}

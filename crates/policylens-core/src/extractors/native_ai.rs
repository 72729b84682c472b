//! Native AI Extractor
//!
//! **Question**: Does the vendor claim its AI is built in-house?
//!
//! Only records the claim. Whether `nativeAI` ends up true is decided by the
//! assembler, because third-party provider evidence always overrides it.

use crate::catalog::{PatternCatalog, Signal};
use crate::config::AnalysisConfig;
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;

use super::{scan, Extractor, ExtractorKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeAiFinding {
    pub claimed: bool,
    pub evidence: EvidenceLog,
}

pub struct NativeAiExtractor;

impl NativeAiExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeAiExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for NativeAiExtractor {
    type Finding = NativeAiFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::NativeAi
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> NativeAiFinding {
        let rule = PatternCatalog::global().lookup(Signal::AiNative);
        let mut finding = NativeAiFinding::default();

        for hit in scan(docs, rule, config.window(), config.priority_resolution) {
            finding.claimed = true;
            finding.evidence.record(hit.evidence(Signal::AiNative));
        }

        finding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentCategory;

    #[test]
    fn test_proprietary_models_claim() {
        let docs = DocumentSet::new().with(
            DocumentCategory::AiTrust,
            "We use our proprietary machine learning models developed in-house by our data \
             science team. Our native AI algorithms are trained for our specific use cases.",
        );
        let finding = NativeAiExtractor::new().extract(&docs, &AnalysisConfig::default());

        assert!(finding.claimed);
        // proprietary, our ... models, in-house, native
        assert!(finding.evidence.items(Signal::AiNative).len() >= 3);
    }

    #[test]
    fn test_native_word_without_ai_context() {
        let docs = DocumentSet::new().with(
            DocumentCategory::PrivacyPolicy,
            "Our native mobile apps store your preferences locally.",
        );
        let finding = NativeAiExtractor::new().extract(&docs, &AnalysisConfig::default());
        assert!(!finding.claimed);
    }
}

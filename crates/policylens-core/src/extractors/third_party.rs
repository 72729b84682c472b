//! Third-party Provider Extractor
//!
//! **Question**: Which outside AI providers does the vendor rely on?
//!
//! A relevant third-party mention is evidence on its own; the providers named
//! inside its context are collected in list order, first discovery first.

use tracing::debug;

use crate::catalog::{vocabulary, PatternCatalog, Signal};
use crate::config::AnalysisConfig;
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;
use crate::types::push_unique;

use super::{scan, Extractor, ExtractorKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThirdPartyFinding {
    /// Providers in order of first discovery, spelled as in the vocabulary
    pub providers: Vec<String>,
    pub evidence: EvidenceLog,
}

pub struct ThirdPartyExtractor;

impl ThirdPartyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThirdPartyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for ThirdPartyExtractor {
    type Finding = ThirdPartyFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::ThirdParty
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> ThirdPartyFinding {
        let rule = PatternCatalog::global().lookup(Signal::ThirdParty);
        let mut finding = ThirdPartyFinding::default();

        for hit in scan(docs, rule, config.window(), config.priority_resolution) {
            finding.evidence.record(hit.evidence(Signal::ThirdParty));
            for provider in vocabulary::providers_in(hit.context) {
                if push_unique(&mut finding.providers, provider) {
                    debug!(provider, category = %hit.category, "found AI provider");
                }
            }
        }

        finding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentCategory;

    fn extract(docs: &DocumentSet) -> ThirdPartyFinding {
        ThirdPartyExtractor::new().extract(docs, &AnalysisConfig::default())
    }

    #[test]
    fn test_providers_in_discovery_order() {
        let docs = DocumentSet::new().with(
            DocumentCategory::PrivacyPolicy,
            "Our product integrates with OpenAI's GPT models to provide AI capabilities. Some \
             features may also utilize Google's machine learning APIs for specific functionalities.",
        );
        let finding = extract(&docs);
        assert_eq!(finding.providers, vec!["OpenAI".to_string(), "Google".to_string()]);
    }

    #[test]
    fn test_providers_deduplicated_across_categories() {
        let docs = DocumentSet::new()
            .with(DocumentCategory::Subprocessors, "Azure hosts our AI models.")
            .with(DocumentCategory::TermsOfService, "Our AI runs on azure.");
        let finding = extract(&docs);

        assert_eq!(finding.providers, vec!["Azure".to_string()]);
        assert_eq!(finding.evidence.items(Signal::ThirdParty).len(), 2);
    }

    #[test]
    fn test_partner_mention_without_provider() {
        let docs = DocumentSet::new().with(
            DocumentCategory::DataProcessing,
            "Our AI features rely on trusted partners.",
        );
        let finding = extract(&docs);

        assert!(finding.providers.is_empty());
        assert_eq!(finding.evidence.items(Signal::ThirdParty).len(), 1);
    }

    #[test]
    fn test_cloud_mention_without_ai_context() {
        let docs = DocumentSet::new().with(
            DocumentCategory::Subprocessors,
            "Billing records are hosted on AWS.",
        );
        assert!(extract(&docs).providers.is_empty());
    }
}

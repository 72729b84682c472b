//! Contractual Protections Extractor
//!
//! **Question**: Are third-party AI providers contractually bound?
//!
//! Only meaningful once providers are known, so it takes the provider list
//! found by the third-party extractor and is skipped entirely without one.
//! A match counts when its context is about AI and names one of those
//! providers or refers to an outside party generically.

use tracing::debug;

use crate::catalog::{vocabulary, PatternCatalog, Signal};
use crate::config::AnalysisConfig;
use crate::context::{first_sentence_matching, normalize_whitespace};
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;

use super::{scan, Extractor, ExtractorKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractualFinding {
    pub protected: bool,
    /// First sentence stating the protection
    pub details: Option<String>,
    pub evidence: EvidenceLog,
}

pub struct ContractualExtractor {
    providers: Vec<String>,
}

impl ContractualExtractor {
    pub fn new(providers: Vec<String>) -> Self {
        Self { providers }
    }

    fn refers_to_provider(&self, context: &str) -> bool {
        self.providers
            .iter()
            .any(|provider| vocabulary::names_provider(context, provider))
            || PatternCatalog::global()
                .lookup(Signal::ThirdPartyReference)
                .is_match(context)
    }
}

impl Extractor for ContractualExtractor {
    type Finding = ContractualFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Contractual
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> ContractualFinding {
        let mut finding = ContractualFinding::default();
        if self.providers.is_empty() {
            debug!("no third-party providers, skipping contractual protections");
            return finding;
        }

        let rule = PatternCatalog::global().lookup(Signal::Contractual);
        for hit in scan(docs, rule, config.window(), config.priority_resolution) {
            if !self.refers_to_provider(hit.context) {
                continue;
            }

            finding.protected = true;
            finding.evidence.record(hit.evidence(Signal::Contractual));
            if finding.details.is_none() {
                finding.details =
                    first_sentence_matching(hit.context, &rule.matcher).map(normalize_whitespace);
            }
        }

        finding
    }
}

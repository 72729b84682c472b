//! Signal extractors, one per analysis facet.
//!
//! Each extractor scans the document categories its rule applies to, keeps
//! only matches whose context passes the relevance filter, and returns a
//! private finding with its own evidence log.
//!
//! ## Extractor Independence
//!
//! - Extractors never see each other's findings, except contractual
//!   protections, which is handed the provider list up front
//! - No shared mutable state: each finding owns its evidence
//! - Categories are scanned in a fixed order, so results do not depend on
//!   whether extractors ran sequentially or concurrently

mod compliance;
mod contractual;
mod data_usage;
mod ethics;
mod features;
mod native_ai;
mod opt_out;
mod security;
mod sharing;
mod third_party;

pub use compliance::{ComplianceExtractor, ComplianceFinding};
pub use contractual::{ContractualExtractor, ContractualFinding};
pub use data_usage::{DataUsageExtractor, DataUsageFinding};
pub use ethics::{EthicsExtractor, EthicsFinding};
pub use features::{FeatureExtractor, FeatureFinding};
pub use native_ai::{NativeAiExtractor, NativeAiFinding};
pub use opt_out::{OptOutExtractor, OptOutFinding};
pub use security::{SecurityExtractor, SecurityFinding};
pub use sharing::{SharingExtractor, SharingFinding};
pub use third_party::{ThirdPartyExtractor, ThirdPartyFinding};

use regex::Match;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::catalog::{PatternRule, Signal};
use crate::config::{AnalysisConfig, PriorityResolution, Window};
use crate::context::{context_bounds, is_relevant};
use crate::document::DocumentSet;
use crate::evidence::{EvidenceItem, EvidenceLog};
use crate::types::DocumentCategory;

/// The extractors, in the order their evidence is merged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    OptOut,
    NativeAi,
    ThirdParty,
    Features,
    DataUsage,
    Sharing,
    Contractual,
    Compliance,
    Security,
    Ethics,
}

impl ExtractorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorKind::OptOut => "opt_out",
            ExtractorKind::NativeAi => "native_ai",
            ExtractorKind::ThirdParty => "third_party",
            ExtractorKind::Features => "features",
            ExtractorKind::DataUsage => "data_usage",
            ExtractorKind::Sharing => "sharing",
            ExtractorKind::Contractual => "contractual",
            ExtractorKind::Compliance => "compliance",
            ExtractorKind::Security => "security",
            ExtractorKind::Ethics => "ethics",
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait implemented by all extractors.
pub trait Extractor {
    type Finding;

    fn kind(&self) -> ExtractorKind;

    /// Scan the document set.
    ///
    /// Infallible: absent or empty documents simply contribute nothing.
    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> Self::Finding;
}

/// A relevant match of a rule in one document.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub category: DocumentCategory,
    /// Full text of the document
    pub text: &'a str,
    /// Byte span of the match in `text`
    pub start: usize,
    pub end: usize,
    pub matched: &'a str,
    /// First capture group, when the rule has one
    pub capture: Option<&'a str>,
    pub context: &'a str,
    /// Byte offset of `context` within `text`
    pub context_start: usize,
}

impl<'a> Hit<'a> {
    /// Evidence for this match.
    pub fn evidence(&self, signal: Signal) -> EvidenceItem {
        EvidenceItem::new(signal, self.category, self.context, self.start, self.end)
    }

    /// Evidence for a sub-match found inside this hit's context.
    pub fn sub_evidence(&self, signal: Signal, sub: Match<'_>) -> EvidenceItem {
        EvidenceItem::new(
            signal,
            self.category,
            self.context,
            self.context_start + sub.start(),
            self.context_start + sub.end(),
        )
    }
}

/// Categories a rule is scanned in under the configured resolution.
///
/// `Apply` keeps the rule's priority order; `RecordOnly` uses the canonical
/// category order.
pub fn scan_order(rule: &PatternRule, resolution: PriorityResolution) -> Vec<DocumentCategory> {
    match resolution {
        PriorityResolution::Apply => rule.scope.categories().to_vec(),
        PriorityResolution::RecordOnly => DocumentCategory::ALL
            .into_iter()
            .filter(|category| rule.scope.includes(*category))
            .collect(),
    }
}

/// Every relevant match of `rule`, category by category in scan order.
///
/// Matches whose context fails the rule's relevance requirement are dropped
/// here and never reach the extractor.
pub fn scan<'a>(
    docs: &'a DocumentSet,
    rule: &PatternRule,
    window: Window,
    resolution: PriorityResolution,
) -> Vec<Hit<'a>> {
    let mut hits = Vec::new();

    for category in scan_order(rule, resolution) {
        let Some(text) = docs.text(category) else {
            continue;
        };

        let mut seen = 0;
        for caps in rule.matcher.captures_iter(text) {
            let Some(m) = caps.get(0) else {
                continue;
            };
            seen += 1;
            let bounds = context_bounds(text, m.start(), m.end(), window.before, window.after);
            let context_start = bounds.start;
            let context = &text[bounds];
            if !is_relevant(context, rule.relevance) {
                continue;
            }
            hits.push(Hit {
                category,
                text,
                start: m.start(),
                end: m.end(),
                matched: m.as_str(),
                capture: caps.get(1).map(|c| c.as_str()),
                context,
                context_start,
            });
        }

        debug!(
            signal = %rule.signal,
            category = %category,
            matches = seen,
            "scanned category"
        );
    }

    hits
}

/// Evidence-bearing output of every extractor, for the assembler to merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractorFindings {
    pub opt_out: OptOutFinding,
    pub native_ai: NativeAiFinding,
    pub third_party: ThirdPartyFinding,
    pub features: FeatureFinding,
    pub data_usage: DataUsageFinding,
    pub sharing: SharingFinding,
    pub contractual: ContractualFinding,
    pub compliance: ComplianceFinding,
    pub security: SecurityFinding,
    pub ethics: EthicsFinding,
}

impl ExtractorFindings {
    /// Run every extractor sequentially.
    ///
    /// Contractual protections runs after third-party providers because it
    /// needs the provider list.
    pub fn extract_all(docs: &DocumentSet, config: &AnalysisConfig) -> Self {
        let third_party = ThirdPartyExtractor::new().extract(docs, config);
        let contractual =
            ContractualExtractor::new(third_party.providers.clone()).extract(docs, config);

        Self {
            opt_out: OptOutExtractor::new().extract(docs, config),
            native_ai: NativeAiExtractor::new().extract(docs, config),
            third_party,
            features: FeatureExtractor::new().extract(docs, config),
            data_usage: DataUsageExtractor::new().extract(docs, config),
            sharing: SharingExtractor::new().extract(docs, config),
            contractual,
            compliance: ComplianceExtractor::new().extract(docs, config),
            security: SecurityExtractor::new().extract(docs, config),
            ethics: EthicsExtractor::new().extract(docs, config),
        }
    }

    /// Evidence of every extractor, merged in `ExtractorKind` order.
    pub fn merged_evidence(&self) -> EvidenceLog {
        let mut log = EvidenceLog::new();
        for (_, evidence) in self.evidence_by_kind() {
            log.merge(evidence.clone());
        }
        log
    }

    pub fn evidence_by_kind(&self) -> [(ExtractorKind, &EvidenceLog); 10] {
        [
            (ExtractorKind::OptOut, &self.opt_out.evidence),
            (ExtractorKind::NativeAi, &self.native_ai.evidence),
            (ExtractorKind::ThirdParty, &self.third_party.evidence),
            (ExtractorKind::Features, &self.features.evidence),
            (ExtractorKind::DataUsage, &self.data_usage.evidence),
            (ExtractorKind::Sharing, &self.sharing.evidence),
            (ExtractorKind::Contractual, &self.contractual.evidence),
            (ExtractorKind::Compliance, &self.compliance.evidence),
            (ExtractorKind::Security, &self.security.evidence),
            (ExtractorKind::Ethics, &self.ethics.evidence),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;

    #[test]
    fn test_scan_skips_irrelevant_context() {
        let docs = DocumentSet::new().with(
            DocumentCategory::PrivacyPolicy,
            "You can opt out of marketing emails at any time.",
        );
        let rule = PatternCatalog::global().lookup(Signal::OptOut);
        let hits = scan(&docs, rule, Window { before: 100, after: 100 }, PriorityResolution::Apply);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_scan_follows_priority_order() {
        let docs = DocumentSet::new()
            .with(DocumentCategory::PrivacyPolicy, "AI features can be disabled.")
            .with(DocumentCategory::AdminGuide, "AI features can be disabled.");
        let rule = PatternCatalog::global().lookup(Signal::OptOut);

        let applied = scan(&docs, rule, Window { before: 100, after: 100 }, PriorityResolution::Apply);
        assert_eq!(applied[0].category, DocumentCategory::AdminGuide);

        let canonical = scan(
            &docs,
            rule,
            Window { before: 100, after: 100 },
            PriorityResolution::RecordOnly,
        );
        assert_eq!(canonical[0].category, DocumentCategory::PrivacyPolicy);
    }

    #[test]
    fn test_hit_offsets_point_into_document() {
        let text = "Intro. Our AI can be turned off by admins.";
        let docs = DocumentSet::new().with(DocumentCategory::AdminGuide, text);
        let rule = PatternCatalog::global().lookup(Signal::OptOut);
        let hits = scan(&docs, rule, Window { before: 20, after: 5 }, PriorityResolution::Apply);

        assert_eq!(hits.len(), 1);
        let hit = hits[0];
        assert_eq!(&text[hit.start..hit.end], "turned off");
        assert_eq!(&text[hit.context_start..hit.context_start + hit.context.len()], hit.context);
    }

    #[test]
    fn test_record_only_order_is_canonical_subset() {
        let rule = PatternCatalog::global().lookup(Signal::ModelSharing);
        assert_eq!(
            scan_order(rule, PriorityResolution::RecordOnly),
            vec![
                DocumentCategory::PrivacyPolicy,
                DocumentCategory::TermsOfService,
                DocumentCategory::DataProcessing
            ]
        );
    }
}

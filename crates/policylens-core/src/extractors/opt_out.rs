//! Opt-out Extractor
//!
//! **Question**: Can the customer switch the vendor's AI off, and how?
//!
//! ## Refinements
//!
//! | Fact | Source | Rule |
//! |------|--------|------|
//! | `optOutAvailable` | relevant `opt_out` match | any match |
//! | `enterpriseOptOut` | `enterprise` inside the opt-out context | any match |
//! | `optOutMethod` | admin console, then API, then vendor contact | first match wins |
//! | `optOutGranularity` | per-user, per-feature, organization-wide | first match wins |

use crate::catalog::{PatternCatalog, Signal};
use crate::config::AnalysisConfig;
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;
use crate::types::{OptOutGranularity, OptOutMethod};

use super::{scan, Extractor, ExtractorKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptOutFinding {
    pub available: bool,
    pub enterprise: bool,
    pub method: Option<OptOutMethod>,
    pub granularity: Option<OptOutGranularity>,
    pub evidence: EvidenceLog,
}

pub struct OptOutExtractor;

impl OptOutExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OptOutExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for OptOutExtractor {
    type Finding = OptOutFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::OptOut
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> OptOutFinding {
        let catalog = PatternCatalog::global();
        let enterprise = catalog.lookup(Signal::Enterprise);
        let mut finding = OptOutFinding::default();

        let rule = catalog.lookup(Signal::OptOut);
        for hit in scan(docs, rule, config.window(), config.priority_resolution) {
            finding.available = true;
            finding.evidence.record(hit.evidence(Signal::OptOut));

            if let Some(m) = enterprise.matcher.find(hit.context) {
                finding.enterprise = true;
                finding.evidence.record(hit.sub_evidence(Signal::Enterprise, m));
            }

            if finding.method.is_none() {
                finding.method = infer_method(hit.context);
            }
            if finding.granularity.is_none() {
                finding.granularity = infer_granularity(hit.context);
            }
        }

        finding
    }
}

/// How the opt-out described in `context` is exercised, if it says.
pub fn infer_method(context: &str) -> Option<OptOutMethod> {
    let catalog = PatternCatalog::global();
    if catalog.lookup(Signal::AdminControls).is_match(context) {
        Some(OptOutMethod::AdminConsole)
    } else if catalog.lookup(Signal::ApiAccess).is_match(context) {
        Some(OptOutMethod::Api)
    } else if catalog.lookup(Signal::VendorContact).is_match(context) {
        Some(OptOutMethod::ContactVendor)
    } else {
        None
    }
}

/// The level the opt-out described in `context` applies at, if it says.
pub fn infer_granularity(context: &str) -> Option<OptOutGranularity> {
    let m = PatternCatalog::global()
        .lookup(Signal::Granularity)
        .matcher
        .find(context)?;
    let text = m.as_str().to_lowercase();

    if text.contains("user") {
        Some(OptOutGranularity::UserLevel)
    } else if text.contains("feature") {
        Some(OptOutGranularity::FeatureLevel)
    } else {
        Some(OptOutGranularity::OrganizationLevel)
    }
}

//! Data Usage Extractor
//!
//! **Question**: Is customer data kept, for how long, and is it used for
//! training?
//!
//! Both signals require the context to be about AI *and* about data.

use crate::catalog::{PatternCatalog, Signal};
use crate::config::AnalysisConfig;
use crate::context::{extract_context, normalize_whitespace};
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;

use super::{scan, Extractor, ExtractorKind};

/// Characters kept either side of a bare time unit.
const UNIT_WINDOW: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataUsageFinding {
    pub retention: bool,
    pub retention_period: Option<String>,
    pub training: bool,
    pub evidence: EvidenceLog,
}

pub struct DataUsageExtractor;

impl DataUsageExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DataUsageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for DataUsageExtractor {
    type Finding = DataUsageFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::DataUsage
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> DataUsageFinding {
        let catalog = PatternCatalog::global();
        let mut finding = DataUsageFinding::default();

        let retention = catalog.lookup(Signal::DataRetention);
        for hit in scan(docs, retention, config.window(), config.priority_resolution) {
            finding.retention = true;
            finding.evidence.record(hit.evidence(Signal::DataRetention));
            if finding.retention_period.is_none() {
                finding.retention_period = find_period(hit.context);
            }
        }

        let training = catalog.lookup(Signal::ModelTraining);
        for hit in scan(docs, training, config.window(), config.priority_resolution) {
            finding.training = true;
            finding.evidence.record(hit.evidence(Signal::ModelTraining));
        }

        finding
    }
}

/// A retention period stated in `context`.
///
/// Prefers "<number> <unit>"; falls back to a short slice around a bare unit.
pub fn find_period(context: &str) -> Option<String> {
    let catalog = PatternCatalog::global();

    if let Some(m) = catalog.lookup(Signal::RetentionPeriod).matcher.find(context) {
        return Some(normalize_whitespace(m.as_str()));
    }

    catalog
        .lookup(Signal::PeriodUnit)
        .matcher
        .find(context)
        .map(|m| {
            normalize_whitespace(extract_context(
                context,
                m.start(),
                m.end(),
                UNIT_WINDOW,
                UNIT_WINDOW,
            ))
        })
}

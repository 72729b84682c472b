//! Model Sharing Extractor
//!
//! **Question**: Are models trained on customer data shared beyond the
//! customer?
//!
//! ## Resolution
//!
//! Within a category the last relevant match decides that category's value.
//! Across categories:
//!
//! | Mode | Winner |
//! |------|--------|
//! | `apply` | first category in priority order that produced a value |
//! | `record_only` | last category in canonical order that produced a value |
//!
//! Seeing both polarities is reported as a conflict either way.

use tracing::debug;

use crate::catalog::{PatternCatalog, Signal};
use crate::config::{AnalysisConfig, PriorityResolution};
use crate::context::{extract_context, normalize_whitespace};
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;
use crate::types::DocumentCategory;

use super::{scan, Extractor, ExtractorKind};

const LIMITATION_BEFORE: usize = 20;
const LIMITATION_AFTER: usize = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharingFinding {
    pub shared: bool,
    /// Slice around the first negation seen, regardless of the final value
    pub limitations: Option<String>,
    /// Category whose value won
    pub decided_by: Option<DocumentCategory>,
    /// Categories disagreed on the value
    pub conflicting: bool,
    pub evidence: EvidenceLog,
}

pub struct SharingExtractor;

impl SharingExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SharingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for SharingExtractor {
    type Finding = SharingFinding;

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Sharing
    }

    fn extract(&self, docs: &DocumentSet, config: &AnalysisConfig) -> SharingFinding {
        let catalog = PatternCatalog::global();
        let negation = catalog.lookup(Signal::Negation);
        let rule = catalog.lookup(Signal::ModelSharing);
        let mut finding = SharingFinding::default();

        // (category, value of its last relevant match), in scan order
        let mut per_category: Vec<(DocumentCategory, bool)> = Vec::new();

        for hit in scan(docs, rule, config.window(), config.priority_resolution) {
            finding.evidence.record(hit.evidence(Signal::ModelSharing));

            let shared = match negation.matcher.find(hit.context) {
                Some(m) => {
                    if finding.limitations.is_none() {
                        finding.limitations = Some(normalize_whitespace(extract_context(
                            hit.context,
                            m.start(),
                            m.end(),
                            LIMITATION_BEFORE,
                            LIMITATION_AFTER,
                        )));
                    }
                    false
                }
                None => true,
            };

            match per_category.last_mut() {
                Some((category, value)) if *category == hit.category => *value = shared,
                _ => per_category.push((hit.category, shared)),
            }
        }

        finding.conflicting = per_category.iter().any(|(_, v)| *v)
            && per_category.iter().any(|(_, v)| !*v);

        let winner = match config.priority_resolution {
            PriorityResolution::Apply => per_category.first(),
            PriorityResolution::RecordOnly => per_category.last(),
        };
        if let Some((category, value)) = winner {
            finding.shared = *value;
            finding.decided_by = Some(*category);
            debug!(category = %category, shared = value, "model sharing resolved");
        }

        finding
    }
}

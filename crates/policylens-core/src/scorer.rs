//! Confidence scoring.
//!
//! Confidence grows with how much evidence backs a facet and, more steeply,
//! with how many distinct document categories it came from:
//!
//! ```text
//! confidence = min(1.0, (0.3 * items + 0.7 * categories) / 3)
//! ```
//!
//! Evidence is read back through the catalog's signal-to-facet mapping, the
//! same key it was recorded under. A facet with no evidence scores exactly 0.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::PatternCatalog;
use crate::evidence::EvidenceLog;
use crate::types::{DocumentCategory, Facet};

/// Converts accumulated evidence into bounded confidence values.
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub const ITEM_WEIGHT: f64 = 0.3;
    pub const CATEGORY_WEIGHT: f64 = 0.7;
    /// Weighted evidence needed for full confidence.
    pub const SATURATION: f64 = 3.0;

    pub fn new() -> Self {
        Self
    }

    /// Confidence for `items` evidence items spread over `categories` categories.
    pub fn confidence(items: usize, categories: usize) -> f64 {
        if items == 0 {
            return 0.0;
        }
        let weighted = Self::ITEM_WEIGHT * items as f64 + Self::CATEGORY_WEIGHT * categories as f64;
        (weighted / Self::SATURATION).min(1.0)
    }

    /// Confidence for a single facet.
    pub fn score_facet(&self, facet: Facet, evidence: &EvidenceLog) -> f64 {
        let mut items = 0;
        let mut categories: BTreeSet<DocumentCategory> = BTreeSet::new();

        for signal in PatternCatalog::global().signals_for(facet) {
            for item in evidence.items(signal) {
                items += 1;
                categories.insert(item.source_category);
            }
        }

        Self::confidence(items, categories.len())
    }

    /// Confidence for every facet.
    pub fn score(&self, evidence: &EvidenceLog) -> BTreeMap<Facet, f64> {
        Facet::ALL
            .iter()
            .map(|facet| (*facet, self.score_facet(*facet, evidence)))
            .collect()
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

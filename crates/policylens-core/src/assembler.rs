//! Result Assembler: merges extractor findings into one Analysis.
//!
//! Merging is single-threaded and order-fixed, so the result is the same
//! whether the extractors ran sequentially or concurrently.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::catalog::PatternCatalog;
use crate::document::DocumentSet;
use crate::evidence::EvidenceLog;
use crate::extractors::ExtractorFindings;
use crate::scorer::ConfidenceScorer;
use crate::synthesizer::ConcernSynthesizer;
use crate::types::{Analysis, DocumentCategory, Facet};

/// The Result Assembler turns findings into the final analysis.
pub struct ResultAssembler {
    scorer: ConfidenceScorer,
    synthesizer: ConcernSynthesizer,
}

impl ResultAssembler {
    pub fn new() -> Self {
        Self {
            scorer: ConfidenceScorer::new(),
            synthesizer: ConcernSynthesizer::new(),
        }
    }

    /// Assemble the analysis for `docs` from every extractor's findings.
    pub fn assemble(&self, docs: &DocumentSet, findings: ExtractorFindings) -> Analysis {
        let evidence = findings.merged_evidence();
        let confidence_levels = self.scorer.score(&evidence);
        let authoritative_sources = authoritative_sources(&evidence);

        let mut conflicts = Vec::new();
        if findings.sharing.conflicting {
            conflicts.push(Facet::ModelSharing);
        }

        let ExtractorFindings {
            opt_out,
            native_ai,
            third_party,
            features,
            data_usage,
            sharing,
            contractual,
            compliance,
            security,
            ethics,
        } = findings;

        // Explicit third-party evidence always beats a bare native claim.
        let native = if !third_party.providers.is_empty() {
            Some(false)
        } else if native_ai.claimed {
            Some(true)
        } else {
            None
        };

        let mut analysis = Analysis {
            opt_out_available: opt_out.available,
            enterprise_opt_out: opt_out.enterprise,
            opt_out_method: opt_out.method,
            opt_out_granularity: opt_out.granularity,
            native_ai: native,
            third_party_providers: third_party.providers,
            ai_features: features.features,
            data_retention: data_usage.retention,
            retention_period: data_usage.retention_period,
            model_training: data_usage.training,
            model_sharing: sharing.shared,
            model_sharing_limitations: sharing.limitations,
            contractual_protections: contractual.protected,
            contractual_details: contractual.details,
            gdpr_compliant: compliance.gdpr,
            ccpa_compliant: compliance.ccpa,
            security_measures: security.measures,
            security_certifications: security.certifications,
            ethical_considerations: ethics.considerations,
            concerns: Vec::new(),
            document_coverage: docs.coverage(),
            confidence_levels,
            evidence: evidence.into_map(),
            authoritative_sources,
        };

        analysis.concerns = self.synthesizer.synthesize(&analysis, &conflicts);

        if analysis.has_evidence() {
            info!(
                evidence = analysis.evidence_count(),
                signals = analysis.evidence.len(),
                concerns = analysis.concerns.len(),
                "analysis assembled"
            );
        } else {
            warn!(
                covered = docs.covered().count(),
                "no relevant evidence found in any document"
            );
        }

        analysis
    }
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// The category that wins priority resolution for each facet with evidence.
///
/// The first category in the facet's priority list that contributed
/// evidence; failing that, the first contributing category in canonical order.
pub fn authoritative_sources(evidence: &EvidenceLog) -> BTreeMap<Facet, DocumentCategory> {
    let catalog = PatternCatalog::global();
    let mut sources = BTreeMap::new();

    for facet in Facet::ALL {
        let contributing: Vec<DocumentCategory> = catalog
            .signals_for(facet)
            .into_iter()
            .flat_map(|signal| evidence.items(signal).iter().map(|item| item.source_category))
            .collect();
        if contributing.is_empty() {
            continue;
        }

        let winner = facet
            .priority()
            .iter()
            .copied()
            .find(|category| contributing.contains(category))
            .or_else(|| contributing.iter().min().copied());

        if let Some(category) = winner {
            debug!(facet = %facet, category = %category, "priority resolution winner");
            sources.insert(facet, category);
        }
    }

    sources
}

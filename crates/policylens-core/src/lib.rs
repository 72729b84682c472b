//! # policylens-core
//!
//! Evidence-driven heuristic analysis of vendor policy documents.
//!
//! Given the extracted text of a vendor's privacy policy, terms of service,
//! AI-ethics statement and similar documents, this crate answers:
//! - Can the customer switch the vendor's AI off, and how?
//! - Is the AI built in-house or bought from a third party?
//! - What happens to customer data: retention, training, sharing?
//! - Which contractual, compliance, security and ethical commitments back it?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same document set always produces the same analysis
//! 2. **Evidence-backed**: Every asserted fact cites at least one document snippet
//! 3. **Infallible**: Missing or empty documents mean "no evidence", never an error
//! 4. **Parallel-safe**: Extractors run independently and merge in a fixed order
//!
//! ## Example
//!
//! ```rust,ignore
//! use policylens_core::{analyze, DocumentCategory, DocumentSet};
//!
//! let docs = DocumentSet::new().with(
//!     DocumentCategory::TermsOfService,
//!     "Our AI features can be disabled by administrators in the Admin Console.",
//! );
//! let analysis = analyze(&docs);
//! assert!(analysis.opt_out_available);
//! println!("{}", serde_json::to_string_pretty(&analysis)?);
//! ```

pub mod assembler;
pub mod catalog;
pub mod config;
pub mod context;
pub mod document;
pub mod evidence;
pub mod extractors;
pub mod scorer;
pub mod synthesizer;
pub mod types;

// Re-export main types at crate root
pub use assembler::ResultAssembler;
pub use catalog::{PatternCatalog, PatternRule, Relevance, Scope, Signal};
pub use config::{AnalysisConfig, PriorityResolution};
pub use document::{DocumentSet, DocumentSetError};
pub use evidence::{EvidenceItem, EvidenceLog};
pub use extractors::{Extractor, ExtractorFindings, ExtractorKind};
pub use scorer::ConfidenceScorer;
pub use synthesizer::ConcernSynthesizer;
pub use types::{Analysis, DocumentCategory, Facet, OptOutGranularity, OptOutMethod};

/// Analyze a document set with the default configuration.
///
/// This is the main entry point for policylens analysis.
pub fn analyze(docs: &DocumentSet) -> Analysis {
    analyze_with_config(docs, &AnalysisConfig::default())
}

/// Analyze a document set with an explicit configuration.
///
/// Runs every extractor sequentially, then merges, scores and synthesizes
/// concerns. For concurrent extraction see `policylens-runtime`.
pub fn analyze_with_config(docs: &DocumentSet, config: &AnalysisConfig) -> Analysis {
    let findings = ExtractorFindings::extract_all(docs, config);
    ResultAssembler::new().assemble(docs, findings)
}

//! Runtime orchestrator for concurrent extraction.
//!
//! The orchestrator runs the core extractors on tokio's blocking pool:
//! - Fan-out to every independent extractor via tokio::join!
//! - Contractual protections second, once the provider list is known
//! - Deterministic fan-in through the Result Assembler
//!
//! Extractors share nothing but the read-only document set and config, so
//! the analysis is identical to the sequential `policylens_core::analyze`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info};

use policylens_core::extractors::{
    ComplianceExtractor, ContractualExtractor, DataUsageExtractor, EthicsExtractor,
    FeatureExtractor, NativeAiExtractor, OptOutExtractor, SecurityExtractor, SharingExtractor,
    ThirdPartyExtractor,
};
use policylens_core::{
    Analysis, AnalysisConfig, DocumentCategory, DocumentSet, Extractor, ExtractorFindings,
    ExtractorKind, ResultAssembler,
};

use crate::config::RuntimeConfig;
use crate::source::{collect_documents, DocumentSource, SourceError};

/// Errors from the runtime orchestrator.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Extractor {kind} failed: {message}")]
    Extractor { kind: ExtractorKind, message: String },

    #[error("Extraction task failed: {0}")]
    Task(String),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Result from a runtime analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeResult {
    /// When the analysis was produced
    pub analyzed_at: DateTime<Utc>,

    /// Name of the document source
    pub source: String,

    /// Categories the source could not deliver
    pub failed_categories: Vec<DocumentCategory>,

    /// The analysis itself
    pub analysis: Analysis,
}

/// The runtime orchestrator manages concurrent extraction.
pub struct RuntimeOrchestrator {
    config: RuntimeConfig,
    assembler: ResultAssembler,
}

impl RuntimeOrchestrator {
    /// Create a new runtime orchestrator.
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            assembler: ResultAssembler::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Fetch every document from `source`, then analyze them.
    pub async fn analyze_source(
        &self,
        source: Arc<dyn DocumentSource>,
    ) -> Result<RuntimeResult, RuntimeError> {
        let name = source.name().to_string();
        let collected = collect_documents(source, &self.config.timeouts).await;
        let mut result = self.analyze_documents(collected.documents).await?;
        result.source = name;
        result.failed_categories = collected.failed;
        Ok(result)
    }

    /// Analyze an in-memory document set.
    pub async fn analyze_documents(&self, docs: DocumentSet) -> Result<RuntimeResult, RuntimeError> {
        let docs = Arc::new(docs);

        let findings = if self.config.parallel {
            self.extract_parallel(&docs).await?
        } else {
            let blocking_docs = Arc::clone(&docs);
            let config = self.config.analysis.clone();
            tokio::task::spawn_blocking(move || {
                ExtractorFindings::extract_all(&blocking_docs, &config)
            })
            .await
            .map_err(|e| RuntimeError::Task(e.to_string()))?
        };

        // Fan-in: deterministic assembly
        let analysis = self.assembler.assemble(&docs, findings);
        let analyzed_at = self.config.determinism.analyzed_at.unwrap_or_else(Utc::now);

        info!(
            covered = docs.covered().count(),
            parallel = self.config.parallel,
            "runtime analysis complete"
        );

        Ok(RuntimeResult {
            analyzed_at,
            source: "inline".to_string(),
            failed_categories: Vec::new(),
            analysis,
        })
    }

    async fn extract_parallel(
        &self,
        docs: &Arc<DocumentSet>,
    ) -> Result<ExtractorFindings, RuntimeError> {
        let config = &self.config.analysis;

        // Fan-out: independent extractors
        let (
            opt_out,
            native_ai,
            third_party,
            features,
            data_usage,
            sharing,
            compliance,
            security,
            ethics,
        ) = tokio::join!(
            run(OptOutExtractor::new(), docs, config),
            run(NativeAiExtractor::new(), docs, config),
            run(ThirdPartyExtractor::new(), docs, config),
            run(FeatureExtractor::new(), docs, config),
            run(DataUsageExtractor::new(), docs, config),
            run(SharingExtractor::new(), docs, config),
            run(ComplianceExtractor::new(), docs, config),
            run(SecurityExtractor::new(), docs, config),
            run(EthicsExtractor::new(), docs, config),
        );

        let third_party = third_party?;
        debug!(providers = third_party.providers.len(), "fan-out complete");

        // Contractual protections needs the provider list
        let contractual = run(
            ContractualExtractor::new(third_party.providers.clone()),
            docs,
            config,
        )
        .await?;

        Ok(ExtractorFindings {
            opt_out: opt_out?,
            native_ai: native_ai?,
            third_party,
            features: features?,
            data_usage: data_usage?,
            sharing: sharing?,
            contractual,
            compliance: compliance?,
            security: security?,
            ethics: ethics?,
        })
    }
}

impl Default for RuntimeOrchestrator {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

/// Run one extractor on the blocking pool.
async fn run<E>(
    extractor: E,
    docs: &Arc<DocumentSet>,
    config: &AnalysisConfig,
) -> Result<E::Finding, RuntimeError>
where
    E: Extractor + Send + 'static,
    E::Finding: Send + 'static,
{
    let kind = extractor.kind();
    let docs = Arc::clone(docs);
    let config = config.clone();
    tokio::task::spawn_blocking(move || extractor.extract(&docs, &config))
        .await
        .map_err(|e| join_failure(kind, e))
}

fn join_failure(kind: ExtractorKind, error: JoinError) -> RuntimeError {
    tracing::warn!(extractor = %kind, error = %error, "extractor task failed");
    RuntimeError::Extractor {
        kind,
        message: error.to_string(),
    }
}

//! # policylens-runtime
//!
//! Async runtime around `policylens-core`:
//! - Configuration loaded from YAML or JSON
//! - Document sources (directories, in-memory) fetched under timeouts
//! - Concurrent extraction with deterministic fan-in
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use policylens_runtime::{DirectorySource, RuntimeConfig, RuntimeOrchestrator};
//!
//! let orchestrator = RuntimeOrchestrator::new(RuntimeConfig::default());
//! let source = Arc::new(DirectorySource::new("./vendor-docs")?);
//! let result = orchestrator.analyze_source(source).await?;
//! println!("{:?}", result.analysis.concerns);
//! ```

pub mod config;
pub mod orchestrator;
pub mod source;

pub use config::{ConfigError, DeterminismConfig, RuntimeConfig, TimeoutConfig};
pub use orchestrator::{RuntimeError, RuntimeOrchestrator, RuntimeResult};
pub use source::{
    collect_documents, CollectedDocuments, DirectorySource, DocumentSource, SourceError,
    StaticSource,
};

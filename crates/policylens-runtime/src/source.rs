//! Document sources.
//!
//! A source hands back the text of one document category at a time. Fetches
//! are blocking and run on tokio's blocking pool, each under its own
//! timeout, with a global deadline over the whole collection. A category
//! that fails or times out is reported and treated as absent.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use policylens_core::{DocumentCategory, DocumentSet};

use crate::config::TimeoutConfig;

/// Errors from a document source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Fetch failed: {0}")]
    Failed(String),
}

/// Somewhere policy documents can be fetched from.
pub trait DocumentSource: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Fetch the text for `category`. `Ok(None)` means the source has no such document.
    fn fetch(&self, category: DocumentCategory) -> Result<Option<String>, SourceError>;
}

/// Reads `<dir>/<category>.txt` or `<dir>/<category>.md`.
pub struct DirectorySource {
    root: PathBuf,
    name: String,
}

impl DirectorySource {
    pub const EXTENSIONS: [&'static str; 2] = ["txt", "md"];

    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SourceError::NotFound(root.display().to_string()));
        }
        let name = root.display().to_string();
        Ok(Self { root, name })
    }

    fn path_for(&self, category: DocumentCategory) -> Option<PathBuf> {
        Self::EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", category.as_str(), ext)))
            .find(|path| path.is_file())
    }
}

impl DocumentSource for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, category: DocumentCategory) -> Result<Option<String>, SourceError> {
        match self.path_for(category) {
            Some(path) => Ok(Some(fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }
}

/// In-memory source, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    documents: BTreeMap<DocumentCategory, String>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: BTreeMap::new(),
        }
    }

    pub fn with(mut self, category: DocumentCategory, text: impl Into<String>) -> Self {
        self.documents.insert(category, text.into());
        self
    }

    /// Wrap an already-loaded document set.
    pub fn from_documents(name: impl Into<String>, docs: &DocumentSet) -> Self {
        let mut source = Self::new(name);
        for category in docs.covered() {
            if let Some(text) = docs.text(category) {
                source.documents.insert(category, text.to_string());
            }
        }
        source
    }
}

impl DocumentSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, category: DocumentCategory) -> Result<Option<String>, SourceError> {
        Ok(self.documents.get(&category).cloned())
    }
}

/// Documents gathered from a source, plus the categories that could not be fetched.
#[derive(Debug, Clone, Default)]
pub struct CollectedDocuments {
    pub documents: DocumentSet,
    pub failed: Vec<DocumentCategory>,
}

/// Fetch every category from `source` concurrently.
///
/// Each fetch is bounded by its category's timeout and by the global
/// deadline. Results are gathered in canonical category order.
pub async fn collect_documents(
    source: Arc<dyn DocumentSource>,
    timeouts: &TimeoutConfig,
) -> CollectedDocuments {
    let started = Instant::now();
    let global_deadline = started + timeouts.global;

    let handles: Vec<(DocumentCategory, JoinHandle<Result<Option<String>, SourceError>>)> =
        DocumentCategory::ALL
            .iter()
            .map(|&category| {
                let source = Arc::clone(&source);
                (
                    category,
                    tokio::task::spawn_blocking(move || source.fetch(category)),
                )
            })
            .collect();

    let mut collected = CollectedDocuments::default();

    for (category, mut handle) in handles {
        let limit = timeouts.document_timeout(category);
        let deadline = (started + limit).min(global_deadline);

        let outcome = match timeout_at(deadline, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(SourceError::Failed(join_error.to_string())),
            Err(_) => {
                handle.abort();
                Err(SourceError::Timeout(deadline - started))
            }
        };

        match outcome {
            Ok(Some(text)) => {
                debug!(category = %category, bytes = text.len(), "document fetched");
                collected.documents.insert(category, text);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    source = source.name(),
                    category = %category,
                    error = %e,
                    "document fetch failed, treating as absent"
                );
                collected.failed.push(category);
            }
        }
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    struct FlakySource {
        slow: DocumentCategory,
        broken: DocumentCategory,
    }

    impl DocumentSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        fn fetch(&self, category: DocumentCategory) -> Result<Option<String>, SourceError> {
            if category == self.slow {
                thread::sleep(Duration::from_millis(300));
                return Ok(Some("late AI data text".to_string()));
            }
            if category == self.broken {
                return Err(SourceError::Failed("connection reset".to_string()));
            }
            if category == DocumentCategory::PrivacyPolicy {
                return Ok(Some("We retain data for 30 days.".to_string()));
            }
            Ok(None)
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("policylens-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_directory_source_reads_known_files() {
        let dir = temp_dir("dir-source");
        fs::write(dir.join("privacy_policy.txt"), "Privacy text").unwrap();
        fs::write(dir.join("admin_guide.md"), "# Admin guide").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let source = DirectorySource::new(&dir).unwrap();
        assert_eq!(
            source.fetch(DocumentCategory::PrivacyPolicy).unwrap().as_deref(),
            Some("Privacy text")
        );
        assert_eq!(
            source.fetch(DocumentCategory::AdminGuide).unwrap().as_deref(),
            Some("# Admin guide")
        );
        assert!(source.fetch(DocumentCategory::DataProcessing).unwrap().is_none());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_directory_source_missing_root() {
        let missing = std::env::temp_dir().join("policylens-definitely-missing-dir");
        assert!(matches!(
            DirectorySource::new(missing),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn test_static_source_from_documents_skips_blank() {
        let docs = DocumentSet::new()
            .with(DocumentCategory::PrivacyPolicy, "text")
            .with(DocumentCategory::DataProcessing, "   ");
        let source = StaticSource::from_documents("inline", &docs);

        assert_eq!(source.name(), "inline");
        assert!(source.fetch(DocumentCategory::PrivacyPolicy).unwrap().is_some());
        assert!(source.fetch(DocumentCategory::DataProcessing).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collect_from_static_source() {
        let source = StaticSource::new("memory")
            .with(DocumentCategory::TermsOfService, "Terms")
            .with(DocumentCategory::AiTrust, "Trust");

        let collected = collect_documents(Arc::new(source), &TimeoutConfig::default()).await;

        assert!(collected.failed.is_empty());
        assert_eq!(
            collected.documents.covered().collect::<Vec<_>>(),
            vec![DocumentCategory::TermsOfService, DocumentCategory::AiTrust]
        );
    }

    #[tokio::test]
    async fn test_failures_and_timeouts_are_absent() {
        let source = FlakySource {
            slow: DocumentCategory::AdminGuide,
            broken: DocumentCategory::DataProcessing,
        };
        let mut timeouts = TimeoutConfig::default();
        timeouts
            .per_category
            .insert(DocumentCategory::AdminGuide, Duration::from_millis(20));

        let collected = collect_documents(Arc::new(source), &timeouts).await;

        assert_eq!(
            collected.failed,
            vec![DocumentCategory::DataProcessing, DocumentCategory::AdminGuide]
        );
        assert!(collected.documents.is_covered(DocumentCategory::PrivacyPolicy));
        assert!(!collected.documents.is_covered(DocumentCategory::AdminGuide));
    }

    #[tokio::test]
    async fn test_global_deadline_caps_document_timeout() {
        let source = FlakySource {
            slow: DocumentCategory::PrivacyPolicy,
            broken: DocumentCategory::DataProcessing,
        };
        let timeouts = TimeoutConfig {
            global: Duration::from_millis(20),
            ..TimeoutConfig::default()
        };

        let collected = collect_documents(Arc::new(source), &timeouts).await;
        assert!(collected.failed.contains(&DocumentCategory::PrivacyPolicy));
        assert!(collected.documents.is_empty());
    }
}

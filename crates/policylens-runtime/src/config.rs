//! Configuration for policylens-runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use policylens_core::{AnalysisConfig, DocumentCategory};

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    /// Analysis tunables passed through to the core
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Run extractors concurrently on blocking tasks
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Document fetch timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Determinism configuration
    #[serde(default)]
    pub determinism: DeterminismConfig,
}

fn default_true() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            parallel: true,
            timeouts: TimeoutConfig::default(),
            determinism: DeterminismConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, choosing the format by extension.
    /// Anything other than `.json` is read as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Get the fetch timeout for a specific category.
    pub fn document_timeout(&self, category: DocumentCategory) -> Duration {
        self.timeouts.document_timeout(category)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.global.is_zero() {
            return Err(ConfigError::Invalid("timeouts.global must be positive".to_string()));
        }
        if self.timeouts.per_document.is_zero() {
            return Err(ConfigError::Invalid(
                "timeouts.per_document must be positive".to_string(),
            ));
        }
        if let Some((category, _)) = self
            .timeouts
            .per_category
            .iter()
            .find(|(_, timeout)| timeout.is_zero())
        {
            return Err(ConfigError::Invalid(format!(
                "timeouts.per_category.{} must be positive",
                category
            )));
        }
        Ok(())
    }
}

/// Timeout configuration for the document source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeoutConfig {
    /// Deadline for collecting every document
    #[serde(with = "humantime_serde", default = "default_global_timeout")]
    pub global: Duration,

    /// Default deadline for fetching one document
    #[serde(with = "humantime_serde", default = "default_document_timeout")]
    pub per_document: Duration,

    /// Per-category overrides (BTreeMap for deterministic iteration)
    #[serde(with = "humantime_serde::map", default)]
    pub per_category: BTreeMap<DocumentCategory, Duration>,
}

fn default_global_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_document_timeout() -> Duration {
    Duration::from_secs(15)
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            global: Duration::from_secs(60),
            per_document: Duration::from_secs(15),
            per_category: BTreeMap::new(),
        }
    }
}

impl TimeoutConfig {
    pub fn document_timeout(&self, category: DocumentCategory) -> Duration {
        self.per_category
            .get(&category)
            .copied()
            .unwrap_or(self.per_document)
    }
}

/// Determinism configuration for reproducible reports.
///
/// The analysis itself carries no timestamp. This only pins the `analyzedAt`
/// stamp of the report wrapped around it:
///
/// ```yaml
/// determinism:
///   analyzed_at: "2025-12-20T10:00:00Z"
/// ```
///
/// When `analyzed_at` is None (default), the current system time is used.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DeterminismConfig {
    /// Fixed timestamp for the report.
    ///
    /// Format: ISO 8601 (e.g., "2025-12-20T10:00:00Z")
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
}

// Custom serialization for Duration using humantime format
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub mod map {
        use serde::ser::SerializeMap;
        use serde::{self, Deserialize, Deserializer, Serializer};
        use std::collections::BTreeMap;
        use std::time::Duration;

        use policylens_core::DocumentCategory;

        pub fn serialize<S>(
            map: &BTreeMap<DocumentCategory, Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut out = serializer.serialize_map(Some(map.len()))?;
            for (category, duration) in map {
                out.serialize_entry(category, &humantime::format_duration(*duration).to_string())?;
            }
            out.end()
        }

        pub fn deserialize<'de, D>(
            deserializer: D,
        ) -> Result<BTreeMap<DocumentCategory, Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = BTreeMap::<DocumentCategory, String>::deserialize(deserializer)?;
            raw.into_iter()
                .map(|(category, s)| {
                    humantime::parse_duration(&s)
                        .map(|duration| (category, duration))
                        .map_err(serde::de::Error::custom)
                })
                .collect()
        }
    }
}

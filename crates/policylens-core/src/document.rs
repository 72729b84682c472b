//! Document set parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::DocumentCategory;

/// Errors that can occur when loading a document set.
#[derive(Error, Debug)]
pub enum DocumentSetError {
    #[error("Failed to read document set file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown document category: {0}")]
    UnknownCategory(String),
}

/// Extracted plain text per document category.
///
/// Missing, null and empty entries are all treated as "no document".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DocumentSet {
    documents: BTreeMap<DocumentCategory, String>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, category: DocumentCategory, text: impl Into<String>) -> Self {
        self.insert(category, text);
        self
    }

    pub fn insert(&mut self, category: DocumentCategory, text: impl Into<String>) {
        self.documents.insert(category, text.into());
    }

    /// Text for a category, or `None` if absent or blank.
    pub fn text(&self, category: DocumentCategory) -> Option<&str> {
        self.documents
            .get(&category)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    /// Whether a category has non-empty text.
    pub fn is_covered(&self, category: DocumentCategory) -> bool {
        self.text(category).is_some()
    }

    /// Categories with non-empty text, in canonical order.
    pub fn covered(&self) -> impl Iterator<Item = DocumentCategory> + '_ {
        DocumentCategory::ALL
            .into_iter()
            .filter(move |category| self.is_covered(*category))
    }

    /// Coverage of every category.
    pub fn coverage(&self) -> BTreeMap<DocumentCategory, bool> {
        DocumentCategory::ALL
            .iter()
            .map(|category| (*category, self.is_covered(*category)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.covered().next().is_none()
    }

    /// Parse a document set from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentSetError> {
        let raw: BTreeMap<String, Option<String>> = serde_yaml::from_str(yaml)?;
        Self::from_raw(raw)
    }

    /// Parse a document set from JSON.
    pub fn from_json(json: &str) -> Result<Self, DocumentSetError> {
        let raw: BTreeMap<String, Option<String>> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Parse a document set from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DocumentSetError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a document set from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DocumentSetError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a document set from a file, choosing the format by extension.
    /// Anything other than `.yaml`/`.yml` is read as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentSetError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_json_file(path),
        }
    }

    fn from_raw(raw: BTreeMap<String, Option<String>>) -> Result<Self, DocumentSetError> {
        let mut set = DocumentSet::new();
        for (key, text) in raw {
            let category: DocumentCategory = key
                .parse()
                .map_err(DocumentSetError::UnknownCategory)?;
            if let Some(text) = text {
                set.insert(category, text);
            }
        }
        Ok(set)
    }
}

impl FromIterator<(DocumentCategory, String)> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = (DocumentCategory, String)>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let json = r#"{"privacy_policy": "We use AI.", "terms_of_service": null, "ai_trust": ""}"#;
        let set = DocumentSet::from_json(json).unwrap();

        assert_eq!(set.text(DocumentCategory::PrivacyPolicy), Some("We use AI."));
        assert_eq!(set.text(DocumentCategory::TermsOfService), None);
        assert_eq!(set.text(DocumentCategory::AiTrust), None);
        assert_eq!(set.covered().collect::<Vec<_>>(), vec![DocumentCategory::PrivacyPolicy]);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "admin_guide: |\n  Administrators can disable AI.\n";
        let set = DocumentSet::from_yaml(yaml).unwrap();
        assert!(set.is_covered(DocumentCategory::AdminGuide));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = DocumentSet::from_json(r#"{"cookie_policy": "..."}"#);
        assert!(matches!(result, Err(DocumentSetError::UnknownCategory(key)) if key == "cookie_policy"));
    }

    #[test]
    fn test_whitespace_only_is_not_covered() {
        let set = DocumentSet::new().with(DocumentCategory::ApiTerms, "  \n ");
        assert!(set.is_empty());
        let coverage = set.coverage();
        assert_eq!(coverage.len(), DocumentCategory::ALL.len());
        assert!(coverage.values().all(|covered| !covered));
    }
}

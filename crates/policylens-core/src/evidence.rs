//! Evidence linking for policylens analyses.
//!
//! Every asserted fact must be backed by evidence pointing at a specific
//! span of a specific policy document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Signal;
use crate::types::DocumentCategory;

/// A context-bearing instance of a signal matching in one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    /// Category of the document the match was found in
    pub source_category: DocumentCategory,

    /// The text window around the match
    pub context: String,

    /// Signal that produced the match
    pub matched_pattern: Signal,

    /// Byte span of the match (e.g., "privacy_policy[47:72]")
    pub pointer: String,
}

impl EvidenceItem {
    /// Create evidence for a match at `start..end` in a category's text.
    pub fn new(
        signal: Signal,
        category: DocumentCategory,
        context: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            source_category: category,
            context: context.into().trim().to_string(),
            matched_pattern: signal,
            pointer: format!("{}[{}:{}]", category, start, end),
        }
    }
}

/// Evidence collected by one extractor, keyed by signal.
///
/// Each extractor owns its log privately; the assembler merges logs in a
/// fixed order after every extractor has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceLog {
    entries: BTreeMap<Signal, Vec<EvidenceItem>>,
}

impl EvidenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item under the signal it names.
    pub fn record(&mut self, item: EvidenceItem) {
        debug_assert!(
            item.matched_pattern.records_evidence(),
            "signal {} feeds no facet and must not record evidence",
            item.matched_pattern
        );
        self.entries.entry(item.matched_pattern).or_default().push(item);
    }

    pub fn items(&self, signal: Signal) -> &[EvidenceItem] {
        self.entries.get(&signal).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Append every item of `other`, preserving its per-signal order.
    pub fn merge(&mut self, other: EvidenceLog) {
        for (signal, items) in other.entries {
            self.entries.entry(signal).or_default().extend(items);
        }
    }

    pub fn into_map(self) -> BTreeMap<Signal, Vec<EvidenceItem>> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_names_category_and_span() {
        let item = EvidenceItem::new(
            Signal::OptOut,
            DocumentCategory::AdminGuide,
            "  can be disabled ",
            42,
            50,
        );
        assert_eq!(item.pointer, "admin_guide[42:50]");
        assert_eq!(item.context, "can be disabled");
    }

    #[test]
    fn test_serializes_camel_case() {
        let item = EvidenceItem::new(
            Signal::ThirdParty,
            DocumentCategory::PrivacyPolicy,
            "OpenAI",
            0,
            6,
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["sourceCategory"], "privacy_policy");
        assert_eq!(json["matchedPattern"], "third_party");
    }

    #[test]
    fn test_log_merge_preserves_order() {
        let mut first = EvidenceLog::new();
        first.record(EvidenceItem::new(
            Signal::Security,
            DocumentCategory::DataSecurity,
            "a",
            0,
            1,
        ));
        let mut second = EvidenceLog::new();
        second.record(EvidenceItem::new(
            Signal::Security,
            DocumentCategory::PrivacyPolicy,
            "b",
            0,
            1,
        ));

        first.merge(second);
        let contexts: Vec<_> = first
            .items(Signal::Security)
            .iter()
            .map(|item| item.context.as_str())
            .collect();
        assert_eq!(contexts, vec!["a", "b"]);
        assert_eq!(first.len(), 2);
    }

    #[test]
    #[should_panic(expected = "must not record evidence")]
    #[cfg(debug_assertions)]
    fn test_refinement_signal_cannot_record() {
        let mut log = EvidenceLog::new();
        log.record(EvidenceItem::new(
            Signal::Negation,
            DocumentCategory::TermsOfService,
            "never",
            0,
            5,
        ));
    }
}

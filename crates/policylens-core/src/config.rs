//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a single analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Characters of context kept before each match
    #[serde(default = "default_context_window")]
    pub context_before: usize,

    /// Characters of context kept after each match
    #[serde(default = "default_context_window")]
    pub context_after: usize,

    /// How conflicting facts across document categories are resolved
    #[serde(default)]
    pub priority_resolution: PriorityResolution,
}

fn default_context_window() -> usize {
    100
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            context_before: default_context_window(),
            context_after: default_context_window(),
            priority_resolution: PriorityResolution::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn window(&self) -> Window {
        Window {
            before: self.context_before,
            after: self.context_after,
        }
    }
}

/// Context window around a match, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub before: usize,
    pub after: usize,
}

/// Conflict resolution across document categories.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriorityResolution {
    /// Scan categories most-authoritative first; the highest-priority
    /// category's value wins a conflict.
    #[default]
    Apply,
    /// Scan categories in canonical order; the last writer wins and the
    /// priority winner is only recorded.
    RecordOnly,
}

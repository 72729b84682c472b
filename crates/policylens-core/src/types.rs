//! Core types for policylens analysis.
//!
//! These types are the data structures used throughout policylens for
//! document categories, analysis facets, and the analysis result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::catalog::Signal;
use crate::evidence::EvidenceItem;

/// The kinds of policy document the analysis consumes.
///
/// Declaration order is the canonical processing order; `Ord` follows it so
/// `BTreeMap<DocumentCategory, _>` iterates deterministically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    PrivacyPolicy,
    TermsOfService,
    DataProcessing,
    AiTrust,
    AiEthics,
    ResponsibleAi,
    DataSecurity,
    GdprCompliance,
    CcpaCompliance,
    AcceptableUse,
    DataRetention,
    Subprocessors,
    ApiTerms,
    DeveloperPolicy,
    AdminGuide,
    EnterpriseControls,
}

impl DocumentCategory {
    /// Every category, in canonical order.
    pub const ALL: [DocumentCategory; 16] = [
        DocumentCategory::PrivacyPolicy,
        DocumentCategory::TermsOfService,
        DocumentCategory::DataProcessing,
        DocumentCategory::AiTrust,
        DocumentCategory::AiEthics,
        DocumentCategory::ResponsibleAi,
        DocumentCategory::DataSecurity,
        DocumentCategory::GdprCompliance,
        DocumentCategory::CcpaCompliance,
        DocumentCategory::AcceptableUse,
        DocumentCategory::DataRetention,
        DocumentCategory::Subprocessors,
        DocumentCategory::ApiTerms,
        DocumentCategory::DeveloperPolicy,
        DocumentCategory::AdminGuide,
        DocumentCategory::EnterpriseControls,
    ];

    /// The stable snake_case key used in input maps and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::PrivacyPolicy => "privacy_policy",
            DocumentCategory::TermsOfService => "terms_of_service",
            DocumentCategory::DataProcessing => "data_processing",
            DocumentCategory::AiTrust => "ai_trust",
            DocumentCategory::AiEthics => "ai_ethics",
            DocumentCategory::ResponsibleAi => "responsible_ai",
            DocumentCategory::DataSecurity => "data_security",
            DocumentCategory::GdprCompliance => "gdpr_compliance",
            DocumentCategory::CcpaCompliance => "ccpa_compliance",
            DocumentCategory::AcceptableUse => "acceptable_use",
            DocumentCategory::DataRetention => "data_retention",
            DocumentCategory::Subprocessors => "subprocessors",
            DocumentCategory::ApiTerms => "api_terms",
            DocumentCategory::DeveloperPolicy => "developer_policy",
            DocumentCategory::AdminGuide => "admin_guide",
            DocumentCategory::EnterpriseControls => "enterprise_controls",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(&['-', ' '][..], "_");
        DocumentCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| s.to_string())
    }
}

/// A fact on the analysis that carries a confidence score.
///
/// Ordered alphabetically for deterministic iteration in BTreeMap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    AiFeatures,
    CcpaCompliant,
    ContractualProtections,
    DataRetention,
    EnterpriseOptOut,
    EthicalConsiderations,
    GdprCompliant,
    ModelSharing,
    ModelTraining,
    NativeAi,
    OptOutAvailable,
    SecurityCertifications,
    SecurityMeasures,
    ThirdPartyProviders,
}

impl Facet {
    pub const ALL: [Facet; 14] = [
        Facet::AiFeatures,
        Facet::CcpaCompliant,
        Facet::ContractualProtections,
        Facet::DataRetention,
        Facet::EnterpriseOptOut,
        Facet::EthicalConsiderations,
        Facet::GdprCompliant,
        Facet::ModelSharing,
        Facet::ModelTraining,
        Facet::NativeAi,
        Facet::OptOutAvailable,
        Facet::SecurityCertifications,
        Facet::SecurityMeasures,
        Facet::ThirdPartyProviders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::AiFeatures => "ai_features",
            Facet::CcpaCompliant => "ccpa_compliant",
            Facet::ContractualProtections => "contractual_protections",
            Facet::DataRetention => "data_retention",
            Facet::EnterpriseOptOut => "enterprise_opt_out",
            Facet::EthicalConsiderations => "ethical_considerations",
            Facet::GdprCompliant => "gdpr_compliant",
            Facet::ModelSharing => "model_sharing",
            Facet::ModelTraining => "model_training",
            Facet::NativeAi => "native_ai",
            Facet::OptOutAvailable => "opt_out_available",
            Facet::SecurityCertifications => "security_certifications",
            Facet::SecurityMeasures => "security_measures",
            Facet::ThirdPartyProviders => "third_party_providers",
        }
    }

    /// Document categories in priority order (most authoritative first)
    /// used to resolve conflicts for this facet.
    pub fn priority(&self) -> &'static [DocumentCategory] {
        use DocumentCategory::*;
        match self {
            Facet::OptOutAvailable => &[AdminGuide, EnterpriseControls, TermsOfService, PrivacyPolicy],
            Facet::EnterpriseOptOut => &[AdminGuide, EnterpriseControls, TermsOfService],
            Facet::NativeAi => &[AiTrust, AiEthics, ResponsibleAi, PrivacyPolicy],
            Facet::ThirdPartyProviders => &[Subprocessors, DataProcessing, PrivacyPolicy],
            Facet::DataRetention => &[DataRetention, PrivacyPolicy, DataProcessing],
            Facet::ModelTraining => &[AiTrust, AiEthics, PrivacyPolicy, TermsOfService],
            Facet::ModelSharing => &[TermsOfService, PrivacyPolicy, DataProcessing],
            Facet::ContractualProtections => &[DataProcessing, TermsOfService, ApiTerms],
            Facet::SecurityMeasures | Facet::SecurityCertifications => {
                &[DataSecurity, DataProcessing, PrivacyPolicy]
            }
            Facet::GdprCompliant => &[GdprCompliance, DataProcessing, PrivacyPolicy],
            Facet::CcpaCompliant => &[CcpaCompliance, PrivacyPolicy, DataProcessing],
            Facet::EthicalConsiderations => &[AiEthics, ResponsibleAi, AiTrust],
            Facet::AiFeatures => &[AiTrust, ResponsibleAi, AiEthics, PrivacyPolicy, TermsOfService],
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an AI opt-out is exercised.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptOutMethod {
    AdminConsole,
    Api,
    ContactVendor,
}

/// At what level an AI opt-out applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptOutGranularity {
    UserLevel,
    FeatureLevel,
    OrganizationLevel,
}

/// The result of analyzing a vendor's document set.
///
/// Constructed fresh per invocation; never mutated after being returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    // Opt-out
    pub opt_out_available: bool,
    pub enterprise_opt_out: bool,
    pub opt_out_method: Option<OptOutMethod>,
    pub opt_out_granularity: Option<OptOutGranularity>,

    // AI implementation
    /// `None` when neither a native claim nor a third-party provider was found
    #[serde(rename = "nativeAI")]
    pub native_ai: Option<bool>,
    pub third_party_providers: Vec<String>,
    pub ai_features: Vec<String>,

    // Data usage
    pub data_retention: bool,
    pub retention_period: Option<String>,
    pub model_training: bool,
    pub model_sharing: bool,
    pub model_sharing_limitations: Option<String>,

    // Contractual protections
    pub contractual_protections: bool,
    pub contractual_details: Option<String>,

    // Compliance
    pub gdpr_compliant: Option<bool>,
    pub ccpa_compliant: Option<bool>,

    // Security and ethics
    pub security_measures: Vec<String>,
    pub security_certifications: Vec<String>,
    pub ethical_considerations: Vec<String>,

    pub concerns: Vec<String>,

    /// Whether each category had non-empty text
    pub document_coverage: BTreeMap<DocumentCategory, bool>,

    /// Confidence in [0, 1] for every facet
    pub confidence_levels: BTreeMap<Facet, f64>,

    /// Raw evidence per evidence-bearing signal, in discovery order
    pub evidence: BTreeMap<Signal, Vec<EvidenceItem>>,

    /// Category that won priority resolution, per facet with evidence
    #[serde(default)]
    pub authoritative_sources: BTreeMap<Facet, DocumentCategory>,
}

impl Analysis {
    /// Confidence for a facet.
    ///
    /// # Panics
    ///
    /// Panics if the facet has no entry, which means the scorer was bypassed.
    pub fn confidence(&self, facet: Facet) -> f64 {
        match self.confidence_levels.get(&facet) {
            Some(value) => *value,
            None => panic!("confidence map has no entry for facet {}", facet),
        }
    }

    /// Evidence recorded for a signal (empty for refinement signals).
    pub fn evidence_for(&self, signal: Signal) -> &[EvidenceItem] {
        self.evidence.get(&signal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of evidence items across every signal.
    pub fn evidence_count(&self) -> usize {
        self.evidence.values().map(Vec::len).sum()
    }

    pub fn has_evidence(&self) -> bool {
        self.evidence_count() > 0
    }
}

/// Append `value` to `items` unless an equal entry is already present.
///
/// Returns true if the value was added.
pub(crate) fn push_unique(items: &mut Vec<String>, value: impl Into<String>) -> bool {
    let value = value.into();
    if value.is_empty() || items.contains(&value) {
        return false;
    }
    items.push(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in DocumentCategory::ALL {
            assert_eq!(category.as_str().parse::<DocumentCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_category_parse_is_lenient_about_separators() {
        assert_eq!(
            "Terms-Of-Service".parse::<DocumentCategory>(),
            Ok(DocumentCategory::TermsOfService)
        );
        assert!("cookie_policy".parse::<DocumentCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&DocumentCategory::AdminGuide).unwrap();
        assert_eq!(json, "\"admin_guide\"");
    }

    #[test]
    fn test_facet_order_is_alphabetical() {
        let mut sorted = Facet::ALL;
        sorted.sort_by_key(|f| f.as_str());
        assert_eq!(sorted, Facet::ALL);
    }

    #[test]
    fn test_push_unique_skips_duplicates_and_empty() {
        let mut items = Vec::new();
        assert!(push_unique(&mut items, "encryption"));
        assert!(!push_unique(&mut items, "encryption"));
        assert!(!push_unique(&mut items, ""));
        assert_eq!(items, vec!["encryption".to_string()]);
    }
}

//! Pattern Catalog
//!
//! Static mapping from signal name to its detection rule. Every rule declares
//! which document categories it scans, what relevance the surrounding context
//! must show before a match counts as evidence, and which facets it feeds.
//!
//! ## Signals
//!
//! | Kind | Signals |
//! |------|---------|
//! | Evidence-bearing | `opt_out`, `enterprise`, `ai_native`, `ai_feature`, `third_party`, `data_retention`, `model_training`, `model_sharing`, `contractual`, `gdpr`, `ccpa`, `security`, `certification`, `ethical` |
//! | Refinement | `admin_controls`, `api_access`, `vendor_contact`, `granularity`, `retention_period`, `period_unit`, `negation`, `third_party_reference`, `compliance_affirmation` |
//!
//! Refinement signals are only ever applied to an already-relevant context or
//! document. They feed no facet and never record evidence.
//!
//! The facet mapping lives here and nowhere else: confidence is read back
//! through [`PatternRule::facets`], never through a derived key.

pub mod vocabulary;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::types::{DocumentCategory, Facet};

/// A named detection rule.
///
/// Ordered alphabetically for deterministic iteration in BTreeMap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    AdminControls,
    AiFeature,
    AiNative,
    ApiAccess,
    Ccpa,
    Certification,
    ComplianceAffirmation,
    Contractual,
    DataRetention,
    Enterprise,
    Ethical,
    Gdpr,
    Granularity,
    ModelSharing,
    ModelTraining,
    Negation,
    OptOut,
    PeriodUnit,
    RetentionPeriod,
    Security,
    ThirdParty,
    ThirdPartyReference,
    VendorContact,
}

impl Signal {
    pub const ALL: [Signal; 23] = [
        Signal::AdminControls,
        Signal::AiFeature,
        Signal::AiNative,
        Signal::ApiAccess,
        Signal::Ccpa,
        Signal::Certification,
        Signal::ComplianceAffirmation,
        Signal::Contractual,
        Signal::DataRetention,
        Signal::Enterprise,
        Signal::Ethical,
        Signal::Gdpr,
        Signal::Granularity,
        Signal::ModelSharing,
        Signal::ModelTraining,
        Signal::Negation,
        Signal::OptOut,
        Signal::PeriodUnit,
        Signal::RetentionPeriod,
        Signal::Security,
        Signal::ThirdParty,
        Signal::ThirdPartyReference,
        Signal::VendorContact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::AdminControls => "admin_controls",
            Signal::AiFeature => "ai_feature",
            Signal::AiNative => "ai_native",
            Signal::ApiAccess => "api_access",
            Signal::Ccpa => "ccpa",
            Signal::Certification => "certification",
            Signal::ComplianceAffirmation => "compliance_affirmation",
            Signal::Contractual => "contractual",
            Signal::DataRetention => "data_retention",
            Signal::Enterprise => "enterprise",
            Signal::Ethical => "ethical",
            Signal::Gdpr => "gdpr",
            Signal::Granularity => "granularity",
            Signal::ModelSharing => "model_sharing",
            Signal::ModelTraining => "model_training",
            Signal::Negation => "negation",
            Signal::OptOut => "opt_out",
            Signal::PeriodUnit => "period_unit",
            Signal::RetentionPeriod => "retention_period",
            Signal::Security => "security",
            Signal::ThirdParty => "third_party",
            Signal::ThirdPartyReference => "third_party_reference",
            Signal::VendorContact => "vendor_contact",
        }
    }

    /// Whether matches of this signal are recorded as evidence.
    pub fn records_evidence(&self) -> bool {
        !PatternCatalog::global().lookup(*self).facets.is_empty()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signal::ALL
            .iter()
            .copied()
            .find(|signal| signal.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// What a match's surrounding context must show before it counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relevance {
    /// Always relevant
    None,
    /// Context mentions an AI-indicative term
    AiRelated,
    /// AI-related and mentions "data"
    DataRelated,
    /// AI-related and mentions "model" or "algorithm"
    ModelRelated,
    /// AI-related or mentions "data"
    AiOrData,
}

/// Which document categories a rule scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Applied to whatever context or document the caller hands it
    Any,
    /// Scanned in exactly these categories, in this order (most authoritative first)
    Categories(&'static [DocumentCategory]),
}

impl Scope {
    pub fn includes(&self, category: DocumentCategory) -> bool {
        match self {
            Scope::Any => true,
            Scope::Categories(categories) => categories.contains(&category),
        }
    }

    /// Categories in scan order. `Any` scans every category in canonical order.
    pub fn categories(&self) -> &'static [DocumentCategory] {
        match self {
            Scope::Any => &DocumentCategory::ALL,
            Scope::Categories(categories) => categories,
        }
    }
}

/// A static detection rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub signal: Signal,
    /// Case-insensitive matcher
    pub matcher: Regex,
    pub scope: Scope,
    pub relevance: Relevance,
    /// Facets whose confidence this rule's evidence feeds
    pub facets: &'static [Facet],
    pub description: &'static str,
}

impl PatternRule {
    fn new(
        signal: Signal,
        pattern: &str,
        scope: Scope,
        relevance: Relevance,
        facets: &'static [Facet],
        description: &'static str,
    ) -> Self {
        let matcher = match Regex::new(&format!("(?i){}", pattern)) {
            Ok(regex) => regex,
            Err(e) => panic!("pattern for signal {} does not compile: {}", signal, e),
        };
        Self {
            signal,
            matcher,
            scope,
            relevance,
            facets,
            description,
        }
    }

    /// The source of the matcher, including the case-insensitive flag.
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    pub fn feeds(&self, facet: Facet) -> bool {
        self.facets.contains(&facet)
    }
}

use DocumentCategory as C;

const OPT_OUT_CATEGORIES: &[DocumentCategory] = &[
    C::AdminGuide,
    C::EnterpriseControls,
    C::TermsOfService,
    C::PrivacyPolicy,
    C::AcceptableUse,
];

const NATIVE_AI_CATEGORIES: &[DocumentCategory] = &[
    C::AiTrust,
    C::AiEthics,
    C::ResponsibleAi,
    C::PrivacyPolicy,
    C::TermsOfService,
];

const THIRD_PARTY_CATEGORIES: &[DocumentCategory] = &[
    C::Subprocessors,
    C::DataProcessing,
    C::PrivacyPolicy,
    C::TermsOfService,
];

const DATA_USAGE_CATEGORIES: &[DocumentCategory] = &[
    C::DataRetention,
    C::PrivacyPolicy,
    C::DataProcessing,
    C::TermsOfService,
];

const SHARING_CATEGORIES: &[DocumentCategory] = &[
    C::TermsOfService,
    C::PrivacyPolicy,
    C::DataProcessing,
];

const CONTRACTUAL_CATEGORIES: &[DocumentCategory] = &[
    C::DataProcessing,
    C::TermsOfService,
    C::ApiTerms,
    C::PrivacyPolicy,
];

const GDPR_CATEGORIES: &[DocumentCategory] = &[
    C::GdprCompliance,
    C::DataProcessing,
    C::PrivacyPolicy,
    C::CcpaCompliance,
];

const CCPA_CATEGORIES: &[DocumentCategory] = &[
    C::CcpaCompliance,
    C::PrivacyPolicy,
    C::DataProcessing,
    C::GdprCompliance,
];

const SECURITY_CATEGORIES: &[DocumentCategory] = &[
    C::DataSecurity,
    C::DataProcessing,
    C::PrivacyPolicy,
];

const ETHICS_CATEGORIES: &[DocumentCategory] = &[C::AiEthics, C::ResponsibleAi, C::AiTrust];

lazy_static! {
    static ref CATALOG: PatternCatalog = PatternCatalog::build();
}

/// The immutable set of all pattern rules.
#[derive(Debug)]
pub struct PatternCatalog {
    rules: BTreeMap<Signal, PatternRule>,
}

impl PatternCatalog {
    /// The process-wide catalog, compiled on first use.
    pub fn global() -> &'static PatternCatalog {
        &CATALOG
    }

    /// Rule for a signal.
    pub fn lookup(&self, signal: Signal) -> &PatternRule {
        match self.rules.get(&signal) {
            Some(rule) => rule,
            None => panic!("pattern catalog has no rule for signal {}", signal),
        }
    }

    /// Rule for a signal given by name.
    ///
    /// # Panics
    ///
    /// Panics on an unknown name: callers must only use names from [`Signal`].
    pub fn lookup_name(&self, name: &str) -> &PatternRule {
        match name.parse::<Signal>() {
            Ok(signal) => self.lookup(signal),
            Err(unknown) => panic!("unknown signal name: {}", unknown),
        }
    }

    /// Every rule, ordered by signal.
    pub fn rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.values()
    }

    /// Signals whose evidence feeds a facet.
    pub fn signals_for(&self, facet: Facet) -> Vec<Signal> {
        self.rules
            .values()
            .filter(|rule| rule.feeds(facet))
            .map(|rule| rule.signal)
            .collect()
    }

    fn build() -> Self {
        let rules = vec![
            // =================================================================
            // OPT-OUT
            // =================================================================
            PatternRule::new(
                Signal::OptOut,
                r"\bopt[-\s]?out\b|\bdisabl(?:e|ed|es|ing)\b|\bturn(?:ed|s|ing)?\s+off\b|\bdeactivat\w*|\btoggl\w*|\bswitch(?:ed)?\s+off\b",
                Scope::Categories(OPT_OUT_CATEGORIES),
                Relevance::AiRelated,
                &[Facet::OptOutAvailable],
                "AI features can be switched off",
            ),
            PatternRule::new(
                Signal::Enterprise,
                r"\b(?:enterprise|admin\w*|organi[sz]ation(?:al|s)?|tenants?|company[-\s]wide)\b",
                Scope::Categories(OPT_OUT_CATEGORIES),
                Relevance::None,
                &[Facet::EnterpriseOptOut],
                "Opt-out controlled at enterprise or admin level",
            ),
            PatternRule::new(
                Signal::AdminControls,
                r"\badmin(?:istrator)?\s+(?:console|portal|dashboard|center|centre|settings)\b|\b(?:settings|configuration|preferences)\b",
                Scope::Any,
                Relevance::None,
                &[],
                "Opt-out exercised through an admin console or settings",
            ),
            PatternRule::new(
                Signal::ApiAccess,
                r"\bapis?\b",
                Scope::Any,
                Relevance::None,
                &[],
                "Opt-out exercised through an API",
            ),
            PatternRule::new(
                Signal::VendorContact,
                r"\bcontact\w*|\brequest\w*",
                Scope::Any,
                Relevance::None,
                &[],
                "Opt-out exercised by contacting the vendor",
            ),
            PatternRule::new(
                Signal::Granularity,
                r"\bper[-\s]?(?:user|feature|organi[sz]ation|tenant)\b|\b(?:user|feature|organi[sz]ation|tenant|enterprise)[-\s](?:level|wide)\b",
                Scope::Any,
                Relevance::None,
                &[],
                "Level at which an opt-out applies",
            ),
            // =================================================================
            // AI IMPLEMENTATION
            // =================================================================
            PatternRule::new(
                Signal::AiNative,
                r"\bbuilt[-\s]?in\b|\bnative\b|\bproprietary\b|\bour\s+own\b|\bour\s+models?\b|\bin[-\s]house\b|\bdeveloped\s+by\s+us\b|\binternal(?:ly)?\b",
                Scope::Categories(NATIVE_AI_CATEGORIES),
                Relevance::AiRelated,
                &[Facet::NativeAi],
                "AI built in-house",
            ),
            PatternRule::new(
                Signal::AiFeature,
                r"\b(?:features?|capability|capabilities|functionality|functionalities|tools?)\s+(?:includ(?:e|es|ing)|such\s+as|like)\s+([^.]+)",
                Scope::Categories(NATIVE_AI_CATEGORIES),
                Relevance::AiRelated,
                &[Facet::AiFeatures],
                "Enumerated AI features",
            ),
            PatternRule::new(
                Signal::ThirdParty,
                r"\bthird[-\s]?part(?:y|ies)\b|\bpartners?\b|\bOpenAI\b|\bAzure\b|\bGoogle\b|\bAWS\b|\bAmazon\b|\bAnthropic\b|\bClaude\b|\bHugging\s?Face\b|\bCohere\b|\bMistral\b",
                Scope::Categories(THIRD_PARTY_CATEGORIES),
                Relevance::AiRelated,
                &[Facet::ThirdPartyProviders, Facet::NativeAi],
                "AI supplied by a third party",
            ),
            PatternRule::new(
                Signal::ThirdPartyReference,
                r"\bthird[-\s]?part(?:y|ies)\b|\bpartners?\b|\bproviders?\b|\bvendors?\b",
                Scope::Any,
                Relevance::None,
                &[],
                "Generic reference to an outside party",
            ),
            // =================================================================
            // DATA USAGE
            // =================================================================
            PatternRule::new(
                Signal::DataRetention,
                r"\bretain\w*|\bretention\b|\bstor(?:e|es|ed|ing|age)\b|\bsav(?:e|es|ed)\b|\bkeep\w*|\bkept\b|\bpreserv\w*|\bhold\w*|\bmaintain\w*",
                Scope::Categories(DATA_USAGE_CATEGORIES),
                Relevance::DataRelated,
                &[Facet::DataRetention],
                "Data is retained",
            ),
            PatternRule::new(
                Signal::RetentionPeriod,
                r"\b(?:\d+|one|two|three|four|five|six|seven|ten|twelve|eighteen|thirty|sixty|ninety)[\s-]+(?:calendar\s+|business\s+)?(?:days?|weeks?|months?|years?)\b",
                Scope::Any,
                Relevance::None,
                &[],
                "Explicit retention period",
            ),
            PatternRule::new(
                Signal::PeriodUnit,
                r"\b(?:days?|weeks?|months?|years?)\b",
                Scope::Any,
                Relevance::None,
                &[],
                "Bare time unit near a retention statement",
            ),
            PatternRule::new(
                Signal::ModelTraining,
                r"\btrain\w*|\blearn\w*|\bimprov\w*|\benhanc\w*|\brefin\w*|\bfine[-\s]?tun\w*",
                Scope::Categories(DATA_USAGE_CATEGORIES),
                Relevance::DataRelated,
                &[Facet::ModelTraining],
                "Customer data used to train models",
            ),
            PatternRule::new(
                Signal::ModelSharing,
                r"\bshar(?:e|es|ed|ing)\b|\bdistribut\w*|\bprovided?\s+to\b|\bmade\s+available\b|\btransfer\w*|\btransmit\w*",
                Scope::Categories(SHARING_CATEGORIES),
                Relevance::ModelRelated,
                &[Facet::ModelSharing],
                "Models shared beyond the customer",
            ),
            PatternRule::new(
                Signal::Negation,
                r"\bnot\b|\bnever\b|\bisn['’]t\b|\bdoesn['’]t\b|\bwon['’]t\b|\bwouldn['’]t\b|\bprohibited\b|\bforbidden\b",
                Scope::Any,
                Relevance::None,
                &[],
                "Negation cue",
            ),
            // =================================================================
            // CONTRACTUAL PROTECTIONS
            // =================================================================
            PatternRule::new(
                Signal::Contractual,
                r"\bcontract\w*|\bagreements?\b|\bprohibit\w*|\brestrict\w*|\bprevent\w*|\bobligat\w*|\bnot\s+(?:allowed|permitted)\b",
                Scope::Categories(CONTRACTUAL_CATEGORIES),
                Relevance::AiRelated,
                &[Facet::ContractualProtections],
                "Contract terms bind third-party providers",
            ),
            // =================================================================
            // COMPLIANCE
            // =================================================================
            PatternRule::new(
                Signal::Gdpr,
                r"\bgdpr\b|\bgeneral\s+data\s+protection\s+regulation\b",
                Scope::Categories(GDPR_CATEGORIES),
                Relevance::None,
                &[Facet::GdprCompliant],
                "GDPR compliance affirmed",
            ),
            PatternRule::new(
                Signal::Ccpa,
                r"\bccpa\b|\bcalifornia\s+consumer\s+privacy\b",
                Scope::Categories(CCPA_CATEGORIES),
                Relevance::None,
                &[Facet::CcpaCompliant],
                "CCPA compliance affirmed",
            ),
            PatternRule::new(
                Signal::ComplianceAffirmation,
                r"\bcompl(?:y|ies|iant|iance)\b|\badher\w*",
                Scope::Any,
                Relevance::None,
                &[],
                "Compliance-affirming term",
            ),
            // =================================================================
            // SECURITY AND ETHICS
            // =================================================================
            PatternRule::new(
                Signal::Security,
                r"\bsecur\w*|\bencrypt\w*|\bprotect\w*|\bsafeguard\w*|\bconfidential\w*",
                Scope::Categories(SECURITY_CATEGORIES),
                Relevance::AiOrData,
                &[Facet::SecurityMeasures],
                "Security measures for AI or data",
            ),
            PatternRule::new(
                Signal::Certification,
                r"\bISO(?:/IEC)?[\s-]?\d{4,5}(?::\d{4})?\b|\bSOC\s?[123](?:\s+Type\s+(?:II|I|1|2))?\b|\bHITRUST\b|\bFedRAMP\b|\bPCI[\s-]DSS\b|\bCSA\s+STAR\b",
                Scope::Categories(SECURITY_CATEGORIES),
                Relevance::None,
                &[Facet::SecurityCertifications],
                "Security certification",
            ),
            PatternRule::new(
                Signal::Ethical,
                r"\bethic\w*|\bfair\w*|\bbias\w*|\btransparen\w*|\bexplainab\w*|\binterpretab\w*|\baccountab\w*",
                Scope::Categories(ETHICS_CATEGORIES),
                Relevance::None,
                &[Facet::EthicalConsiderations],
                "Ethical consideration",
            ),
        ];

        let rules: BTreeMap<Signal, PatternRule> =
            rules.into_iter().map(|rule| (rule.signal, rule)).collect();
        debug_assert_eq!(rules.len(), Signal::ALL.len(), "every signal needs exactly one rule");

        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_signal_has_rule() {
        let catalog = PatternCatalog::global();
        for signal in Signal::ALL {
            assert_eq!(catalog.lookup(signal).signal, signal);
        }
    }

    #[test]
    fn test_every_facet_is_fed_by_a_signal() {
        let catalog = PatternCatalog::global();
        for facet in Facet::ALL {
            assert!(
                !catalog.signals_for(facet).is_empty(),
                "facet {} has no signal",
                facet
            );
        }
    }

    #[test]
    fn test_native_ai_pools_native_and_third_party() {
        let signals = PatternCatalog::global().signals_for(Facet::NativeAi);
        assert_eq!(signals, vec![Signal::AiNative, Signal::ThirdParty]);
    }

    #[test]
    fn test_matchers_are_case_insensitive() {
        let catalog = PatternCatalog::global();
        assert!(catalog.lookup(Signal::OptOut).is_match("OPT-OUT"));
        assert!(catalog.lookup(Signal::Gdpr).is_match("Gdpr"));
        assert!(catalog.lookup(Signal::ThirdParty).is_match("openai"));
    }

    #[test]
    fn test_lookup_by_name() {
        let rule = PatternCatalog::global().lookup_name("model_sharing");
        assert_eq!(rule.signal, Signal::ModelSharing);
    }

    #[test]
    #[should_panic(expected = "unknown signal name")]
    fn test_unknown_signal_name_fails_fast() {
        PatternCatalog::global().lookup_name("model_sharing_limitations");
    }

    #[test]
    fn test_refinement_signals_record_no_evidence() {
        assert!(!Signal::Negation.records_evidence());
        assert!(!Signal::AdminControls.records_evidence());
        assert!(Signal::OptOut.records_evidence());
    }

    #[test]
    fn test_retention_period_prefers_number_and_unit() {
        let rule = PatternCatalog::global().lookup(Signal::RetentionPeriod);
        let m = rule.matcher.find("kept for a period of 30 days").unwrap();
        assert_eq!(m.as_str(), "30 days");
    }

    #[test]
    fn test_certification_keeps_type_suffix() {
        let rule = PatternCatalog::global().lookup(Signal::Certification);
        let m = rule.matcher.find("We hold SOC 2 Type II and ISO 27001.").unwrap();
        assert_eq!(m.as_str(), "SOC 2 Type II");
    }

    #[test]
    fn test_scope_order_is_priority_order() {
        let rule = PatternCatalog::global().lookup(Signal::ModelSharing);
        assert_eq!(
            rule.scope.categories(),
            &[
                DocumentCategory::TermsOfService,
                DocumentCategory::PrivacyPolicy,
                DocumentCategory::DataProcessing
            ]
        );
    }
}

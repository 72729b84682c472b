//! Fixed vocabularies used by the relevance filter and the extractors.
//!
//! Short tokens ("ai", "ml", "llm") are word-bounded so they do not match
//! inside unrelated words such as "maintain" or "html".

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// AI-indicative terms.
    static ref AI_TERMS: Regex = Regex::new(
        r"(?i)\bai\b|\bml\b|\bllms?\b|artificial\s+intelligence|machine\s+learning|large\s+language\s+models?|\bmodels?\b|algorithm|neural|generative|\bchat\w*|copilot|analytics|intelligent\s+assistant|\bpredict\w*|\bautomated\b"
    ).unwrap();

    static ref MODEL_TERMS: Regex = Regex::new(r"(?i)\bmodels?\b|algorithm").unwrap();

    /// Known AI providers, spelled as they are reported.
    static ref PROVIDERS: Vec<(&'static str, Regex)> = vec![
        ("OpenAI", Regex::new(r"(?i)\bopenai\b").unwrap()),
        ("Azure", Regex::new(r"(?i)\bazure\b").unwrap()),
        ("Google", Regex::new(r"(?i)\bgoogle\b").unwrap()),
        ("AWS", Regex::new(r"(?i)\baws\b").unwrap()),
        ("Amazon", Regex::new(r"(?i)\bamazon\b").unwrap()),
        ("Anthropic", Regex::new(r"(?i)\banthropic\b").unwrap()),
        ("Claude", Regex::new(r"(?i)\bclaude\b").unwrap()),
        ("HuggingFace", Regex::new(r"(?i)\bhugging\s?face\b").unwrap()),
        ("Cohere", Regex::new(r"(?i)\bcohere\b").unwrap()),
        ("Mistral", Regex::new(r"(?i)\bmistral\b").unwrap()),
    ];

    /// Security measures, longest phrasing first where one contains another.
    static ref SECURITY_MEASURES: Vec<(&'static str, Regex)> = vec![
        ("encryption", Regex::new(r"(?i)\bencrypt\w*").unwrap()),
        ("access controls", Regex::new(r"(?i)\baccess[\s-]controls?\b").unwrap()),
        ("multi-factor authentication", Regex::new(r"(?i)\bmulti[\s-]?factor\s+authentication\b|\bmfa\b").unwrap()),
        ("authentication", Regex::new(r"(?i)\bauthenticat\w*").unwrap()),
        ("monitoring", Regex::new(r"(?i)\bmonitor\w*").unwrap()),
        ("auditing", Regex::new(r"(?i)\baudit\w*").unwrap()),
        ("data minimization", Regex::new(r"(?i)\bdata\s+minimi[sz]ation\b").unwrap()),
        ("anonymization", Regex::new(r"(?i)\banonymi[sz]\w*").unwrap()),
        ("pseudonymization", Regex::new(r"(?i)\bpseudonymi[sz]\w*").unwrap()),
        ("penetration testing", Regex::new(r"(?i)\bpenetration\s+test\w*|\bpen[\s-]?test\w*").unwrap()),
    ];
}

pub fn mentions_ai(text: &str) -> bool {
    AI_TERMS.is_match(text)
}

/// Plain substring check: "metadata" and "database" count too.
pub fn mentions_data(text: &str) -> bool {
    text.to_lowercase().contains("data")
}

pub fn mentions_model(text: &str) -> bool {
    MODEL_TERMS.is_match(text)
}

/// Providers named in `text`, in list order.
pub fn providers_in(text: &str) -> Vec<&'static str> {
    PROVIDERS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(name, _)| *name)
        .collect()
}

/// Whether `text` names the given provider (by its reported spelling).
pub fn names_provider(text: &str, provider: &str) -> bool {
    PROVIDERS
        .iter()
        .find(|(name, _)| *name == provider)
        .map(|(_, pattern)| pattern.is_match(text))
        .unwrap_or(false)
}

/// Security measures named in `text`, in vocabulary order.
pub fn security_measures_in(text: &str) -> Vec<&'static str> {
    SECURITY_MEASURES
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_ai_token_is_word_bounded() {
        assert!(mentions_ai("Our AI assistant"));
        assert!(!mentions_ai("We maintain records"));
        assert!(!mentions_ai("OpenAI")); // provider names are not AI terms on their own
    }

    #[test]
    fn test_ai_phrases() {
        assert!(mentions_ai("uses machine learning to rank results"));
        assert!(mentions_ai("powered by a Large Language Model"));
        assert!(mentions_ai("the chatbot answers questions"));
        assert!(!mentions_ai("opt out of marketing emails"));
    }

    #[test]
    fn test_providers_in_list_order_with_list_spelling() {
        let found = providers_in("We use openai and AWS Bedrock, plus Hugging Face models.");
        assert_eq!(found, vec!["OpenAI", "AWS", "HuggingFace"]);
    }

    #[test]
    fn test_provider_not_matched_inside_word() {
        assert!(providers_in("the awsome team").is_empty());
    }

    #[test]
    fn test_names_provider() {
        assert!(names_provider("OpenAI is contractually bound", "OpenAI"));
        assert!(!names_provider("OpenAI is contractually bound", "Cohere"));
        assert!(!names_provider("anything", "Unknown Co"));
    }

    #[test]
    fn test_security_measures() {
        let found = security_measures_in(
            "Data is encrypted at rest, protected by multi-factor authentication and regular audits.",
        );
        assert_eq!(
            found,
            vec!["encryption", "multi-factor authentication", "authentication", "auditing"]
        );
    }
}

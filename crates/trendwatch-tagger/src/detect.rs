//! Stopword-based language detection.
//!
//! Counts occurrences of high-frequency function words per supported
//! language; the language with the most matches wins. A tie or zero matches
//! means the text is undetectable and is reported as `None`.

use crate::types::Language;

/// Detects the language of a free-text snippet.
pub trait LanguageDetector {
    fn detect(&self, text: &str) -> Option<Language>;
}

/// High-frequency function words per language. Words shared between two
/// languages are deliberately omitted so they never tip the balance.
const EN_STOPWORDS: &[&str] = &[
    "the", "and", "of", "to", "in", "is", "are", "was", "for", "with", "on", "that", "this", "it",
    "at", "from", "by", "be", "have", "not",
];

const PT_STOPWORDS: &[&str] = &[
    "não", "uma", "com", "muito", "mais", "está", "você", "isso", "também", "já", "mas", "ou",
    "quando", "ser", "tem", "foi", "são", "pela", "pelo", "das", "dos", "na", "no", "em",
];

const ES_STOPWORDS: &[&str] = &[
    "el", "los", "las", "una", "con", "muy", "usted", "eso", "también", "ya", "pero", "cuando",
    "tiene", "fue", "son", "del", "al", "en",
];

/// Lexicon-based [`LanguageDetector`] for the fixed supported set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopwordDetector;

impl StopwordDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn score(words: &[String], lexicon: &[&str]) -> usize {
        words
            .iter()
            .filter(|w| lexicon.contains(&w.as_str()))
            .count()
    }
}

impl LanguageDetector for StopwordDetector {
    fn detect(&self, text: &str) -> Option<Language> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphabetic())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();

        let scored = [
            (Language::English, Self::score(&words, EN_STOPWORDS)),
            (Language::Portuguese, Self::score(&words, PT_STOPWORDS)),
            (Language::Spanish, Self::score(&words, ES_STOPWORDS)),
        ];

        let (best_lang, best) = scored
            .iter()
            .copied()
            .max_by_key(|(_, score)| *score)
            .unwrap_or((Language::English, 0));

        if best == 0 {
            return None;
        }
        // A tie between two languages is undetectable.
        if scored.iter().filter(|(_, score)| *score == best).count() > 1 {
            return None;
        }
        Some(best_lang)
    }
}

//! Pattern-based entity extraction.
//!
//! Extracts hashtags, mentions, money amounts (currency form per language),
//! and capitalized proper-noun runs. Patterns are matched in priority order;
//! a span claimed by an earlier pattern is not re-reported by a later one.

use regex::Regex;

use crate::types::{Entity, Language};

/// Extracts entities from one free-text snippet.
pub trait EntityAnalyzer {
    fn analyze(&self, text: &str) -> Vec<Entity>;
}

/// Regex-backed [`EntityAnalyzer`]. Compile once per language and reuse.
pub struct PatternAnalyzer {
    patterns: Vec<(Regex, &'static str)>,
}

impl PatternAnalyzer {
    /// Builds the analyzer for one language.
    ///
    /// # Panics
    ///
    /// The patterns are static and known-valid; compilation cannot fail for
    /// callers.
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        let money = match language {
            Language::Portuguese => r"R\$\s?\d+(?:[.,]\d+)*",
            Language::English | Language::Spanish => r"\$\s?\d+(?:[.,]\d+)*",
        };

        let patterns = vec![
            (r"#[\p{L}\p{N}_]+", "HASHTAG"),
            (r"@[A-Za-z0-9_.]+", "MENTION"),
            (money, "MONEY"),
            (r"\p{Lu}[\p{L}\p{N}]+(?:\s\p{Lu}[\p{L}\p{N}]+)*", "PROPER"),
        ];

        Self {
            patterns: patterns
                .into_iter()
                .map(|(pattern, label)| {
                    let regex = Regex::new(pattern).expect("static pattern must compile");
                    (regex, label)
                })
                .collect(),
        }
    }
}

impl EntityAnalyzer for PatternAnalyzer {
    fn analyze(&self, text: &str) -> Vec<Entity> {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut entities: Vec<(usize, Entity)> = Vec::new();

        for (regex, label) in &self.patterns {
            for found in regex.find_iter(text) {
                let span = (found.start(), found.end());
                let overlaps = claimed
                    .iter()
                    .any(|&(start, end)| span.0 < end && start < span.1);
                if overlaps {
                    continue;
                }
                claimed.push(span);
                entities.push((span.0, Entity::new(found.as_str(), *label)));
            }
        }

        // Report entities in document order regardless of pattern priority.
        entities.sort_by_key(|(start, _)| *start);
        entities.into_iter().map(|(_, entity)| entity).collect()
    }
}

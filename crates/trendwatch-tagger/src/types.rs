use serde::{Deserialize, Serialize};

/// Languages with an analyzer available. Text in any other language yields
/// an empty entity list, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Portuguese,
    Spanish,
}

impl Language {
    /// Two-letter language tag.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Portuguese => "pt",
            Language::Spanish => "es",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One extracted entity: the matched text span and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

impl Entity {
    #[must_use]
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Portuguese.code(), "pt");
        assert_eq!(Language::Spanish.code(), "es");
    }

    #[test]
    fn entity_serializes_compactly() {
        let entity = Entity::new("#promo", "HASHTAG");
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, r##"{"text":"#promo","label":"HASHTAG"}"##);
    }
}

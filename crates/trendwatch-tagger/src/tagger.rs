//! Language-dispatched entity tagging.
//!
//! Each text is routed to the analyzer matching its detected language.
//! Unsupported or undetectable text yields an empty entity list — never an
//! error — so one odd row cannot fail a whole annotation pass.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use trendwatch_core::tsv;

use crate::analyze::{EntityAnalyzer, PatternAnalyzer};
use crate::detect::{LanguageDetector, StopwordDetector};
use crate::error::TagError;
use crate::types::{Entity, Language};

/// Registry of one detector plus per-language analyzers.
pub struct Tagger {
    detector: Box<dyn LanguageDetector + Send + Sync>,
    analyzers: HashMap<Language, Box<dyn EntityAnalyzer + Send + Sync>>,
}

impl Tagger {
    /// An empty registry around `detector`; add analyzers with
    /// [`Tagger::with_analyzer`].
    #[must_use]
    pub fn new(detector: Box<dyn LanguageDetector + Send + Sync>) -> Self {
        Self {
            detector,
            analyzers: HashMap::new(),
        }
    }

    /// The built-in setup: stopword detection plus pattern analyzers for
    /// every supported language.
    #[must_use]
    pub fn with_default_models() -> Self {
        let mut tagger = Self::new(Box::new(StopwordDetector::new()));
        for language in [Language::English, Language::Portuguese, Language::Spanish] {
            tagger = tagger.with_analyzer(language, Box::new(PatternAnalyzer::for_language(language)));
        }
        tagger
    }

    #[must_use]
    pub fn with_analyzer(
        mut self,
        language: Language,
        analyzer: Box<dyn EntityAnalyzer + Send + Sync>,
    ) -> Self {
        self.analyzers.insert(language, analyzer);
        self
    }

    /// Tags one text: detect the language, dispatch to its analyzer.
    #[must_use]
    pub fn tag(&self, text: &str) -> Vec<Entity> {
        let Some(language) = self.detector.detect(text) else {
            tracing::debug!("language undetectable — no entities");
            return Vec::new();
        };
        match self.analyzers.get(&language) {
            Some(analyzer) => analyzer.analyze(text),
            None => {
                tracing::debug!(language = %language, "no analyzer registered — no entities");
                Vec::new()
            }
        }
    }

    /// Tags every row of a text column.
    #[must_use]
    pub fn tag_column(&self, rows: &[String]) -> Vec<Vec<Entity>> {
        rows.iter().map(|text| self.tag(text)).collect()
    }
}

/// Annotates one TSV artifact in place: reads `path`, appends an `entities`
/// column (JSON-encoded list per row) derived from `text_column`, and writes
/// `<stem>_tagged.tsv` next to the input. Input columns are untouched.
///
/// # Errors
///
/// - [`TagError::MissingColumn`] when `text_column` is not in the header.
/// - [`TagError::Export`] on read/write failure.
pub fn annotate_file(tagger: &Tagger, path: &Path, text_column: &str) -> Result<PathBuf, TagError> {
    let mut table = tsv::read_table(path)?;

    let column = table
        .column_index(text_column)
        .ok_or_else(|| TagError::MissingColumn {
            column: text_column.to_owned(),
            path: path.display().to_string(),
        })?;

    table.header.push("entities".to_owned());
    for row in &mut table.rows {
        let text = row.get(column).cloned().unwrap_or_default();
        let entities = tagger.tag(&text);
        let encoded =
            serde_json::to_string(&entities).unwrap_or_else(|_| "[]".to_owned());
        row.push(encoded);
    }

    let output = annotated_path(path);
    tsv::write_table(&output, &table)?;
    tracing::info!(input = %path.display(), output = %output.display(), rows = table.rows.len(), "annotation pass finished");
    Ok(output)
}

fn annotated_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "annotated".to_owned(), |s| s.to_string_lossy().into_owned());
    path.with_file_name(format!("{stem}_tagged.tsv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("trendwatch-tagger-{}-{name}", std::process::id()))
    }

    #[test]
    fn tag_routes_portuguese_to_the_portuguese_analyzer() {
        let tagger = Tagger::with_default_models();
        let entities =
            tagger.tag("não perca a promoção de R$ 99 na loja, está imperdível você vai gostar");
        assert!(entities
            .iter()
            .any(|e| e.label == "MONEY" && e.text.starts_with("R$")));
    }

    #[test]
    fn undetectable_text_yields_empty_entities() {
        let tagger = Tagger::with_default_models();
        assert!(tagger.tag("zzz qqq xxx").is_empty());
    }

    #[test]
    fn unsupported_language_yields_empty_entities() {
        // Registry with a detector but no analyzers at all.
        let tagger = Tagger::new(Box::new(StopwordDetector::new()));
        assert!(tagger
            .tag("the quick brown fox jumps over the lazy dog")
            .is_empty());
    }

    #[test]
    fn tag_column_is_row_aligned() {
        let tagger = Tagger::with_default_models();
        let rows = vec![
            "não gostei da entrega está atrasada #reclamação você viu".to_owned(),
            "zzz".to_owned(),
        ];
        let tagged = tagger.tag_column(&rows);
        assert_eq!(tagged.len(), 2);
        assert!(!tagged[0].is_empty());
        assert!(tagged[1].is_empty());
    }

    #[test]
    fn annotate_file_appends_entities_column() {
        let input = tmp_path("posts.tsv");
        std::fs::write(
            &input,
            "id\ttext\n1\tnão perca o #saldão está imperdível você vai amar\n2\tzzz\n",
        )
        .unwrap();

        let tagger = Tagger::with_default_models();
        let output = annotate_file(&tagger, &input, "text").unwrap();
        assert!(output.to_string_lossy().ends_with("posts_tagged.tsv"));

        let table = tsv::read_table(&output).unwrap();
        assert_eq!(table.header.last().map(String::as_str), Some("entities"));
        assert_eq!(table.rows.len(), 2);
        // Existing columns untouched.
        assert_eq!(table.rows[0][0], "1");
        assert!(table.rows[0][2].contains("HASHTAG"));
        assert_eq!(table.rows[1][2], "[]");

        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&output).ok();
    }

    #[test]
    fn annotate_file_rejects_missing_column() {
        let input = tmp_path("nocol.tsv");
        std::fs::write(&input, "id\tcaption\n1\thello\n").unwrap();

        let tagger = Tagger::with_default_models();
        let err = annotate_file(&tagger, &input, "text").unwrap_err();
        assert!(matches!(err, TagError::MissingColumn { ref column, .. } if column == "text"));

        std::fs::remove_file(&input).ok();
    }
}

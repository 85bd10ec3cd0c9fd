//! Normalization from raw page/API strings into [`TrendRecord`].
//!
//! Count parsing applies suffix expansion *before* separator stripping: a
//! dot or comma immediately preceding a `k` suffix is read as a decimal mark
//! (`"3.4k"` → 3400), while counts without a suffix drop every non-digit
//! (`"12.345"` → 12345).

use thiserror::Error;

use crate::records::{TrendRecord, TrendSource};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("label is empty after whitespace normalization (raw: {raw:?})")]
    EmptyLabel { raw: String },
}

/// Normalizes a raw label: strips exterior whitespace and collapses embedded
/// newlines (and any interior whitespace run) to single spaces.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a raw count string to its numeric value.
///
/// Trailing unit words (`"Postagens"`, `"posts"`) are discarded. A trailing
/// `k`/`K` with a preceding numeral multiplies the numeral by 1000, with any
/// separator before the suffix read as a decimal mark. Otherwise all
/// non-digit characters are stripped. Empty or unparseable input yields 0
/// (the platform provided no count).
#[must_use]
pub fn normalize_count(raw: &str) -> u64 {
    let lowered = raw.trim().to_lowercase();

    // Split the string after its last digit or separator; everything past
    // that point is a suffix run ("k", "k posts", "postagens").
    let split = lowered
        .rfind(|c: char| c.is_ascii_digit() || c == '.' || c == ',')
        .map_or(0, |i| i + 1);
    let (numeric, suffix) = lowered.split_at(split);
    let numeric = numeric.trim();
    if numeric.is_empty() {
        return 0;
    }

    if suffix.trim_start().starts_with('k') {
        // Suffix expansion first: "3.4k" and "3,4k" both mean 3400.
        let decimal = numeric.replace(',', ".");
        if let Ok(value) = decimal.parse::<f64>() {
            if value >= 0.0 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                return (value * 1000.0).round() as u64;
            }
        }
        // Prefix was not a clean decimal; strip to digits and expand.
        digits_of(numeric).map_or(0, |v| v.saturating_mul(1000))
    } else {
        digits_of(numeric).unwrap_or(0)
    }
}

fn digits_of(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().ok()
}

/// Builds a [`TrendRecord`] from raw label and count strings.
///
/// # Errors
///
/// Returns [`NormalizeError::EmptyLabel`] if the label is empty after
/// whitespace normalization.
pub fn normalize_trend(
    raw_label: &str,
    raw_count: &str,
    source: TrendSource,
) -> Result<TrendRecord, NormalizeError> {
    let label = normalize_label(raw_label);
    if label.is_empty() {
        return Err(NormalizeError::EmptyLabel {
            raw: raw_label.to_owned(),
        });
    }
    Ok(TrendRecord {
        label,
        count: normalize_count(raw_count),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // normalize_label
    // -----------------------------------------------------------------------

    #[test]
    fn label_strips_exterior_whitespace() {
        assert_eq!(normalize_label("  #promo  "), "#promo");
    }

    #[test]
    fn label_collapses_newlines_to_spaces() {
        assert_eq!(normalize_label("#black\nfriday"), "#black friday");
    }

    #[test]
    fn label_collapses_crlf_and_runs() {
        assert_eq!(normalize_label(" #a \r\n  b \n c "), "#a b c");
    }

    #[test]
    fn label_empty_input_stays_empty() {
        assert_eq!(normalize_label("  \n "), "");
    }

    // -----------------------------------------------------------------------
    // normalize_count
    // -----------------------------------------------------------------------

    #[test]
    fn count_strips_dot_separators() {
        assert_eq!(normalize_count("12.345"), 12_345);
    }

    #[test]
    fn count_strips_comma_separators() {
        assert_eq!(normalize_count("1,234,567"), 1_234_567);
    }

    #[test]
    fn count_plain_number_unchanged() {
        assert_eq!(normalize_count("350"), 350);
    }

    #[test]
    fn count_k_suffix_expands() {
        assert_eq!(normalize_count("3k"), 3000);
    }

    #[test]
    fn count_k_suffix_with_decimal_dot() {
        // Suffix expansion before separator stripping: the dot is a decimal mark.
        assert_eq!(normalize_count("3.4k"), 3400);
    }

    #[test]
    fn count_k_suffix_with_decimal_comma() {
        assert_eq!(normalize_count("1,2K"), 1200);
    }

    #[test]
    fn count_uppercase_k_suffix() {
        assert_eq!(normalize_count("15K"), 15_000);
    }

    #[test]
    fn count_trailing_unit_word_stripped() {
        assert_eq!(normalize_count("1.200 Postagens"), 1200);
    }

    #[test]
    fn count_k_suffix_followed_by_unit_word() {
        assert_eq!(normalize_count("3.4K Postagens"), 3400);
    }

    #[test]
    fn count_empty_yields_zero() {
        assert_eq!(normalize_count(""), 0);
        assert_eq!(normalize_count("   "), 0);
    }

    #[test]
    fn count_no_digits_yields_zero() {
        assert_eq!(normalize_count("Postagens"), 0);
    }

    // -----------------------------------------------------------------------
    // normalize_trend
    // -----------------------------------------------------------------------

    #[test]
    fn trend_from_raw_pair() {
        let record = normalize_trend("#a", "1.200", TrendSource::TrendsSite).unwrap();
        assert_eq!(record.label, "#a");
        assert_eq!(record.count, 1200);
        assert_eq!(record.source, TrendSource::TrendsSite);
    }

    #[test]
    fn trend_rejects_whitespace_only_label() {
        let err = normalize_trend(" \n ", "10", TrendSource::ShortVideoSite).unwrap_err();
        assert!(matches!(err, NormalizeError::EmptyLabel { .. }));
    }

    #[test]
    fn trend_count_defaults_to_zero_when_absent() {
        let record = normalize_trend("#b", "", TrendSource::SearchTrendsApi).unwrap();
        assert_eq!(record.count, 0);
    }
}

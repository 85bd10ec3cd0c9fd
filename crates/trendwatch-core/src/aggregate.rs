//! Combination of per-source collections into one unified dataset.
//!
//! Concatenation preserves input order and never deduplicates across
//! sources; the same label may legitimately appear once per source. An empty
//! successful source and a failed source are tracked separately so a partial
//! run is never mistaken for a complete one.

use crate::records::{TrendRecord, TrendSource};

/// Outcome of one source's collection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Succeeded,
    Failed(String),
}

/// One source's collected records plus its status.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: TrendSource,
    pub records: Vec<TrendRecord>,
    pub status: SourceStatus,
}

impl SourceReport {
    #[must_use]
    pub fn succeeded(source: TrendSource, records: Vec<TrendRecord>) -> Self {
        Self {
            source,
            records,
            status: SourceStatus::Succeeded,
        }
    }

    /// A failed collection contributes no records.
    #[must_use]
    pub fn failed(source: TrendSource, reason: impl Into<String>) -> Self {
        Self {
            source,
            records: Vec::new(),
            status: SourceStatus::Failed(reason.into()),
        }
    }
}

/// Completion state of a combined run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every source succeeded.
    Complete,
    /// At least one source succeeded; the named sources did not.
    Partial { failed: Vec<TrendSource> },
    /// No source succeeded.
    Failed,
}

/// The unified dataset plus its completion state.
#[derive(Debug, Clone)]
pub struct CombinedTrends {
    pub records: Vec<TrendRecord>,
    pub status: RunStatus,
}

/// Concatenates per-source reports in input order.
#[must_use]
pub fn combine(reports: Vec<SourceReport>) -> CombinedTrends {
    let failed: Vec<TrendSource> = reports
        .iter()
        .filter(|r| matches!(r.status, SourceStatus::Failed(_)))
        .map(|r| r.source)
        .collect();

    let status = if failed.is_empty() {
        RunStatus::Complete
    } else if failed.len() == reports.len() {
        RunStatus::Failed
    } else {
        RunStatus::Partial { failed }
    };

    let records = reports.into_iter().flat_map(|r| r.records).collect();

    CombinedTrends { records, status }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, source: TrendSource) -> TrendRecord {
        TrendRecord {
            label: label.to_string(),
            count: 1,
            source,
        }
    }

    #[test]
    fn combine_preserves_source_order() {
        let a = vec![
            record("#a1", TrendSource::TrendsSite),
            record("#a2", TrendSource::TrendsSite),
        ];
        let b = vec![record("#b1", TrendSource::ShortVideoSite)];
        let c = vec![record("#c1", TrendSource::SearchTrendsApi)];

        let combined = combine(vec![
            SourceReport::succeeded(TrendSource::TrendsSite, a.clone()),
            SourceReport::succeeded(TrendSource::ShortVideoSite, b),
            SourceReport::succeeded(TrendSource::SearchTrendsApi, c),
        ]);

        assert_eq!(combined.status, RunStatus::Complete);
        assert_eq!(combined.records.len(), 4);

        // The sub-sequence restricted to the first source equals that
        // source's own output, in original order.
        let from_a: Vec<_> = combined
            .records
            .iter()
            .filter(|r| r.source == TrendSource::TrendsSite)
            .cloned()
            .collect();
        assert_eq!(from_a, a);
    }

    #[test]
    fn combine_does_not_deduplicate_across_sources() {
        let combined = combine(vec![
            SourceReport::succeeded(
                TrendSource::TrendsSite,
                vec![record("#same", TrendSource::TrendsSite)],
            ),
            SourceReport::succeeded(
                TrendSource::ShortVideoSite,
                vec![record("#same", TrendSource::ShortVideoSite)],
            ),
        ]);
        assert_eq!(combined.records.len(), 2);
    }

    #[test]
    fn combine_flags_partial_run() {
        let combined = combine(vec![
            SourceReport::succeeded(
                TrendSource::TrendsSite,
                vec![record("#a", TrendSource::TrendsSite)],
            ),
            SourceReport::failed(TrendSource::ShortVideoSite, "navigation control not found"),
        ]);
        assert_eq!(
            combined.status,
            RunStatus::Partial {
                failed: vec![TrendSource::ShortVideoSite]
            }
        );
        assert_eq!(combined.records.len(), 1);
    }

    #[test]
    fn combine_all_failed_is_failed_not_partial() {
        let combined = combine(vec![
            SourceReport::failed(TrendSource::TrendsSite, "timeout"),
            SourceReport::failed(TrendSource::ShortVideoSite, "timeout"),
        ]);
        assert_eq!(combined.status, RunStatus::Failed);
        assert!(combined.records.is_empty());
    }

    #[test]
    fn empty_successful_source_is_not_a_failure() {
        let combined = combine(vec![
            SourceReport::succeeded(TrendSource::TrendsSite, vec![]),
            SourceReport::succeeded(
                TrendSource::ShortVideoSite,
                vec![record("#b", TrendSource::ShortVideoSite)],
            ),
        ]);
        assert_eq!(combined.status, RunStatus::Complete);
        assert_eq!(combined.records.len(), 1);
    }

    #[test]
    fn combine_of_no_sources_is_trivially_complete() {
        let combined = combine(vec![]);
        assert_eq!(combined.status, RunStatus::Complete);
        assert!(combined.records.is_empty());
    }
}

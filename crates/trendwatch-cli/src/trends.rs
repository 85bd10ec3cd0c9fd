//! The `trends` command: every source attempted in fixed order (trends
//! site, short-video site, trends API), then aggregation into the combined
//! artifact.
//!
//! A failed source is logged and flagged in the run status; its per-source
//! artifact is not written, so an empty file never masquerades as a
//! successful empty collection. The combined artifact is written for
//! complete and partial runs only.

use std::time::Duration;

use trendwatch_core::{
    combine, normalize_trend, write_records, AppConfig, RunStatus, SourceReport, TrendRecord,
    TrendSource,
};
use trendwatch_interest::{collect_trending, InterestClient, InterestScope, ItemOutcome, PacingPolicy};
use trendwatch_page::{
    extract, short_video_recipe, trends_listing_recipe, ChromiumDriver, ExtractionRecipe,
    RecipeTimeouts,
};

const TRENDS_SITE_URL: &str = "https://trends24.in/brazil/";
const SHORT_VIDEO_URL: &str =
    "https://ads.tiktok.com/business/creativecenter/inspiration/popular/hashtag/pc/pt";

pub async fn run(config: &AppConfig, skip_browser: bool) -> anyhow::Result<()> {
    let mut reports = Vec::new();

    if !skip_browser {
        let timeouts = recipe_timeouts(config);
        reports.push(
            browser_source(
                config,
                TrendSource::TrendsSite,
                TRENDS_SITE_URL,
                trends_listing_recipe(timeouts),
            )
            .await,
        );
        reports.push(
            browser_source(
                config,
                TrendSource::ShortVideoSite,
                SHORT_VIDEO_URL,
                short_video_recipe(timeouts),
            )
            .await,
        );
    }

    reports.push(search_trends_source(config).await);

    for report in &reports {
        match &report.status {
            trendwatch_core::SourceStatus::Succeeded => {
                let path = config.output_dir.join(artifact_name(report.source));
                write_records(&path, &report.records)?;
                tracing::info!(
                    source = %report.source,
                    records = report.records.len(),
                    path = %path.display(),
                    "source artifact written"
                );
            }
            trendwatch_core::SourceStatus::Failed(reason) => {
                tracing::error!(source = %report.source, reason = %reason, "source failed — no artifact");
            }
        }
    }

    let combined = combine(reports);
    match &combined.status {
        RunStatus::Complete => tracing::info!("all sources collected"),
        RunStatus::Partial { failed } => {
            let names: Vec<String> = failed.iter().map(ToString::to_string).collect();
            tracing::warn!(failed = %names.join(", "), "run completed in degraded state");
        }
        RunStatus::Failed => {
            anyhow::bail!("every trend source failed — combined artifact not written");
        }
    }

    let combined_path = config.output_dir.join("all_trends.tsv");
    write_records(&combined_path, &combined.records)?;

    let status_word = match combined.status {
        RunStatus::Complete => "complete",
        RunStatus::Partial { .. } => "PARTIAL",
        RunStatus::Failed => unreachable!("failed runs bail before writing"),
    };
    println!(
        "{} trend records written to {} ({status_word})",
        combined.records.len(),
        combined_path.display()
    );
    Ok(())
}

fn recipe_timeouts(config: &AppConfig) -> RecipeTimeouts {
    RecipeTimeouts {
        overlay: config.overlay_timeout(),
        element: config.element_timeout(),
        settle: config.settle_wait(),
    }
}

fn artifact_name(source: TrendSource) -> &'static str {
    match source {
        TrendSource::TrendsSite => "trends_site.tsv",
        TrendSource::ShortVideoSite => "short_video.tsv",
        TrendSource::SearchTrendsApi => "search_trends.tsv",
        TrendSource::SocialSearchApi => "social_search.tsv",
    }
}

/// Runs one browser-driven source with its own driver, torn down whatever
/// the outcome.
async fn browser_source(
    config: &AppConfig,
    source: TrendSource,
    url: &str,
    recipe: ExtractionRecipe,
) -> SourceReport {
    tracing::info!(%source, url, "starting browser extraction");

    let driver = match ChromiumDriver::launch(config.chromium_path.clone(), config.poll_interval())
        .await
    {
        Ok(driver) => driver,
        Err(e) => {
            tracing::error!(%source, error = %e, "browser launch failed");
            return SourceReport::failed(source, e.to_string());
        }
    };

    let result = extract(&driver, url, &recipe).await;
    if let Err(e) = driver.shutdown().await {
        tracing::warn!(%source, error = %e, "browser shutdown failed");
    }

    match result {
        Ok(rows) => {
            let records = page_records(&rows, source);
            tracing::info!(%source, records = records.len(), "extraction succeeded");
            SourceReport::succeeded(source, records)
        }
        Err(e) => {
            tracing::error!(%source, error = %e, "extraction failed");
            SourceReport::failed(source, e.to_string())
        }
    }
}

/// Normalizes raw page rows, dropping the (rare) row whose label is empty
/// after whitespace normalization.
fn page_records(rows: &[trendwatch_page::RawTrend], source: TrendSource) -> Vec<TrendRecord> {
    rows.iter()
        .filter_map(|row| match normalize_trend(&row.label, &row.raw_count, source) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(%source, error = %e, "skipping malformed row");
                None
            }
        })
        .collect()
}

async fn search_trends_source(config: &AppConfig) -> SourceReport {
    let source = TrendSource::SearchTrendsApi;
    tracing::info!(%source, "polling trending terms");

    let client = match InterestClient::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.interest_api_url,
    ) {
        Ok(client) => client,
        Err(e) => return SourceReport::failed(source, e.to_string()),
    };

    let pacing = PacingPolicy {
        base_delay: Duration::from_secs(config.interest_delay_secs),
        jitter: Duration::from_secs(config.interest_jitter_secs),
        max_attempts: config.max_attempts,
    };
    let scope = InterestScope {
        geo: &config.geo,
        window: "now 1-d",
    };
    let mut rng = rand::rng();

    match collect_trending(&client, scope, &pacing, &mut rng).await {
        Ok(outcomes) => SourceReport::succeeded(source, trend_records(&outcomes, source)),
        Err(e) => {
            tracing::error!(%source, error = %e, "trending poll failed");
            SourceReport::failed(source, e.to_string())
        }
    }
}

/// Converts successful per-term outcomes into trend records; failed terms
/// were already logged by the poller and contribute nothing.
fn trend_records(outcomes: &[ItemOutcome<u64>], source: TrendSource) -> Vec<TrendRecord> {
    outcomes
        .iter()
        .filter_map(|outcome| {
            let count = *outcome.success()?;
            match normalize_trend(&outcome.label, &count.to_string(), source) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed term");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_are_distinct_per_source() {
        let names = [
            artifact_name(TrendSource::TrendsSite),
            artifact_name(TrendSource::ShortVideoSite),
            artifact_name(TrendSource::SearchTrendsApi),
            artifact_name(TrendSource::SocialSearchApi),
        ];
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn page_rows_normalize_into_trend_records() {
        let rows = vec![
            trendwatch_page::RawTrend {
                label: "#a".to_string(),
                raw_count: "1.200".to_string(),
            },
            trendwatch_page::RawTrend {
                label: "#b".to_string(),
                raw_count: "350".to_string(),
            },
        ];

        let records = page_records(&rows, TrendSource::TrendsSite);

        assert_eq!(
            records,
            vec![
                TrendRecord {
                    label: "#a".to_string(),
                    count: 1200,
                    source: TrendSource::TrendsSite,
                },
                TrendRecord {
                    label: "#b".to_string(),
                    count: 350,
                    source: TrendSource::TrendsSite,
                },
            ]
        );
    }

    #[test]
    fn trend_records_keep_successes_only() {
        let outcomes = vec![
            ItemOutcome {
                label: "enem".to_string(),
                outcome: Ok(73),
            },
            ItemOutcome {
                label: "falhou".to_string(),
                outcome: Err(trendwatch_interest::InterestError::UnexpectedStatus {
                    status: 500,
                    url: "http://example.test".to_string(),
                }),
            },
        ];

        let records = trend_records(&outcomes, TrendSource::SearchTrendsApi);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "enem");
        assert_eq!(records[0].count, 73);
        assert_eq!(records[0].source, TrendSource::SearchTrendsApi);
    }

    #[test]
    fn trend_records_drop_empty_labels() {
        let outcomes = vec![ItemOutcome {
            label: "  ".to_string(),
            outcome: Ok(5),
        }];
        assert!(trend_records(&outcomes, TrendSource::SearchTrendsApi).is_empty());
    }
}

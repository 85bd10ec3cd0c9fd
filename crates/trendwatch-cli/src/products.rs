//! The `products` command: mean weekly interest for one category's
//! products.

use std::time::Duration;

use trendwatch_core::{
    load_categories, normalize_trend, write_records, AppConfig, TrendRecord, TrendSource,
};
use trendwatch_interest::{category_interest, InterestClient, InterestScope, PacingPolicy};

pub async fn run(config: &AppConfig, category_slug: &str) -> anyhow::Result<()> {
    let categories = load_categories(&config.categories_path)?;
    let category = categories.find(category_slug).ok_or_else(|| {
        let available: Vec<String> = categories.categories.iter().map(|c| c.slug()).collect();
        anyhow::anyhow!(
            "unknown category '{category_slug}'; available: {}",
            available.join(", ")
        )
    })?;

    let client = InterestClient::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.interest_api_url,
    )?;
    let pacing = PacingPolicy {
        base_delay: Duration::from_secs(config.interest_delay_secs),
        jitter: Duration::from_secs(config.interest_jitter_secs),
        max_attempts: config.max_attempts,
    };
    let scope = InterestScope {
        geo: &config.geo,
        window: "now 7-d",
    };
    let mut rng = rand::rng();

    let outcomes = category_interest(&client, category, scope, &pacing, &mut rng).await;

    let records: Vec<TrendRecord> = outcomes
        .iter()
        .filter_map(|outcome| {
            let mean = *outcome.success()?;
            normalize_trend(&outcome.label, &mean.to_string(), TrendSource::SearchTrendsApi).ok()
        })
        .collect();
    let failed = outcomes.len() - records.len();
    if failed > 0 {
        tracing::warn!(failed, total = outcomes.len(), "some products failed during the pass");
    }

    let path = config
        .output_dir
        .join(format!("{}.tsv", category.slug()));
    write_records(&path, &records)?;
    println!(
        "{} product records for '{}' written to {}",
        records.len(),
        category.name,
        path.display()
    );
    Ok(())
}

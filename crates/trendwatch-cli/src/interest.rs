//! The `interest` command: regional interest for sampled products of every
//! category, paced against the quota-limited trends API.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use trendwatch_core::{
    is_valid_state, load_categories, write_records, AppConfig, RegionalInterestRecord,
    BRAZIL_STATES,
};
use trendwatch_interest::{regional_interest, InterestClient, InterestScope, PacingPolicy};

pub async fn run(
    config: &AppConfig,
    state: &str,
    sample: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let state = state.trim().to_uppercase();
    if !is_valid_state(&state) {
        anyhow::bail!(
            "unknown state code '{state}'; expected one of: {}",
            BRAZIL_STATES.join(", ")
        );
    }

    let categories = load_categories(&config.categories_path)?;
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
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let scope = InterestScope {
        geo: &config.geo,
        window: "now 7-d",
    };

    let outcomes = regional_interest(
        &client,
        &categories.categories,
        &state,
        sample.unwrap_or(config.sample_size),
        scope,
        &pacing,
        &mut rng,
    )
    .await;

    let records: Vec<RegionalInterestRecord> = outcomes
        .iter()
        .filter_map(|outcome| outcome.success().cloned())
        .collect();
    let failed = outcomes.len() - records.len();
    if failed > 0 {
        tracing::warn!(failed, total = outcomes.len(), "some items failed during the pass");
    }

    let path = config
        .output_dir
        .join(format!("interest_{}.tsv", state.to_lowercase()));
    write_records(&path, &records)?;
    println!(
        "{} regional records for {state} written to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

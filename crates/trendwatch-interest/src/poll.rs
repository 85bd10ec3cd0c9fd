//! Paced polling loops over the search-trends API.
//!
//! Every query result is collected as a per-item [`ItemOutcome`] rather than
//! silently swallowed: a failed item is logged and skipped while the loop
//! continues, and the caller decides what a batch with failures means.
//! Pacing applies between every two consecutive queries, within and across
//! categories.

use rand::Rng;
use trendwatch_core::{CategoryConfig, RegionalInterestRecord};

use crate::client::{InterestClient, InterestPoint};
use crate::error::InterestError;
use crate::pacing::PacingPolicy;

/// Smallest per-category sample drawn by the regional poller.
const MIN_SAMPLE: usize = 3;
/// Largest per-category sample drawn by the regional poller.
const MAX_SAMPLE: usize = 5;

/// Result of one item's query: the value, or the reason it was skipped.
#[derive(Debug)]
pub struct ItemOutcome<T> {
    pub label: String,
    pub outcome: Result<T, InterestError>,
}

impl<T> ItemOutcome<T> {
    #[must_use]
    pub fn success(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Geography and time window shared by a polling pass.
#[derive(Debug, Clone, Copy)]
pub struct InterestScope<'a> {
    pub geo: &'a str,
    pub window: &'a str,
}

/// Per-category sample size: the request clamped into
/// [`MIN_SAMPLE`]..=[`MAX_SAMPLE`], bounded by the items available.
#[must_use]
pub fn effective_sample_size(requested: usize, available: usize) -> usize {
    requested.clamp(MIN_SAMPLE, MAX_SAMPLE).min(available)
}

/// Runs `operation` up to `policy.max_attempts` times, pausing between
/// attempts. With the default of one attempt this is a plain call — the
/// retry knob exists on the policy, not in the loop bodies.
async fn with_attempts<T, F, Fut, R>(
    policy: &PacingPolicy,
    rng: &mut R,
    mut operation: F,
) -> Result<T, InterestError>
where
    R: Rng + ?Sized,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, InterestError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_attempts {
                    return Err(err);
                }
                attempt += 1;
                tracing::warn!(attempt, max_attempts, error = %err, "query failed — retrying after pacing delay");
                policy.pause(rng).await;
            }
        }
    }
}

/// Today's trending terms with the latest interest value of each.
///
/// The initial trending query failing fails the whole pass; individual
/// interest queries failing only skip their term. A term whose series is
/// empty keeps a count of 0 (the platform provided none).
///
/// # Errors
///
/// Propagates the error of the trending-list query only.
pub async fn collect_trending<R: Rng + ?Sized>(
    client: &InterestClient,
    scope: InterestScope<'_>,
    pacing: &PacingPolicy,
    rng: &mut R,
) -> Result<Vec<ItemOutcome<u64>>, InterestError> {
    let terms = client.trending_terms(scope.geo).await?;
    tracing::info!(terms = terms.len(), geo = scope.geo, "fetched trending terms");

    let mut outcomes = Vec::with_capacity(terms.len());
    for term in terms {
        pacing.pause(rng).await;
        let outcome = match with_attempts(pacing, rng, || {
            client.interest_over_time(&term, scope.geo, scope.window)
        })
        .await
        {
            Ok(points) => Ok(points.last().map_or(0, |p| u64::from(p.value))),
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "interest query failed — skipping term");
                Err(e)
            }
        };
        outcomes.push(ItemOutcome {
            label: term,
            outcome,
        });
    }
    Ok(outcomes)
}

/// Mean interest over the window for every product of one category.
pub async fn category_interest<R: Rng + ?Sized>(
    client: &InterestClient,
    category: &CategoryConfig,
    scope: InterestScope<'_>,
    pacing: &PacingPolicy,
    rng: &mut R,
) -> Vec<ItemOutcome<u64>> {
    tracing::info!(category = %category.name, "collecting category interest");

    let mut outcomes = Vec::with_capacity(category.products.len());
    let mut first = true;
    for product in &category.products {
        if !first {
            pacing.pause(rng).await;
        }
        first = false;

        let outcome = match with_attempts(pacing, rng, || {
            client.interest_over_time(product, scope.geo, scope.window)
        })
        .await
        {
            Ok(points) => Ok(mean_value(&points)),
            Err(e) => {
                tracing::warn!(product = %product, error = %e, "interest query failed — skipping product");
                Err(e)
            }
        };
        outcomes.push(ItemOutcome {
            label: product.clone(),
            outcome,
        });
    }
    outcomes
}

/// Regional interest for a bounded random sample of each category.
///
/// Categories are visited in declaration order; products within a category
/// in sampled order (reproducible iff `rng` is seeded). A product missing
/// from the response's region index yields a record with no score; a failed
/// query yields no record.
pub async fn regional_interest<R: Rng + ?Sized>(
    client: &InterestClient,
    categories: &[CategoryConfig],
    state: &str,
    requested_sample: usize,
    scope: InterestScope<'_>,
    pacing: &PacingPolicy,
    rng: &mut R,
) -> Vec<ItemOutcome<RegionalInterestRecord>> {
    let region_geo = format!("{}-{state}", scope.geo);

    let mut outcomes = Vec::new();
    let mut first = true;
    for category in categories {
        let amount = effective_sample_size(requested_sample, category.products.len());
        let picked = rand::seq::index::sample(rng, category.products.len(), amount);
        tracing::info!(category = %category.name, sampled = amount, state, "querying regional interest");

        for idx in picked {
            let product = &category.products[idx];
            if !first {
                pacing.pause(rng).await;
            }
            first = false;

            let outcome = match with_attempts(pacing, rng, || {
                client.interest_by_region(product, &region_geo, scope.window)
            })
            .await
            {
                Ok(regions) => Ok(RegionalInterestRecord {
                    state: state.to_owned(),
                    product: product.clone(),
                    score: regions.get(state).copied(),
                }),
                Err(e) => {
                    tracing::warn!(product = %product, error = %e, "regional query failed — skipping item");
                    Err(e)
                }
            };
            outcomes.push(ItemOutcome {
                label: product.clone(),
                outcome,
            });
        }
    }
    outcomes
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn mean_value(points: &[InterestPoint]) -> u64 {
    if points.is_empty() {
        return 0;
    }
    let sum: u64 = points.iter().map(|p| u64::from(p.value)).sum();
    ((sum as f64) / (points.len() as f64)).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: u8) -> InterestPoint {
        InterestPoint {
            timestamp: 0,
            value,
        }
    }

    #[test]
    fn sample_size_clamps_up_to_minimum() {
        assert_eq!(effective_sample_size(1, 10), 3);
    }

    #[test]
    fn sample_size_clamps_down_to_maximum() {
        assert_eq!(effective_sample_size(9, 10), 5);
    }

    #[test]
    fn sample_size_bounded_by_available_items() {
        assert_eq!(effective_sample_size(4, 2), 2);
    }

    #[test]
    fn sample_size_in_range_passes_through() {
        assert_eq!(effective_sample_size(4, 10), 4);
    }

    #[test]
    fn mean_of_empty_series_is_zero() {
        assert_eq!(mean_value(&[]), 0);
    }

    #[test]
    fn mean_rounds_to_nearest() {
        assert_eq!(mean_value(&[point(1), point(2)]), 2); // 1.5 rounds up
        assert_eq!(mean_value(&[point(60), point(80), point(100)]), 80);
    }
}

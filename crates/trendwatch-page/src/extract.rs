//! The generic extraction algorithm driven by an [`ExtractionRecipe`].
//!
//! Step order: navigate → locale switch (required when present) → overlay
//! dismiss (optional) → table reveal (required when present) → data wait →
//! positional pairing. The page session is released on every exit path.

use crate::driver::{PageDriver, PageSession};
use crate::error::PageError;
use crate::recipe::ExtractionRecipe;

/// One raw `(label, count)` pair as read off the page, before
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrend {
    pub label: String,
    pub raw_count: String,
}

/// Pairs label and count texts positionally. Trailing elements of the longer
/// column have no partner and are dropped.
#[must_use]
pub fn pair_rows(labels: Vec<String>, counts: Vec<String>) -> Vec<RawTrend> {
    labels
        .into_iter()
        .zip(counts)
        .map(|(label, raw_count)| RawTrend { label, raw_count })
        .collect()
}

/// Runs `recipe` against `url` in a fresh session of `driver`.
///
/// A missing *required* element (locale step, reveal control, data column)
/// after its bounded wait fails this source only; a missing *optional*
/// overlay is logged and skipped. The session is closed before returning,
/// whatever the outcome.
///
/// # Errors
///
/// - [`PageError::MissingElement`] when a required element never appeared.
/// - [`PageError::Navigation`] / [`PageError::Driver`] on browser failure.
pub async fn extract(
    driver: &dyn PageDriver,
    url: &str,
    recipe: &ExtractionRecipe,
) -> Result<Vec<RawTrend>, PageError> {
    let mut session = driver.new_session().await?;
    let result = run_recipe(session.as_mut(), url, recipe).await;
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to release browser session");
    }
    result
}

async fn run_recipe(
    session: &mut dyn PageSession,
    url: &str,
    recipe: &ExtractionRecipe,
) -> Result<Vec<RawTrend>, PageError> {
    let timeouts = recipe.timeouts;
    let element_secs = timeouts.element.as_secs();

    session.navigate(url).await?;
    tracing::info!(url, "page loaded");

    if let Some(steps) = &recipe.locale {
        if !session.wait_for(&steps.menu, timeouts.element).await? {
            return Err(PageError::MissingElement {
                role: "language menu",
                locator: steps.menu.to_string(),
                timeout_secs: element_secs,
            });
        }
        session.click(&steps.menu).await?;

        if !session.wait_for(&steps.option, timeouts.element).await? {
            return Err(PageError::MissingElement {
                role: "language option",
                locator: steps.option.to_string(),
                timeout_secs: element_secs,
            });
        }
        session.click(&steps.option).await?;
        tracing::info!("language selected — waiting for the page to settle");
        tokio::time::sleep(timeouts.settle).await;
    }

    if let Some(overlay) = &recipe.dismiss_overlay {
        if session.wait_for(overlay, timeouts.overlay).await? {
            match session.click(overlay).await {
                Ok(()) => tracing::info!("overlay dismissed"),
                // The overlay may close itself between the wait and the click.
                Err(e) => tracing::warn!(error = %e, "overlay found but not dismissed"),
            }
        } else {
            tracing::info!("no overlay found — continuing");
        }
    }

    if let Some(reveal) = &recipe.reveal {
        if !session.wait_for(reveal, timeouts.element).await? {
            return Err(PageError::MissingElement {
                role: "navigation control",
                locator: reveal.to_string(),
                timeout_secs: element_secs,
            });
        }
        session.scroll_into_view(reveal).await?;
        session.click(reveal).await?;
        tracing::info!(control = %reveal, "table revealed");
    }

    if !session.wait_for(&recipe.labels, timeouts.element).await? {
        return Err(PageError::MissingElement {
            role: "data column",
            locator: recipe.labels.to_string(),
            timeout_secs: element_secs,
        });
    }

    let labels = session.texts(&recipe.labels).await?;
    let counts = session.texts(&recipe.counts).await?;
    let rows = pair_rows(labels, counts);
    tracing::info!(rows = rows.len(), "extraction finished");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::recipe::{LocaleSteps, Locator, RecipeTimeouts};

    /// Scripted page state shared between the fake driver and the test body.
    #[derive(Default)]
    struct FakeState {
        /// Locator displays that resolve to a present element.
        present: HashSet<String>,
        /// Texts returned per locator display.
        texts: HashMap<String, Vec<String>>,
        clicks: Vec<String>,
        closed: bool,
    }

    struct FakeDriver {
        state: Arc<Mutex<FakeState>>,
    }

    struct FakeSession {
        state: Arc<Mutex<FakeState>>,
    }

    #[async_trait]
    impl PageDriver for FakeDriver {
        async fn new_session(&self) -> Result<Box<dyn PageSession>, PageError> {
            Ok(Box::new(FakeSession {
                state: Arc::clone(&self.state),
            }))
        }
    }

    #[async_trait]
    impl PageSession for FakeSession {
        async fn navigate(&mut self, _url: &str) -> Result<(), PageError> {
            Ok(())
        }

        async fn wait_for(
            &mut self,
            locator: &Locator,
            _timeout: Duration,
        ) -> Result<bool, PageError> {
            // Absent elements "time out" instantly; the bounded-wait
            // contract only requires the boolean outcome.
            Ok(self.state.lock().unwrap().present.contains(&locator.to_string()))
        }

        async fn click(&mut self, locator: &Locator) -> Result<(), PageError> {
            self.state.lock().unwrap().clicks.push(locator.to_string());
            Ok(())
        }

        async fn scroll_into_view(&mut self, _locator: &Locator) -> Result<(), PageError> {
            Ok(())
        }

        async fn texts(&mut self, locator: &Locator) -> Result<Vec<String>, PageError> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .texts
                .get(&locator.to_string())
                .cloned()
                .unwrap_or_default())
        }

        async fn close(&mut self) -> Result<(), PageError> {
            self.state.lock().unwrap().closed = true;
            Ok(())
        }
    }

    fn fast_timeouts() -> RecipeTimeouts {
        RecipeTimeouts {
            overlay: Duration::from_millis(1),
            element: Duration::from_millis(1),
            settle: Duration::from_millis(0),
        }
    }

    fn basic_recipe() -> ExtractionRecipe {
        ExtractionRecipe {
            dismiss_overlay: Some(Locator::css("button.close")),
            locale: None,
            reveal: Some(Locator::css("#tab")),
            labels: Locator::css("td.topic"),
            counts: Locator::css("td.count"),
            timeouts: fast_timeouts(),
        }
    }

    fn driver_with(state: FakeState) -> (FakeDriver, Arc<Mutex<FakeState>>) {
        let state = Arc::new(Mutex::new(state));
        (
            FakeDriver {
                state: Arc::clone(&state),
            },
            state,
        )
    }

    fn present(locators: &[&str]) -> HashSet<String> {
        locators.iter().map(|l| (*l).to_string()).collect()
    }

    fn texts_for(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(k, vs)| {
                (
                    (*k).to_string(),
                    vs.iter().map(|v| (*v).to_string()).collect(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn happy_path_extracts_paired_rows() {
        let (driver, state) = driver_with(FakeState {
            present: present(&["button.close", "#tab", "td.topic"]),
            texts: texts_for(&[
                ("td.topic", &["#a", "#b"]),
                ("td.count", &["1.200", "350"]),
            ]),
            ..FakeState::default()
        });

        let rows = extract(&driver, "https://example.test", &basic_recipe())
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "#a");
        assert_eq!(rows[0].raw_count, "1.200");
        assert!(state.lock().unwrap().closed, "session must be released");
    }

    #[tokio::test]
    async fn missing_overlay_is_not_an_error() {
        let (driver, state) = driver_with(FakeState {
            present: present(&["#tab", "td.topic"]),
            texts: texts_for(&[("td.topic", &["#a"]), ("td.count", &["10"])]),
            ..FakeState::default()
        });

        let rows = extract(&driver, "https://example.test", &basic_recipe())
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        // The overlay was never clicked.
        assert!(!state.lock().unwrap().clicks.contains(&"button.close".to_string()));
    }

    #[tokio::test]
    async fn missing_reveal_fails_the_source_and_releases_session() {
        let (driver, state) = driver_with(FakeState {
            present: present(&["button.close"]),
            ..FakeState::default()
        });

        let err = extract(&driver, "https://example.test", &basic_recipe())
            .await
            .unwrap_err();

        assert!(
            matches!(err, PageError::MissingElement { role, .. } if role == "navigation control")
        );
        assert!(state.lock().unwrap().closed, "session must be released on failure");
    }

    #[tokio::test]
    async fn missing_data_column_fails_the_source() {
        let (driver, _state) = driver_with(FakeState {
            present: present(&["button.close", "#tab"]),
            ..FakeState::default()
        });

        let err = extract(&driver, "https://example.test", &basic_recipe())
            .await
            .unwrap_err();

        assert!(matches!(err, PageError::MissingElement { role, .. } if role == "data column"));
    }

    #[tokio::test]
    async fn missing_locale_menu_is_a_hard_failure() {
        let recipe = ExtractionRecipe {
            dismiss_overlay: None,
            locale: Some(LocaleSteps {
                menu: Locator::css("span.lang"),
                option: Locator::text_inside("div", "Português (Brasil)"),
            }),
            reveal: None,
            labels: Locator::css("span.title"),
            counts: Locator::css("div.posts"),
            timeouts: fast_timeouts(),
        };
        let (driver, state) = driver_with(FakeState::default());

        let err = extract(&driver, "https://example.test", &recipe)
            .await
            .unwrap_err();

        assert!(matches!(err, PageError::MissingElement { role, .. } if role == "language menu"));
        assert!(state.lock().unwrap().closed);
    }

    #[tokio::test]
    async fn locale_steps_click_menu_then_option() {
        let option = Locator::text_inside("div", "Português (Brasil)");
        let recipe = ExtractionRecipe {
            dismiss_overlay: None,
            locale: Some(LocaleSteps {
                menu: Locator::css("span.lang"),
                option: option.clone(),
            }),
            reveal: None,
            labels: Locator::css("span.title"),
            counts: Locator::css("div.posts"),
            timeouts: fast_timeouts(),
        };
        let option_display = option.to_string();
        let (driver, state) = driver_with(FakeState {
            present: present(&["span.lang", option_display.as_str(), "span.title"]),
            texts: texts_for(&[("span.title", &["#promo"]), ("div.posts", &["3.4K"])]),
            ..FakeState::default()
        });

        let rows = extract(&driver, "https://example.test", &recipe)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        let clicks = state.lock().unwrap().clicks.clone();
        assert_eq!(clicks[0], "span.lang");
        assert_eq!(clicks[1], option.to_string());
    }

    #[test]
    fn pairing_is_bounded_by_the_shorter_column() {
        let labels = vec!["#1", "#2", "#3", "#4", "#5"]
            .into_iter()
            .map(String::from)
            .collect();
        let counts = vec!["10", "20", "30"].into_iter().map(String::from).collect();

        let rows = pair_rows(labels, counts);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].label, "#3");
        assert_eq!(rows[2].raw_count, "30");
    }

    #[test]
    fn pairing_with_empty_counts_is_empty() {
        let rows = pair_rows(vec!["#1".into()], vec![]);
        assert!(rows.is_empty());
    }
}

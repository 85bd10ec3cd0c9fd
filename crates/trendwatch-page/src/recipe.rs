//! Declarative extraction recipes.
//!
//! A recipe describes how to reach the trend table on one page type:
//! which overlay to dismiss, which controls to activate, and which two
//! element sets hold the label and count columns. All site-specific
//! brittleness lives here; the extraction algorithm itself is generic.

use std::time::Duration;

/// How to locate elements on a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Standard CSS selector.
    Css(String),
    /// The candidate among `css` matches whose rendered text equals `text`
    /// exactly (after trimming). Used where pages only distinguish options
    /// by their visible label.
    TextInside { css: String, text: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text_inside(css: impl Into<String>, text: impl Into<String>) -> Self {
        Locator::TextInside {
            css: css.into(),
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "{css}"),
            Locator::TextInside { css, text } => write!(f, "{css}[text={text:?}]"),
        }
    }
}

/// Two sequential clicks that switch the page language before the table is
/// revealed. Both steps are required; either one missing fails the source.
#[derive(Debug, Clone)]
pub struct LocaleSteps {
    pub menu: Locator,
    pub option: Locator,
}

/// Bounded-wait settings shared by the recipes.
#[derive(Debug, Clone, Copy)]
pub struct RecipeTimeouts {
    /// Wait for the optional dismiss-overlay control.
    pub overlay: Duration,
    /// Wait for required controls and data columns.
    pub element: Duration,
    /// Settle time after a locale switch re-renders the page.
    pub settle: Duration,
}

impl Default for RecipeTimeouts {
    fn default() -> Self {
        Self {
            overlay: Duration::from_secs(5),
            element: Duration::from_secs(10),
            settle: Duration::from_secs(10),
        }
    }
}

/// Selector set and waits for one page type.
#[derive(Debug, Clone)]
pub struct ExtractionRecipe {
    /// Transient pop-up close control; absence is not an error.
    pub dismiss_overlay: Option<Locator>,
    /// Language-switch sequence; required when present.
    pub locale: Option<LocaleSteps>,
    /// Control revealing the data table; required when present.
    pub reveal: Option<Locator>,
    /// Label column elements.
    pub labels: Locator,
    /// Count column elements, paired positionally with `labels`.
    pub counts: Locator,
    pub timeouts: RecipeTimeouts,
}

/// Recipe for the trends-listing site: close a possible pop-up, activate the
/// table tab, read topic/count cells.
#[must_use]
pub fn trends_listing_recipe(timeouts: RecipeTimeouts) -> ExtractionRecipe {
    ExtractionRecipe {
        dismiss_overlay: Some(Locator::css(
            r#"button[aria-label="Fechar"], button[class*="close"]"#,
        )),
        locale: None,
        reveal: Some(Locator::css("#tab-link-table")),
        labels: Locator::css("td.topic a"),
        counts: Locator::css("td.count"),
        timeouts,
    }
}

/// Recipe for the short-video creative-center page: switch the page to
/// Portuguese via the language menu, close the assistant pop-up, read the
/// hashtag cards.
#[must_use]
pub fn short_video_recipe(timeouts: RecipeTimeouts) -> ExtractionRecipe {
    ExtractionRecipe {
        dismiss_overlay: Some(Locator::css(
            r#"img[alt="TikTok Symphony Assistant"][src*="logo_v2_close.svg"]"#,
        )),
        locale: Some(LocaleSteps {
            menu: Locator::css(r#"span[data-testid="cc_rimless_select_language"]"#),
            option: Locator::text_inside("div", "Português (Brasil)"),
        }),
        reveal: None,
        labels: Locator::css(r#"span[class*="CardPc_titleText__"]"#),
        counts: Locator::css(r#"div[class*="CardPc_pavWrapper__"]"#),
        timeouts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_display_css() {
        assert_eq!(Locator::css("td.topic a").to_string(), "td.topic a");
    }

    #[test]
    fn locator_display_text_inside() {
        let locator = Locator::text_inside("div", "Português (Brasil)");
        assert_eq!(locator.to_string(), "div[text=\"Português (Brasil)\"]");
    }

    #[test]
    fn trends_recipe_has_required_reveal_and_no_locale() {
        let recipe = trends_listing_recipe(RecipeTimeouts::default());
        assert!(recipe.reveal.is_some());
        assert!(recipe.locale.is_none());
        assert!(recipe.dismiss_overlay.is_some());
    }

    #[test]
    fn short_video_recipe_has_locale_and_no_reveal() {
        let recipe = short_video_recipe(RecipeTimeouts::default());
        assert!(recipe.locale.is_some());
        assert!(recipe.reveal.is_none());
    }

    #[test]
    fn default_timeouts_are_bounded() {
        let t = RecipeTimeouts::default();
        assert_eq!(t.overlay, Duration::from_secs(5));
        assert_eq!(t.element, Duration::from_secs(10));
    }
}

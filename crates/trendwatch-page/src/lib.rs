pub mod driver;
pub mod error;
pub mod extract;
pub mod recipe;

pub use driver::{find_chromium, ChromiumDriver, PageDriver, PageSession};
pub use error::PageError;
pub use extract::{extract, pair_rows, RawTrend};
pub use recipe::{
    short_video_recipe, trends_listing_recipe, ExtractionRecipe, LocaleSteps, Locator,
    RecipeTimeouts,
};

pub mod client;
pub mod error;
pub mod pacing;
pub mod poll;

pub use client::{InterestClient, InterestPoint};
pub use error::InterestError;
pub use pacing::PacingPolicy;
pub use poll::{
    category_interest, collect_trending, effective_sample_size, regional_interest, InterestScope,
    ItemOutcome,
};

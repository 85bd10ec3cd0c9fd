pub mod client;
pub mod error;
pub mod media;
pub mod types;

pub use client::{SearchClient, MAX_SEARCH_RESULTS, MIN_SEARCH_RESULTS};
pub use error::SocialError;
pub use media::{MediaClient, MediaCredentials, MAX_MEDIA_COUNT};
pub use types::{SearchItem, SearchQuery};

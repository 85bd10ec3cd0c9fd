pub mod analyze;
pub mod detect;
pub mod error;
pub mod tagger;
pub mod types;

pub use analyze::{EntityAnalyzer, PatternAnalyzer};
pub use detect::{LanguageDetector, StopwordDetector};
pub use error::TagError;
pub use tagger::{annotate_file, Tagger};
pub use types::{Entity, Language};

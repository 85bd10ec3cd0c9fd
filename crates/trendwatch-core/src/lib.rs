pub mod aggregate;
pub mod app_config;
pub mod categories;
pub mod config;
pub mod error;
pub mod normalize;
pub mod records;
pub mod tsv;

pub use aggregate::{combine, CombinedTrends, RunStatus, SourceReport, SourceStatus};
pub use app_config::AppConfig;
pub use categories::{load_categories, CategoriesFile, CategoryConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use normalize::{normalize_count, normalize_label, normalize_trend, NormalizeError};
pub use records::{
    is_valid_state, PostRecord, RegionalInterestRecord, TrendRecord, TrendSource, BRAZIL_STATES,
};
pub use tsv::{read_table, sanitize_field, write_records, ExportError, Table, TsvRecord};

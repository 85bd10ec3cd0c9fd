use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("column '{column}' not found in {path}")]
    MissingColumn { column: String, path: String },

    #[error(transparent)]
    Export(#[from] trendwatch_core::ExportError),
}

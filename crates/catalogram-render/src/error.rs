use thiserror::Error;

use catalogram_core::Error as CoreError;

/// Errors surfaced by a render pass.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The catalog failed validation (e.g. a dangling foreign key).
    #[error(transparent)]
    Catalog(#[from] CoreError),
    /// The requested format, quoting rule or option is not recognized.
    #[error("unsupported format option: {0}")]
    UnsupportedFormatOption(String),
    /// The output sink rejected a write; partial output is left as-is.
    #[error("output write failed: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for render operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

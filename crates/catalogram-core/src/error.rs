use thiserror::Error;

/// Core error type shared across catalogram crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A key or index points at a table or column missing from the catalog.
    #[error("invalid catalog reference {entity}: {reason}")]
    InvalidCatalogReference { entity: String, reason: String },
    /// The catalog violates structural invariants (e.g. duplicate names).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl Error {
    pub(crate) fn reference(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidCatalogReference {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results returned by catalogram crates.
pub type Result<T> = std::result::Result<T, Error>;

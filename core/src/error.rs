use thiserror::Error;

/// Failure taxonomy for the catalog.
///
/// `Execution` wraps the underlying store error. Every execution failure
/// inside a transaction is preceded by a rollback; the rollback itself is
/// best-effort and never masks the original error.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("recipe with id {recipe_id} does not exist")]
    NotFound { recipe_id: i64 },

    #[error("database operation failed: {0}")]
    Execution(#[from] rusqlite::Error),

    #[error("'{input}' is not a valid number")]
    Conversion { input: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

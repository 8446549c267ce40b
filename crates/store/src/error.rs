use thiserror::Error;

/// Storage-layer error.
///
/// "Row absent" is modelled as `Ok(None)` on reads; `NotFound` is only
/// returned by mutations that target a missing row.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint was violated (e.g. duplicate email).
    #[error("conflict on {0}")]
    Conflict(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

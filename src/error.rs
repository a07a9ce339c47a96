use thiserror::Error as ThisError;
use uuid::Uuid;

/// Error taxonomy for the content store and workflow layer.
///
/// Not-found is never an error: reads and updates addressing a missing id
/// return `Ok(None)`, deletes return `Ok(false)`.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required field was missing or empty. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (slug, setting key, username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A category still referenced by posts cannot be deleted.
    #[error("category {id} still has {posts} post(s) attached")]
    CategoryInUse { id: Uuid, posts: i64 },

    /// Any other failure from the relational backend.
    #[error("storage error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict(message.into())
    }

    pub fn slug_taken(slug: &str) -> Self {
        Error::Conflict(format!("slug already in use: {}", slug))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Collapses a unique-constraint violation from the database into the
    /// same `Conflict` the in-memory backend raises from its pre-check, so
    /// callers see one error taxonomy regardless of backend.
    pub(crate) fn translate_unique(err: sqlx::Error, conflict: Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => conflict,
            _ => Error::Database(err),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

use lawmox_core::crypto::CryptoError;
use lawmox_core::error::CoreError;

/// Error returned by repository operations that validate or transform input
/// before touching the database.
///
/// Plain reads keep returning `sqlx::Error`; both convert into the API error.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<CryptoError> for DbError {
    fn from(err: CryptoError) -> Self {
        DbError::Core(err.into())
    }
}

impl DbError {
    /// Name of the violated unique constraint, if this is a PostgreSQL
    /// unique violation (SQLSTATE `23505`).
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            DbError::Sqlx(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23505") =>
            {
                db_err.constraint()
            }
            _ => None,
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

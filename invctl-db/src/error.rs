//! Error types for invctl-db

use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Core(#[from] invctl_core::CoreError),
}

impl DbError {
    /// Remap unique-constraint violations to a conflict with a readable
    /// message; everything else stays a database error.
    pub fn from_sqlx_conflict(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DbError::Conflict(format!("{what} already exists"));
            }
        }
        DbError::Sqlx(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DbError::NotFound("product 'WID-001'".to_string());
        assert_eq!(err.to_string(), "Not found: product 'WID-001'");
    }

    #[test]
    fn test_non_database_error_passes_through() {
        let err = DbError::from_sqlx_conflict(sqlx::Error::RowNotFound, "product 'X'");
        assert!(matches!(err, DbError::Sqlx(_)));
    }
}

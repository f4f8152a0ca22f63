//! Persistence error boundary
//!
//! Every repository call returns [`RepoError`], which has exactly two
//! persistence kinds: a unique-constraint violation (`Conflict`) or anything
//! else the database reports (`Database`). Business rules raised inside a
//! repository travel as `App` untouched.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// User-facing message for unique-constraint violations
pub const CONFLICT_MESSAGE: &str = "Ya existe un registro con esos datos";
/// User-facing message for every other persistence failure
pub const INTERNAL_MESSAGE: &str = "Error interno del servidor";

#[derive(Debug, Error)]
pub enum RepoError {
    /// Unique constraint violated (constraint name when known)
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Business-rule error (already an AppError with the correct ErrorCode)
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error()
            && db_err.is_unique_violation()
        {
            return RepoError::Conflict(db_err.constraint().unwrap_or("unique").to_string());
        }
        RepoError::Database(e)
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::App(app_err) => app_err,
            RepoError::Conflict(constraint) => {
                tracing::warn!(constraint = %constraint, "Unique constraint violation");
                AppError::with_message(ErrorCode::AlreadyExists, CONFLICT_MESSAGE)
                    .with_detail("constraint", constraint)
            }
            RepoError::Database(db_err) => {
                tracing::error!(error = %db_err, "Repository database error");
                AppError::with_message(ErrorCode::InternalError, INTERNAL_MESSAGE)
            }
        }
    }
}

impl IntoResponse for RepoError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_conflict_maps_to_409() {
        let err: AppError = RepoError::Conflict("product_sku_key".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        assert_eq!(err.message, CONFLICT_MESSAGE);
    }

    #[test]
    fn test_other_database_errors_map_to_500() {
        let err: AppError = RepoError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, INTERNAL_MESSAGE);

        let err: AppError = RepoError::from(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn test_business_errors_pass_through() {
        let err: AppError = RepoError::from(AppError::new(ErrorCode::RoleInUse)).into();
        assert_eq!(err.code, ErrorCode::RoleInUse);
    }
}

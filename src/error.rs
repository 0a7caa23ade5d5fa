use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("only {available} of {requested} requested seats available")]
    InsufficientCapacity { requested: i32, available: i32 },

    #[error("booking is already cancelled")]
    AlreadyCancelled,

    /// A write landed but its companion write did not. Surfaced loudly so
    /// the two stores can be reconciled, never swallowed.
    #[error("inconsistent state: {0}")]
    Inconsistent(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        // Losing a unique-index race (duplicate email, reference collision)
        // is a conflict for the client, not a server failure.
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("A record with this value already exists".to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) | AppError::AlreadyCancelled => StatusCode::CONFLICT,
            AppError::InsufficientCapacity { .. } => StatusCode::CONFLICT,
            AppError::Inconsistent(_) | AppError::Internal(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InsufficientCapacity { .. } => "INSUFFICIENT_CAPACITY",
            AppError::AlreadyCancelled => "ALREADY_CANCELLED",
            AppError::Inconsistent(_) => "INCONSISTENT_STATE",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        }

        // Database details stay out of client responses.
        let message = match &self {
            AppError::Database(_) => "internal database error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            code: self.code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_capacity_maps_to_conflict() {
        let err = AppError::InsufficientCapacity {
            requested: 4,
            available: 2,
        };
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "INSUFFICIENT_CAPACITY");
        assert_eq!(err.to_string(), "only 2 of 4 requested seats available");
    }

    #[test]
    fn already_cancelled_is_a_conflict() {
        assert_eq!(AppError::AlreadyCancelled.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::AlreadyCancelled.code(), "ALREADY_CANCELLED");
    }

    #[test]
    fn validation_maps_to_unprocessable_entity() {
        let err = AppError::Validation("passengers must be at least 1".into());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn non_unique_db_errors_stay_internal() {
        let err: AppError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let err = AppError::Database(DbErr::Custom("secret dsn".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

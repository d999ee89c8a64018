use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::scheduling::ScheduleError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Timed out after {0} ms")]
    Timeout(u128),

    #[error("Internal server error")]
    InternalServerError,
}

impl AppError {
    /// Failures worth one more attempt: timeouts, pool exhaustion, I/O and
    /// SQLite busy/locked.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Timeout(_) => true,
            AppError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => true,
            AppError::Database(sqlx::Error::Database(db)) => {
                matches!(db.code().as_deref(), Some("5" | "6" | "517" | "262"))
            }
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Schedule(e) => match e {
                ScheduleError::NotFound { .. } => StatusCode::NOT_FOUND,
                ScheduleError::InvalidSlot(_) => StatusCode::BAD_REQUEST,
                ScheduleError::InvalidConfiguration(_) | ScheduleError::Unsatisfiable { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ScheduleError::SlotOccupied { .. }
                | ScheduleError::TeacherConflict { .. }
                | ScheduleError::RoomConflict { .. }
                | ScheduleError::LoadExceeded { .. }
                | ScheduleError::LabBlockLocked { .. } => StatusCode::CONFLICT,
            },
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                StatusCode::CONFLICT
            }
            AppError::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) if self.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Database(sqlx::Error::Database(db))
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                warn!("constraint violation: {}", db);
                db.message().to_string()
            }
            AppError::Database(e) => {
                error!("database error: {}", e);
                if status == StatusCode::SERVICE_UNAVAILABLE {
                    "Database is busy, try again".to_string()
                } else {
                    "Database error occurred".to_string()
                }
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            detail,
        });

        (status, body).into_response()
    }
}

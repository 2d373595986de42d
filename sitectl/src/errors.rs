use crate::db::errors::DbError;
use crate::stats::StatsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data
    #[error("{message}")]
    BadRequest { message: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Recompute could not read the backend
    #[error(transparent)]
    Stats(#[from] StatsError),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::OutOfRange { .. } | DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            // The backend is upstream of us
            Error::Stats(StatsError::Fetch(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::OutOfRange { .. } | DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Stats(StatsError::Fetch(_)) => "Failed to fetch project data".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::NotFound) | Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Database(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Stats(StatsError::Fetch(source)) => {
                tracing::error!("Upstream error: {}: {}", self, source);
            }
        }

        (self.status_code(), self.user_message()).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

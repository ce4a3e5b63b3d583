use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::users::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    // request problems
    #[error("{0}")]
    BadRequest(String),
    #[error("No {0} was provided")]
    MissingField(&'static str),

    // auth
    #[error("User already exists")]
    UserExists,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Missing Authorization Header")]
    MissingToken,
    #[error("Bad Authorization header. Expected 'Authorization: Bearer <JWT>'")]
    BadAuthHeader,
    #[error("Token has expired")]
    TokenExpired,
    #[error("{0}")]
    InvalidToken(String),
    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => AppError::UserExists,
            StoreError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    msg: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::MissingField(_) => StatusCode::BAD_REQUEST,
            // 401 for duplicates is what existing clients expect
            Self::UserExists
            | Self::InvalidCredentials
            | Self::MissingToken
            | Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::BadAuthHeader | Self::InvalidToken(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let msg = match &self {
            Self::Internal(e) => {
                error!(error = ?e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { msg })).into_response()
    }
}

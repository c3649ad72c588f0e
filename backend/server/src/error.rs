use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledger::LedgerError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Invalid reaction")]
    InvalidReaction,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Recipe not found")]
    NotFound,

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("Ledger inconsistent: {0}")]
    Inconsistent(LedgerError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidReaction(_) => AppError::InvalidReaction,
            LedgerError::InvalidRecipeId(_) => AppError::NotFound,
            err if err.is_invalid_input() => AppError::InvalidInput(err.to_string()),
            err => AppError::Inconsistent(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload | AppError::InvalidReaction | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Inconsistent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!("{self}");
            "Server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    rpc::{RemoteError, client::RpcError},
};

/// Domain outcome carried on a failed RPC reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Unauthorized,
    NotFound,
    RuleViolation,
}

/// Errors raised inside a domain service.
///
/// The first four variants are domain outcomes and travel back to the caller
/// as an unsuccessful [`crate::rpc::RpcReply`]. The rest are infrastructure
/// faults and surface as a transport failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Rule(String),

    #[error("Database error")]
    Db(#[from] sea_orm::DbErr),

    #[error("Database error")]
    Sqlx(#[from] sqlx::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ServiceError::Validation(_) => Some(ErrorCode::Validation),
            ServiceError::Unauthorized(_) => Some(ErrorCode::Unauthorized),
            ServiceError::NotFound(_) => Some(ErrorCode::NotFound),
            ServiceError::Rule(_) => Some(ErrorCode::RuleViolation),
            ServiceError::Db(_) | ServiceError::Sqlx(_) | ServiceError::Internal(_) => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by gateway handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Upstream call failed: {0}")]
    Upstream(#[from] RpcError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn from_code(code: ErrorCode, message: String) -> Self {
        match code {
            ErrorCode::Validation | ErrorCode::RuleViolation => AppError::BadRequest(message),
            ErrorCode::Unauthorized => AppError::Unauthorized(message),
            ErrorCode::NotFound => AppError::NotFound(message),
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Rejected { code, message } => AppError::from_code(code, message),
            RemoteError::MissingPayload => AppError::Internal(anyhow::anyhow!(err)),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err.code() {
            Some(code) => AppError::from_code(code, err.to_string()),
            None => AppError::Internal(anyhow::anyhow!(err)),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

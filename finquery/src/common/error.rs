//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `GatewayError`は`external_message()`と`status_code()`を提供し、
//! 呼び出し元に内部情報を漏らさないレスポンスを生成できる。

use axum::http::StatusCode;
use thiserror::Error;

use crate::audit::store::LogStoreError;
use crate::auth::AuthError;
use crate::providers::ProviderError;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Credential gate rejection or failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Question log store failure
    #[error(transparent)]
    LogStore(#[from] LogStoreError),

    /// Upstream provider failure
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Malformed request payload
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns a safe error message for external clients.
    ///
    /// Full details (`to_string()`) belong in server logs only.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Common(_) => "An unexpected error occurred",
            Self::Auth(err) => err.external_message(),
            Self::LogStore(LogStoreError::Read(_)) => "Error retrieving logs",
            Self::LogStore(LogStoreError::Clear(_)) => "Error clearing logs",
            Self::LogStore(_) => "An unexpected error occurred",
            Self::Provider(ProviderError::EmptyResponse) => "No data found",
            Self::Provider(_) => "Backend service unavailable",
            Self::BadRequest(_) => "Invalid request",
            Self::NotFound(_) => "Not found",
            Self::Internal(_) => "An unexpected error occurred",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => err.status_code(),
            Self::LogStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Provider(err) => err.status_code(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

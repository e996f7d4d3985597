//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::GatewayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError {
    error: GatewayError,
    message: Option<&'static str>,
    expose_detail: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AppError {
    /// エラーをラップする（詳細は非公開）
    pub fn new(error: impl Into<GatewayError>) -> Self {
        Self {
            error: error.into(),
            message: None,
            expose_detail: false,
        }
    }

    /// 呼び出し元に返すメッセージを差し替える
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    /// 500系レスポンスに内部エラー詳細を含めるか
    pub fn with_detail(mut self, expose: bool) -> Self {
        self.expose_detail = expose;
        self
    }

    /// HTTPステータスコード
    pub fn status(&self) -> StatusCode {
        self.error.status_code()
    }

    /// 呼び出し元に返すメッセージ
    pub fn message(&self) -> &'static str {
        self.message
            .unwrap_or_else(|| self.error.external_message())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::new(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        // 内部詳細はログにのみ出力する
        let detail = if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self.error);
            self.expose_detail.then(|| self.error.to_string())
        } else {
            tracing::debug!(status = status.as_u16(), "{}", self.error);
            None
        };

        (
            status,
            Json(ErrorBody {
                message,
                error: detail,
            }),
        )
            .into_response()
    }
}

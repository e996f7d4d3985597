//! 外部プロバイダ（回答生成・株価）
//!
//! 各プロバイダは trait で抽象化し、ハンドラーからは `Arc<dyn ...>` で参照する。
//! 外向き呼び出しは固定のクライアント側タイムアウトで制限し、再試行は行わない。

use axum::http::StatusCode;
use thiserror::Error;

/// OpenAI互換の回答プロバイダ
pub mod openai;

/// 株価履歴プロバイダ
pub mod stock;

pub use openai::{AnswerMode, AnswerProvider, OpenAiAnswerProvider};
pub use stock::{StockQuery, StockQuoteProvider, HttpStockQuoteProvider};

/// プロバイダ呼び出しエラー
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 必要な設定が無い
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// 入力が不正
    #[error("Invalid provider input: {0}")]
    InvalidInput(String),

    /// タイムアウト
    #[error("Provider request timed out: {0}")]
    Timeout(String),

    /// 通信エラー
    #[error("Provider transport error: {0}")]
    Transport(String),

    /// 上流がエラーステータスを返した
    #[error("Provider responded with status {status}: {body}")]
    Upstream {
        /// HTTPステータス
        status: u16,
        /// レスポンスボディ（ログ用）
        body: String,
    },

    /// 上流が空のレスポンスを返した
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// 想定外のレスポンス形式
    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// 呼び出し元に返すHTTPステータス
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::EmptyResponse => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Transport(err.to_string())
    }
}

//! finquery Gateway
//!
//! 自然言語の質問を回答プロバイダへ、株価照会を市場データプロバイダへ中継するHTTPゲートウェイ。
//! 一部のルートは検証可能クレデンシャル（VC-JWT）による認可ゲートの背後にあり、
//! 金融系の質問は監査ログに記録される。

#![warn(missing_docs)]

/// 共通型定義（エラー・入力サニタイズ）
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 認証・認可機能（クレデンシャルゲート）
pub mod auth;

/// 質問監査ログ
pub mod audit;

/// 外部プロバイダ（回答生成・株価）
pub mod providers;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ロギング初期化ユーティリティ
pub mod logging;

/// axumサーバー起動・シャットダウン
pub mod server;

/// CLIインターフェース
pub mod cli;

#[cfg(test)]
pub(crate) mod test_support;

use api::error::AppError;
use audit::QuestionLogStore;
use auth::{CredentialGate, CredentialVerifier};
use common::error::GatewayError;
use config::{GatewayConfig, VerifierConfig};
use providers::{AnswerProvider, HttpStockQuoteProvider, OpenAiAnswerProvider, StockQuoteProvider};
use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// ゲートウェイ設定
    pub config: Arc<GatewayConfig>,
    /// クレデンシャルゲート
    pub gate: CredentialGate,
    /// 質問ログストア
    pub log_store: QuestionLogStore,
    /// 回答プロバイダ
    pub answer_provider: Arc<dyn AnswerProvider>,
    /// 株価プロバイダ
    pub stock_provider: Arc<dyn StockQuoteProvider>,
}

impl AppState {
    /// 各コンポーネントから状態を組み立てる
    pub fn new(
        config: GatewayConfig,
        verifier: Arc<dyn CredentialVerifier>,
        answer_provider: Arc<dyn AnswerProvider>,
        stock_provider: Arc<dyn StockQuoteProvider>,
    ) -> Self {
        let log_store = QuestionLogStore::new(config.log_file.clone());
        Self {
            config: Arc::new(config),
            gate: CredentialGate::new(verifier),
            log_store,
            answer_provider,
            stock_provider,
        }
    }

    /// 設定から既定の検証器・プロバイダを構築する
    pub fn from_config(
        config: GatewayConfig,
        verifier_config: &VerifierConfig,
    ) -> Result<Self, GatewayError> {
        let verifier = auth::verifier::build_verifier(verifier_config)?;
        let answer_provider = Arc::new(OpenAiAnswerProvider::new(config.answer_provider.clone())?);
        let stock_provider = Arc::new(HttpStockQuoteProvider::new(config.stock_provider.clone())?);
        Ok(Self::new(config, verifier, answer_provider, stock_provider))
    }

    /// 開発モード設定を反映した `AppError` を作成する
    pub fn error(&self, err: impl Into<GatewayError>) -> AppError {
        AppError::new(err).with_detail(self.config.expose_error_details)
    }
}

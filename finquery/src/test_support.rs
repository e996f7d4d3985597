// ユニットテスト用のスタブ

use crate::auth::CredentialVerifier;
use crate::config::{AnswerProviderConfig, CorsConfig, GatewayConfig, StockProviderConfig};
use crate::providers::{AnswerMode, AnswerProvider, ProviderError, StockQuery, StockQuoteProvider};
use crate::AppState;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct EchoAnswerProvider;

#[async_trait]
impl AnswerProvider for EchoAnswerProvider {
    fn provider_name(&self) -> &str {
        "echo"
    }

    async fn answer(&self, question: &str, mode: AnswerMode) -> Result<String, ProviderError> {
        Ok(format!("{mode:?}: {question}"))
    }
}

pub(crate) struct FixedStockProvider;

#[async_trait]
impl StockQuoteProvider for FixedStockProvider {
    async fn history(&self, query: &StockQuery) -> Result<Value, ProviderError> {
        Ok(json!({ "symbol": query.symbol }))
    }
}

pub(crate) fn test_config(log_file: PathBuf) -> GatewayConfig {
    GatewayConfig {
        log_file,
        expose_error_details: false,
        cors: CorsConfig::default(),
        answer_provider: AnswerProviderConfig {
            api_key: None,
            model: "test".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        },
        stock_provider: StockProviderConfig {
            base_url: None,
            timeout: Duration::from_secs(1),
        },
    }
}

pub(crate) fn test_state(log_file: PathBuf, verifier: Arc<dyn CredentialVerifier>) -> AppState {
    AppState::new(
        test_config(log_file),
        verifier,
        Arc::new(EchoAnswerProvider),
        Arc::new(FixedStockProvider),
    )
}

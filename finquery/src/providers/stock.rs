//! 株価履歴プロバイダ

use super::{map_reqwest_error, ProviderError};
use crate::config::StockProviderConfig;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::info;

/// 省略時の取得期間（30日）
pub const DEFAULT_LOOKBACK_SECS: i64 = 30 * 24 * 60 * 60;

static STOCK_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z0-9.]{1,10}$").expect("stock symbol pattern is valid")
});

/// ティッカーシンボルの形式を検証する
pub fn is_valid_stock_symbol(symbol: &str) -> bool {
    STOCK_SYMBOL.is_match(symbol)
}

/// 株価履歴の問い合わせ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockQuery {
    /// ティッカーシンボル
    pub symbol: String,
    /// 開始（UNIX秒）
    pub period1: i64,
    /// 終了（UNIX秒）
    pub period2: i64,
}

impl StockQuery {
    /// 期間を省略した場合は `now` から30日前〜`now` になる
    pub fn new(symbol: String, period1: Option<i64>, period2: Option<i64>, now_secs: i64) -> Self {
        Self {
            symbol,
            period1: period1.unwrap_or(now_secs - DEFAULT_LOOKBACK_SECS),
            period2: period2.unwrap_or(now_secs),
        }
    }
}

/// 株価プロバイダの抽象化 trait
#[async_trait]
pub trait StockQuoteProvider: Send + Sync {
    /// 日足の履歴を取得する（上流のJSONをそのまま返す）
    async fn history(&self, query: &StockQuery) -> Result<Value, ProviderError>;
}

/// HTTP株価プロバイダ
pub struct HttpStockQuoteProvider {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpStockQuoteProvider {
    /// 設定からプロバイダを作成する
    pub fn new(config: StockProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl StockQuoteProvider for HttpStockQuoteProvider {
    async fn history(&self, query: &StockQuery) -> Result<Value, ProviderError> {
        if !is_valid_stock_symbol(&query.symbol) {
            return Err(ProviderError::InvalidInput(
                "invalid stock symbol".to_string(),
            ));
        }
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("stock API base URL is not set".to_string()))?;

        info!(symbol = %query.symbol, "Retrieving stock data");

        let url = format!("{}/{}", base_url.trim_end_matches('/'), query.symbol);
        let res = self
            .client
            .get(&url)
            .query(&[
                ("symbol", query.symbol.as_str()),
                ("period1", &query.period1.to_string()),
                ("period2", &query.period2.to_string()),
                ("interval", "1d"),
                ("events", "history|split"),
            ])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        let text = res.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body: text.trim().to_string(),
            });
        }
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        // JSON以外（CSV等）は文字列としてそのまま返す
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Null) => Err(ProviderError::EmptyResponse),
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(text)),
        }
    }
}

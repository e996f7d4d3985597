//! 株価履歴API（保護ルート）

use super::error::AppError;
use crate::common::error::GatewayError;
use crate::providers::stock::is_valid_stock_symbol;
use crate::providers::{ProviderError, StockQuery};
use crate::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

/// 期間パラメータ（UNIX秒）を取り出す
///
/// 数値または数値文字列を受け付ける。0・負数・非数値は省略扱い。
fn period_param(field: Option<&Value>) -> Option<i64> {
    let secs = match field? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (secs > 0).then_some(secs)
}

/// POST /stock
pub async fn stock_history(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> Result<Json<Value>, AppError> {
    let body = payload.map(|Json(body)| body).unwrap_or(Value::Null);

    let symbol = body
        .get("symbol")
        .and_then(Value::as_str)
        .filter(|symbol| is_valid_stock_symbol(symbol))
        .ok_or_else(|| {
            state
                .error(GatewayError::BadRequest("invalid stock symbol".to_string()))
                .with_message("Invalid stock symbol format")
        })?;

    let query = StockQuery::new(
        symbol.to_string(),
        period_param(body.get("period1")),
        period_param(body.get("period2")),
        Utc::now().timestamp(),
    );

    let data = state.stock_provider.history(&query).await.map_err(|e| {
        let message = match e {
            ProviderError::EmptyResponse => "No data found",
            _ => "Error retrieving stock data",
        };
        state.error(e).with_message(message)
    })?;

    Ok(Json(json!({ "message": "Success", "data": data })))
}

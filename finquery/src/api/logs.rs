//! 質問ログAPI（保護ルート）
//!
//! `/log` エンドポイントを提供する。

use super::error::AppError;
use crate::audit::ClearOutcome;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// GET /log
pub async fn get_logs(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let loaded = state.log_store.load().await.map_err(|e| state.error(e))?;

    let body = match loaded {
        None => json!({ "message": "No logs found", "data": [] }),
        Some(entries) => json!({ "message": "Logs retrieved successfully", "data": entries }),
    };
    Ok(Json(body))
}

/// DELETE /log
pub async fn clear_logs(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let message = match state.log_store.clear().await.map_err(|e| state.error(e))? {
        ClearOutcome::Cleared => "Logs cleared successfully",
        ClearOutcome::NothingToClear => "No logs to clear",
    };
    Ok(Json(json!({ "message": message })))
}

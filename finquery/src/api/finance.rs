//! 金融質問API（保護ルート）

use super::chat::{extract_question, generate_answer, invalid_question};
use super::error::AppError;
use crate::providers::AnswerMode;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// POST /finance
///
/// 回答生成に成功した場合のみ質問を監査ログに記録する（記録失敗は応答に影響しない）。
pub async fn finance_question(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> Result<Json<Value>, AppError> {
    let question = extract_question(
        payload
            .as_ref()
            .and_then(|Json(body)| body.pointer("/info/question")),
    )
    .ok_or_else(|| invalid_question(&state))?;

    let answer = generate_answer(&state, &question, AnswerMode::Finance).await?;

    state.log_store.append(&question).await;

    Ok(Json(json!({
        "message": "Finance data processed successfully",
        "data": { "answer": answer },
    })))
}

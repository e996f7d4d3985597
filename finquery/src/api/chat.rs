//! 汎用チャットAPI

use super::error::AppError;
use crate::common::error::GatewayError;
use crate::common::sanitize::sanitize_value;
use crate::providers::AnswerMode;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub(crate) const INVALID_QUESTION: &str = "Invalid question format";
pub(crate) const ANSWER_FAILED: &str = "Failed to generate response";

/// 質問フィールドを取り出してサニタイズする（文字列以外・空は `None`）
pub(crate) fn extract_question(field: Option<&Value>) -> Option<String> {
    field.map(sanitize_value).filter(|q| !q.is_empty())
}

pub(crate) fn invalid_question(state: &AppState) -> AppError {
    state
        .error(GatewayError::BadRequest(
            "question must be a non-empty string".to_string(),
        ))
        .with_message(INVALID_QUESTION)
}

/// 回答プロバイダを呼び出す（失敗は常に500）
pub(crate) async fn generate_answer(
    state: &AppState,
    question: &str,
    mode: AnswerMode,
) -> Result<String, AppError> {
    state
        .answer_provider
        .answer(question, mode)
        .await
        .map_err(|e| {
            state
                .error(GatewayError::Internal(format!(
                    "{} provider failed: {e}",
                    state.answer_provider.provider_name()
                )))
                .with_message(ANSWER_FAILED)
        })
}

/// POST /chat
pub async fn chat_question(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> Result<Json<Value>, AppError> {
    let question = extract_question(payload.as_ref().and_then(|Json(body)| body.get("question")))
        .ok_or_else(|| invalid_question(&state))?;

    let mode = AnswerMode::detect(&question);
    let answer = generate_answer(&state, &question, mode).await?;

    Ok(Json(json!({ "message": answer, "data": null })))
}

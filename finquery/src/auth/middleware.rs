// クレデンシャルゲートミドルウェア

use crate::api::error::AppError;
use crate::auth::AuthError;
use crate::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

/// JSONボディの上限（1 MiB）
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 保護ルート用のクレデンシャルゲートミドルウェア
///
/// JSONボディを読み取ってゲートで評価し、成功時は `VerifiedSubject` を
/// リクエスト拡張に格納してから、同じボディで次のハンドラーに渡す。
///
/// # Returns
/// * `Ok(Response)` - ゲート通過
/// * `Err(AppError)` - 401（クレデンシャル不備）または 500（ゲート内部エラー）
pub async fn credential_gate_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| state.error(AuthError::System(format!("failed to read request body: {e}"))))?;

    // JSON以外のボディ（Content-Type不一致を含む）はトークン無しとして扱う
    let payload: Value = if is_json_content(&parts.headers) {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    } else {
        Value::Null
    };

    let subject = state
        .gate
        .authorize(&payload)
        .await
        .map_err(|e| state.error(e))?;

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(subject);

    Ok(next.run(request).await)
}

/// `application/json` または `+json` サフィックスのメディアタイプか
fn is_json_content(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

//! 疎通確認API

use crate::common::sanitize::truncate_chars;
use axum::Json;
use serde_json::{json, Value};

const MAX_NAME_CHARS: usize = 30;

/// POST /test
///
/// ユーザー入力はログに出さない。
pub async fn hello(payload: Option<Json<Value>>) -> Json<Value> {
    let name = payload
        .as_ref()
        .and_then(|Json(body)| body.get("name"))
        .and_then(Value::as_str)
        .map(|name| truncate_chars(name, MAX_NAME_CHARS))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "World".to_string());

    Json(json!({ "message": format!("Hello {name}") }))
}

//! 入力サニタイズ
//!
//! 質問文がプロバイダや監査ログに渡る前に長さを制限し、前後の空白を除去する。

use serde_json::Value;

/// サニタイズ後の最大文字数
pub const MAX_INPUT_CHARS: usize = 500;

/// 文字列入力をサニタイズする
///
/// 先頭から最大 [`MAX_INPUT_CHARS`] 文字を取り出し、前後の空白を除去する。
pub fn sanitize(input: &str) -> String {
    let limited: String = input.chars().take(MAX_INPUT_CHARS).collect();
    limited.trim().to_string()
}

/// JSON値をサニタイズする
///
/// 文字列以外（数値、null、オブジェクト等）は空文字列になる。
pub fn sanitize_value(input: &Value) -> String {
    match input {
        Value::String(s) => sanitize(s),
        _ => String::new(),
    }
}

/// 先頭から最大 `max` 文字を取り出す（文字境界を保つ）
pub fn truncate_chars(input: &str, max: usize) -> String {
    input.chars().take(max).collect()
}

//! 共通ユーティリティ

/// エラー型
pub mod error;

/// 入力サニタイズ
pub mod sanitize;

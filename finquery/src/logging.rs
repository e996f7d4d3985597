//! ロギング初期化ユーティリティ
//!
//! 標準出力へのテキストログに加え、`FINQUERY_LOG_DIR` が設定されていれば
//! 日次ローテーションのJSONログファイルにも出力する。

use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログレベル指定の環境変数
pub const LOG_LEVEL_ENV: &str = "FINQUERY_LOG_LEVEL";
/// ログファイル出力先ディレクトリの環境変数
pub const LOG_DIR_ENV: &str = "FINQUERY_LOG_DIR";

const DEFAULT_LEVEL: &str = "info";
const LOG_FILE_PREFIX: &str = "finquery.jsonl";

/// グローバルなtracing subscriberを初期化する
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = env_filter(std::env::var(LOG_LEVEL_ENV).ok().as_deref());

    let file_layer = log_dir().map(|dir| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()
}

/// ログファイルの出力先ディレクトリ（未設定ならファイル出力なし）
pub fn log_dir() -> Option<PathBuf> {
    std::env::var(LOG_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}

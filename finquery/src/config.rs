//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to legacy variable names (with a warning log), and the typed configuration
//! values that are handed to the gate, the log store and the providers at
//! construction time.

use crate::common::error::CommonError;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the question log, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "logs/queries.log";

/// Get an environment variable with fallback to a legacy name
///
/// If the new variable name is set, returns its value.
/// If only the legacy name is set, returns its value and logs a
/// deprecation warning.
///
/// # Example
/// ```
/// use finquery::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("FINQUERY_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Falls back to `default` when neither is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 開発モード判定（`FINQUERY_ENV` / 旧 `NODE_ENV` が `development`）
///
/// 開発モードでは500系レスポンスに内部エラー詳細を含める。
pub fn is_development() -> bool {
    get_env_with_fallback("FINQUERY_ENV", "NODE_ENV")
        .map(|value| value.eq_ignore_ascii_case("development"))
        .unwrap_or(false)
}

/// 回答プロバイダ（OpenAI互換API）設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerProviderConfig {
    /// APIキー
    pub api_key: Option<String>,
    /// モデル名
    pub model: String,
    /// APIベースURL
    pub base_url: String,
    /// リクエストタイムアウト
    pub timeout: Duration,
}

impl AnswerProviderConfig {
    /// 環境変数から読み込む
    pub fn from_env() -> Self {
        let timeout_ms =
            get_env_with_fallback_parse("FINQUERY_API_TIMEOUT_MS", "API_TIMEOUT", 30_000u64);
        Self {
            api_key: non_empty(get_env_with_fallback(
                "FINQUERY_OPENAI_API_KEY",
                "OPENAI_API_KEY",
            )),
            model: get_env_with_fallback_or(
                "FINQUERY_OPENAI_MODEL",
                "OPENAI_MODEL",
                "gpt-4-0125-preview",
            ),
            base_url: get_env_with_fallback_or(
                "FINQUERY_OPENAI_BASE_URL",
                "OPENAI_BASE_URL",
                "https://api.openai.com/v1",
            ),
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

/// 株価プロバイダ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockProviderConfig {
    /// 株価APIのベースURL（未設定時は株価ルートが500を返す）
    pub base_url: Option<String>,
    /// リクエストタイムアウト
    pub timeout: Duration,
}

impl StockProviderConfig {
    /// 株価APIの固定タイムアウト
    pub const TIMEOUT: Duration = Duration::from_secs(5);

    /// 環境変数から読み込む
    pub fn from_env() -> Self {
        Self {
            base_url: non_empty(get_env_with_fallback("FINQUERY_STOCK_BASE_URL", "YAHOO_LINK")),
            timeout: Self::TIMEOUT,
        }
    }
}

/// VC-JWT検証鍵
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationKey {
    /// HS256共有シークレット
    Secret(String),
    /// 公開鍵PEM（Ed25519 / P-256 / RSA）
    PublicKeyPem(String),
}

/// クレデンシャル検証器の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierConfig {
    /// 外部の検証サービスへ委譲
    Remote {
        /// 検証エンドポイントURL
        url: String,
        /// リクエストタイムアウト
        timeout: Duration,
    },
    /// ローカルでVC-JWT署名を検証
    Jwt {
        /// 検証鍵
        key: VerificationKey,
        /// 期待する発行者
        issuer: Option<String>,
    },
}

impl VerifierConfig {
    /// 外部検証サービスのタイムアウト
    pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

    /// 環境変数から読み込む
    ///
    /// 優先順位: `FINQUERY_VC_VERIFIER_URL` → `FINQUERY_VC_PUBLIC_KEY_PEM`（ファイルパス）
    /// → `FINQUERY_VC_JWT_SECRET`。いずれも無い場合は設定エラー。
    pub fn from_env() -> Result<Self, CommonError> {
        if let Some(url) = non_empty(std::env::var("FINQUERY_VC_VERIFIER_URL").ok()) {
            return Ok(Self::Remote {
                url,
                timeout: Self::REMOTE_TIMEOUT,
            });
        }

        let issuer = non_empty(std::env::var("FINQUERY_VC_ISSUER").ok());

        if let Some(pem_path) = non_empty(std::env::var("FINQUERY_VC_PUBLIC_KEY_PEM").ok()) {
            let pem = std::fs::read_to_string(&pem_path).map_err(|e| {
                CommonError::Config(format!("Failed to read VC public key {pem_path}: {e}"))
            })?;
            return Ok(Self::Jwt {
                key: VerificationKey::PublicKeyPem(pem),
                issuer,
            });
        }

        if let Some(secret) = non_empty(std::env::var("FINQUERY_VC_JWT_SECRET").ok()) {
            return Ok(Self::Jwt {
                key: VerificationKey::Secret(secret),
                issuer,
            });
        }

        Err(CommonError::Config(
            "No credential verifier configured: set FINQUERY_VC_VERIFIER_URL, \
             FINQUERY_VC_PUBLIC_KEY_PEM or FINQUERY_VC_JWT_SECRET"
                .to_string(),
        ))
    }
}

/// CORS設定
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorsConfig {
    /// 許可するオリジン（未設定時は任意オリジン、クレデンシャル無し）
    pub client_url: Option<String>,
}

impl CorsConfig {
    /// 環境変数から読み込む
    pub fn from_env() -> Self {
        Self {
            client_url: non_empty(get_env_with_fallback("FINQUERY_CLIENT_URL", "CLIENT_URL")),
        }
    }
}

/// ゲートウェイ全体の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// 質問ログファイルのパス
    pub log_file: PathBuf,
    /// 500系レスポンスに内部エラー詳細を含めるか
    pub expose_error_details: bool,
    /// CORS設定
    pub cors: CorsConfig,
    /// 回答プロバイダ設定
    pub answer_provider: AnswerProviderConfig,
    /// 株価プロバイダ設定
    pub stock_provider: StockProviderConfig,
}

impl GatewayConfig {
    /// 環境変数から読み込む
    pub fn from_env() -> Self {
        Self {
            log_file: log_file_path(),
            expose_error_details: is_development(),
            cors: CorsConfig::from_env(),
            answer_provider: AnswerProviderConfig::from_env(),
            stock_provider: StockProviderConfig::from_env(),
        }
    }
}

/// サーバー待ち受け設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// バインドアドレス
    pub host: String,
    /// 待ち受けポート
    pub port: u16,
}

impl ServerConfig {
    /// 環境変数から読み込む（`FINQUERY_HOST`, `FINQUERY_PORT`（旧: `PORT`））
    pub fn from_env() -> Self {
        Self {
            host: non_empty(std::env::var("FINQUERY_HOST").ok())
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get_env_with_fallback_parse("FINQUERY_PORT", "PORT", 8001),
        }
    }

    /// CLI引数で上書きする
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` 形式のバインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 質問ログファイルのパス
///
/// 環境変数 `FINQUERY_LOG_FILE`（旧: `LOG_FILE_PATH`）から取得し、
/// 未設定の場合は `logs/queries.log` を返す。
pub fn log_file_path() -> PathBuf {
    non_empty(get_env_with_fallback("FINQUERY_LOG_FILE", "LOG_FILE_PATH"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

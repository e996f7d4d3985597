// 認証モジュール（検証可能クレデンシャル）

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// クレデンシャルゲート（トークン有無・鮮度・検証）
pub mod gate;

/// クレデンシャル検証器（VC-JWT / 外部検証サービス）
pub mod verifier;

/// 認証ミドルウェア
pub mod middleware;

pub use gate::{CredentialGate, CREDENTIAL_FRESHNESS_WINDOW};
pub use verifier::{CredentialVerifier, VerifyError};

/// リクエストボディ中のトークンフィールド名
pub const TOKEN_FIELD: &str = "vcJwt";
/// リクエストボディ中のクライアントタイムスタンプ（ミリ秒）フィールド名
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// クレデンシャルゲートの拒否理由
#[derive(Debug, Error)]
pub enum AuthError {
    /// トークンが無い、または空
    #[error("Missing verification credentials")]
    MissingCredential,

    /// クライアントタイムスタンプが鮮度ウィンドウを超えている
    #[error("Request expired")]
    RequestExpired,

    /// 検証失敗、または検証は通ったがサブジェクトが無い
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// ゲート自体の内部エラー
    #[error("Authentication system error: {0}")]
    System(String),
}

impl AuthError {
    /// 呼び出し元に返す汎用メッセージ（内部詳細は含めない）
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::MissingCredential => "Access denied: Missing verification credentials",
            Self::RequestExpired => "Request expired",
            Self::InvalidCredential(_) => "Access denied: Invalid credentials",
            Self::System(_) => "Authentication system error",
        }
    }

    /// HTTPステータスコード
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::System(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// 検証済みクレデンシャルのサブジェクト
///
/// リクエスト拡張に格納されていることが、下流ハンドラーにとって唯一の認可シグナルになる。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedSubject {
    /// サブジェクト識別子（DID等）
    pub id: Option<String>,
    /// `credentialSubject` のクレーム一式
    pub claims: Map<String, Value>,
}

impl VerifiedSubject {
    /// `credentialSubject` からサブジェクトを構築する
    ///
    /// 空オブジェクトやオブジェクト以外は `None`（クレーム無し扱い）。
    pub fn from_claims(subject: Value) -> Option<Self> {
        match subject {
            Value::Object(claims) if !claims.is_empty() => Some(Self {
                id: claims.get("id").and_then(Value::as_str).map(str::to_string),
                claims,
            }),
            _ => None,
        }
    }
}

//! クレデンシャルゲート
//!
//! 保護ルートの前段で以下を順に評価する:
//! 1. トークンの有無
//! 2. クライアントタイムスタンプの鮮度（タイムスタンプが無い場合はスキップ）
//! 3. 検証器によるトークン検証
//! 4. サブジェクトクレームの有無
//!
//! 再試行は行わない。リクエスト間で状態を保持しない。

use super::{AuthError, CredentialVerifier, VerifiedSubject, TIMESTAMP_FIELD, TOKEN_FIELD};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// クレデンシャルの鮮度ウィンドウ（5分）
pub const CREDENTIAL_FRESHNESS_WINDOW: Duration = Duration::from_millis(300_000);

/// クレデンシャルゲート
#[derive(Clone)]
pub struct CredentialGate {
    verifier: Arc<dyn CredentialVerifier>,
    freshness_window: Duration,
}

impl CredentialGate {
    /// 既定の鮮度ウィンドウでゲートを作成する
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            verifier,
            freshness_window: CREDENTIAL_FRESHNESS_WINDOW,
        }
    }

    /// 鮮度ウィンドウを差し替える
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    /// 鮮度ウィンドウ
    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// 現在時刻でリクエストボディを評価する
    pub async fn authorize(&self, body: &Value) -> Result<VerifiedSubject, AuthError> {
        self.authorize_at(body, Utc::now().timestamp_millis()).await
    }

    /// 指定時刻（エポックミリ秒）でリクエストボディを評価する
    pub async fn authorize_at(
        &self,
        body: &Value,
        now_ms: i64,
    ) -> Result<VerifiedSubject, AuthError> {
        let token = extract_token(body)?;

        match client_timestamp_ms(body) {
            Some(issued_at) => {
                let age_ms = now_ms as f64 - issued_at;
                if age_ms > self.freshness_window.as_millis() as f64 {
                    tracing::info!(age_ms, "Rejected stale credential request");
                    return Err(AuthError::RequestExpired);
                }
            }
            None => {
                // タイムスタンプ無しのリクエストはリプレイ保護なしで通す
                tracing::debug!("Credential request without client timestamp, freshness check skipped");
            }
        }

        let claims = self.verifier.verify(token).await.map_err(|e| {
            tracing::warn!("Credential verification failed: {}", e);
            AuthError::InvalidCredential(e.to_string())
        })?;

        let subject = claims
            .subject
            .and_then(VerifiedSubject::from_claims)
            .ok_or_else(|| {
                tracing::warn!("Verified credential carries no subject claims");
                AuthError::InvalidCredential("credential has no subject claims".to_string())
            })?;

        tracing::debug!(subject_id = ?subject.id, "Credential verified");
        Ok(subject)
    }
}

fn extract_token(body: &Value) -> Result<&str, AuthError> {
    match body.get(TOKEN_FIELD) {
        None | Some(Value::Null) => Err(AuthError::MissingCredential),
        Some(Value::String(token)) if token.is_empty() => Err(AuthError::MissingCredential),
        Some(Value::String(token)) => Ok(token),
        Some(_) => Err(AuthError::InvalidCredential(format!(
            "{TOKEN_FIELD} is not a string"
        ))),
    }
}

/// クライアントタイムスタンプ（エポックミリ秒）を取り出す
///
/// 数値または数値文字列を受け付ける。0・非数値・欠落は「無し」として扱う。
/// `true` はエポック1ミリ秒として扱うため必ず期限切れになる。
fn client_timestamp_ms(body: &Value) -> Option<f64> {
    let raw = match body.get(TIMESTAMP_FIELD)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(true) => 1.0,
        _ => return None,
    };
    (raw.is_finite() && raw != 0.0).then_some(raw)
}

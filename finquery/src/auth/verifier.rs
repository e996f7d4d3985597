//! クレデンシャル検証器
//!
//! ゲートは検証を [`CredentialVerifier`] に委譲する。実装は2種類:
//! - [`JwtCredentialVerifier`]: 設定された鍵でVC-JWTの署名を検証（jsonwebtoken）
//! - [`HttpCredentialVerifier`]: 外部の検証サービスへ転送

use crate::common::error::CommonError;
use crate::config::{VerificationKey, VerifierConfig};
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// 検証エラー
#[derive(Debug, Error)]
pub enum VerifyError {
    /// トークンの形式不正
    #[error("Malformed credential: {0}")]
    Malformed(String),

    /// 署名・発行者等の検証に失敗
    #[error("Credential rejected: {0}")]
    Rejected(String),

    /// 検証サービスに到達できない
    #[error("Verifier unavailable: {0}")]
    Unavailable(String),

    /// 検証鍵が不正
    #[error("Invalid verification key: {0}")]
    Key(String),
}

/// 検証成功時に得られるクレーム
#[derive(Debug, Clone, Default)]
pub struct CredentialClaims {
    /// `credentialSubject`（存在しない場合は `None`）
    pub subject: Option<Value>,
}

/// クレデンシャル検証の抽象化 trait
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// トークンを検証し、クレームを返す
    async fn verify(&self, token: &str) -> Result<CredentialClaims, VerifyError>;
}

#[derive(Debug, Deserialize)]
struct VcJwtClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    vc: Option<VcBody>,
}

#[derive(Debug, Deserialize)]
struct VcBody {
    #[serde(rename = "credentialSubject", default)]
    credential_subject: Option<Value>,
}

/// VC-JWT検証器
pub struct JwtCredentialVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtCredentialVerifier {
    /// HS256共有シークレットで検証する
    pub fn from_secret(secret: &str) -> Self {
        Self::with_key(
            DecodingKey::from_secret(secret.as_bytes()),
            Algorithm::HS256,
        )
    }

    /// 公開鍵PEMで検証する（Ed25519 → P-256 → RSA の順に判別）
    pub fn from_public_key_pem(pem: &[u8]) -> Result<Self, VerifyError> {
        if let Ok(key) = DecodingKey::from_ed_pem(pem) {
            return Ok(Self::with_key(key, Algorithm::EdDSA));
        }
        if let Ok(key) = DecodingKey::from_ec_pem(pem) {
            return Ok(Self::with_key(key, Algorithm::ES256));
        }
        DecodingKey::from_rsa_pem(pem)
            .map(|key| Self::with_key(key, Algorithm::RS256))
            .map_err(|e| VerifyError::Key(e.to_string()))
    }

    fn with_key(key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // VC-JWTは exp を持たないことがある（持つ場合は検証される）
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        Self { key, validation }
    }

    /// 発行者（`iss`）を固定する
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }
}

#[async_trait]
impl CredentialVerifier for JwtCredentialVerifier {
    async fn verify(&self, token: &str) -> Result<CredentialClaims, VerifyError> {
        let data = decode::<VcJwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => VerifyError::Malformed(e.to_string()),
                _ => VerifyError::Rejected(e.to_string()),
            }
        })?;

        let claims = data.claims;
        let subject = claims
            .vc
            .and_then(|vc| vc.credential_subject)
            .map(|subject| fill_subject_id(subject, claims.sub.as_deref()));
        Ok(CredentialClaims { subject })
    }
}

/// VC-JWTの `sub` は `credentialSubject.id` に対応する
fn fill_subject_id(mut subject: Value, sub: Option<&str>) -> Value {
    if let (Value::Object(map), Some(sub)) = (&mut subject, sub) {
        if !map.is_empty() && !map.contains_key("id") {
            map.insert("id".to_string(), Value::String(sub.to_string()));
        }
    }
    subject
}

/// 外部検証サービスのレスポンス
#[derive(Debug, Deserialize)]
struct RemoteVerification {
    #[serde(rename = "credentialSubject", default)]
    credential_subject: Option<Value>,
}

/// 外部検証サービスへ委譲する検証器
///
/// `POST <url>` に `{"vcJwt": token}` を送り、2xxで `{"credentialSubject": {...}}` を期待する。
pub struct HttpCredentialVerifier {
    client: reqwest::Client,
    url: String,
}

impl HttpCredentialVerifier {
    /// 新しい検証器を作成する
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerifyError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CredentialVerifier for HttpCredentialVerifier {
    async fn verify(&self, token: &str) -> Result<CredentialClaims, VerifyError> {
        let res = self
            .client
            .post(&self.url)
            .json(&json!({ "vcJwt": token }))
            .send()
            .await
            .map_err(|e| VerifyError::Unavailable(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(VerifyError::Rejected(format!(
                "verification service responded with {}",
                status.as_u16()
            )));
        }

        let body: RemoteVerification = res
            .json()
            .await
            .map_err(|e| VerifyError::Malformed(e.to_string()))?;
        Ok(CredentialClaims {
            subject: body.credential_subject,
        })
    }
}

/// 設定から検証器を構築する
pub fn build_verifier(config: &VerifierConfig) -> Result<Arc<dyn CredentialVerifier>, CommonError> {
    match config {
        VerifierConfig::Remote { url, timeout } => {
            tracing::info!(url = %url, "Using remote credential verification service");
            let verifier = HttpCredentialVerifier::new(url.clone(), *timeout)
                .map_err(|e| CommonError::Config(e.to_string()))?;
            Ok(Arc::new(verifier))
        }
        VerifierConfig::Jwt { key, issuer } => {
            let verifier = match key {
                VerificationKey::Secret(secret) => JwtCredentialVerifier::from_secret(secret),
                VerificationKey::PublicKeyPem(pem) => {
                    JwtCredentialVerifier::from_public_key_pem(pem.as_bytes())
                        .map_err(|e| CommonError::Config(e.to_string()))?
                }
            };
            let verifier = match issuer {
                Some(issuer) => verifier.with_issuer(issuer),
                None => verifier,
            };
            tracing::info!("Using local VC-JWT credential verification");
            Ok(Arc::new(verifier))
        }
    }
}

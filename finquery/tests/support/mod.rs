//! 契約テスト用の共通ヘルパー

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use finquery::{
    api,
    auth::{verifier::JwtCredentialVerifier, CredentialVerifier},
    config::{AnswerProviderConfig, CorsConfig, GatewayConfig, StockProviderConfig},
    providers::{HttpStockQuoteProvider, OpenAiAnswerProvider},
    AppState,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// テスト用VC-JWTの署名シークレット
pub const VC_SECRET: &str = "contract-test-secret";

/// テストゲートウェイの構成
#[derive(Default)]
pub struct GatewayOptions {
    pub verifier: Option<Arc<dyn CredentialVerifier>>,
    pub log_path: Option<PathBuf>,
    pub client_url: Option<String>,
    pub expose_error_details: bool,
}

/// wiremockの回答・株価プロバイダに接続したテスト用アプリ
pub struct TestGateway {
    pub app: Router,
    pub log_path: PathBuf,
    pub answers: MockServer,
    pub quotes: MockServer,
    pub dir: TempDir,
}

impl TestGateway {
    pub async fn start() -> Self {
        Self::start_with(GatewayOptions::default()).await
    }

    pub async fn start_with(options: GatewayOptions) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let answers = MockServer::start().await;
        let quotes = MockServer::start().await;
        let log_path = options
            .log_path
            .unwrap_or_else(|| dir.path().join("logs").join("queries.log"));

        let config = GatewayConfig {
            log_file: log_path.clone(),
            expose_error_details: options.expose_error_details,
            cors: CorsConfig {
                client_url: options.client_url,
            },
            answer_provider: AnswerProviderConfig {
                api_key: Some("sk-test".to_string()),
                model: "gpt-test".to_string(),
                base_url: format!("{}/v1", answers.uri()),
                timeout: Duration::from_secs(5),
            },
            stock_provider: StockProviderConfig {
                base_url: Some(format!("{}/v8/finance/chart", quotes.uri())),
                timeout: Duration::from_secs(5),
            },
        };

        let verifier = options
            .verifier
            .unwrap_or_else(|| Arc::new(JwtCredentialVerifier::from_secret(VC_SECRET)));
        let answer_provider = Arc::new(
            OpenAiAnswerProvider::new(config.answer_provider.clone()).expect("answer provider"),
        );
        let stock_provider = Arc::new(
            HttpStockQuoteProvider::new(config.stock_provider.clone()).expect("stock provider"),
        );
        let state = AppState::new(config, verifier, answer_provider, stock_provider);

        Self {
            app: api::create_app(state),
            log_path,
            answers,
            quotes,
            dir,
        }
    }

    /// リクエストを送信し、ステータス・ヘッダー・JSONボディを返す
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let res = self.app.clone().oneshot(request).await.expect("oneshot");
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    /// 回答プロバイダが常に `content` を返すようにする
    pub async fn mock_answer(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-contract",
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            })))
            .mount(&self.answers)
            .await;
    }

    /// 質問ログを生テキストで読む（未作成なら `None`）
    pub fn raw_log(&self) -> Option<String> {
        std::fs::read_to_string(&self.log_path).ok()
    }
}

/// `vc.credentialSubject` を持つHS256署名のVC-JWTを作成する
pub fn vc_token(subject: Value) -> String {
    vc_token_signed(subject, VC_SECRET)
}

pub fn vc_token_signed(subject: Value, secret: &str) -> String {
    let claims = json!({
        "iss": "did:example:issuer",
        "sub": "did:example:holder",
        "vc": {
            "type": ["VerifiableCredential", "MembershipCredential"],
            "credentialSubject": subject,
        }
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("encode vc-jwt")
}

/// 有効なサブジェクトを持つトークン
pub fn member_token() -> String {
    vc_token(json!({ "id": "did:example:holder", "membership": "gold" }))
}

/// 現在時刻（エポックミリ秒）
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

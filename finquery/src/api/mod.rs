//! REST APIハンドラー
//!
//! 公開ルート（`/test`, `/chat`）と、クレデンシャルゲート配下の保護ルート
//! （`/finance`, `/log`, `/stock`）を提供する。

pub mod chat;
pub mod error;
pub mod finance;
pub mod logs;
pub mod stock;
pub mod system;

use crate::auth::middleware::{credential_gate_middleware, MAX_BODY_BYTES};
use crate::common::error::GatewayError;
use crate::config::CorsConfig;
use error::AppError;
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Uri},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// APIルーターを作成
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/finance", post(finance::finance_question))
        .route("/log", get(logs::get_logs).delete(logs::clear_logs))
        .route("/stock", post(stock::stock_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            credential_gate_middleware,
        ));

    let open = Router::new()
        .route("/test", post(system::hello))
        .route("/chat", post(chat::chat_question));

    Router::new()
        .merge(open)
        .merge(protected)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORSレイヤーを作成
///
/// `client_url` が設定されていればそのオリジンのみクレデンシャル付きで許可し、
/// 未設定なら任意オリジンをクレデンシャル無しで許可する。
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    match cors.client_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        Some(Err(e)) => {
            tracing::warn!("Invalid client URL for CORS, allowing any origin: {}", e);
            base.allow_origin(Any)
        }
        None => base.allow_origin(Any),
    }
}

async fn not_found(uri: Uri) -> AppError {
    AppError::new(GatewayError::NotFound(uri.path().to_string()))
}

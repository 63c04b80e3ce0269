use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use claude_proxy_types::ProxyConfig;
use std::sync::Arc;
use tower_http::compression::predicate::{NotForContentType, Predicate, SizeAbove};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::proxy::handlers;
use crate::proxy::upstream::UpstreamProvider;

/// Request bodies above this are rejected with 413.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
/// Responses smaller than this are sent uncompressed.
const MIN_COMPRESS_BYTES: u16 = 1000;

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Arc<dyn UpstreamProvider>,
}

impl AppState {
    pub fn new(config: ProxyConfig, upstream: Arc<dyn UpstreamProvider>) -> Self {
        Self { config: Arc::new(config), upstream }
    }
}

/// `/health` is public; everything under `/v1` requires the bearer token.
pub fn build_proxy_router(state: AppState) -> Router {
    let compress_when = SizeAbove::new(MIN_COMPRESS_BYTES)
        .and(NotForContentType::GRPC)
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::SSE);

    let api = Router::new()
        .route("/v1/models", get(handlers::openai::handle_list_models))
        .route("/v1/chat/completions", post(handlers::openai::handle_chat_completions))
        .route_layer(axum::middleware::from_fn_with_state(
            state.config.clone(),
            crate::proxy::middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::handle_health))
        .merge(api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new().compress_when(compress_when))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use santalink_core::{SantalinkError, TokenStore};
use santalink_tokens::{TokenIssuer, TokenRedeemer};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Issues new tokens.
    pub issuer: Arc<TokenIssuer>,
    /// Redeems tokens, at most once each.
    pub redeemer: Arc<TokenRedeemer>,
    /// Store handle for health checks.
    pub store: Arc<dyn TokenStore>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    /// Assemble gateway state around a store handle.
    ///
    /// The store must already be initialized; the gateway never calls
    /// `initialize` itself.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            issuer: Arc::new(TokenIssuer::new(store.clone())),
            redeemer: Arc::new(TokenRedeemer::new(store.clone())),
            store,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors ServerConfig from santalink-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// Exposed separately from [`start_server`] so tests can drive it with
/// `tower::ServiceExt::oneshot` without binding a socket. Cross-origin
/// access is permitted on all routes; possession of a token is the only
/// access control this service has.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/tokens", post(handlers::post_tokens))
        .route("/v1/tokens/batch", post(handlers::post_tokens_batch))
        .route("/v1/redeem", get(handlers::get_redeem))
        .route("/health", get(handlers::get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves:
/// - POST /v1/tokens
/// - POST /v1/tokens/batch
/// - GET /v1/redeem
/// - GET /health
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), SantalinkError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SantalinkError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| SantalinkError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use santalink_storage::MemoryTokenStore;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        build_router(GatewayState::new(store))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn issue_then_redeem_round_trip() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(post_json("/v1/tokens", r#"{"gifter":"alice","giftee":"bob"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = body_json(response).await["token"].as_str().unwrap().to_string();
        assert!(!token.is_empty());

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/redeem?token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["gifter"], "alice");
        assert_eq!(json["giftee"], "bob");

        // Second redemption: 403, pairing withheld.
        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/redeem?token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["error"], "token already used");
        assert!(json.get("gifter").is_none());
    }

    #[tokio::test]
    async fn redeem_without_token_is_bad_request() {
        for uri in ["/v1/redeem", "/v1/redeem?token="] {
            let response = test_router()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert!(json["error"].as_str().unwrap().contains("token"));
        }
    }

    #[tokio::test]
    async fn redeem_unknown_token_is_not_found() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/v1/redeem?token=nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "token not found");
    }

    #[tokio::test]
    async fn issue_with_malformed_body_is_bad_request() {
        let response = test_router()
            .oneshot(post_json("/v1/tokens", r#"{"gifter":"alice"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn batch_issue_returns_token_per_pair() {
        let router = test_router();
        let body = r#"{"pairs":[
            {"gifter":"alice","giftee":"bob"},
            {"gifter":"bob","giftee":"alice"}
        ]}"#;

        let response = router
            .clone()
            .oneshot(post_json("/v1/tokens/batch", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let tokens = json["tokens"].as_array().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0]["gifter"], "alice");
        assert_eq!(tokens[1]["giftee"], "alice");

        // Each batch token is independently redeemable, once.
        let token = tokens[0]["token"].as_str().unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/redeem?token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn cors_allows_cross_origin_callers() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }
}

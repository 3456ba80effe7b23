// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/tokens, POST /v1/tokens/batch, GET /v1/redeem,
//! GET /health. Domain errors are mapped to HTTP statuses exactly once,
//! in [`ApiError`]'s `IntoResponse` impl.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use santalink_core::{HealthStatus, IssuedToken, SantalinkError};

use crate::server::GatewayState;

/// Request body for POST /v1/tokens.
#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    /// Identifier of the gift-giver.
    pub gifter: String,
    /// Identifier of the gift-receiver.
    pub giftee: String,
}

/// Response body for POST /v1/tokens.
#[derive(Debug, Serialize)]
pub struct IssueResponse {
    /// The freshly issued single-use token.
    pub token: String,
}

/// Request body for POST /v1/tokens/batch.
#[derive(Debug, Deserialize)]
pub struct BatchIssueRequest {
    /// One entry per pairing to issue a token for.
    pub pairs: Vec<IssueRequest>,
}

/// Response body for POST /v1/tokens/batch.
#[derive(Debug, Serialize)]
pub struct BatchIssueResponse {
    /// Issued tokens, in the same order as the request pairs.
    pub tokens: Vec<IssuedToken>,
}

/// Query parameters for GET /v1/redeem.
#[derive(Debug, Deserialize)]
pub struct RedeemParams {
    /// The token to redeem. Absence is an invalid request, not a 404.
    #[serde(default)]
    pub token: Option<String>,
}

/// Response body for GET /v1/redeem.
#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub gifter: String,
    pub giftee: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// Error response body. Every failure renders as `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Gateway-side wrapper mapping domain errors to transport statuses.
#[derive(Debug)]
pub struct ApiError(pub SantalinkError);

impl From<SantalinkError> for ApiError {
    fn from(err: SantalinkError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SantalinkError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SantalinkError::TokenNotFound => (StatusCode::NOT_FOUND, "token not found".into()),
            // PreconditionFailed is normally absorbed by the redeemer; if it
            // escapes, the caller-facing meaning is the same.
            SantalinkError::TokenAlreadyUsed | SantalinkError::PreconditionFailed => {
                (StatusCode::FORBIDDEN, "token already used".into())
            }
            SantalinkError::StoreUnavailable { source } => {
                // Store error shapes stay out of response bodies.
                error!(error = %source, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".into())
            }
            SantalinkError::Config(msg) | SantalinkError::Internal(msg) => {
                error!(error = %msg, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".into())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// POST /v1/tokens
///
/// Issues a single-use token for one gifter/giftee pair.
pub async fn post_tokens(
    State(state): State<GatewayState>,
    body: Result<Json<IssueRequest>, JsonRejection>,
) -> Result<Json<IssueResponse>, ApiError> {
    let Json(body) = body
        .map_err(|e| SantalinkError::InvalidRequest(format!("malformed body: {e}")))?;

    let token = state.issuer.issue(&body.gifter, &body.giftee).await?;
    Ok(Json(IssueResponse { token }))
}

/// POST /v1/tokens/batch
///
/// Issues one token per provided pair, for handing a whole group its links
/// in one round trip.
pub async fn post_tokens_batch(
    State(state): State<GatewayState>,
    body: Result<Json<BatchIssueRequest>, JsonRejection>,
) -> Result<Json<BatchIssueResponse>, ApiError> {
    let Json(body) = body
        .map_err(|e| SantalinkError::InvalidRequest(format!("malformed body: {e}")))?;

    let pairs: Vec<(String, String)> = body
        .pairs
        .into_iter()
        .map(|p| (p.gifter, p.giftee))
        .collect();
    let tokens = state.issuer.issue_batch(&pairs).await?;
    Ok(Json(BatchIssueResponse { tokens }))
}

/// GET /v1/redeem?token=...
///
/// Reveals the pairing behind a token, at most once per token.
pub async fn get_redeem(
    State(state): State<GatewayState>,
    Query(params): Query<RedeemParams>,
) -> Result<Json<RedeemResponse>, ApiError> {
    let token = params.token.unwrap_or_default();
    let pairing = state.redeemer.redeem(&token).await?;
    Ok(Json(RedeemResponse {
        gifter: pairing.gifter,
        giftee: pairing.giftee,
    }))
}

/// GET /health
///
/// Reports gateway and store health for process supervision.
pub async fn get_health(
    State(state): State<GatewayState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let status = match state.store.health_check().await? {
        HealthStatus::Healthy => "ok".to_string(),
        HealthStatus::Degraded(detail) => {
            return Err(SantalinkError::Internal(format!("store degraded: {detail}")).into());
        }
        HealthStatus::Unhealthy(detail) => {
            return Err(SantalinkError::Internal(format!("store unhealthy: {detail}")).into());
        }
    };

    Ok(Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_request_deserializes() {
        let json = r#"{"gifter": "alice", "giftee": "bob"}"#;
        let req: IssueRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.gifter, "alice");
        assert_eq!(req.giftee, "bob");
    }

    #[test]
    fn issue_request_rejects_missing_fields() {
        let result: Result<IssueRequest, _> = serde_json::from_str(r#"{"gifter": "alice"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn redeem_params_tolerate_missing_token() {
        let params: RedeemParams = serde_json::from_str("{}").unwrap();
        assert!(params.token.is_none());
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "token already used".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"token already used"}"#);
    }

    #[test]
    fn api_error_maps_domain_errors_to_statuses() {
        let cases = [
            (
                ApiError(SantalinkError::InvalidRequest("token is required".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError(SantalinkError::TokenNotFound), StatusCode::NOT_FOUND),
            (ApiError(SantalinkError::TokenAlreadyUsed), StatusCode::FORBIDDEN),
            (
                ApiError(SantalinkError::PreconditionFailed),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError(SantalinkError::store(std::io::Error::other("s3 is down"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}

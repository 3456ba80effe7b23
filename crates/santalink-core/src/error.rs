// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Santalink token service.

use thiserror::Error;

/// The primary error type used across the token store, domain operations,
/// and the HTTP gateway.
///
/// Store-level failures are wrapped into [`SantalinkError::StoreUnavailable`]
/// at the store boundary; no backend error shape crosses into the domain or
/// gateway layers. The gateway maps each variant to an HTTP status exactly
/// once, in its `IntoResponse` impl.
#[derive(Debug, Error)]
pub enum SantalinkError {
    /// Configuration errors (invalid TOML, unknown backend, bad bind address).
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or malformed request input (empty token, malformed body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No token record exists at the given key.
    #[error("token not found")]
    TokenNotFound,

    /// The token record exists but has already been redeemed.
    /// The pairing is never disclosed alongside this error.
    #[error("token already used")]
    TokenAlreadyUsed,

    /// A conditional write found the stored status changed underneath it,
    /// i.e. a concurrent redemption won the race. The redeemer maps this to
    /// [`SantalinkError::TokenAlreadyUsed`] before it reaches the gateway.
    #[error("store precondition failed")]
    PreconditionFailed,

    /// Underlying store I/O failure (transient infrastructure fault).
    /// Safe to retry: issue generates a fresh token each time, redeem is
    /// idempotent up to its first success.
    #[error("store unavailable: {source}")]
    StoreUnavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SantalinkError {
    /// Wrap an arbitrary backend error as a store-unavailable failure.
    pub fn store<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StoreUnavailable {
            source: Box::new(source),
        }
    }
}

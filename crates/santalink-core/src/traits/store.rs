// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token store trait for persistence backends (SQLite, in-memory).

use async_trait::async_trait;

use crate::error::SantalinkError;
use crate::types::{HealthStatus, TokenRecord, TokenStatus};

/// Key-value persistence collaborator holding token records, keyed by the
/// token string.
///
/// Backends own all persisted state; the issuer and redeemer hold only
/// transient in-memory copies during a single request. Implementations must
/// be safe to share across concurrent requests behind an `Arc`.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Human-readable backend name (`"sqlite"`, `"memory"`).
    fn name(&self) -> &str;

    /// Initializes the backend (connections, migrations). Must be called
    /// once before any other operation.
    async fn initialize(&self) -> Result<(), SantalinkError>;

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, SantalinkError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), SantalinkError>;

    /// Fetch the record stored under `token`, or `None` if absent.
    async fn get(&self, token: &str) -> Result<Option<TokenRecord>, SantalinkError>;

    /// Unconditionally write `record` under its token key, creating or
    /// overwriting. Token identifiers are drawn from a 128-bit space, so
    /// an overwrite of an existing key is not checked for.
    async fn put(&self, record: &TokenRecord) -> Result<(), SantalinkError>;

    /// Write `record` only if the currently stored status equals `expected`.
    ///
    /// Fails with [`SantalinkError::PreconditionFailed`] when the stored
    /// status differs or the record is missing. This is the primitive that
    /// makes the unused -> used transition race-free: of any number of
    /// concurrent redemptions, exactly one conditional write succeeds.
    async fn put_if_status(
        &self,
        record: &TokenRecord,
        expected: TokenStatus,
    ) -> Result<(), SantalinkError>;
}

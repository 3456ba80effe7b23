// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token redemption: reveals a pairing at most once per token.

use std::sync::Arc;

use tracing::{info, warn};

use santalink_core::{Pairing, SantalinkError, TokenStatus, TokenStore};

/// Redeems tokens, transitioning them `unused -> used` exactly once.
///
/// The state machine is read -> check -> conditional write -> respond. The
/// pairing is only returned after the store durably reflects `used`, so a
/// caller who sees success can act on the pairing knowing no later attempt
/// will see it again. The conditional write is what makes the guarantee hold
/// under concurrent redemptions of the same token.
pub struct TokenRedeemer {
    store: Arc<dyn TokenStore>,
}

impl TokenRedeemer {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Redeem `token`, returning its pairing iff this call wins the
    /// unused -> used transition.
    ///
    /// Failures:
    /// - blank token: [`SantalinkError::InvalidRequest`], store untouched
    /// - unknown token: [`SantalinkError::TokenNotFound`]
    /// - already redeemed (or lost the race): [`SantalinkError::TokenAlreadyUsed`]
    /// - store I/O: [`SantalinkError::StoreUnavailable`]; the stored status
    ///   is presumed unchanged, so the legitimate caller may safely retry
    pub async fn redeem(&self, token: &str) -> Result<Pairing, SantalinkError> {
        if token.trim().is_empty() {
            return Err(SantalinkError::InvalidRequest("token is required".into()));
        }

        let record = self
            .store
            .get(token)
            .await?
            .ok_or(SantalinkError::TokenNotFound)?;

        if record.status == TokenStatus::Used {
            info!(token = %token, "rejected redemption of used token");
            return Err(SantalinkError::TokenAlreadyUsed);
        }

        // Transition before responding. On a lost race the stored status has
        // already moved to used, which for the caller is the same outcome as
        // arriving late.
        match self.store.put_if_status(&record.used(), TokenStatus::Unused).await {
            Ok(()) => {
                info!(token = %token, "token redeemed");
                Ok(record.pairing())
            }
            Err(SantalinkError::PreconditionFailed) => {
                warn!(token = %token, "lost redemption race");
                Err(SantalinkError::TokenAlreadyUsed)
            }
            Err(e) => Err(e),
        }
    }
}

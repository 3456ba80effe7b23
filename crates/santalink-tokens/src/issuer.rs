// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token issuance: creates records in the `unused` state.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use santalink_core::{IssuedToken, SantalinkError, TokenRecord, TokenStore};

/// Issues single-use lookup tokens for gifter/giftee pairs.
///
/// The store handle is injected at construction; the issuer holds no other
/// state and is safe to share across requests.
pub struct TokenIssuer {
    store: Arc<dyn TokenStore>,
}

impl TokenIssuer {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Issue a token for one pairing and return it.
    ///
    /// The write is an unconditional create: identifiers are 128-bit random,
    /// so collisions are not checked for. A store failure surfaces as
    /// [`SantalinkError::StoreUnavailable`] and leaves no partial state;
    /// retrying simply issues a fresh token.
    pub async fn issue(&self, gifter: &str, giftee: &str) -> Result<String, SantalinkError> {
        let token = generate_token();
        let record = TokenRecord::new(token.clone(), gifter, giftee);

        self.store.put(&record).await?;
        info!(token = %token, "issued token");
        Ok(token)
    }

    /// Issue one token per provided pair.
    ///
    /// Pairs are caller-provided; this performs no assignment logic. Writes
    /// happen sequentially and the first failure aborts the batch -- already
    /// written tokens remain valid but are not reported to the caller, who
    /// is expected to retry the whole batch with fresh pairs.
    pub async fn issue_batch(
        &self,
        pairs: &[(String, String)],
    ) -> Result<Vec<IssuedToken>, SantalinkError> {
        let mut issued = Vec::with_capacity(pairs.len());
        for (gifter, giftee) in pairs {
            let token = self.issue(gifter, giftee).await?;
            issued.push(IssuedToken {
                gifter: gifter.clone(),
                giftee: giftee.clone(),
                token,
            });
        }
        Ok(issued)
    }
}

/// Generate a fresh token identifier: a UUID v4 rendered without hyphens.
fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

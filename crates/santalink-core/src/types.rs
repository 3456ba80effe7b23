// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types for the Santalink token service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a token record.
///
/// The only legal transition is `Unused -> Used`, exactly once, never
/// reversed. Serialized lowercase to match the stored JSON format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TokenStatus {
    Unused,
    Used,
}

/// A single token record, the sole persisted entity.
///
/// The `token` field doubles as the store key. `gifter` and `giftee` are
/// opaque to this system; nothing validates or interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Opaque unique identifier, generated at issue time.
    pub token: String,
    /// Identifier of the gift-giver.
    pub gifter: String,
    /// Identifier of the gift-receiver.
    pub giftee: String,
    /// Current lifecycle state.
    pub status: TokenStatus,
}

impl TokenRecord {
    /// Create a fresh record in the `Unused` state.
    pub fn new(
        token: impl Into<String>,
        gifter: impl Into<String>,
        giftee: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            gifter: gifter.into(),
            giftee: giftee.into(),
            status: TokenStatus::Unused,
        }
    }

    /// Return a copy of this record transitioned to `Used`.
    ///
    /// Only the status changes; the pairing is immutable for the lifetime
    /// of the record.
    pub fn used(&self) -> Self {
        Self {
            status: TokenStatus::Used,
            ..self.clone()
        }
    }

    /// The pairing this record grants access to.
    pub fn pairing(&self) -> Pairing {
        Pairing {
            gifter: self.gifter.clone(),
            giftee: self.giftee.clone(),
        }
    }
}

/// The (gifter, giftee) tuple revealed by a successful redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub gifter: String,
    pub giftee: String,
}

/// A freshly issued token together with the pair it was issued for.
///
/// Returned by batch issuance so callers can hand each participant their
/// own link without re-correlating tokens to pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub gifter: String,
    pub giftee: String,
    pub token: String,
}

/// Result of a store health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Store is fully operational.
    Healthy,
    /// Store is reachable but experiencing issues.
    Degraded(String),
    /// Store is not operational.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TokenStatus::Unused).unwrap(),
            "\"unused\""
        );
        assert_eq!(
            serde_json::to_string(&TokenStatus::Used).unwrap(),
            "\"used\""
        );
    }

    #[test]
    fn status_parses_from_stored_text() {
        assert_eq!(TokenStatus::from_str("unused").unwrap(), TokenStatus::Unused);
        assert_eq!(TokenStatus::from_str("used").unwrap(), TokenStatus::Used);
        assert!(TokenStatus::from_str("expired").is_err());
    }

    #[test]
    fn new_record_starts_unused() {
        let record = TokenRecord::new("tok", "alice", "bob");
        assert_eq!(record.status, TokenStatus::Unused);
        assert_eq!(record.gifter, "alice");
        assert_eq!(record.giftee, "bob");
    }

    #[test]
    fn used_changes_only_status() {
        let record = TokenRecord::new("tok", "alice", "bob");
        let used = record.used();
        assert_eq!(used.status, TokenStatus::Used);
        assert_eq!(used.token, record.token);
        assert_eq!(used.pairing(), record.pairing());
    }
}

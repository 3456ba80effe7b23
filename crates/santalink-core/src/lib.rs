// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Santalink token service.
//!
//! This crate provides the domain types, error taxonomy, and the
//! [`TokenStore`] trait that storage backends implement. The domain and
//! gateway crates depend only on what is defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SantalinkError;
pub use traits::TokenStore;
pub use types::{HealthStatus, IssuedToken, Pairing, TokenRecord, TokenStatus};

// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token lifecycle domain logic for the Santalink token service.
//!
//! Two components over an injected [`santalink_core::TokenStore`]:
//!
//! - [`TokenIssuer`] creates token records in the `unused` state.
//! - [`TokenRedeemer`] reveals a pairing at most once per token, using the
//!   store's conditional write for the unused -> used transition.

pub mod issuer;
pub mod redeemer;

pub use issuer::TokenIssuer;
pub use redeemer::TokenRedeemer;

// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions implemented by storage backends.

mod store;

pub use store::TokenStore;

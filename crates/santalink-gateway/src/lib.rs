// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Santalink token service.
//!
//! A thin trigger layer: request/response DTOs, the error-to-status mapping,
//! and the axum router. All domain decisions live in `santalink-tokens`.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, build_router, start_server};

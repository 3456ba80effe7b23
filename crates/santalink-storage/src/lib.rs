// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token store backends for the Santalink token service.
//!
//! Provides WAL-mode SQLite storage with embedded migrations and a
//! single-writer concurrency model via `tokio-rusqlite`, plus an in-memory
//! backend for tests and ephemeral deployments. Both implement the
//! [`santalink_core::TokenStore`] trait; the conditional-write primitive
//! `put_if_status` is what makes the unused -> used transition race-free.

pub mod database;
pub mod memory;
pub mod migrations;
pub mod queries;
pub mod sqlite;

pub use database::Database;
pub use memory::MemoryTokenStore;
pub use sqlite::SqliteTokenStore;

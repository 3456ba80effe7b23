// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Santalink token service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Santalink configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SantalinkConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token store backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Token store backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Backend to use: `"sqlite"` (durable) or `"memory"` (ephemeral).
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Path to the SQLite database file. Ignored by the memory backend.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode for the SQLite backend.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_database_path() -> String {
    "santalink.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

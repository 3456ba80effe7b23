// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./santalink.toml` >
//! `~/.config/santalink/santalink.toml` > `/etc/santalink/santalink.toml`
//! with environment variable overrides via the `SANTALINK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SantalinkConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/santalink/santalink.toml` (system-wide)
/// 3. `~/.config/santalink/santalink.toml` (user XDG config)
/// 4. `./santalink.toml` (local directory)
/// 5. `SANTALINK_*` environment variables
pub fn load_config() -> Result<SantalinkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SantalinkConfig::default()))
        .merge(Toml::file("/etc/santalink/santalink.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("santalink/santalink.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("santalink.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SantalinkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SantalinkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SantalinkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SantalinkConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SANTALINK_STORAGE_DATABASE_PATH` must
/// map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("SANTALINK_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: SANTALINK_SERVER_LOG_LEVEL -> "server_log_level"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

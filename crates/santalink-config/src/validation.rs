// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and known backend names.

use crate::diagnostic::ConfigError;
use crate::model::SantalinkConfig;

/// Backends a [`crate::model::StorageConfig`] may name.
pub const KNOWN_BACKENDS: &[&str] = &["sqlite", "memory"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SantalinkConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate server.host is not empty and looks like an IP or hostname
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must not be 0".to_string(),
        });
    }

    // Validate backend names a compiled-in store
    if !KNOWN_BACKENDS.contains(&config.storage.backend.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "storage.backend `{}` is not one of: {}",
                config.storage.backend,
                KNOWN_BACKENDS.join(", ")
            ),
        });
    }

    // Validate database_path is not empty when sqlite is selected
    if config.storage.backend == "sqlite" && config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SantalinkConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = SantalinkConfig::default();
        config.server.host = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("server.host")));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = SantalinkConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let mut config = SantalinkConfig::default();
        config.storage.backend = "dynamodb".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("dynamodb")));
    }

    #[test]
    fn memory_backend_ignores_empty_database_path() {
        let mut config = SantalinkConfig::default();
        config.storage.backend = "memory".to_string();
        config.storage.database_path = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = SantalinkConfig::default();
        config.server.host = String::new();
        config.server.port = 0;
        config.storage.backend = "s3".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (pool capacity, ports)
//! - Detect the primary and overflow listeners colliding
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("pool.capacity must be at least 1")]
    ZeroPoolCapacity,

    #[error("overflow.port must be non-zero")]
    ZeroOverflowPort,

    #[error("overflow.port {0} collides with the primary listener port")]
    OverflowPortCollision(u16),

    #[error("storage.root must not be empty")]
    EmptyStorageRoot,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listen_port = match config.listener.bind_address.parse::<SocketAddr>() {
        Ok(addr) => Some(addr.port()),
        Err(_) => {
            errors.push(ValidationError::InvalidBindAddress(
                config.listener.bind_address.clone(),
            ));
            None
        }
    };

    if config.pool.capacity == 0 {
        errors.push(ValidationError::ZeroPoolCapacity);
    }

    if config.overflow.port == 0 {
        errors.push(ValidationError::ZeroOverflowPort);
    } else if listen_port == Some(config.overflow.port) {
        errors.push(ValidationError::OverflowPortCollision(config.overflow.port));
    }

    if config.storage.root.is_empty() {
        errors.push(ValidationError::EmptyStorageRoot);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.pool.capacity = 0;
        config.storage.root = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_overflow_port_collision() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:9000".into();
        config.overflow.port = 9000;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::OverflowPortCollision(9000)]
        ));
    }

    #[test]
    fn test_zero_overflow_port_rejected() {
        let mut config = ServerConfig::default();
        config.overflow.port = 0;
        assert!(validate_config(&config).is_err());
    }
}

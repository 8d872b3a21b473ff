//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the file
//! server. All types derive Serde traits for deserialization from config
//! files. The schema describes a *primary* deployment; a secondary instance
//! is constructed in-process with an explicit role, never from its own file.

use serde::{Deserialize, Serialize};

/// Root configuration for the file server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Worker pool sizing.
    pub pool: PoolConfig,

    /// Overflow escalation settings for the primary instance.
    pub overflow: OverflowConfig,

    /// Storage backend settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address for the primary listener (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of concurrent local-handling slots. The escalation threshold
    /// is half this value (integer division).
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { capacity: 8 }
    }
}

/// Overflow escalation configuration.
///
/// The secondary instance listens on `port` at the same host the primary is
/// bound to. It is constructed with escalation disabled, so there is never
/// more than one hop of proxying.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverflowConfig {
    /// Port the dynamically-spawned secondary instance will listen on.
    pub port: u16,
}

impl Default for OverflowConfig {
    fn default() -> Self {
        Self { port: 8081 }
    }
}

/// Storage backend configuration.
///
/// The root is shared by the primary and the secondary it spawns; pointing
/// two deployments at different roots is how isolation would be configured.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for the path-addressable byte store.
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: "server_storage".to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Address the metrics endpoint binds to.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.pool.capacity, 8);
        assert_eq!(config.overflow.port, 8081);
        assert_eq!(config.storage.root, "server_storage");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [pool]
            capacity = 32

            [overflow]
            port = 9090
            "#,
        )
        .unwrap();

        assert_eq!(config.pool.capacity, 32);
        assert_eq!(config.overflow.port, 9090);
        // Untouched sections keep their defaults.
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.root, "server_storage");
    }
}

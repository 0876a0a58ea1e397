// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `DATA_DIR` | Root directory for the store and mirror file | `./data` |
//! | `PUBLIC_DIR` | Root directory for documents, photos, QR images | `./public` |
//! | `RPC_URL` | EVM JSON-RPC endpoint | `http://127.0.0.1:7545` |
//! | `REGISTRY_ADDRESS` | Deployed registry contract address | Required |
//! | `ISSUER_PRIVATE_KEY` | Hex private key of the issuing account | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the public file directory path.
pub const PUBLIC_DIR_ENV: &str = "PUBLIC_DIR";

/// Typed runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Root directory for the embedded database and JSON mirror.
    pub data_dir: PathBuf,
    /// Root directory for uploaded documents, photos, and QR images.
    pub public_dir: PathBuf,
    /// EVM JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Deployed registry contract address (0x + 40 hex chars).
    pub registry_address: String,
    /// Hex-encoded private key of the issuing account.
    pub issuer_private_key: String,
}

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    ///
    /// The registry address and issuer key have no defaults: the service
    /// refuses to start without a contract to write to.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_raw = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port: u16 = port_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port_raw,
        })?;

        let data_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let public_dir = std::env::var(PUBLIC_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public"));

        let rpc_url =
            std::env::var("RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:7545".to_string());
        let registry_address =
            std::env::var("REGISTRY_ADDRESS").map_err(|_| ConfigError::Missing("REGISTRY_ADDRESS"))?;
        let issuer_private_key = std::env::var("ISSUER_PRIVATE_KEY")
            .map_err(|_| ConfigError::Missing("ISSUER_PRIVATE_KEY"))?;

        Ok(Self {
            host,
            port,
            data_dir,
            public_dir,
            rpc_url,
            registry_address,
            issuer_private_key,
        })
    }
}

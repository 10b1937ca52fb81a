//! Configuration management for geoserve.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `GEOSERVE_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use geoserve::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//! config.validate()?;
//!
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `GEOSERVE_HOST` - Server bind address (default: 0.0.0.0)
//! - `GEOSERVE_PORT` - Server port (default: 3000)
//! - `GEOSERVE_UPLOAD_DIR` - Directory uploads are stored in (default: uploads)
//! - `GEOSERVE_MAX_UPLOAD_SIZE` - Maximum upload size in bytes (default: 50 MiB)
//! - `GEOSERVE_AUTH_ENABLED` - Mount the `/auth` routes (default: true)
//! - `GEOSERVE_AUTH_SECRET` - HMAC secret for bearer tokens
//! - `GEOSERVE_TOKEN_TTL` - Token lifetime in seconds (default: 86400)
//! - `GEOSERVE_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::time::Duration;

use clap::Parser;

use crate::account::DEFAULT_TOKEN_TTL;
use crate::server::{RouterConfig, DEFAULT_MAX_UPLOAD_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default upload directory.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Longest accepted bearer token lifetime in seconds (10 years).
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

// =============================================================================
// CLI Arguments
// =============================================================================

/// geoserve - distances, geodata uploads and accounts over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "geoserve")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "GEOSERVE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "GEOSERVE_PORT")]
    pub port: u16,

    // =========================================================================
    // Upload Configuration
    // =========================================================================
    /// Directory uploaded files are written to and served from.
    #[arg(long, default_value = DEFAULT_UPLOAD_DIR, env = "GEOSERVE_UPLOAD_DIR")]
    pub upload_dir: String,

    /// Maximum upload size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE, env = "GEOSERVE_MAX_UPLOAD_SIZE")]
    pub max_upload_size: usize,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Enable the account routes under /auth.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "GEOSERVE_AUTH_ENABLED")]
    pub auth_enabled: bool,

    /// Secret key for signing bearer tokens and credential digests.
    ///
    /// Required when auth is enabled.
    #[arg(long, env = "GEOSERVE_AUTH_SECRET")]
    pub auth_secret: Option<String>,

    /// Bearer token lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_TOKEN_TTL.as_secs(), env = "GEOSERVE_TOKEN_TTL")]
    pub token_ttl: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "GEOSERVE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth_enabled && self.auth_secret.as_deref().unwrap_or("").is_empty() {
            return Err(
                "Authentication is enabled but no secret provided. \
                 Set --auth-secret or GEOSERVE_AUTH_SECRET, or disable auth with --auth-enabled=false"
                    .to_string(),
            );
        }

        if self.upload_dir.trim().is_empty() {
            return Err("upload_dir must not be empty".to_string());
        }

        if self.max_upload_size == 0 {
            return Err("max_upload_size must be greater than 0".to_string());
        }

        if self.token_ttl == 0 {
            return Err("token_ttl must be greater than 0".to_string());
        }

        if self.token_ttl > MAX_TOKEN_TTL_SECS {
            return Err(format!(
                "token_ttl must be at most {} seconds",
                MAX_TOKEN_TTL_SECS
            ));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the auth secret, or an empty string if unset (call validate() first).
    pub fn auth_secret_or_empty(&self) -> &str {
        self.auth_secret.as_deref().unwrap_or("")
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl)
    }

    /// Build the router configuration from these settings.
    pub fn router_config(&self) -> RouterConfig {
        let mut router_config = RouterConfig::new()
            .with_max_upload_size(self.max_upload_size)
            .with_tracing(!self.no_tracing);

        if let Some(ref origins) = self.cors_origins {
            router_config = router_config.with_cors_origins(origins.clone());
        }

        router_config
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Configuration management for Batchpress.
//!
//! Supports command-line arguments via clap, environment variables with a
//! `BATCHPRESS_` prefix, and sensible defaults for all optional settings.
//!
//! # Environment Variables
//!
//! - `BATCHPRESS_HOST` - Server bind address (default: 0.0.0.0)
//! - `BATCHPRESS_PORT` - Server port (default: 8000)
//! - `BATCHPRESS_AUTH_TOKEN` - Shared secret for bearer auth (required)
//! - `BATCHPRESS_AVIFENC_BIN` - Path to the avifenc binary (default: avifenc)
//! - `BATCHPRESS_AVIF_MIN_QUANTIZER` - avifenc --min value (default: 40)
//! - `BATCHPRESS_AVIF_MAX_QUANTIZER` - avifenc --max value (default: 60)
//! - `BATCHPRESS_ENCODE_TIMEOUT` - Per-invocation encoder deadline in seconds (default: 60)
//! - `BATCHPRESS_MAX_UPLOAD_BYTES` - Request body cap (default: 100MB)
//! - `BATCHPRESS_CORS_ORIGINS` - Comma-separated origin allowlist (default: any)

use std::path::PathBuf;

use clap::Parser;

use crate::convert::{DEFAULT_AVIF_MAX_QUANTIZER, DEFAULT_AVIF_MIN_QUANTIZER};
use crate::server::DEFAULT_MAX_UPLOAD_BYTES;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default encoder deadline in seconds.
pub const DEFAULT_ENCODE_TIMEOUT_SECS: u64 = 60;

/// Highest quantizer value avifenc accepts.
const MAX_QUANTIZER_VALUE: u8 = 63;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Batchpress - A batch image conversion server.
///
/// Accepts multipart image uploads over HTTP and returns a ZIP archive of
/// the same images transcoded to WEBP or AVIF.
#[derive(Parser, Debug, Clone)]
#[command(name = "batchpress")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "BATCHPRESS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "BATCHPRESS_PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Shared secret compared against the Authorization bearer token.
    #[arg(long, env = "BATCHPRESS_AUTH_TOKEN")]
    pub auth_token: String,

    // =========================================================================
    // Encoder Configuration
    // =========================================================================
    /// Path to the external AVIF encoder binary.
    #[arg(long, default_value = "avifenc", env = "BATCHPRESS_AVIFENC_BIN")]
    pub avifenc_bin: PathBuf,

    /// Lower quantizer bound passed to avifenc (--min).
    #[arg(long, default_value_t = DEFAULT_AVIF_MIN_QUANTIZER, env = "BATCHPRESS_AVIF_MIN_QUANTIZER")]
    pub avif_min_quantizer: u8,

    /// Upper quantizer bound passed to avifenc (--max).
    #[arg(long, default_value_t = DEFAULT_AVIF_MAX_QUANTIZER, env = "BATCHPRESS_AVIF_MAX_QUANTIZER")]
    pub avif_max_quantizer: u8,

    /// Deadline in seconds for one external encoder invocation.
    #[arg(long, default_value_t = DEFAULT_ENCODE_TIMEOUT_SECS, env = "BATCHPRESS_ENCODE_TIMEOUT")]
    pub encode_timeout: u64,

    // =========================================================================
    // Upload Configuration
    // =========================================================================
    /// Maximum accepted request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "BATCHPRESS_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "BATCHPRESS_CORS_ORIGINS", value_delimiter = ',')]
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
        if self.auth_token.is_empty() {
            return Err(
                "Auth token must not be empty. Set --auth-token or BATCHPRESS_AUTH_TOKEN"
                    .to_string(),
            );
        }

        if self.avif_min_quantizer > MAX_QUANTIZER_VALUE
            || self.avif_max_quantizer > MAX_QUANTIZER_VALUE
        {
            return Err(format!(
                "Quantizer values must be between 0 and {}",
                MAX_QUANTIZER_VALUE
            ));
        }

        if self.avif_min_quantizer > self.avif_max_quantizer {
            return Err("avif_min_quantizer must not exceed avif_max_quantizer".to_string());
        }

        if self.encode_timeout == 0 {
            return Err("encode_timeout must be greater than 0".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================

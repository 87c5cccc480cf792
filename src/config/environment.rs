// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sitekit_core::constants::media;
use std::env;
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::{info, warn};

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/sitekit.db";

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational (default)
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string; bare paths are treated as SQLite files
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str.trim_start_matches("//")),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Pool size for file-backed databases
    pub max_connections: u32,
}

/// Bearer token settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Tokens granted the admin role
    #[serde(skip_serializing)]
    pub admin_tokens: Vec<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_tokens", &format!("[{} redacted]", self.admin_tokens.len()))
            .finish()
    }
}

/// Media upload processing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Long-edge bound for image downscaling
    pub max_dimension: u32,
    /// JPEG re-encode quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: media::MAX_UPLOAD_BYTES,
            max_dimension: media::MAX_IMAGE_DIMENSION,
            jpeg_quality: media::JPEG_QUALITY,
        }
    }
}

/// Cross-origin settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// CORS allowed origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: IpAddr,
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Media processing configuration
    pub media: MediaConfig,
    /// Security settings
    pub security: SecurityConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            host: env_var_or("HOST", "0.0.0.0")
                .parse()
                .context("Invalid HOST value")?,
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)),
                max_connections: env_var_or("DATABASE_MAX_CONNECTIONS", "5")
                    .parse()
                    .context("Invalid DATABASE_MAX_CONNECTIONS value")?,
            },
            auth: AuthConfig {
                admin_tokens: parse_list(&env_var_or("SITEKIT_ADMIN_TOKENS", "")),
            },
            media: MediaConfig {
                max_upload_bytes: env_var_or(
                    "MEDIA_MAX_UPLOAD_BYTES",
                    &media::MAX_UPLOAD_BYTES.to_string(),
                )
                .parse()
                .context("Invalid MEDIA_MAX_UPLOAD_BYTES value")?,
                max_dimension: env_var_or(
                    "MEDIA_MAX_DIMENSION",
                    &media::MAX_IMAGE_DIMENSION.to_string(),
                )
                .parse()
                .context("Invalid MEDIA_MAX_DIMENSION value")?,
                jpeg_quality: env_var_or("MEDIA_JPEG_QUALITY", &media::JPEG_QUALITY.to_string())
                    .parse()
                    .context("Invalid MEDIA_JPEG_QUALITY value")?,
            },
            security: SecurityConfig {
                cors_origins: parse_list(&env_var_or("CORS_ALLOWED_ORIGINS", "")),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error for values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.media.jpeg_quality == 0 || self.media.jpeg_quality > 100 {
            return Err(anyhow::anyhow!("MEDIA_JPEG_QUALITY must be between 1 and 100"));
        }
        if self.media.max_dimension == 0 {
            return Err(anyhow::anyhow!("MEDIA_MAX_DIMENSION must be positive"));
        }
        if self.auth.admin_tokens.is_empty() {
            warn!("SITEKIT_ADMIN_TOKENS is empty: every privileged request will be rejected");
        }
        if self.environment.is_production() && self.database.url.is_memory() {
            warn!("In-memory database configured in production: data will not persist");
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Sitekit Server Configuration:\n\
             - Bind: {}:{}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Admin Tokens: {}\n\
             - Media: max {} bytes, {}px long edge, JPEG q{}\n\
             - CORS Origins: {}",
            self.host,
            self.http_port,
            self.environment,
            self.log_level,
            self.database.url,
            self.auth.admin_tokens.len(),
            self.media.max_upload_bytes,
            self.media.max_dimension,
            self.media.jpeg_quality,
            if self.security.cors_origins.is_empty() {
                "any".to_owned()
            } else {
                self.security.cors_origins.join(", ")
            },
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            http_port: DEFAULT_HTTP_PORT,
            log_level: LogLevel::default(),
            environment: Environment::default(),
            database: DatabaseConfig {
                url: DatabaseUrl::default(),
                max_connections: 5,
            },
            auth: AuthConfig::default(),
            media: MediaConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Read an environment variable with a default
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a comma-separated list, dropping blanks
pub(crate) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

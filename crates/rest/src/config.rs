//! Server configuration for the patients API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PATIENTS_SERVER_PORT` | 8080 | Server port |
//! | `PATIENTS_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `PATIENTS_LOG_LEVEL` | info | Log level |
//! | `PATIENTS_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `PATIENTS_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `PATIENTS_ENABLE_CORS` | true | Enable CORS |
//! | `PATIENTS_CORS_ORIGINS` | * | Allowed origins |
//! | `PATIENTS_CORS_METHODS` | GET,POST,PUT,PATCH,DELETE,OPTIONS | Allowed methods |
//! | `PATIENTS_CORS_HEADERS` | Content-Type,Accept,If-Match,If-None-Match,X-Principal | Allowed headers |
//! | `PATIENTS_BASE_URL` | http://localhost:8080 | Server base URL |
//! | `PATIENTS_DATABASE_URL` | patients.db | SQLite database path (`:memory:` allowed) |
//! | `PATIENTS_ENABLE_REQUEST_ID` | true | Set and propagate `x-request-id` |
//! | `PATIENTS_DEFAULT_PRINCIPAL` | System | Principal recorded when a request names none |
//! | `PATIENTS_DEFAULT_PAGE_SIZE` | 10 | Page size for non-positive `pageSize` |
//! | `PATIENTS_MAX_PAGE_SIZE` | 100 | Upper bound for `pageSize` |
//!
//! # Example
//!
//! ```rust
//! use patients_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! ```

use clap::Parser;

const DEFAULT_CORS_HEADERS: &str = "Content-Type,Accept,If-Match,If-None-Match,X-Principal";

/// Server configuration for the patients API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "patients-server")]
#[command(about = "Patient records API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "PATIENTS_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "PATIENTS_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "PATIENTS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "PATIENTS_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "PATIENTS_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "PATIENTS_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "PATIENTS_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "PATIENTS_CORS_METHODS",
        default_value = "GET,POST,PUT,PATCH,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "PATIENTS_CORS_HEADERS", default_value = DEFAULT_CORS_HEADERS)]
    pub cors_headers: String,

    /// Base URL for the server (used in Location headers).
    #[arg(long, env = "PATIENTS_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "PATIENTS_DATABASE_URL", default_value = "patients.db")]
    pub database_url: String,

    /// Enable request ID tracking.
    #[arg(long, env = "PATIENTS_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// Principal recorded in the audit log when a request carries no X-Principal header.
    #[arg(long, env = "PATIENTS_DEFAULT_PRINCIPAL", default_value = "System")]
    pub default_principal: String,

    /// Page size used when a list request asks for a non-positive size.
    #[arg(long, env = "PATIENTS_DEFAULT_PAGE_SIZE", default_value = "10")]
    pub default_page_size: i64,

    /// Maximum page size for list results.
    #[arg(long, env = "PATIENTS_MAX_PAGE_SIZE", default_value = "100")]
    pub max_page_size: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,PATCH,DELETE,OPTIONS".to_string(),
            cors_headers: DEFAULT_CORS_HEADERS.to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: "patients.db".to_string(),
            enable_request_id: true,
            default_principal: "System".to_string(),
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse_from(["patients-server"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.database_url.trim().is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        if self.default_principal.trim().is_empty() {
            errors.push("Default principal cannot be empty".to_string());
        }

        if self.default_page_size <= 0 {
            errors.push("Default page size must be positive".to_string());
        }

        if self.max_page_size <= 0 {
            errors.push("Max page size must be positive".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, an in-memory database, and disables
    /// features that might interfere with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            max_body_size: 1024 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: ":memory:".to_string(),
            enable_request_id: false,
            default_principal: "test-runner".to_string(),
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

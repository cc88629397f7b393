//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (CORPUS_GATEWAY_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [gateway]
//! query_timeout_secs = 180
//! default_batch = 20
//! app_name = "bhsa"
//!
//! [kernel]
//! url = "http://127.0.0.1:18981"
//!
//! [interface]
//! showGraphics = true
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! CORPUS_GATEWAY_GATEWAY__QUERY_TIMEOUT_SECS=60
//! CORPUS_GATEWAY_KERNEL__URL=http://kernel:18981
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub kernel: KernelConfig,
    #[serde(default)]
    pub interface: InterfaceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Query execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Wall-clock limit for searches and CSV materialization
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    /// Results per page when a request does not say
    #[serde(default = "default_batch")]
    pub default_batch: usize,

    /// Page links kept on either side of the current page (0 = all)
    #[serde(default = "default_page_window")]
    pub page_window: usize,

    /// Used in export titles and archive file names
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl GatewayConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            query_timeout_secs: default_query_timeout_secs(),
            default_batch: default_batch(),
            page_window: default_page_window(),
            app_name: default_app_name(),
        }
    }
}

/// Remote Kernel connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Base URL of the Kernel service
    #[serde(default = "default_kernel_url")]
    pub url: String,

    /// Transport timeout per Kernel request in seconds. 0 = none.
    #[serde(default)]
    pub request_timeout_secs: u64,
}

impl KernelConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            url: default_kernel_url(),
            request_timeout_secs: 0,
        }
    }
}

/// Interface option defaults merged into every request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceConfig {
    pub defaults: BTreeMap<String, serde_json::Value>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Serve the HTTP API
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// HTTP server bind address
    #[serde(default = "default_http_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub port: u16,

    /// Allowed CORS origins (empty = same-origin only, unless cors_allow_all is true)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Explicitly allow all CORS origins (dev mode opt-in)
    #[serde(default)]
    pub cors_allow_all: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            enabled: true,
            host: default_http_host(),
            port: default_http_port(),
            cors_origins: Vec::new(),
            cors_allow_all: false,
        }
    }
}

// Default value functions
fn default_query_timeout_secs() -> u64 {
    180
}
fn default_batch() -> usize {
    20
}
fn default_page_window() -> usize {
    5
}
fn default_app_name() -> String {
    "corpus".to_string()
}
fn default_kernel_url() -> String {
    "http://127.0.0.1:18981".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_http_host() -> String {
    "127.0.0.1".to_string()
}
fn default_http_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. config.toml (base configuration)
    /// 2. config.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (CORPUS_GATEWAY_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed("CORPUS_GATEWAY_").split("__"))
            .extract::<Config>()?
            .validated()
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("CORPUS_GATEWAY_").split("__"))
            .extract::<Config>()?
            .validated()
    }

    /// Rejects a zero query timeout.
    fn validated(self) -> Result<Self, figment::Error> {
        if self.gateway.query_timeout_secs == 0 {
            return Err(figment::Error::from(
                "gateway.query_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

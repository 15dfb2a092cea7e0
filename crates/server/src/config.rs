use phash_service::{HashConfig, PipelineConfig, DEFAULT_HASH_SIZE};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whole-request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Download timeout in seconds; unset means no timeout
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// Maximum request body size in KB; unset means no limit
    #[serde(default)]
    pub max_body_size_kb: Option<usize>,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Directory for downloaded images; system temp dir when unset
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Side of the perceptual hash grid
    #[serde(default = "default_hash_size")]
    pub hash_size: u32,

    /// User-Agent sent when downloading images
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            request_timeout_secs: None,
            fetch_timeout_secs: None,
            max_body_size_kb: None,
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            scratch_dir: None,
            hash_size: default_hash_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("PHASH_SERVER").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        if config.hash_size == 0 {
            anyhow::bail!("hash_size must be at least 1");
        }
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Get max body size in bytes, if limited
    pub fn max_body_size(&self) -> Option<usize> {
        self.max_body_size_kb.map(|kb| kb * 1024)
    }

    /// Pipeline settings derived from this config
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            scratch_dir: self.scratch_dir.clone(),
            hash: HashConfig {
                hash_size: self.hash_size,
            },
            fetch_timeout: self.fetch_timeout_secs.map(Duration::from_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_hash_size() -> u32 {
    DEFAULT_HASH_SIZE
}

fn default_user_agent() -> String {
    format!("phash-server/{}", env!("CARGO_PKG_VERSION"))
}

use anyhow::anyhow;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_RPC_ADDR: &str = "127.0.0.1:8081";
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_RPC_MAX_IN_FLIGHT: u32 = 64;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP/JSON listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Binary RPC listener.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_bind")]
    pub bind: String,
    /// Concurrent requests served per connection.
    #[serde(default = "default_rpc_max_in_flight")]
    pub max_in_flight: u32,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { bind: default_rpc_bind(), max_in_flight: default_rpc_max_in_flight() }
    }
}

fn default_rpc_bind() -> String { DEFAULT_RPC_ADDR.to_string() }

fn default_rpc_max_in_flight() -> u32 { DEFAULT_RPC_MAX_IN_FLIGHT }

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Upper bound for every storage call and every RPC request.
    #[serde(default = "default_call_timeout")]
    pub call_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { call_timeout_ms: default_call_timeout() }
    }
}

fn default_call_timeout() -> u64 { DEFAULT_CALL_TIMEOUT_MS }

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Database,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub url: String,
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Load a TOML config file; a missing file yields the defaults.
/// Unreadable or malformed files are errors.
pub fn load_optional(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).with_context(|| format!("parsing {path}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow::Error::new(e).context(format!("reading {path}"))),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), fall back to defaults when the
    /// file is missing, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_optional(&config_path())?;
        cfg.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("MAILGATE_HTTP_ADDR") {
            if let Some((host, port)) = addr.rsplit_once(':') {
                if let Ok(port) = port.parse::<u16>() {
                    if !host.is_empty() {
                        self.server.host = host.to_string();
                    }
                    self.server.port = port;
                }
            }
        }
        if let Ok(addr) = std::env::var("MAILGATE_RPC_ADDR") {
            self.rpc.bind = addr;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Ok(backend) = std::env::var("MAILGATE_STORAGE") {
            match backend.to_lowercase().as_str() {
                "database" | "db" => self.storage.backend = StorageBackend::Database,
                "memory" => self.storage.backend = StorageBackend::Memory,
                _ => {}
            }
        }
        self.storage.normalize_from_env();
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.rpc.normalize()?;
        self.gateway.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway.call_timeout_ms)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl RpcConfig {
    fn normalize(&mut self) -> Result<()> {
        let bind = self.bind.trim();
        if bind.is_empty() {
            self.bind = default_rpc_bind();
            return Ok(());
        }
        // ":8081" binds every interface on the given port
        if let Some(port) = bind.strip_prefix(':') {
            self.bind = format!("0.0.0.0:{port}");
        } else {
            self.bind = bind.to_string();
        }
        let (_, port) = self
            .bind
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("rpc.bind must be host:port, got {}", self.bind))?;
        port.parse::<u16>()
            .map_err(|_| anyhow!("rpc.bind has an invalid port: {}", self.bind))?;
        if self.max_in_flight == 0 {
            return Err(anyhow!("rpc.max_in_flight must be at least 1"));
        }
        Ok(())
    }
}

impl GatewayConfig {
    fn validate(&self) -> Result<()> {
        if self.call_timeout_ms == 0 {
            return Err(anyhow!("gateway.call_timeout_ms must be a positive number of milliseconds"));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::Memory {
            return Ok(());
        }
        if self.url.trim().is_empty() {
            return Err(anyhow!("storage.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("storage.url must start with postgres://, postgresql:// or sqlite:"));
        }
        Ok(())
    }
}

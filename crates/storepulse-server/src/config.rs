use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Volatile in-process store, for development and tests
    Mem,
    /// SQLite file store
    Sqlite,
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Sqlite
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request deadline enforced at the router boundary
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub search_log: SearchLogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite database path; `~` expands to the home directory
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_false")]
    pub log_sql_queries: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLogConfig {
    /// Queued search records before enqueueing starts dropping
    #[serde(default = "default_search_log_buffer")]
    pub buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            search_log: SearchLogConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_sql_queries: false,
        }
    }
}

impl Default for SearchLogConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_search_log_buffer(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("STOREPULSE_STORE_BACKEND") {
            match val.to_lowercase().as_str() {
                "mem" => self.store.backend = StoreBackend::Mem,
                "sqlite" => self.store.backend = StoreBackend::Sqlite,
                _ => eprintln!(
                    "Warning: Invalid STOREPULSE_STORE_BACKEND '{}', keeping current setting",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("STOREPULSE_STORE_PATH") {
            self.store.path = val;
        }

        if let Ok(val) = std::env::var("STOREPULSE_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Ok(val) = std::env::var("STOREPULSE_PORT") {
            if let Ok(port) = val.parse::<u16>() {
                self.port = port;
            } else {
                eprintln!("Warning: Invalid STOREPULSE_PORT '{}', keeping current setting", val);
            }
        }

        if let Ok(val) = std::env::var("STOREPULSE_HOST") {
            self.host = val;
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_store_path() -> String {
    "~/.storepulse/storepulse.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_search_log_buffer() -> usize {
    1024
}

fn default_false() -> bool {
    false
}

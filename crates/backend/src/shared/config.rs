use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub webhooks: WebhooksConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Размер чанка импорта (строк на одну транзакцию)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Количество воркеров, обрабатывающих задачи импорта
    #[serde(default = "default_workers")]
    pub workers: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhooksConfig {
    /// Таймаут одной доставки вебхука
    #[serde(default = "default_webhook_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProgressConfig {
    /// Время жизни снимка прогресса в хранилище
    #[serde(default = "default_retention")]
    pub retention_seconds: u64,
    /// Интервал опроса хранилища для SSE потока
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "target/db/app.db".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_workers() -> usize {
    2
}

fn default_webhook_timeout() -> u64 {
    10
}

fn default_retention() -> u64 {
    3600
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            workers: default_workers(),
        }
    }
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_webhook_timeout(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            retention_seconds: default_retention(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[database]
path = "target/db/app.db"

[import]
chunk_size = 1000
workers = 2

[webhooks]
timeout_seconds = 10

[progress]
retention_seconds = 3600
poll_interval_ms = 1000
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    // If absolute path, use as is
    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    // If relative path, resolve it relative to the executable directory
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(db_path);
            return Ok(resolved_path);
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.import.chunk_size, 1000);
        assert_eq!(config.webhooks.timeout_seconds, 10);
        assert_eq!(config.progress.retention_seconds, 3600);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [import]
            chunk_size = 500
        "#,
        )
        .unwrap();
        assert_eq!(config.import.chunk_size, 500);
        assert_eq!(config.import.workers, 2);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.progress.poll_interval_ms, 1000);
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
    }
}

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_USERS_FILE: &str = "users.json";
const DEFAULT_WORKER_THREADS: usize = 4;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: DEFAULT_PORT, worker_threads: Some(DEFAULT_WORKER_THREADS) }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { users_file: default_users_file() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_users_file() -> PathBuf { PathBuf::from(DEFAULT_USERS_FILE) }
fn default_log_format() -> String { "compact".to_string() }

/// Load `$CONFIG_PATH` (or `config.toml`). Fails if the file is absent.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, defaults otherwise, then process env overrides.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        let vars: HashMap<String, String> = std::env::vars().collect();
        cfg.apply_env(&vars)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply `PORT`, `HOST`, `USERS_FILE`, `LOG_FORMAT` and
    /// `TOKIO_WORKER_THREADS` on top of the file values.
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(port) = vars.get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("PORT must be an integer in 1..=65535, got {port:?}"))?;
        }
        if let Some(host) = vars.get("HOST") {
            self.server.host = host.clone();
        }
        if let Some(path) = vars.get("USERS_FILE") {
            self.storage.users_file = PathBuf::from(path);
        }
        if let Some(format) = vars.get("LOG_FORMAT") {
            self.logging.format = format.clone();
        }
        if let Some(w) = vars.get("TOKIO_WORKER_THREADS") {
            let threads = w
                .trim()
                .parse()
                .map_err(|_| anyhow!("TOKIO_WORKER_THREADS must be a positive integer, got {w:?}"))?;
            self.server.worker_threads = Some(threads);
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// `host:port` string suitable for `SocketAddr` parsing.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = DEFAULT_HOST.to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(DEFAULT_WORKER_THREADS),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.users_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.users_file must not be empty"));
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        match self.format.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" | "json" => Ok(()),
            other => Err(anyhow!("logging.format must be compact or json, got {other:?}")),
        }
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_bind_all_interfaces_on_5000() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
        assert_eq!(cfg.storage.users_file, PathBuf::from("users.json"));
    }

    #[test]
    fn port_env_overrides_file() -> Result<()> {
        let mut cfg: AppConfig = toml::from_str("[server]\nport = 8080\n")?;
        cfg.apply_env(&vars(&[("PORT", "7000"), ("USERS_FILE", "/tmp/u.json")]))?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.users_file, PathBuf::from("/tmp/u.json"));
        Ok(())
    }

    #[test]
    fn invalid_port_env_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(&vars(&[("PORT", "abc")])).is_err());
        assert!(cfg.apply_env(&vars(&[("PORT", "70000")])).is_err());
        cfg.apply_env(&vars(&[("PORT", "0")])).unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn invalid_worker_threads_env_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(&vars(&[("TOKIO_WORKER_THREADS", "four")])).is_err());
        assert!(cfg.apply_env(&vars(&[("TOKIO_WORKER_THREADS", "-2")])).is_err());
        assert_eq!(cfg.server.worker_threads, Some(DEFAULT_WORKER_THREADS));
        cfg.apply_env(&vars(&[("TOKIO_WORKER_THREADS", " 7 ")])).unwrap();
        assert_eq!(cfg.server.worker_threads, Some(7));
    }

    #[test]
    fn normalizes_blank_host_and_zero_workers() -> Result<()> {
        let mut cfg: AppConfig =
            toml::from_str("[server]\nhost = \" \"\nport = 5001\nworker_threads = 0\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, DEFAULT_HOST);
        assert_eq!(cfg.server.worker_threads, Some(4));
        Ok(())
    }

    #[test]
    fn rejects_unknown_log_format() -> Result<()> {
        let mut cfg: AppConfig = toml::from_str("[logging]\nformat = \"xml\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = std::env::temp_dir().join(format!("no_such_{}.toml", uuid::Uuid::new_v4()));
        let err = load_from_file(path.to_str().unwrap()).unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn loads_full_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("cfg_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[server]\nhost = \"127.0.0.1\"\nport = 9000\n[storage]\nusers_file = \"data/users.json\"\n[logging]\nformat = \"json\"\n",
        )?;
        let cfg = load_from_file(path.to_str().unwrap())?;
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.storage.users_file, PathBuf::from("data/users.json"));
        assert_eq!(cfg.logging.format, "json");
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}

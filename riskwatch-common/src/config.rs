//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default bind port for the web module
pub const DEFAULT_PORT: u16 = 5710;

/// Runtime configuration for the web module
///
/// Resolution priority for every value:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (`RISKWATCH_*`)
/// 3. TOML config file
/// 4. Compiled default (fallback)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite database file location
    pub database_path: PathBuf,
    /// The single administrator account (compared case-insensitively)
    pub admin_email: String,
    /// Base URL of the inference endpoints; domain paths are appended
    pub inference_base_url: String,
    /// IP geolocation service URL
    pub geoip_url: String,
}

/// Optional CLI overrides passed down from the binary's argument parser
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub admin_email: Option<String>,
    pub inference_base_url: Option<String>,
}

impl Config {
    /// Load configuration with the standard resolution order
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let file = load_config_file().unwrap_or_default();

        let port = overrides
            .port
            .or_else(|| env_var("RISKWATCH_PORT").and_then(|v| v.parse().ok()))
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let host = env_var("RISKWATCH_HOST")
            .or(file.host)
            .unwrap_or_else(|| "127.0.0.1".to_string());

        let database_path = overrides
            .database
            .or_else(|| env_var("RISKWATCH_DATABASE").map(PathBuf::from))
            .or(file.database.map(PathBuf::from))
            .unwrap_or_else(default_database_path);

        let admin_email = overrides
            .admin_email
            .or_else(|| env_var("RISKWATCH_ADMIN_EMAIL"))
            .or(file.admin_email)
            .unwrap_or_else(|| "admin@riskwatch.local".to_string());

        let inference_base_url = overrides
            .inference_base_url
            .or_else(|| env_var("RISKWATCH_INFERENCE_URL"))
            .or(file.inference_base_url)
            .unwrap_or_else(|| "https://models.riskwatch.local".to_string());

        let geoip_url = env_var("RISKWATCH_GEOIP_URL")
            .or(file.geoip_url)
            .unwrap_or_else(|| "https://ipapi.co/json/".to_string());

        Ok(Self {
            host,
            port,
            database_path,
            admin_email,
            inference_base_url,
            geoip_url,
        })
    }

    /// Socket address to bind the HTTP listener to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address: {}", e)))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Values readable from the TOML config file
#[derive(Debug, Default, serde::Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
    admin_email: Option<String>,
    inference_base_url: Option<String>,
    geoip_url: Option<String>,
}

/// Read the platform config file if one exists
///
/// Linux checks `~/.config/riskwatch/config.toml` then
/// `/etc/riskwatch/config.toml`; macOS and Windows use the platform config
/// directory. A missing or unparseable file is not an error - later tiers
/// supply the values.
fn load_config_file() -> Option<FileConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
            None
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("riskwatch").join("config.toml")) {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/riskwatch/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("riskwatch"))
        .unwrap_or_else(|| PathBuf::from("./riskwatch_data"))
        .join("riskwatch.db")
}

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    listen_addr: Option<String>,
    log_dir: Option<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl ServerConfig {
    /// Layered load: optional TOML file, overridden by environment
    /// variables. `DATABASE_URL` is the only required key.
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let file_config: PartialServerConfig = if let Some(path_str) = config_path {
            let path = Path::new(path_str);
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            } else {
                PartialServerConfig::default()
            }
        } else {
            PartialServerConfig::default()
        };

        let env_config = PartialServerConfig {
            database_url: env::var("DATABASE_URL").ok(),
            listen_addr: env::var("LISTEN_ADDR").ok(),
            log_dir: env::var("LOG_DIR").ok(),
        };

        Ok(ServerConfig {
            database_url: env_config
                .database_url
                .or(file_config.database_url)
                .ok_or("DATABASE_URL is required")?,
            listen_addr: env_config
                .listen_addr
                .or(file_config.listen_addr)
                .unwrap_or_else(default_listen_addr),
            log_dir: env_config
                .log_dir
                .or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
        })
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default = "default_banner")]
    pub banner: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            database: DatabaseConfig::default(),
            banner: default_banner(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub sqlite: SqliteConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
        }
    }
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_filename() -> String {
    "database.sqlite".to_string()
}

fn default_banner() -> String {
    "BD4.1 CW - SQL Queries & async/await".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Loads `path` if given, otherwise starts from the defaults, then
    /// applies the `PORT` environment variable.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.set_port(std::env::var("PORT").ok());
        Ok(config)
    }

    /// Overrides the listen port. Empty values are ignored.
    pub fn set_port(&mut self, port: Option<String>) {
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            self.listen.port = port.trim().to_string();
        }
    }

    pub fn get_database_path(&self) -> &str {
        &self.database.sqlite.filename
    }

    pub fn listen_addr(&self) -> String {
        let address = self.listen.address.as_deref().unwrap_or("[::]");
        format!("{}:{}", address, self.listen.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

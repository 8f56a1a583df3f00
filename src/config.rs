use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH, ENV_PREFIX};

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Section {section} not found in the {path} file")]
    MissingSection { section: String, path: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Application configuration loaded from the `[db]` and `[server]` sections
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
}

/// `[db]` section
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// SQLite file holding all tables
    pub database: PathBuf,
    /// Optional DDL script replacing the bundled schema
    #[serde(default)]
    pub schema: Option<PathBuf>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Master secret for the session cookie key. A random key is used when unset.
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_environment() -> String {
    "development".to_string()
}

impl Config {
    /// Load configuration from the file named by `PERMITS_CONFIG`
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Load configuration from a TOML file, overlaid by `PERMITS_*` variables
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let figment = figment_for(path);

        Ok(Config {
            db: extract_section(&figment, path, "db")?,
            server: extract_section(&figment, path, "server")?,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Read one section as a plain option -> value mapping
pub fn section(path: impl AsRef<Path>, name: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let path = path.as_ref();
    let figment = figment_for(path);
    let raw: BTreeMap<String, serde_json::Value> = extract_section(&figment, path, name)?;

    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

fn extract_section<T: DeserializeOwned>(
    figment: &Figment,
    path: &Path,
    name: &str,
) -> Result<T, ConfigError> {
    if !figment.contains(name) {
        return Err(ConfigError::MissingSection {
            section: name.to_string(),
            path: path.display().to_string(),
        });
    }

    Ok(figment.extract_inner(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
[db]
database = "data/permits.db"
schema = "schema.sql"

[server]
host = "0.0.0.0"
port = 8080
secret_key = "not-so-secret"
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.db.database, PathBuf::from("data/permits.db"));
        assert_eq!(config.db.schema, Some(PathBuf::from("schema.sql")));
        assert_eq!(config.db.max_connections, 5);
        assert_eq!(config.server_address(), "0.0.0.0:8080");
        assert_eq!(config.server.secret_key.as_deref(), Some("not-so-secret"));
        assert_eq!(config.server.environment, "development");
    }

    #[test]
    fn test_server_defaults() {
        let file = write_config(
            r#"
[db]
database = "permits.db"

[server]
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server_address(), "127.0.0.1:5000");
        assert!(config.server.secret_key.is_none());
        assert!(config.db.schema.is_none());
    }

    #[test]
    fn test_missing_section() {
        let file = write_config(
            r#"
[db]
database = "permits.db"
"#,
        );

        match Config::load(file.path()) {
            Err(ConfigError::MissingSection { section, .. }) => assert_eq!(section, "server"),
            other => panic!("expected missing section error, got {:?}", other),
        }
    }

    #[test]
    fn test_section_mapping() {
        let file = write_config(
            r#"
[server]
host = "localhost"
port = 5000
"#,
        );

        let server = section(file.path(), "server").unwrap();
        assert_eq!(server.get("host").map(String::as_str), Some("localhost"));
        assert_eq!(server.get("port").map(String::as_str), Some("5000"));

        assert!(matches!(
            section(file.path(), "db"),
            Err(ConfigError::MissingSection { .. })
        ));
    }
}

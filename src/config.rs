use crate::cli::Cli;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Main configuration combining server and storage settings.
///
/// Can be loaded from files, env vars, or CLI args with precedence order:
/// CLI > File > Environment > Defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage backend settings.
///
/// `backend` is a raw selector string; it is interpreted (and rejected when
/// unsupported) by the `StorageProvider`, not here. Empty means "use the
/// default backend".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("POKEDEX_HOST") {
            config.server.host = host;
        }

        if let Ok(port_str) = std::env::var("POKEDEX_PORT") {
            if let Ok(port) = port_str.parse() {
                config.server.port = port;
            }
        }

        if let Ok(backend) = std::env::var("DB_TYPE") {
            config.storage.backend = backend;
        }

        if let Ok(table) = std::env::var("DYNAMODB_TABLE") {
            config.storage.table = Some(table);
        }

        if let Ok(region) = std::env::var("AWS_REGION") {
            config.storage.region = Some(region);
        }

        Ok(config)
    }

    /// Create config with CLI args taking precedence over environment and file.
    ///
    /// Precedence: CLI > File > Environment > Defaults
    pub fn from_sources(cli: &Cli) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        let file_config = cli
            .config
            .as_ref()
            .map(Self::load_from_file)
            .transpose()?;

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or_else(|| file_config.as_ref().map(|c| c.server.host.clone()))
                .unwrap_or_else(|| env_config.server.host.clone()),
            port: cli
                .port
                .or_else(|| file_config.as_ref().map(|c| c.server.port))
                .unwrap_or(env_config.server.port),
        };

        let storage = StorageConfig {
            backend: cli
                .backend
                .clone()
                .or_else(|| {
                    file_config
                        .as_ref()
                        .map(|c| c.storage.backend.clone())
                        .filter(|b| !b.is_empty())
                })
                .unwrap_or_else(|| env_config.storage.backend.clone()),
            table: cli
                .table
                .clone()
                .or_else(|| file_config.as_ref().and_then(|c| c.storage.table.clone()))
                .or_else(|| env_config.storage.table.clone()),
            region: cli
                .aws_region
                .clone()
                .or_else(|| file_config.as_ref().and_then(|c| c.storage.region.clone()))
                .or_else(|| env_config.storage.region.clone()),
        };

        Ok(Config { server, storage })
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(config.storage.backend.is_empty());
        assert_eq!(config.storage.table, None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "server": {{"host": "127.0.0.1", "port": 8080}},
                "storage": {{"backend": "dynamodb", "table": "pokedex"}}
            }}"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, "dynamodb");
        assert_eq!(config.storage.table.as_deref(), Some("pokedex"));
        assert_eq!(config.storage.region, None);
    }

    #[test]
    fn test_load_from_file_partial_sections_use_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"storage": {{"table": "pokedex"}}}}"#).unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 5000);
        assert!(config.storage.backend.is_empty());
        assert_eq!(config.storage.table.as_deref(), Some("pokedex"));
    }

    #[test]
    fn test_load_from_file_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "server": {{"host": "10.0.0.1", "port": 8080}},
                "storage": {{"table": "from-file"}}
            }}"#
        )
        .unwrap();

        let cli = Cli {
            host: Some("127.0.0.1".to_string()),
            port: None,
            backend: None,
            table: Some("from-cli".to_string()),
            aws_region: None,
            config: Some(file.path().to_path_buf()),
            verbose: false,
            debug: false,
        };

        let config = Config::from_sources(&cli).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.table.as_deref(), Some("from-cli"));
    }

    #[test]
    fn test_from_env_reads_all_vars() {
        std::env::set_var("POKEDEX_HOST", "192.168.0.9");
        std::env::set_var("POKEDEX_PORT", "5055");
        std::env::set_var("DB_TYPE", "dynamodb");
        std::env::set_var("DYNAMODB_TABLE", "pokedex-env");
        std::env::set_var("AWS_REGION", "eu-west-1");

        let config = Config::from_env().unwrap();

        std::env::remove_var("POKEDEX_HOST");
        std::env::remove_var("POKEDEX_PORT");
        std::env::remove_var("DB_TYPE");
        std::env::remove_var("DYNAMODB_TABLE");
        std::env::remove_var("AWS_REGION");

        assert_eq!(config.server.host, "192.168.0.9");
        assert_eq!(config.server.port, 5055);
        assert_eq!(config.storage.backend, "dynamodb");
        assert_eq!(config.storage.table.as_deref(), Some("pokedex-env"));
        assert_eq!(config.storage.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.storage.backend = "dynamodb".to_string();
        config.storage.table = Some("pokedex".to_string());
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.storage.backend, "dynamodb");
        assert_eq!(loaded.storage.table.as_deref(), Some("pokedex"));
    }
}

use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub database_dsn: Option<String>,
}

/// Environment fallback, keyed on `PORT`, `STORAGE` and `PG_DSN`.
#[derive(Debug, Deserialize)]
struct EnvConfig {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    storage: Storage,
    pg_dsn: Option<String>,
}

const fn default_port() -> u16 {
    8000
}

impl Config {
    pub fn from_yaml(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.storage == Storage::Postgres && self.database_dsn.is_none() {
            return Err("database_dsn (or PG_DSN) is required when storage is 'postgres'".into());
        }

        Ok(())
    }
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let env_config: EnvConfig = envy::from_env()?;

    let config = Config {
        port: env_config.port,
        storage: env_config.storage,
        database_dsn: env_config.pg_dsn,
    };
    config.validate()?;

    Ok(config)
}

const CONFIG_ENV: &str = "PERSON_NOTES_CONFIG";
const EXAMPLE_CONFIG: &str = "config.example.yaml";

/// Config files to look at, most specific first, without repeats.
fn config_candidates(explicit: Option<String>) -> Vec<String> {
    let mut candidates: Vec<String> = explicit.into_iter().collect();
    for path in ["config.yaml", EXAMPLE_CONFIG] {
        if !candidates.iter().any(|c| c == path) {
            candidates.push(path.to_string());
        }
    }
    candidates
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let candidates = config_candidates(env::var(CONFIG_ENV).ok());

    if let Some(path) = candidates.iter().find(|path| Path::new(path).exists()) {
        if path == EXAMPLE_CONFIG {
            tracing::warn!(
                "using '{}' as service config; copy it to 'config.yaml' and set real values",
                EXAMPLE_CONFIG
            );
        } else {
            tracing::info!("reading service config from '{}'", path);
        }
        return Config::from_yaml(&fs::read_to_string(path)?);
    }

    tracing::info!("no config file present, reading PORT, STORAGE and PG_DSN from the environment");
    load_from_env().map_err(|e| {
        format!(
            "cannot configure person-notes-server: none of [{}] exists and the environment \
             is unusable ({e})",
            candidates.join(", ")
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = Config::from_yaml("database_dsn: host=localhost").unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.storage, Storage::Postgres);
        assert_eq!(config.database_dsn.as_deref(), Some("host=localhost"));
    }

    #[test]
    fn memory_storage_needs_no_dsn() {
        let config = Config::from_yaml("port: 9000\nstorage: memory\n").unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.storage, Storage::Memory);
        assert!(config.database_dsn.is_none());
    }

    #[test]
    fn postgres_storage_requires_dsn() {
        assert!(Config::from_yaml("storage: postgres\n").is_err());
    }

    #[test]
    fn unknown_storage_is_rejected() {
        assert!(Config::from_yaml("storage: redis\n").is_err());
    }

    #[test]
    fn config_candidates_prefer_explicit_path() {
        assert_eq!(
            config_candidates(Some("/etc/notes.yaml".to_string())),
            vec!["/etc/notes.yaml", "config.yaml", "config.example.yaml"]
        );
        assert_eq!(
            config_candidates(None),
            vec!["config.yaml", "config.example.yaml"]
        );
        assert_eq!(
            config_candidates(Some("config.yaml".to_string())),
            vec!["config.yaml", "config.example.yaml"]
        );
    }

    #[test]
    fn example_config_is_valid() {
        let config = Config::from_yaml(include_str!("../config.example.yaml")).unwrap();

        assert_eq!(config.storage, Storage::Postgres);
        assert!(config.database_dsn.is_some());
    }
}

//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use serde::Deserialize;

use crate::models::credential::CredentialStore;

/// Which record store backs the process. Only one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Records kept per session in memory, lost on logout or restart
    Memory,
    /// Records persisted to the SQLite table `gastos`
    Sqlite,
}

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid environment: {0}")]
    Env(#[from] envy::Error),

    /// A `USERS` entry is not of the form `name=sha256hex`.
    #[error("invalid USERS entry {0:?}: expected name=sha256hex")]
    InvalidUserEntry(String),
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to `sqlite://gastos_malharia.db`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `STORAGE` (optional): `sqlite` or `memory`, defaults to `sqlite`
/// - `USERS` (optional): `name=sha256hex` pairs separated by commas
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_storage")]
    pub storage: StorageMode,

    #[serde(default)]
    pub users: Option<String>,
}

fn default_database_url() -> String {
    "sqlite://gastos_malharia.db".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_storage() -> StorageMode {
    StorageMode::Sqlite
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed into its expected type.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(envy::from_env::<Config>()?)
    }

    /// Build the credential store from `USERS`, or the demo accounts when unset.
    pub fn credentials(&self) -> Result<CredentialStore, ConfigError> {
        match self.users.as_deref().map(str::trim) {
            None | Some("") => Ok(CredentialStore::with_default_users()),
            Some(list) => parse_users(list),
        }
    }
}

/// Parse `name=hash,name=hash`.
fn parse_users(list: &str) -> Result<CredentialStore, ConfigError> {
    let entries = list
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, hash) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidUserEntry(entry.to_string()))?;
            let (name, hash) = (name.trim(), hash.trim());
            let valid_hash = hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit());
            if name.is_empty() || !valid_hash {
                return Err(ConfigError::InvalidUserEntry(entry.to_string()));
            }
            Ok((name.to_string(), hash.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CredentialStore::from_hashes(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::credential::hash_password;

    fn config(users: Option<&str>) -> Config {
        Config {
            database_url: default_database_url(),
            server_port: default_port(),
            storage: default_storage(),
            users: users.map(str::to_string),
        }
    }

    #[test]
    fn missing_users_falls_back_to_demo_accounts() {
        let store = config(None).credentials().unwrap();
        assert!(store.verify("admin", "1234"));
    }

    #[test]
    fn users_list_is_parsed() {
        let list = format!("ana={}, bia={}", hash_password("a"), hash_password("b"));
        let store = config(Some(&list)).credentials().unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.verify("bia", "b"));
        assert!(!store.verify("admin", "1234"));
    }

    #[test]
    fn malformed_entry_is_rejected() {
        assert!(matches!(
            config(Some("ana:abc")).credentials(),
            Err(ConfigError::InvalidUserEntry(_))
        ));
        assert!(matches!(
            config(Some("ana=nothex")).credentials(),
            Err(ConfigError::InvalidUserEntry(_))
        ));
    }
}

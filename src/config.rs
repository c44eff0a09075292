//! Process settings, loaded once at startup.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("unsupported DATABASE_URL {0:?}: only sqlite is supported")]
    UnsupportedDatabase(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    /// Carried for parity with deployments; no endpoint reads it.
    pub secret_key: String,
    pub debug: bool,
    pub cors_origins: Vec<String>,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("secret_key", &"<redacted>")
            .field("debug", &self.debug)
            .field("cors_origins", &self.cors_origins)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite:///payassured.db".to_string(),
            secret_key: "dev-secret-key-change-in-production".to_string(),
            debug: true,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Entry point to load configuration
pub fn load() -> Result<Settings> {
    load_dotenv();
    Settings::from_lookup(|key| env::var(key).ok())
}

/// Load .env base, then .env.{APP_ENV}
fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let env_name = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let _ = dotenvy::from_filename(format!(".env.{env_name}"));
}

impl Settings {
    /// Build from a variable lookup; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Self::default();
        if let Some(v) = lookup("DATABASE_URL") {
            s.database_url = v;
        }
        if let Some(v) = lookup("SECRET_KEY") {
            s.secret_key = v;
        }
        if let Some(v) = lookup("DEBUG") {
            s.debug = parse_bool("DEBUG", &v)?;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            s.cors_origins = parse_origins(&v);
        }
        if let Some(v) = lookup("HOST") {
            s.host = v;
        }
        if let Some(v) = lookup("PORT") {
            s.port = v.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "a valid u16",
                value: v.clone(),
            })?;
        }
        s.db_target()?;
        Ok(s)
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve `database_url`. Accepts `sqlite:///rel.db`, `sqlite:////abs.db`,
    /// `sqlite://:memory:` and bare filesystem paths.
    pub fn db_target(&self) -> Result<DbTarget> {
        let url = self.database_url.trim();
        let path = match url.split_once("://") {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("sqlite") => {
                rest.strip_prefix('/').unwrap_or(rest)
            }
            Some(_) => return Err(ConfigError::UnsupportedDatabase(url.to_string())),
            None => url,
        };
        match path {
            ":memory:" | "" => Ok(DbTarget::Memory),
            p => Ok(DbTarget::File(PathBuf::from(p))),
        }
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a boolean",
            value: value.to_string(),
        }),
    }
}

/// JSON array (`["http://a","http://b"]`) or comma-separated list.
fn parse_origins(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed) {
            return list;
        }
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, "sqlite:///payassured.db");
        assert!(s.debug);
        assert_eq!(s.cors_origins.len(), 2);
        assert_eq!(s.socket_addr(), "0.0.0.0:8000");
        assert_eq!(
            s.db_target().unwrap(),
            DbTarget::File(PathBuf::from("payassured.db"))
        );
    }

    #[test]
    fn env_overrides() {
        let s = settings(&[
            ("DATABASE_URL", "sqlite:////var/lib/crm/crm.db"),
            ("DEBUG", "false"),
            ("PORT", "9000"),
            ("CORS_ORIGINS", "https://crm.example.com, https://admin.example.com"),
        ])
        .unwrap();
        assert!(!s.debug);
        assert_eq!(s.port, 9000);
        assert_eq!(
            s.cors_origins,
            vec!["https://crm.example.com", "https://admin.example.com"]
        );
        assert_eq!(
            s.db_target().unwrap(),
            DbTarget::File(PathBuf::from("/var/lib/crm/crm.db"))
        );
    }

    #[test]
    fn cors_origins_json_list() {
        let s = settings(&[("CORS_ORIGINS", r#"["http://a.test","http://b.test"]"#)]).unwrap();
        assert_eq!(s.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn memory_database() {
        let s = settings(&[("DATABASE_URL", "sqlite://:memory:")]).unwrap();
        assert_eq!(s.db_target().unwrap(), DbTarget::Memory);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(settings(&[("PORT", "eighty")]).is_err());
        assert!(settings(&[("DEBUG", "maybe")]).is_err());
        assert!(matches!(
            settings(&[("DATABASE_URL", "postgresql://localhost/crm")]),
            Err(ConfigError::UnsupportedDatabase(_))
        ));
    }

    #[test]
    fn debug_output_hides_secret() {
        let s = settings(&[("SECRET_KEY", "hunter2")]).unwrap();
        assert!(!format!("{s:?}").contains("hunter2"));
    }
}

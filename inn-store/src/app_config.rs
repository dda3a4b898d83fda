use serde::Deserialize;
use std::env;

/// Secrets shorter than this cannot sign tokens for the remote backend.
const MIN_REMOTE_SECRET_LEN: usize = 20;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    pub admin_email: String,
    /// Seeds the admin staff account on an empty directory.
    #[serde(default)]
    pub bootstrap_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Where registry and front-desk data lives for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    Remote { url: String },
    Fixture { reason: String },
}

impl BackendMode {
    pub fn label(&self) -> &'static str {
        match self {
            BackendMode::Remote { .. } => "postgres",
            BackendMode::Fixture { .. } => "fixture",
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `INN__DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("INN").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Remote only with a postgres URL and a signing secret long enough to trust.
    pub fn backend_mode(&self) -> BackendMode {
        let Some(url) = self.database.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
            return BackendMode::Fixture { reason: "database.url is not set".into() };
        };
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return BackendMode::Fixture { reason: "database.url is not a postgres URL".into() };
        }
        if self.auth.jwt_secret.len() <= MIN_REMOTE_SECRET_LEN {
            return BackendMode::Fixture { reason: "auth.jwt_secret is too short".into() };
        }
        BackendMode::Remote { url: url.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>, secret: &str) -> Config {
        Config {
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig { url: url.map(String::from) },
            auth: AuthConfig {
                jwt_secret: secret.to_string(),
                jwt_expiration_seconds: 3600,
                admin_email: "admin@parnaioca.com".to_string(),
                bootstrap_password: None,
            },
        }
    }

    const LONG_SECRET: &str = "a-very-long-signing-secret-for-tests";

    #[test]
    fn remote_needs_postgres_url_and_long_secret() {
        let mode = config(Some("postgres://inn@localhost/inn"), LONG_SECRET).backend_mode();
        assert_eq!(mode, BackendMode::Remote { url: "postgres://inn@localhost/inn".into() });

        let mode = config(Some("postgresql://inn@db/inn"), LONG_SECRET).backend_mode();
        assert_eq!(mode.label(), "postgres");
    }

    #[test]
    fn falls_back_to_fixture() {
        assert_eq!(config(None, LONG_SECRET).backend_mode().label(), "fixture");
        assert_eq!(config(Some("   "), LONG_SECRET).backend_mode().label(), "fixture");
        assert_eq!(config(Some("mysql://db/inn"), LONG_SECRET).backend_mode().label(), "fixture");
        // exactly 20 characters is not enough
        assert_eq!(
            config(Some("postgres://db/inn"), "12345678901234567890").backend_mode().label(),
            "fixture"
        );
    }
}

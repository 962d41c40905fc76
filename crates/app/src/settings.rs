//! Handles settings for the application. Configuration is read from
//! `config/nightshare.toml` (optional) and from `NIGHTSHARE__*` environment
//! variables, e.g. `NIGHTSHARE__SERVER__PORT=8080`.
use config::{
    Config, ConfigError, Environment, File,
    builder::{ConfigBuilder, DefaultState},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    /// Days a saved calculation stays loadable.
    pub ttl_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
    pub storage: Storage,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::build(
            Config::builder()
                .add_source(File::with_name("config/nightshare").required(false))
                .add_source(
                    Environment::with_prefix("NIGHTSHARE")
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .set_default("storage.ttl_days", engine::DEFAULT_TTL_DAYS)?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(text: &str) -> Settings {
        Settings::build(Config::builder().add_source(File::from_str(text, FileFormat::Toml))).unwrap()
    }

    #[test]
    fn defaults_apply_without_file() {
        let settings = from_toml("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.storage.ttl_days, 30);
        assert!(settings.server.is_none());
    }

    #[test]
    fn reads_server_section() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 3000
            database = { sqlite = "nightshare.db" }

            [storage]
            ttl_days = 7
            "#,
        );
        let server = settings.server.unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(server.port, 3000);
        assert_eq!(server.database, Database::Sqlite("nightshare.db".to_string()));
        assert_eq!(settings.storage.ttl_days, 7);
    }

    #[test]
    fn memory_database_is_a_plain_string() {
        let settings = from_toml("[server]\nport = 3000\ndatabase = \"memory\"\n");
        assert_eq!(settings.server.unwrap().database, Database::Memory);
    }
}

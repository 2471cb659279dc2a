// Configuration module entry point
// Loads application configuration from file, environment and defaults

mod types;

use std::net::SocketAddr;

use crate::error::Result;

// Re-export public types
pub use types::{Config, LoggingConfig, ServerConfig};

/// Environment variable prefix, e.g. `STAGEHAND_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "STAGEHAND";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse configuration from an in-memory TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.keep_alive", true)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_apply() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.server.keep_alive);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.sources.is_empty());
    }

    #[test]
    fn test_sources_parsed() {
        let cfg = Config::from_toml_str(
            r#"
            [server]
            port = 3000
            workers = 2

            [[sources]]
            root = "web"
            prefix = "/"

            [[sources]]
            root = "node_modules"
            prefix = "/node_modules"
            defaults = ["index.js"]

            [sources.allow]
            vue = ["dist/vue.global.prod.js"]
            "@scope/pkg/src" = ["."]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.sources.len(), 2);

        let npm = &cfg.sources[1];
        assert_eq!(npm.prefix.as_deref(), Some("/node_modules"));
        let allow = npm.allow.as_ref().unwrap();
        assert_eq!(allow["vue"], ["dist/vue.global.prod.js"]);
        assert_eq!(allow["@scope/pkg/src"], ["."]);
        assert_eq!(npm.defaults, ["index.js"]);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::from_toml_str("[server]\nhost = \"0.0.0.0\"\nport = 9000").unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "0.0.0.0:9000");

        let bad = Config::from_toml_str("[server]\nhost = \"not a host\"").unwrap();
        assert!(matches!(bad.get_socket_addr(), Err(Error::Address(_))));
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let result = Config::from_toml_str("[server]\nport = \"not a port\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}

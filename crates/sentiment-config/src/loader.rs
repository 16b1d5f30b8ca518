//! Configuration loader (file + env merge).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use thiserror::Error;

use crate::schema::ServiceConfig;

/// Prefix of environment variables read by [`load_config`].
pub const ENV_PREFIX: &str = "SENTIMENT_";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to load or merge configuration.
    #[error("configuration error: {0}")]
    Load(String),
    /// Values parsed but are unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Loads configuration by merging layers:
/// 1. Default values
/// 2. Config file (if given)
/// 3. Environment variables (`SENTIMENT_` prefix, `__` between sections,
///    e.g. `SENTIMENT_SERVER__PORT=9000`)
pub fn load_config(config_path: Option<&str>) -> Result<ServiceConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ServiceConfig::default()));

    if let Some(path) = config_path {
        if !std::path::Path::new(path).exists() {
            return Err(ConfigError::Load(format!("config file not found: {path}")));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: ServiceConfig = figment
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let cfg = load_config(None).expect("defaults");
            assert_eq!(cfg.server.port, 8080);
            assert_eq!(cfg.pool.size, 4);
            Ok(())
        });
    }

    #[test]
    fn file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "sentiment.toml",
                r#"
                [server]
                port = 9090

                [model]
                source = "https://example.com/model.zip"
                "#,
            )?;
            let cfg = load_config(Some("sentiment.toml")).expect("load");
            assert_eq!(cfg.server.port, 9090);
            assert_eq!(cfg.server.host, "127.0.0.1");
            assert_eq!(cfg.model.source, "https://example.com/model.zip");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("sentiment.toml", "[pool]\nsize = 2\n")?;
            jail.set_env("SENTIMENT_POOL__SIZE", "6");
            jail.set_env("SENTIMENT_MODEL__REQUIRE_LOADED", "false");
            let cfg = load_config(Some("sentiment.toml")).expect("load");
            assert_eq!(cfg.pool.size, 6);
            assert!(!cfg.model.require_loaded);
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_error() {
        Jail::expect_with(|_jail| {
            let err = load_config(Some("absent.toml")).unwrap_err();
            assert!(err.to_string().contains("absent.toml"));
            Ok(())
        });
    }

    #[test]
    fn unknown_section_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("sentiment.toml", "[auth]\ntoken = \"x\"\n")?;
            assert!(matches!(
                load_config(Some("sentiment.toml")),
                Err(ConfigError::Load(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn zero_pool_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("SENTIMENT_POOL__SIZE", "0");
            assert!(matches!(load_config(None), Err(ConfigError::Invalid(_))));
            Ok(())
        });
    }
}

use deeplink::config::{Config as DeepLinkConfig, ValidationError};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(flatten)]
    pub deeplink: DeepLinkConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.deeplink.validate()?;

        Ok(config)
    }

    /// Reads the file, then lets the process environment override the
    /// deployment descriptors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.deeplink.deployment.apply_env_overrides();
        config.deeplink.validate()?;

        Ok(config)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use deeplink::config::Environment;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            listener:
                host: 127.0.0.1
                port: 3000
            deployment:
                environment: production
                domain: evermiss.app
                app_version: "2.0.3"
            apps:
                android:
                    package_name: com.pardess.evermiss.beta
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                sentry_dsn: https://key@sentry.example/1
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.deeplink.listener.port, 3000);
        assert_eq!(
            config.deeplink.deployment.environment,
            Environment::Production
        );
        assert_eq!(config.deeplink.deployment.app_version, "2.0.3");
        assert_eq!(
            config.deeplink.apps.android.package_name,
            "com.pardess.evermiss.beta"
        );
        assert_eq!(config.deeplink.apps.ios.url_scheme, "evermiss");
        assert_eq!(
            config.common.metrics,
            Some(MetricsConfig {
                statsd_host: "127.0.0.1".into(),
                statsd_port: 8125
            })
        );
        assert_eq!(
            config.common.logging.expect("logging config").sentry_dsn,
            "https://key@sentry.example/1"
        );
    }

    #[test]
    fn minimal_config() {
        let tmp = write_tmp_file("listener:\n    host: 0.0.0.0\n    port: 8080\n");
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.common, CommonConfig::default());
        assert_eq!(
            config.deeplink.deployment.environment,
            Environment::Development
        );
        assert_eq!(config.deeplink.deployment.domain, "evermiss.app");
    }

    #[test]
    fn invalid_config() {
        let tmp = write_tmp_file("listener:\n    host: 0.0.0.0\n    port: 0\n");
        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::Invalid(ValidationError::InvalidPort))
        ));

        let tmp = write_tmp_file("listener: [1, 2]\n");
        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::ParseError(_))
        ));

        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/linkgate.yaml")),
            Err(ConfigError::LoadError(_))
        ));
    }
}

use crate::targets::{AndroidTarget, IosTarget};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DOMAIN: &str = "evermiss.app";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Domain cannot be empty")]
    EmptyDomain,

    #[error("URL scheme for {0} cannot be empty")]
    EmptyScheme(&'static str),

    #[error("Android package name cannot be empty")]
    EmptyPackageName,
}

/// Deep link service configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for incoming requests
    #[serde(default)]
    pub listener: Listener,
    /// Deployment descriptors, overridable from the environment
    #[serde(default)]
    pub deployment: Deployment,
    /// Native app identities. Defaults point at the production apps.
    #[serde(default)]
    pub apps: Apps,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;

        if self.deployment.domain.trim().is_empty() {
            return Err(ValidationError::EmptyDomain);
        }
        if self.apps.android.package_name.is_empty() {
            return Err(ValidationError::EmptyPackageName);
        }
        if self.apps.android.url_scheme.is_empty() {
            return Err(ValidationError::EmptyScheme("android"));
        }
        if self.apps.ios.url_scheme.is_empty() {
            return Err(ValidationError::EmptyScheme("ios"));
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Only the literal `production` selects the production posture. Any other
/// value, including a missing one, means development.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        Environment::from(value.as_str())
    }
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        match value {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl Environment {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Deployment {
    pub environment: Environment,
    pub domain: String,
    pub app_version: String,
    pub api_base_url: Option<String>,
    /// Token signing secret. Accepted for parity with the other edge
    /// workers; nothing here reads it.
    pub secret: Option<String>,
}

impl Default for Deployment {
    fn default() -> Self {
        Deployment {
            environment: Environment::default(),
            domain: DEFAULT_DOMAIN.into(),
            app_version: "1.0.0".into(),
            api_base_url: None,
            secret: None,
        }
    }
}

impl Deployment {
    /// Overrides fields with values found through `lookup`, which is
    /// normally `std::env::var`. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(environment) = value("ENVIRONMENT") {
            self.environment = Environment::from(environment);
        }
        if let Some(domain) = value("DOMAIN") {
            self.domain = domain;
        }
        if let Some(app_version) = value("APP_VERSION") {
            self.app_version = app_version;
        }
        if let Some(api_base_url) = value("API_BASE_URL") {
            self.api_base_url = Some(api_base_url);
        }
        if let Some(secret) = value("JWT_SECRET") {
            self.secret = Some(secret);
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Apps {
    pub android: AndroidTarget,
    pub ios: IosTarget,
}

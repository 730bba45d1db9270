//! Identifiers and store listings of the native apps, plus the web fallback.
//!
//! `AppTargets` is built once at startup and shared read-only by every
//! request.

use crate::config::{Config, Environment};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PACKAGE_NAME: &str = "com.pardess.evermiss";
pub const DEFAULT_URL_SCHEME: &str = "evermiss";
pub const DEFAULT_PLAY_STORE_URL: &str =
    "https://play.google.com/store/apps/details?id=com.pardess.evermiss";
pub const DEFAULT_APP_STORE_URL: &str = "https://apps.apple.com/app/evermiss";

/// Android app identity
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AndroidTarget {
    /// Package the strict intent is pinned to
    pub package_name: String,
    pub url_scheme: String,
    pub play_store_url: String,
}

impl Default for AndroidTarget {
    fn default() -> Self {
        AndroidTarget {
            package_name: DEFAULT_PACKAGE_NAME.into(),
            url_scheme: DEFAULT_URL_SCHEME.into(),
            play_store_url: DEFAULT_PLAY_STORE_URL.into(),
        }
    }
}

/// iOS app identity
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct IosTarget {
    pub url_scheme: String,
    pub app_store_url: String,
}

impl Default for IosTarget {
    fn default() -> Self {
        IosTarget {
            url_scheme: DEFAULT_URL_SCHEME.into(),
            app_store_url: DEFAULT_APP_STORE_URL.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct WebTarget {
    /// Scheme and host without a trailing slash, e.g. `https://evermiss.app`
    pub fallback_base_url: String,
}

impl WebTarget {
    pub fn new(environment: Environment, domain: &str) -> Self {
        let fallback_base_url = match environment {
            Environment::Production => format!("https://{domain}"),
            Environment::Development => format!("https://dev.{domain}"),
        };
        WebTarget { fallback_base_url }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AppTargets {
    pub android: AndroidTarget,
    pub ios: IosTarget,
    pub web: WebTarget,
}

impl AppTargets {
    pub fn from_config(config: &Config) -> Self {
        AppTargets {
            android: config.apps.android.clone(),
            ios: config.apps.ios.clone(),
            web: WebTarget::new(
                config.deployment.environment,
                &config.deployment.domain,
            ),
        }
    }
}

impl Default for AppTargets {
    fn default() -> Self {
        AppTargets::from_config(&Config::default())
    }
}

//! User-Agent classification.
//!
//! Classification is a set of ordered rule tables matched against the
//! lowercased User-Agent. Within a table the first matching rule wins, so the
//! order of entries encodes precedence: Samsung Internet and Chrome both carry
//! the `Safari` token, hence they are listed before Safari.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Android,
    Ios,
    Desktop,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Desktop];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Desktop => "desktop",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserEngine {
    Samsung,
    Chrome,
    Safari,
    Firefox,
    Unknown,
}

impl BrowserEngine {
    pub const ALL: [BrowserEngine; 5] = [
        BrowserEngine::Samsung,
        BrowserEngine::Chrome,
        BrowserEngine::Safari,
        BrowserEngine::Firefox,
        BrowserEngine::Unknown,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            BrowserEngine::Samsung => "samsung",
            BrowserEngine::Chrome => "chrome",
            BrowserEngine::Safari => "safari",
            BrowserEngine::Firefox => "firefox",
            BrowserEngine::Unknown => "unknown",
        }
    }
}

/// What we know about the client, derived once per request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub platform: Platform,
    pub browser_engine: BrowserEngine,
    /// The page is rendered inside a social or messaging app's web view
    pub is_in_app_browser: bool,
    /// Kept for diagnostics only
    pub raw_user_agent: String,
}

struct Rule<T> {
    signatures: &'static [&'static str],
    class: T,
}

const PLATFORM_RULES: &[Rule<Platform>] = &[
    Rule {
        signatures: &["android"],
        class: Platform::Android,
    },
    Rule {
        signatures: &["iphone", "ipad", "ipod"],
        class: Platform::Ios,
    },
];

const ENGINE_RULES: &[Rule<BrowserEngine>] = &[
    Rule {
        signatures: &["samsungbrowser"],
        class: BrowserEngine::Samsung,
    },
    Rule {
        signatures: &["chrome", "crios"],
        class: BrowserEngine::Chrome,
    },
    Rule {
        signatures: &["safari"],
        class: BrowserEngine::Safari,
    },
    Rule {
        signatures: &["firefox", "fxios"],
        class: BrowserEngine::Firefox,
    },
];

/// Wrapper apps: our own app, Facebook, Instagram, KakaoTalk and LINE.
const IN_APP_SIGNATURES: &[&str] = &["evermiss", "fban", "fbav", "instagram", "kakaotalk", "line/"];

fn first_match<T: Copy>(user_agent: &str, rules: &[Rule<T>], fallback: T) -> T {
    rules
        .iter()
        .find(|rule| rule.signatures.iter().any(|s| user_agent.contains(s)))
        .map(|rule| rule.class)
        .unwrap_or(fallback)
}

/// Classifies a User-Agent. Never fails: anything unrecognized is a desktop
/// with an unknown engine.
pub fn classify(user_agent: &str) -> DeviceDescriptor {
    let ua = user_agent.to_ascii_lowercase();

    DeviceDescriptor {
        platform: first_match(&ua, PLATFORM_RULES, Platform::Desktop),
        browser_engine: first_match(&ua, ENGINE_RULES, BrowserEngine::Unknown),
        is_in_app_browser: IN_APP_SIGNATURES.iter().any(|s| ua.contains(s)),
        raw_user_agent: user_agent.to_string(),
    }
}

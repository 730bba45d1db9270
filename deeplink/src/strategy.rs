//! Decides how to answer a link request.
//!
//! The decision depends only on the resource kind, the platform and the
//! browser engine:
//!
//! ```text
//!                      memorial / celebrity        invite / share
//! android + samsung    ImmediateRedirect(strict)   ImmediateRedirect(strict)
//! android + other      InteractiveAppOpen          InteractiveAppOpen
//! ios                  InteractiveAppOpenIos       ImmediateRedirect(scheme)
//! desktop              StaticDesktopNotice         PlainWebRedirect(web)
//! ```
//!
//! Samsung Internet mishandles the script driven fallback chain, so it gets
//! the strict intent as a plain redirect and relies on the intent's own
//! store fallback.

use crate::device::{BrowserEngine, DeviceDescriptor, Platform};
use crate::links::LinkBuilder;
use crate::resource::{LinkTarget, ResourceKind};
use crate::targets::AppTargets;
use serde::Serialize;
use std::time::Duration;

/// When the interactive Android page tries the generic intent.
pub const SECONDARY_ATTEMPT_DELAY: Duration = Duration::from_millis(1200);
/// When the interactive pages give up and send the user to the store.
pub const STORE_FALLBACK_DELAY: Duration = Duration::from_millis(2500);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    /// 302 straight to a native invocation URL
    ImmediateRedirect { url: String },
    /// HTML page running the Android fallback chain:
    /// primary at load, secondary at +1200ms, store at +2500ms.
    InteractiveAppOpen {
        primary_url: String,
        secondary_url: Option<String>,
        store_url: String,
    },
    /// HTML page trying the custom scheme, then the App Store at +2500ms.
    InteractiveAppOpenIos {
        custom_scheme_url: String,
        store_url: String,
    },
    /// Informational page with store badges. No timers, no redirect.
    StaticDesktopNotice { kind: ResourceKind, id: String },
    /// 302 to the web version of the resource
    PlainWebRedirect { url: String },
}

impl Strategy {
    pub const fn name(&self) -> &'static str {
        match self {
            Strategy::ImmediateRedirect { .. } => "immediate_redirect",
            Strategy::InteractiveAppOpen { .. } => "interactive_app_open",
            Strategy::InteractiveAppOpenIos { .. } => "interactive_app_open_ios",
            Strategy::StaticDesktopNotice { .. } => "static_desktop_notice",
            Strategy::PlainWebRedirect { .. } => "plain_web_redirect",
        }
    }
}

pub fn select(link: &LinkTarget, device: &DeviceDescriptor, targets: &AppTargets) -> Strategy {
    let target = LinkBuilder::new(targets).build(link, device.platform);

    // Engines are listed explicitly for Android so a new engine has to be
    // placed on one side of the Samsung split.
    match (device.platform, device.browser_engine, link) {
        (Platform::Android, BrowserEngine::Samsung, _) => Strategy::ImmediateRedirect {
            url: target.primary_url,
        },
        (
            Platform::Android,
            BrowserEngine::Chrome
            | BrowserEngine::Safari
            | BrowserEngine::Firefox
            | BrowserEngine::Unknown,
            LinkTarget::PrivateMemorial { .. }
            | LinkTarget::PublicMemorial { .. }
            | LinkTarget::Invite { .. }
            | LinkTarget::Share { .. },
        ) => Strategy::InteractiveAppOpen {
            primary_url: target.primary_url,
            secondary_url: target.secondary_url,
            store_url: target.fallback_url,
        },
        (Platform::Ios, _, LinkTarget::PrivateMemorial { .. } | LinkTarget::PublicMemorial { .. }) => {
            Strategy::InteractiveAppOpenIos {
                custom_scheme_url: target.primary_url,
                store_url: target.fallback_url,
            }
        }
        (Platform::Ios, _, LinkTarget::Invite { .. } | LinkTarget::Share { .. }) => {
            Strategy::ImmediateRedirect {
                url: target.primary_url,
            }
        }
        (Platform::Desktop, _, LinkTarget::PrivateMemorial { id } | LinkTarget::PublicMemorial { id }) => {
            Strategy::StaticDesktopNotice {
                kind: link.kind(),
                id: id.clone(),
            }
        }
        (Platform::Desktop, _, LinkTarget::Invite { .. } | LinkTarget::Share { .. }) => {
            Strategy::PlainWebRedirect {
                url: target.primary_url,
            }
        }
    }
}

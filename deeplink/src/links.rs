//! Builds the URLs that open a resource in the native apps or on the web.
//!
//! Every resource has a logical deep path without a leading slash, e.g.
//! `memorial/abc` or `invite?code=X&memorial_id=Y`. The platform URLs are
//! pure string compositions of that path and the configured app targets, so
//! building the same link twice always yields identical URLs.

use crate::device::Platform;
use crate::resource::LinkTarget;
use crate::targets::AppTargets;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, matching what browsers
/// leave alone in `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Identifiers are untrusted input and are always encoded, so a `/`, `#`
/// or `;` inside an id can't alter the structure of an intent URL.
pub fn deep_path(link: &LinkTarget) -> String {
    match link {
        LinkTarget::PrivateMemorial { id } => format!("memorial/{}", encode_component(id)),
        LinkTarget::PublicMemorial { id } => format!("celebrity/{}", encode_component(id)),
        LinkTarget::Invite { code, memorial_id } => format!(
            "invite?code={}&memorial_id={}",
            encode_component(code),
            encode_component(memorial_id)
        ),
        LinkTarget::Share {
            share_type,
            share_id,
        } => format!(
            "share/{}/{}",
            encode_component(share_type),
            encode_component(share_id)
        ),
    }
}

/// The candidate URLs for one resource on one platform, in the order a
/// client should try them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeepLinkTarget {
    /// Native invocation on mobile, the web page on desktop
    pub primary_url: String,
    /// Second native attempt, Android only
    pub secondary_url: Option<String>,
    /// Store listing on mobile, the web page on desktop
    pub fallback_url: String,
}

pub struct LinkBuilder<'a> {
    targets: &'a AppTargets,
}

impl<'a> LinkBuilder<'a> {
    pub fn new(targets: &'a AppTargets) -> Self {
        Self { targets }
    }

    /// Android intent pinned to our package. The browser falls back to the
    /// Play Store on its own if the app is missing.
    pub fn strict_intent(&self, link: &LinkTarget) -> String {
        let android = &self.targets.android;
        format!(
            "intent://{}#Intent;scheme={};package={};action=VIEW;category=BROWSABLE;S.browser_fallback_url={};end",
            deep_path(link),
            android.url_scheme,
            android.package_name,
            encode_component(&android.play_store_url),
        )
    }

    /// Android intent without package or fallback. Some browser and OS
    /// combinations reject the package-qualified form but accept this one.
    pub fn generic_intent(&self, link: &LinkTarget) -> String {
        format!(
            "intent://{}#Intent;scheme={};action=VIEW;category=BROWSABLE;end",
            deep_path(link),
            self.targets.android.url_scheme,
        )
    }

    pub fn custom_scheme(&self, link: &LinkTarget) -> String {
        format!("{}://{}", self.targets.ios.url_scheme, deep_path(link))
    }

    pub fn web_fallback(&self, link: &LinkTarget) -> String {
        format!("{}/{}", self.targets.web.fallback_base_url, deep_path(link))
    }

    pub fn build(&self, link: &LinkTarget, platform: Platform) -> DeepLinkTarget {
        match platform {
            Platform::Android => DeepLinkTarget {
                primary_url: self.strict_intent(link),
                secondary_url: Some(self.generic_intent(link)),
                fallback_url: self.targets.android.play_store_url.clone(),
            },
            Platform::Ios => DeepLinkTarget {
                primary_url: self.custom_scheme(link),
                secondary_url: None,
                fallback_url: self.targets.ios.app_store_url.clone(),
            },
            Platform::Desktop => {
                let web_url = self.web_fallback(link);
                DeepLinkTarget {
                    primary_url: web_url.clone(),
                    secondary_url: None,
                    fallback_url: web_url,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::targets::WebTarget;

    fn memorial(id: &str) -> LinkTarget {
        LinkTarget::PrivateMemorial { id: id.into() }
    }

    fn invite() -> LinkTarget {
        LinkTarget::Invite {
            code: "ABC123".into(),
            memorial_id: "456".into(),
        }
    }

    #[test]
    fn test_deep_paths() {
        assert_eq!(deep_path(&memorial("abc")), "memorial/abc");
        assert_eq!(
            deep_path(&LinkTarget::PublicMemorial { id: "star".into() }),
            "celebrity/star"
        );
        assert_eq!(deep_path(&invite()), "invite?code=ABC123&memorial_id=456");
        assert_eq!(
            deep_path(&LinkTarget::Share {
                share_type: "photo".into(),
                share_id: "789".into()
            }),
            "share/photo/789"
        );
    }

    #[test]
    fn test_identifiers_are_encoded() {
        assert_eq!(deep_path(&memorial("a/b#c;d")), "memorial/a%2Fb%23c%3Bd");
        assert_eq!(deep_path(&memorial("Jürgen K")), "memorial/J%C3%BCrgen%20K");
        assert_eq!(
            deep_path(&LinkTarget::Invite {
                code: "a b&c=d".into(),
                memorial_id: "x?y".into(),
            }),
            "invite?code=a%20b%26c%3Dd&memorial_id=x%3Fy"
        );
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
    }

    #[test]
    fn test_strict_intent() {
        let targets = AppTargets::default();
        let builder = LinkBuilder::new(&targets);

        assert_eq!(
            builder.strict_intent(&memorial("abc")),
            "intent://memorial/abc#Intent;scheme=evermiss;package=com.pardess.evermiss;\
             action=VIEW;category=BROWSABLE;S.browser_fallback_url=\
             https%3A%2F%2Fplay.google.com%2Fstore%2Fapps%2Fdetails%3Fid%3Dcom.pardess.evermiss;end"
        );
    }

    #[test]
    fn test_generic_intent() {
        let targets = AppTargets::default();
        let builder = LinkBuilder::new(&targets);

        let url = builder.generic_intent(&invite());
        assert_eq!(
            url,
            "intent://invite?code=ABC123&memorial_id=456#Intent;scheme=evermiss;action=VIEW;category=BROWSABLE;end"
        );
        assert!(!url.contains("package="));
        assert!(!url.contains("browser_fallback_url"));
    }

    #[test]
    fn test_custom_scheme_and_web() {
        let mut targets = AppTargets::default();
        targets.web = WebTarget::new(Environment::Production, "evermiss.app");
        let builder = LinkBuilder::new(&targets);

        assert_eq!(builder.custom_scheme(&memorial("abc")), "evermiss://memorial/abc");
        assert_eq!(
            builder.web_fallback(&invite()),
            "https://evermiss.app/invite?code=ABC123&memorial_id=456"
        );
    }

    #[test]
    fn test_build_per_platform() {
        let targets = AppTargets::default();
        let builder = LinkBuilder::new(&targets);
        let link = memorial("abc");

        let android = builder.build(&link, Platform::Android);
        assert_eq!(android.primary_url, builder.strict_intent(&link));
        assert_eq!(android.secondary_url, Some(builder.generic_intent(&link)));
        assert_eq!(android.fallback_url, targets.android.play_store_url);

        let ios = builder.build(&link, Platform::Ios);
        assert_eq!(ios.primary_url, "evermiss://memorial/abc");
        assert_eq!(ios.secondary_url, None);
        assert_eq!(ios.fallback_url, targets.ios.app_store_url);

        let desktop = builder.build(&link, Platform::Desktop);
        assert_eq!(desktop.primary_url, "https://dev.evermiss.app/memorial/abc");
        assert_eq!(desktop.fallback_url, desktop.primary_url);
    }

    #[test]
    fn test_builder_is_deterministic() {
        let targets = AppTargets::default();
        let links = [
            memorial("abc"),
            invite(),
            LinkTarget::Share {
                share_type: "photo".into(),
                share_id: "789".into(),
            },
        ];

        for link in &links {
            for platform in Platform::ALL {
                let first = LinkBuilder::new(&targets).build(link, platform);
                let second = LinkBuilder::new(&targets).build(link, platform);
                assert_eq!(first, second);
            }
        }
    }
}

//! Maps a request path and query to the resource it asks for.

use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

const PRIVATE_MEMORIAL_PREFIXES: &[&str] = &["/memorial/", "/m/"];
const PUBLIC_MEMORIAL_PREFIXES: &[&str] = &["/celebrity/", "/c/"];
const INVITE_PREFIX: &str = "/invite";
const SHARE_PREFIX: &str = "/share/";

/// A request that is well formed but incomplete. Answered with a 400.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Missing required query parameter: {0}")]
    MissingQueryParameter(&'static str),

    #[error("Missing required path segment: {0}")]
    MissingPathSegment(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    PrivateMemorial,
    PublicMemorial,
    Invite,
    Share,
    Home,
    Health,
    NotFound,
}

impl ResourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::PrivateMemorial => "private_memorial",
            ResourceKind::PublicMemorial => "public_memorial",
            ResourceKind::Invite => "invite",
            ResourceKind::Share => "share",
            ResourceKind::Home => "home",
            ResourceKind::Health => "health",
            ResourceKind::NotFound => "not_found",
        }
    }
}

/// A resource that has an in-app destination. Invites and shares can only be
/// constructed with all of their identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    /// The id is not validated and may be empty
    PrivateMemorial { id: String },
    PublicMemorial { id: String },
    Invite { code: String, memorial_id: String },
    Share { share_type: String, share_id: String },
}

impl LinkTarget {
    pub fn kind(&self) -> ResourceKind {
        match self {
            LinkTarget::PrivateMemorial { .. } => ResourceKind::PrivateMemorial,
            LinkTarget::PublicMemorial { .. } => ResourceKind::PublicMemorial,
            LinkTarget::Invite { .. } => ResourceKind::Invite,
            LinkTarget::Share { .. } => ResourceKind::Share,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceRequest {
    Link(LinkTarget),
    Home,
    Health,
    NotFound,
}

impl ResourceRequest {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRequest::Link(link) => link.kind(),
            ResourceRequest::Home => ResourceKind::Home,
            ResourceRequest::Health => ResourceKind::Health,
            ResourceRequest::NotFound => ResourceKind::NotFound,
        }
    }
}

/// Decodes a raw query string. When a key repeats, the first value wins.
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    params
}

/// Resolves a path (as sent on the wire, still percent-encoded) and its
/// decoded query parameters.
///
/// Prefixes are checked in a fixed order: memorial, celebrity, invite,
/// share. Missing invite or share identifiers are an error rather than a
/// default; an empty value counts as missing.
pub fn route(path: &str, query: &HashMap<String, String>) -> Result<ResourceRequest, RouteError> {
    if let Some(rest) = strip_any_prefix(path, PRIVATE_MEMORIAL_PREFIXES) {
        return Ok(ResourceRequest::Link(LinkTarget::PrivateMemorial {
            id: first_segment(rest),
        }));
    }

    if let Some(rest) = strip_any_prefix(path, PUBLIC_MEMORIAL_PREFIXES) {
        return Ok(ResourceRequest::Link(LinkTarget::PublicMemorial {
            id: first_segment(rest),
        }));
    }

    if path.starts_with(INVITE_PREFIX) {
        let code = required_param(query, "code")?;
        let memorial_id = required_param(query, "memorial_id")?;
        return Ok(ResourceRequest::Link(LinkTarget::Invite { code, memorial_id }));
    }

    if let Some(rest) = path.strip_prefix(SHARE_PREFIX) {
        let mut segments = rest.split('/').map(decode_segment);
        let share_type = required_segment(segments.next(), "share_type")?;
        let share_id = required_segment(segments.next(), "share_id")?;
        return Ok(ResourceRequest::Link(LinkTarget::Share {
            share_type,
            share_id,
        }));
    }

    match path {
        "/" => Ok(ResourceRequest::Home),
        "/health" => Ok(ResourceRequest::Health),
        _ => Ok(ResourceRequest::NotFound),
    }
}

fn strip_any_prefix<'a>(path: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn first_segment(rest: &str) -> String {
    rest.split('/').next().map(decode_segment).unwrap_or_default()
}

fn required_param(
    query: &HashMap<String, String>,
    name: &'static str,
) -> Result<String, RouteError> {
    query
        .get(name)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or(RouteError::MissingQueryParameter(name))
}

fn required_segment(segment: Option<String>, name: &'static str) -> Result<String, RouteError> {
    segment
        .filter(|s| !s.is_empty())
        .ok_or(RouteError::MissingPathSegment(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_url(path_and_query: &str) -> Result<ResourceRequest, RouteError> {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };
        route(path, &parse_query(query))
    }

    fn link(path_and_query: &str) -> LinkTarget {
        match route_url(path_and_query) {
            Ok(ResourceRequest::Link(link)) => link,
            other => panic!("expected a link for {path_and_query}, got {other:?}"),
        }
    }

    #[test]
    fn test_memorial_routes() {
        let expected = LinkTarget::PrivateMemorial { id: "abc".into() };
        assert_eq!(link("/memorial/abc"), expected);
        assert_eq!(link("/m/abc"), expected);
        assert_eq!(link("/memorial/abc/extra"), expected);

        let expected = LinkTarget::PublicMemorial { id: "star".into() };
        assert_eq!(link("/celebrity/star"), expected);
        assert_eq!(link("/c/star"), expected);
    }

    #[test]
    fn test_missing_memorial_id_is_not_an_error() {
        assert_eq!(
            link("/memorial/"),
            LinkTarget::PrivateMemorial { id: String::new() }
        );
        assert_eq!(link("/c/"), LinkTarget::PublicMemorial { id: String::new() });
    }

    #[test]
    fn test_segments_are_decoded() {
        assert_eq!(
            link("/memorial/J%C3%BCrgen%20K"),
            LinkTarget::PrivateMemorial {
                id: "Jürgen K".into()
            }
        );
    }

    #[test]
    fn test_invite() {
        assert_eq!(
            link("/invite?code=ABC123&memorial_id=456"),
            LinkTarget::Invite {
                code: "ABC123".into(),
                memorial_id: "456".into()
            }
        );
        // Anything starting with /invite is an invite
        assert_eq!(
            link("/invite/accept?memorial_id=9&code=a+b%26c"),
            LinkTarget::Invite {
                code: "a b&c".into(),
                memorial_id: "9".into()
            }
        );
        // First value wins
        assert_eq!(
            link("/invite?code=1&code=2&memorial_id=3"),
            LinkTarget::Invite {
                code: "1".into(),
                memorial_id: "3".into()
            }
        );
    }

    #[test]
    fn test_invite_requires_both_params() {
        assert_eq!(
            route_url("/invite?code=ABC123"),
            Err(RouteError::MissingQueryParameter("memorial_id"))
        );
        assert_eq!(
            route_url("/invite?memorial_id=456"),
            Err(RouteError::MissingQueryParameter("code"))
        );
        assert_eq!(
            route_url("/invite"),
            Err(RouteError::MissingQueryParameter("code"))
        );
        assert_eq!(
            route_url("/invite?code=&memorial_id=456"),
            Err(RouteError::MissingQueryParameter("code"))
        );
    }

    #[test]
    fn test_share() {
        assert_eq!(
            link("/share/photo/789"),
            LinkTarget::Share {
                share_type: "photo".into(),
                share_id: "789".into()
            }
        );
        assert_eq!(
            route_url("/share/photo"),
            Err(RouteError::MissingPathSegment("share_id"))
        );
        assert_eq!(
            route_url("/share/photo/"),
            Err(RouteError::MissingPathSegment("share_id"))
        );
        assert_eq!(
            route_url("/share/"),
            Err(RouteError::MissingPathSegment("share_type"))
        );
    }

    #[test]
    fn test_fixed_routes_and_not_found() {
        assert_eq!(route_url("/"), Ok(ResourceRequest::Home));
        assert_eq!(route_url("/health"), Ok(ResourceRequest::Health));
        assert_eq!(route_url("/health/"), Ok(ResourceRequest::NotFound));
        assert_eq!(route_url("/memorial"), Ok(ResourceRequest::NotFound));
        assert_eq!(route_url("/mx/abc"), Ok(ResourceRequest::NotFound));
        assert_eq!(route_url(""), Ok(ResourceRequest::NotFound));
        assert_eq!(route_url("/robots.txt"), Ok(ResourceRequest::NotFound));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(route_url("/m/1").unwrap().kind(), ResourceKind::PrivateMemorial);
        assert_eq!(route_url("/c/1").unwrap().kind(), ResourceKind::PublicMemorial);
        assert_eq!(
            route_url("/invite?code=1&memorial_id=2").unwrap().kind(),
            ResourceKind::Invite
        );
        assert_eq!(route_url("/share/a/b").unwrap().kind(), ResourceKind::Share);
        assert_eq!(route_url("/nope").unwrap().kind(), ResourceKind::NotFound);
        assert_eq!(ResourceKind::PublicMemorial.as_str(), "public_memorial");
    }
}

//! Turns a [`Strategy`] and the fixed endpoints into HTTP responses.
//!
//! Values interpolated into markup are HTML-escaped; values handed to the
//! inline scripts are JSON string literals with `<` escaped so they can't
//! close the script element.

use crate::config::Deployment;
use crate::device::DeviceDescriptor;
use crate::errors::DeepLinkError;
use crate::resource::{ResourceKind, RouteError};
use crate::strategy::{SECONDARY_ATTEMPT_DELAY, STORE_FALLBACK_DELAY, Strategy};
use crate::targets::AppTargets;
use http::header::LOCATION;
use hyper::{Response, StatusCode};
use serde::Serialize;
use shared::http::{
    ResponseBody, TEXT_HTML, TEXT_PLAIN, empty_body, make_error_response, make_json_response,
    make_response,
};

const APP_NAME: &str = "Evermiss";

pub fn render_strategy(
    strategy: &Strategy,
    device: &DeviceDescriptor,
    targets: &AppTargets,
) -> Result<Response<ResponseBody>, DeepLinkError> {
    match strategy {
        Strategy::ImmediateRedirect { url } | Strategy::PlainWebRedirect { url } => redirect(url),
        Strategy::InteractiveAppOpen {
            primary_url,
            secondary_url,
            store_url,
        } => Ok(html(android_page(
            primary_url,
            secondary_url.as_deref(),
            store_url,
            device,
        )?)),
        Strategy::InteractiveAppOpenIos {
            custom_scheme_url,
            store_url,
        } => Ok(html(ios_page(custom_scheme_url, store_url, device)?)),
        Strategy::StaticDesktopNotice { kind, id } => Ok(html(desktop_page(*kind, id, targets))),
    }
}

pub fn redirect(url: &str) -> Result<Response<ResponseBody>, DeepLinkError> {
    let response = Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, url)
        .body(empty_body())?;
    Ok(response)
}

pub fn bad_request(error: &RouteError) -> Response<ResponseBody> {
    make_response(StatusCode::BAD_REQUEST, TEXT_PLAIN, error.to_string())
}

pub fn not_found() -> Response<ResponseBody> {
    make_error_response(StatusCode::NOT_FOUND)
}

pub fn no_content() -> Response<ResponseBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = StatusCode::NO_CONTENT;
    response
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

/// The catch-all answer. Only the error's display text is exposed.
pub fn internal_error(error: &DeepLinkError) -> Response<ResponseBody> {
    let body = ErrorBody {
        error: "Internal Server Error",
        message: error.to_string(),
    };
    make_json_response(StatusCode::INTERNAL_SERVER_ERROR, &body)
        .unwrap_or_else(|_| make_error_response(StatusCode::INTERNAL_SERVER_ERROR))
}

#[derive(Serialize)]
struct HealthBody<'a> {
    status: &'a str,
    service: &'a str,
    environment: &'a str,
    version: &'a str,
}

pub fn health(deployment: &Deployment) -> Result<Response<ResponseBody>, DeepLinkError> {
    let body = HealthBody {
        status: "ok",
        service: "linkgate",
        environment: deployment.environment.as_str(),
        version: &deployment.app_version,
    };
    Ok(make_json_response(StatusCode::OK, &body)?)
}

pub fn home(targets: &AppTargets) -> Response<ResponseBody> {
    let body = format!(
        r#"<h1>{APP_NAME}</h1>
<p>Links to memorials open directly in the {APP_NAME} app.</p>
{badges}"#,
        badges = store_badges(targets),
    );
    html(page(APP_NAME, &body, None))
}

fn html(body: String) -> Response<ResponseBody> {
    make_response(StatusCode::OK, TEXT_HTML, body)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn script_literal<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

fn page(title: &str, body: &str, script: Option<&str>) -> String {
    let script = script
        .map(|s| format!("<script>\n{s}\n</script>\n"))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 0; padding: 48px 24px; text-align: center; color: #2d2a32; background: #faf8f5; }}
.button {{ display: block; max-width: 320px; margin: 12px auto; padding: 14px; border-radius: 10px; border: 1px solid #6b5b95; color: #6b5b95; text-decoration: none; }}
.button.primary {{ background: #6b5b95; color: #fff; }}
.hint {{ font-size: 14px; color: #7a7580; }}
</style>
</head>
<body>
{body}
{script}</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn in_app_hint(device: &DeviceDescriptor) -> &'static str {
    if device.is_in_app_browser {
        r#"<p class="hint">If nothing happens, open this page in your browser.</p>"#
    } else {
        ""
    }
}

fn android_page(
    primary_url: &str,
    secondary_url: Option<&str>,
    store_url: &str,
    device: &DeviceDescriptor,
) -> Result<String, DeepLinkError> {
    // Leaving the page (visibility or focus) is taken as the app having
    // opened. Pending timers are not cancelled, they turn into no-ops.
    let script = format!(
        r#"(function () {{
  var primaryUrl = {primary};
  var secondaryUrl = {secondary};
  var storeUrl = {store};
  var opened = false;
  function markOpened() {{ opened = true; }}
  document.addEventListener('visibilitychange', function () {{
    if (document.hidden) {{ markOpened(); }}
  }});
  window.addEventListener('blur', markOpened);
  window.location.replace(primaryUrl);
  setTimeout(function () {{
    if (!opened && !document.hidden && secondaryUrl) {{ window.location.href = secondaryUrl; }}
  }}, {secondary_delay});
  setTimeout(function () {{
    if (!opened && !document.hidden) {{ window.location.href = storeUrl; }}
  }}, {store_delay});
}})();"#,
        primary = script_literal(primary_url)?,
        secondary = script_literal(&secondary_url)?,
        store = script_literal(store_url)?,
        secondary_delay = SECONDARY_ATTEMPT_DELAY.as_millis(),
        store_delay = STORE_FALLBACK_DELAY.as_millis(),
    );

    let alt_button = secondary_url
        .map(|url| {
            format!(
                r#"<a class="button" id="open-app-alt" href="{}">Try another way</a>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Opening {APP_NAME}…</h1>
<a class="button primary" id="open-app" href="{primary}">Open in {APP_NAME}</a>
{alt_button}
<a class="button" id="download" href="{store}">Download {APP_NAME}</a>
{hint}"#,
        primary = escape_html(primary_url),
        store = escape_html(store_url),
        hint = in_app_hint(device),
    );

    Ok(page(APP_NAME, &body, Some(&script)))
}

fn ios_page(
    custom_scheme_url: &str,
    store_url: &str,
    device: &DeviceDescriptor,
) -> Result<String, DeepLinkError> {
    let script = format!(
        r#"(function () {{
  var appUrl = {app};
  var storeUrl = {store};
  var opened = false;
  function markOpened() {{ opened = true; }}
  document.addEventListener('visibilitychange', function () {{
    if (document.hidden) {{ markOpened(); }}
  }});
  window.addEventListener('blur', markOpened);
  window.location.href = appUrl;
  setTimeout(function () {{
    if (!opened && !document.hidden) {{ window.location.href = storeUrl; }}
  }}, {store_delay});
}})();"#,
        app = script_literal(custom_scheme_url)?,
        store = script_literal(store_url)?,
        store_delay = STORE_FALLBACK_DELAY.as_millis(),
    );

    let body = format!(
        r#"<h1>Opening {APP_NAME}…</h1>
<a class="button primary" id="open-app" href="{app}">Open in {APP_NAME}</a>
<a class="button" id="download" href="{store}">Download on the App Store</a>
{hint}"#,
        app = escape_html(custom_scheme_url),
        store = escape_html(store_url),
        hint = in_app_hint(device),
    );

    Ok(page(APP_NAME, &body, Some(&script)))
}

fn store_badges(targets: &AppTargets) -> String {
    format!(
        r#"<a class="button" id="app-store" href="{}">Download on the App Store</a>
<a class="button" id="play-store" href="{}">Get it on Google Play</a>"#,
        escape_html(&targets.ios.app_store_url),
        escape_html(&targets.android.play_store_url),
    )
}

fn desktop_page(kind: ResourceKind, id: &str, targets: &AppTargets) -> String {
    let title = match kind {
        ResourceKind::PublicMemorial => "Public memorial",
        _ => "Memorial",
    };
    let reference = if id.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="hint">Reference: {}</p>"#, escape_html(id))
    };

    let body = format!(
        r#"<h1>{title}</h1>
<p>This memorial can be viewed in the {APP_NAME} app on your phone.</p>
{reference}
{badges}"#,
        badges = store_badges(targets),
    );
    page(title, &body, None)
}

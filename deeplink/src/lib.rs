//! Deep link resolution for the Evermiss memorial app.
//!
//! A request path names a memorial, an invite or a shared item; the
//! User-Agent tells us which client is asking. Together they decide whether
//! to redirect straight into the app, serve a page that walks through native
//! invocation and store fallbacks, or send the visitor to the web.

pub mod config;
pub mod device;
pub mod errors;
pub mod links;
pub mod metrics_defs;
pub mod render;
pub mod resource;
pub mod service;
pub mod strategy;
pub mod targets;

use errors::DeepLinkError;
use service::DeepLinkService;
use shared::http::run_http_service;

pub async fn run(config: config::Config) -> Result<(), DeepLinkError> {
    let service = DeepLinkService::new(&config);
    tracing::info!(
        environment = config.deployment.environment.as_str(),
        web_fallback = %service.targets().web.fallback_base_url,
        "Starting deep link service"
    );

    run_http_service(&config.listener.host, config.listener.port, service).await
}

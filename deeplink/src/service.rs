use crate::config::{Config, Deployment};
use crate::device::classify;
use crate::errors::DeepLinkError;
use crate::metrics_defs::{LINKS_RESOLVED, REQUEST_DURATION};
use crate::render;
use crate::resource::{ResourceRequest, parse_query, route};
use crate::strategy::select;
use crate::targets::AppTargets;
use hyper::body::Incoming;
use hyper::header::USER_AGENT;
use hyper::service::Service;
use hyper::{Method, Request, Response};
use shared::http::{ResponseBody, apply_cors_headers};
use shared::{counter, histogram};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

/// Answers every request on the public listener. Holds only immutable
/// configuration, so one instance serves all connections.
#[derive(Clone)]
pub struct DeepLinkService {
    targets: Arc<AppTargets>,
    deployment: Arc<Deployment>,
}

impl DeepLinkService {
    pub fn new(config: &Config) -> Self {
        Self {
            targets: Arc::new(AppTargets::from_config(config)),
            deployment: Arc::new(config.deployment.clone()),
        }
    }

    pub fn targets(&self) -> &AppTargets {
        &self.targets
    }

    /// Produces the response for one request. Never fails: internal errors
    /// are turned into a 500 here, and CORS headers are attached to every
    /// outcome.
    pub fn handle_request<B>(&self, req: &Request<B>) -> Response<ResponseBody> {
        let start = Instant::now();

        let mut response = match self.respond(req) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %req.uri().path(),
                    "Failed to build response"
                );
                render::internal_error(&e)
            }
        };
        apply_cors_headers(response.headers_mut());

        histogram!(REQUEST_DURATION, "status" => response.status().as_u16().to_string())
            .record(start.elapsed().as_secs_f64());
        response
    }

    fn respond<B>(&self, req: &Request<B>) -> Result<Response<ResponseBody>, DeepLinkError> {
        if *req.method() == Method::OPTIONS {
            return Ok(render::no_content());
        }

        let path = req.uri().path();
        let query = parse_query(req.uri().query());

        let resource = match route(path, &query) {
            Ok(resource) => resource,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Rejected incomplete link");
                return Ok(render::bad_request(&e));
            }
        };

        let link = match resource {
            ResourceRequest::Link(link) => link,
            ResourceRequest::Home => return Ok(render::home(&self.targets)),
            ResourceRequest::Health => return render::health(&self.deployment),
            ResourceRequest::NotFound => {
                tracing::warn!(method = %req.method(), path = %path, "No route matched");
                return Ok(render::not_found());
            }
        };

        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|ua| ua.to_str().ok())
            .unwrap_or_default();
        let device = classify(user_agent);
        let strategy = select(&link, &device, &self.targets);

        tracing::debug!(
            kind = link.kind().as_str(),
            platform = device.platform.as_str(),
            engine = device.browser_engine.as_str(),
            in_app = device.is_in_app_browser,
            user_agent = %device.raw_user_agent,
            strategy = strategy.name(),
            "Selected strategy"
        );
        counter!(
            LINKS_RESOLVED,
            "kind" => link.kind().as_str(),
            "platform" => device.platform.as_str(),
            "strategy" => strategy.name(),
        )
        .increment(1);

        render::render_strategy(&strategy, &device, &self.targets)
    }
}

impl Service<Request<Incoming>> for DeepLinkService {
    type Response = Response<ResponseBody>;
    type Error = DeepLinkError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        // The body is never read; everything needed is in the head.
        let response = self.handle_request(&req);
        Box::pin(async move { Ok(response) })
    }
}

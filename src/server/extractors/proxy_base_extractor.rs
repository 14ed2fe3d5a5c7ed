use axum::Extension;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, Uri};
use axum::http::header::HOST;
use axum::http::request::Parts;
use tracing::debug;

use crate::server::api::proxy_controller::PROXY_PATH;
use crate::server::error::Error;
use crate::server::services::RelayServices;

/// `<scheme>://<host>/proxy` as the client sees it, used to build rewritten playlist links
pub struct ProxyBase(pub String);

fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        // proxies chain these as "a, b", the first one is what the client used
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// public relay endpoint from forwarded headers, falling back to https and the configured host.
/// http/2 clients send no host header, their host only shows up as the uri authority
pub fn proxy_base_from_headers(headers: &HeaderMap, uri: &Uri, default_host: &str) -> String {
    let scheme = first_header_value(headers, "x-forwarded-proto").unwrap_or("https");
    let host = first_header_value(headers, "x-forwarded-host")
        .or_else(|| first_header_value(headers, HOST.as_str()))
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or(default_host);

    format!("{}://{}{}", scheme, host, PROXY_PATH)
}

impl<S> FromRequestParts<S> for ProxyBase
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(services): Extension<RelayServices> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|err| Error::UnexpectedFailure(err.to_string()))?;

        let base =
            proxy_base_from_headers(&parts.headers, &parts.uri, &services.config.public_host);
        debug!("Proxy base for this request: {}", base);

        Ok(ProxyBase(base))
    }
}

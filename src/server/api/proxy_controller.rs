use axum::{
    Extension, Router,
    extract::RawQuery,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{debug, error};

use crate::server::{
    error::{AppResult, Error},
    extractors::ProxyBase,
    services::{RelayServices, egress_services::UpstreamResponse},
    utils::{
        playlist_utils::{PLAYLIST_CONTENT_TYPE, is_playlist, rewrite_playlist},
        url_utils::{extract_url_param, validate_target},
    },
};

pub const PROXY_PATH: &str = "/proxy";

const DEFAULT_BINARY_CONTENT_TYPE: &str = "application/octet-stream";

// playlists can point at rotating segment tokens so nothing downstream may keep them, segments
// themselves are addressed by url and safe to reuse for a while
const PLAYLIST_CACHE_CONTROL: &str = "no-cache";
const BINARY_CACHE_CONTROL: &str = "public, max-age=3600";

pub struct ProxyController;

impl ProxyController {
    pub fn app() -> Router {
        Router::new().route(PROXY_PATH, get(Self::proxy_get).options(Self::proxy_options))
    }

    async fn proxy_get(
        Extension(services): Extension<RelayServices>,
        ProxyBase(proxy_base): ProxyBase,
        RawQuery(query): RawQuery,
    ) -> AppResult<Response> {
        let raw_url = extract_url_param(query.as_deref());
        let target_url = validate_target(raw_url.as_deref()).inspect_err(|e| {
            error!("[Proxy Error] {}: {:?}", e, raw_url.as_deref().unwrap_or(""));
        })?;

        debug!("Proxying: {}", target_url);

        // read per request so the router only ever sees what it's handed
        let policy = services.config.egress_policy();

        let upstream = services
            .fallback
            .fetch(&target_url, &policy)
            .await
            .inspect_err(|e| error!("[Proxy Error] {}: {:?}", target_url, e))?;

        Self::transform(upstream, &target_url, &proxy_base)
            .inspect_err(|e| error!("[Proxy Error] Failed to fetch: {} {}", target_url, e))
    }

    async fn proxy_options() -> impl IntoResponse {
        // cors headers come from the router layer
        StatusCode::NO_CONTENT
    }

    /// turn the final upstream answer into what the player gets
    pub fn transform(
        upstream: UpstreamResponse,
        target_url: &str,
        proxy_base: &str,
    ) -> AppResult<Response> {
        if !upstream.status.is_success() {
            return Err(Error::upstream_rejected(upstream.status));
        }

        let as_playlist = is_playlist(target_url, upstream.content_type());
        debug!(
            "Content-Type: {:?}, detected as playlist: {}",
            upstream.content_type(),
            as_playlist
        );

        if as_playlist {
            // some cdns serve latin-1 junk in comments, that shouldn't kill the whole playlist
            let text = String::from_utf8_lossy(&upstream.body);
            let processed_body = rewrite_playlist(&text, target_url, proxy_base);
            debug!(
                "Processed playlist, response length: {} bytes",
                processed_body.len()
            );
            Ok(Self::build_playlist_response(processed_body))
        } else {
            Ok(Self::build_binary_response(upstream))
        }
    }

    fn build_playlist_response(processed_body: String) -> Response {
        let mut response_headers = HeaderMap::new();
        response_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PLAYLIST_CONTENT_TYPE),
        );
        response_headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(PLAYLIST_CACHE_CONTROL),
        );

        (StatusCode::OK, response_headers, processed_body).into_response()
    }

    fn build_binary_response(upstream: UpstreamResponse) -> Response {
        let content_type = upstream
            .headers
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_BINARY_CONTENT_TYPE));

        let mut response_headers = HeaderMap::new();
        response_headers.insert(header::CONTENT_TYPE, content_type);
        response_headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(BINARY_CACHE_CONTROL),
        );

        debug!("Passing through {} bytes", upstream.body.len());

        (StatusCode::OK, response_headers, upstream.body).into_response()
    }
}

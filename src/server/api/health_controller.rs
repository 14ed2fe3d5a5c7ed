use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

use crate::logger::Logger;
use crate::server::dtos::health_dto::{EgressMode, HealthResponse, HealthStatus};
use crate::server::services::RelayServices;
use crate::server::{get_app_version, get_uptime_seconds};

/// health endpoint, never touches an upstream. a broken forward proxy setting shows up as
/// degraded since every fetch would fail with it
pub async fn health_endpoint(
    Extension(services): Extension<RelayServices>,
) -> (StatusCode, Json<HealthResponse>) {
    let policy = services.config.egress_policy();

    let egress = if policy.forward_proxy_url().is_some() {
        EgressMode::ForwardProxy
    } else {
        EgressMode::Direct
    };

    let status = match policy.validate() {
        Ok(()) => HealthStatus::Healthy,
        Err(_) => HealthStatus::Degraded,
    };

    let response = HealthResponse {
        status,
        timestamp: Utc::now(),
        uptime_seconds: get_uptime_seconds(),
        version: get_app_version().to_string(),
        environment: Logger::environment_name(services.config.cargo_env).to_string(),
        egress,
    };

    // degraded still answers 200, the process itself is fine and the config needs fixing
    (StatusCode::OK, Json(response))
}

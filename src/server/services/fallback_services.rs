use axum::http::StatusCode;
use tracing::{info, warn};

use crate::server::{
    error::AppResult,
    services::egress_services::{DynEgressRouter, EgressPolicy, UpstreamResponse},
    utils::header_profiles::ProfileChain,
};

/// statuses that mean the cdn didn't like who we claimed to be
pub fn should_fall_back(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN
}

/// primary profile first, then exactly one more try with the fallback profile if the cdn blocked
/// us. transport errors and any other status are final
pub struct FallbackRetrier {
    egress: DynEgressRouter,
    profiles: ProfileChain,
}

impl FallbackRetrier {
    pub fn new(egress: DynEgressRouter, profiles: ProfileChain) -> Self {
        Self { egress, profiles }
    }

    pub async fn fetch(&self, target_url: &str, policy: &EgressPolicy) -> AppResult<UpstreamResponse> {
        let primary = &self.profiles.primary;
        let response = self.egress.fetch(target_url, primary, policy).await?;

        if !should_fall_back(response.status) {
            return Ok(response);
        }

        let fallback = &self.profiles.fallback;
        warn!(
            "{} rejected profile {} with {}, retrying as {}",
            target_url, primary.name, response.status, fallback.name
        );

        let retried = self.egress.fetch(target_url, fallback, policy).await?;
        info!("Fallback profile {} got {}", fallback.name, retried.status);

        Ok(retried)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forbidden_triggers_a_fallback() {
        assert!(should_fall_back(StatusCode::FORBIDDEN));
        for status in [
            StatusCode::OK,
            StatusCode::UNAUTHORIZED,
            StatusCode::NOT_FOUND,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            assert!(!should_fall_back(status), "{status}");
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::{config::AppConfig, server::utils::header_profiles::ProfileChain};

use super::{
    egress_services::{DynEgressRouter, ReqwestEgressRouter},
    fallback_services::FallbackRetrier,
};

/// everything a request handler needs, cloned into every request through an Extension. nothing
/// in here is mutable
#[derive(Clone)]
pub struct RelayServices {
    pub fallback: Arc<FallbackRetrier>,
    pub config: Arc<AppConfig>,
}

impl RelayServices {
    pub fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        info!("starting relay services...");

        let timeout = Duration::from_secs(config.upstream_timeout_secs);
        let egress = Arc::new(ReqwestEgressRouter::new(timeout)?) as DynEgressRouter;

        info!("egress router ok (timeout {:?} per attempt)", timeout);

        Ok(Self::with_egress(config, egress))
    }

    /// same wiring with a caller supplied router, mostly so tests can script the upstream
    pub fn with_egress(config: Arc<AppConfig>, egress: DynEgressRouter) -> Self {
        Self {
            fallback: Arc::new(FallbackRetrier::new(egress, ProfileChain::default())),
            config,
        }
    }
}

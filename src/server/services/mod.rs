pub mod egress_services;
pub mod fallback_services;
pub mod relay_services;

pub use egress_services::DynEgressRouter;
pub use relay_services::RelayServices;

//! Application wiring: builds the shared state and the HTTP app.

pub mod config;

pub use config::AppConfig;

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{IdentityVerifier, KeyValueStore};
use crate::domain::{AnalyticsService, ComplianceService, LedgerService, RentalService};
use crate::inbound::http::HttpState;

/// Assemble the handler state from config and adapter instances.
pub fn build_state(
    config: &AppConfig,
    kv: Arc<dyn KeyValueStore>,
    identity: Arc<dyn IdentityVerifier>,
) -> HttpState {
    build_state_with_clock(config, kv, identity, Arc::new(DefaultClock))
}

/// [`build_state`] with an explicit clock, used by tests that pin dates.
pub fn build_state_with_clock(
    config: &AppConfig,
    kv: Arc<dyn KeyValueStore>,
    identity: Arc<dyn IdentityVerifier>,
    clock: Arc<dyn Clock>,
) -> HttpState {
    HttpState {
        identity,
        ledger: Arc::new(LedgerService::new(
            kv.clone(),
            clock.clone(),
            config.cas_retry_budget,
            config.kv_timeout(),
        )),
        compliance: Arc::new(ComplianceService::new(
            kv.clone(),
            clock.clone(),
            config.compliance_policy,
            config.kv_timeout(),
        )),
        analytics: Arc::new(AnalyticsService::new(
            kv.clone(),
            config.fan_out_width,
            config.kv_timeout(),
        )),
        rentals: Arc::new(RentalService::new(kv, clock, config.kv_timeout())),
    }
}

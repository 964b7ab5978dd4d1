//! Server configuration parsed from CLI flags and environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::domain::CompliancePolicy;

/// Runtime configuration for the back-office server.
#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "Rental back-office ledger server")]
pub struct AppConfig {
    /// Socket address to bind the HTTP listener to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Budget of compare-and-set attempts per marker update.
    #[arg(long, env = "CAS_RETRY_BUDGET", default_value_t = 5)]
    pub cas_retry_budget: u32,

    /// Per-call timeout for key/value store operations, in milliseconds.
    #[arg(long, env = "KV_TIMEOUT_MS", default_value_t = 5_000)]
    pub kv_timeout_ms: u64,

    /// Concurrency cap for the owner dashboard's per-operator enrichment.
    #[arg(long, env = "FAN_OUT_WIDTH", default_value_t = 8)]
    pub fan_out_width: usize,

    /// Whether login eligibility decays at daily rollover or stays sticky
    /// once granted.
    #[arg(long, env = "COMPLIANCE_POLICY", value_enum, default_value_t = CompliancePolicy::Sticky)]
    pub compliance_policy: CompliancePolicy,
}

impl AppConfig {
    /// Per-call timeout as a [`Duration`].
    pub fn kv_timeout(&self) -> Duration {
        Duration::from_millis(self.kv_timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        // Defaults double as the test configuration.
        Self {
            bind_addr: ([0, 0, 0, 0], 8080).into(),
            cas_retry_budget: 5,
            kv_timeout_ms: 5_000,
            fan_out_width: 8,
            compliance_policy: CompliancePolicy::Sticky,
        }
    }
}

//! Shared HTTP adapter state.
//!
//! Handlers accept this bundle via `actix_web::web::Data` so they only
//! depend on domain services and ports and stay testable without real I/O.

use std::sync::Arc;

use crate::domain::ports::IdentityVerifier;
use crate::domain::{AnalyticsService, ComplianceService, LedgerService, RentalService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Bearer-token verification port.
    pub identity: Arc<dyn IdentityVerifier>,
    /// Ledger writer.
    pub ledger: Arc<LedgerService>,
    /// Login-eligibility evaluator.
    pub compliance: Arc<ComplianceService>,
    /// Read-only aggregator.
    pub analytics: Arc<AnalyticsService>,
    /// Rental catalogue.
    pub rentals: Arc<RentalService>,
}

//! Domain entities, services, and ports.
//!
//! Everything here is transport agnostic: inbound adapters map these types
//! to HTTP, outbound adapters implement the ports against real storage and
//! identity providers.

pub mod analytics;
pub mod compliance;
pub mod deposit;
mod error;
pub mod expense;
pub mod ledger;
pub mod ports;
mod principal;
pub mod rentals;

pub use self::analytics::{AnalyticsService, AnalyticsSnapshot, OperatorSummary};
pub use self::compliance::{CompliancePolicy, ComplianceService, LoginStatus, UserRecord};
pub use self::deposit::{Deposit, DepositDraft, DepositStatus, Shift};
pub use self::error::{Error, ErrorCode};
pub use self::expense::{Expense, ExpenseDraft, Frequency};
pub use self::ledger::LedgerService;
pub use self::principal::{Principal, Role};
pub use self::rentals::{Category, CategoryDraft, RentalItem, RentalItemDraft, RentalService};

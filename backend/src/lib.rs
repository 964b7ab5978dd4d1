//! Deposit-gated access ledger for a rental back office.
//!
//! An append-only ledger of operator deposits and expenses, a derived
//! per-operator login-eligibility state, an owner-only override path, and
//! on-demand analytics, all built on a namespaced key/value store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;

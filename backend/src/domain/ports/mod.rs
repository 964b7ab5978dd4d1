//! Domain ports for the hexagonal boundary.

mod identity;
mod kv_store;

#[cfg(test)]
pub use identity::MockIdentityVerifier;
pub use identity::{IdentityError, IdentityVerifier};
pub(crate) use kv_store::bounded;
#[cfg(test)]
pub use kv_store::MockKeyValueStore;
#[cfg(test)]
pub(crate) use kv_store::StalledStore;
pub use kv_store::{CasOutcome, KeyValueStore, KvStoreError};

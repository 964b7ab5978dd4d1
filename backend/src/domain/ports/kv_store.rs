//! Port abstraction for the namespaced key/value store.
//!
//! Every persisted entity (deposits, expenses, rental items, user records)
//! is built on this primitive. Its consistency guarantees determine whether
//! the ledger logic above it is correct, so the contract is spelled out in
//! full here and adapters must honour it exactly.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error as ThisError;

/// Errors raised by key/value store adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KvStoreError {
    /// The storage substrate is unreachable or timed out.
    #[error("key/value store unavailable: {message}")]
    Unavailable {
        /// Transport-level failure description.
        message: String,
    },
    /// A read or write failed during execution.
    #[error("key/value store query failed: {message}")]
    Query {
        /// Execution failure description.
        message: String,
    },
    /// A stored value could not be encoded or decoded.
    #[error("key/value store serialization failed: {message}")]
    Serialization {
        /// Codec failure description.
        message: String,
    },
}

impl KvStoreError {
    /// Construct an [`KvStoreError::Unavailable`] error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Construct a [`KvStoreError::Query`] error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Construct a [`KvStoreError::Serialization`] error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The stored value matched the expectation and the write happened.
    Applied,
    /// Another writer got there first; nothing was written.
    Conflict,
}

/// Namespaced key/value store with exact-key access and prefix scans.
///
/// Contract:
/// - `get` and `set` never fail except on transport errors; `set`
///   overwrites unconditionally.
/// - `get_by_prefix` is unordered, may be empty, and must reflect a
///   snapshot no staler than the caller's own most recent `set`
///   (read-your-writes). Each entry carries its originating key so callers
///   can recover the owning entity id.
/// - `compare_and_set` succeeds only when the stored value equals
///   `expected` (`None` meaning the key is absent). It is required for
///   every update to the per-user record; a plain get-then-set pair would
///   silently drop one of two concurrent writers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored at `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, KvStoreError>;

    /// Unconditionally store `value` at `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), KvStoreError>;

    /// Fetch all entries whose key starts with `prefix`.
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, KvStoreError>;

    /// Conditionally store `value` at `key` when the current value equals
    /// `expected`.
    ///
    /// The borrowed expectation needs a named lifetime so the generated
    /// mock can carry it.
    async fn compare_and_set<'a>(
        &self,
        key: &str,
        expected: Option<&'a Value>,
        value: Value,
    ) -> Result<CasOutcome, KvStoreError>;
}

/// Run one store call under the caller-supplied deadline.
///
/// Expiry maps to a retryable unavailability error. The ledger's
/// compare-and-set loop carries its own classification instead, because a
/// timed-out write is an unknown outcome rather than a plain failure.
pub(crate) async fn bounded<T>(
    limit: Duration,
    what: &str,
    call: impl Future<Output = Result<T, KvStoreError>>,
) -> Result<T, crate::domain::Error> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.into()),
        Err(_) => Err(crate::domain::Error::service_unavailable(format!(
            "{what} timed out"
        ))),
    }
}

impl From<KvStoreError> for crate::domain::Error {
    fn from(error: KvStoreError) -> Self {
        match error {
            KvStoreError::Unavailable { message } => {
                Self::service_unavailable(format!("key/value store unavailable: {message}"))
            }
            KvStoreError::Query { message } => {
                Self::internal(format!("key/value store query failed: {message}"))
            }
            KvStoreError::Serialization { message } => {
                Self::internal(format!("key/value store serialization failed: {message}"))
            }
        }
    }
}

/// Store double whose calls never resolve; drives timeout coverage in the
/// service suites.
#[cfg(test)]
pub(crate) struct StalledStore;

#[cfg(test)]
#[async_trait]
impl KeyValueStore for StalledStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, KvStoreError> {
        futures_util::future::pending().await
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), KvStoreError> {
        futures_util::future::pending().await
    }

    async fn get_by_prefix(&self, _prefix: &str) -> Result<Vec<(String, Value)>, KvStoreError> {
        futures_util::future::pending().await
    }

    async fn compare_and_set<'a>(
        &self,
        _key: &str,
        _expected: Option<&'a Value>,
        _value: Value,
    ) -> Result<CasOutcome, KvStoreError> {
        futures_util::future::pending().await
    }
}

//! Per-operator login eligibility derived from the deposit ledger.
//!
//! The compliance marker lives on the same `user_{id}` record as the
//! signup profile, so marker updates must preserve profile fields they do
//! not understand. It is the only mutable state an operator and the owner
//! can race on; every update goes through compare-and-set.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ports::{bounded, KeyValueStore};
use super::{Error, Role};

/// Key prefix shared by all user records.
pub const USER_PREFIX: &str = "user_";

/// Storage key for the singleton per-user record.
pub fn user_key(user_id: Uuid) -> String {
    format!("user_{user_id}")
}

/// Mutable per-user record: signup profile plus the compliance marker.
///
/// Unknown fields are retained through `extra` so a marker update never
/// drops profile data written by other paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Display name recorded at signup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account role; operators are subject to the deposit gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Business date of the most recent qualifying deposit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deposit: Option<NaiveDate>,
    /// Sticky eligibility flag set by deposits and overrides.
    #[serde(default)]
    pub can_login: bool,
    /// Profile fields this module does not interpret.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Merge a qualifying deposit into the marker.
    ///
    /// The merge is deterministic regardless of writer order: the newest
    /// deposit date wins and eligibility becomes true if either concurrent
    /// writer supplied it.
    pub fn merge_deposit(&mut self, date: NaiveDate) {
        self.last_deposit = Some(self.last_deposit.map_or(date, |prior| prior.max(date)));
        self.can_login = true;
    }

    /// Shallow-merge arbitrary profile fields into this record.
    ///
    /// Returns the merged record without mutating `self`; fails when an
    /// update conflicts with a typed field (for example a non-boolean
    /// `canLogin`).
    pub fn merged_fields(&self, updates: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            for (key, update) in updates {
                fields.insert(key.clone(), update.clone());
            }
        }
        serde_json::from_value(value)
    }

    /// Force the marker to owner-asserted values.
    ///
    /// Unlike [`UserRecord::merge_deposit`] the supplied date is taken as
    /// is, even when older than the stored one: the owner is asserting
    /// ground truth the ledger cannot otherwise observe.
    pub fn apply_override(&mut self, date: NaiveDate) {
        self.last_deposit = Some(date);
        self.can_login = true;
    }
}

/// How eligibility decays once granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CompliancePolicy {
    /// `can_login` is never cleared once set, so the gate is
    /// one-directional after any qualifying deposit.
    #[default]
    Sticky,
    /// Recompute eligibility purely from the last deposit date, which is
    /// the read-time equivalent of clearing the flag at daily rollover.
    DailyRollover,
}

/// Result of a login-eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    /// Whether the operator may log in right now.
    pub can_login: bool,
    /// Business date of the most recent qualifying deposit, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_deposit: Option<NaiveDate>,
}

/// Pure eligibility predicate over a marker snapshot.
///
/// Never mutates anything; state only changes via deposit and override
/// paths.
pub fn evaluate(record: &UserRecord, as_of: NaiveDate, policy: CompliancePolicy) -> LoginStatus {
    let deposited_yesterday = record
        .last_deposit
        .zip(as_of.checked_sub_days(Days::new(1)))
        .is_some_and(|(deposited, yesterday)| deposited == yesterday);
    let can_login = match policy {
        CompliancePolicy::Sticky => deposited_yesterday || record.can_login,
        CompliancePolicy::DailyRollover => deposited_yesterday,
    };
    LoginStatus {
        can_login,
        last_deposit: record.last_deposit,
    }
}

/// Read-side evaluator answering login checks from the stored marker.
pub struct ComplianceService {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    policy: CompliancePolicy,
    op_timeout: Duration,
}

impl ComplianceService {
    /// Create an evaluator over the given store and clock.
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        policy: CompliancePolicy,
        op_timeout: Duration,
    ) -> Self {
        Self {
            kv,
            clock,
            policy,
            op_timeout,
        }
    }

    /// Check whether an operator may log in as of the current instant.
    ///
    /// A missing marker means the operator has never deposited and is
    /// blocked.
    pub async fn check_login(&self, operator_id: Uuid) -> Result<LoginStatus, Error> {
        let record = bounded(
            self.op_timeout,
            "login check read",
            self.kv.get(&user_key(operator_id)),
        )
        .await?
        .map(|value| {
            serde_json::from_value::<UserRecord>(value).map_err(|err| {
                Error::internal(format!("corrupt user record for {operator_id}: {err}"))
            })
        })
        .transpose()?
        .unwrap_or_default();
        let as_of = self.clock.utc().date_naive();
        Ok(evaluate(&record, as_of, self.policy))
    }
}

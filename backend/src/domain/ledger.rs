//! Ledger writer: append-only deposit and expense records plus the
//! compare-and-set discipline around the per-operator marker.
//!
//! A deposit submission is a two-step write: the immutable record first,
//! then the marker update. The pair is deliberately not a transaction; a
//! failure between the two surfaces as a partial-write error carrying the
//! operator and deposit ids so the ledger can be reconciled, and the record
//! itself is never rolled back because it may represent real money.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mockable::Clock;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::compliance::{user_key, UserRecord};
use super::deposit::{deposit_key, deposit_prefix, Deposit, DepositDraft, DepositStatus, Shift};
use super::expense::{expense_key, expense_prefix, Expense, ExpenseDraft};
use super::ports::{CasOutcome, KeyValueStore, KvStoreError};
use super::{Error, Principal};

/// Outcome classification for a single store call.
enum CallFailure {
    /// The call did not return within the budgeted time; the outcome is
    /// unknown and the logical operation must be re-run from a fresh read.
    TimedOut,
    /// The store reported a definite failure.
    Store(KvStoreError),
}

/// Writer over the append-only ledger and the per-user record.
pub struct LedgerService {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    cas_retry_budget: u32,
    op_timeout: Duration,
}

impl LedgerService {
    /// Create a writer with the given retry budget and per-call timeout.
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        cas_retry_budget: u32,
        op_timeout: Duration,
    ) -> Self {
        Self {
            kv,
            clock,
            cas_retry_budget,
            op_timeout,
        }
    }

    /// Record a normal operator deposit and refresh the operator's marker.
    ///
    /// Validation happens before any write. The marker update runs as a
    /// bounded compare-and-set loop so a concurrent deposit or override
    /// never loses its eligibility signal.
    pub async fn record_deposit(
        &self,
        operator_id: Uuid,
        draft: DepositDraft,
    ) -> Result<Deposit, Error> {
        let (cash_amount, qris_amount) = draft.validate()?;
        let now = self.clock.utc();
        let today = now.date_naive();
        let deposit = Deposit {
            id: Uuid::new_v4(),
            user_id: operator_id,
            cash_amount,
            qris_amount,
            manual_amount: 0,
            shift: draft.shift,
            notes: draft.notes.unwrap_or_default(),
            date: today,
            timestamp: now,
            status: DepositStatus::Completed,
        };
        self.append(&deposit_key(operator_id, deposit.id), &deposit)
            .await?;
        info!(%operator_id, deposit_id = %deposit.id, "deposit recorded");
        self.refresh_marker(operator_id, deposit.id, |record| {
            record.merge_deposit(today);
        })
        .await?;
        Ok(deposit)
    }

    /// Owner-asserted deposit that bypasses the normal compliance flow.
    ///
    /// Only the owner role may call this; the marker is forced to the
    /// supplied date regardless of its relation to "yesterday".
    pub async fn manual_override(
        &self,
        principal: Principal,
        operator_id: Uuid,
        amount: i64,
        notes: Option<String>,
        date: NaiveDate,
    ) -> Result<Deposit, Error> {
        if !principal.is_owner() {
            return Err(Error::forbidden("owner access required"));
        }
        if amount <= 0 {
            return Err(Error::invalid_request("override amount must be positive")
                .with_details(json!({ "field": "amount", "value": amount })));
        }
        let deposit = Deposit {
            id: Uuid::new_v4(),
            user_id: operator_id,
            cash_amount: 0,
            qris_amount: 0,
            manual_amount: amount,
            shift: Shift::Manual,
            notes: notes.unwrap_or_else(|| "Manual override by owner".into()),
            date,
            timestamp: self.clock.utc(),
            status: DepositStatus::ManualOverride,
        };
        self.append(&deposit_key(operator_id, deposit.id), &deposit)
            .await?;
        warn!(
            owner = %principal.id,
            %operator_id,
            deposit_id = %deposit.id,
            "manual override recorded"
        );
        self.refresh_marker(operator_id, deposit.id, |record| {
            record.apply_override(date);
        })
        .await?;
        Ok(deposit)
    }

    /// Append an immutable expense record.
    pub async fn record_expense(&self, user_id: Uuid, draft: ExpenseDraft) -> Result<Expense, Error> {
        draft.validate()?;
        let expense = Expense {
            id: Uuid::new_v4(),
            user_id,
            name: draft.name,
            amount: draft.amount,
            category: draft.category,
            due_date: draft.due_date,
            is_recurring: draft.is_recurring,
            frequency: draft.frequency,
            notes: draft.notes.unwrap_or_default(),
            status: "upcoming".into(),
            created_at: self.clock.utc(),
        };
        self.append(&expense_key(user_id, expense.id), &expense)
            .await?;
        Ok(expense)
    }

    /// List all deposit records for one user.
    pub async fn list_deposits(&self, user_id: Uuid) -> Result<Vec<Deposit>, Error> {
        self.scan(&deposit_prefix(user_id)).await
    }

    /// List all expense records for one user.
    pub async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<Expense>, Error> {
        self.scan(&expense_prefix(user_id)).await
    }

    /// Owner-only shallow merge of profile fields into a user record.
    ///
    /// The record is the same mutable row the compliance marker lives on,
    /// so the update goes through the same compare-and-set loop.
    pub async fn update_operator(
        &self,
        principal: Principal,
        operator_id: Uuid,
        updates: Map<String, Value>,
    ) -> Result<UserRecord, Error> {
        if !principal.is_owner() {
            return Err(Error::forbidden("owner access required"));
        }
        // Surface type mismatches (say, a non-boolean canLogin) before
        // entering the retry loop.
        UserRecord::default()
            .merged_fields(&updates)
            .map_err(|err| {
                Error::invalid_request(format!("invalid operator update: {err}"))
            })?;
        self.update_user_record(operator_id, |record| {
            if let Ok(merged) = record.merged_fields(&updates) {
                *record = merged;
            }
        })
        .await
    }

    /// Write a freshly identified record; overwrite is impossible because
    /// the key embeds a new UUID.
    async fn append<T: serde::Serialize>(&self, key: &str, record: &T) -> Result<(), Error> {
        let value = serde_json::to_value(record)
            .map_err(|err| Error::internal(format!("failed to encode record: {err}")))?;
        match self.bounded(self.kv.set(key, value)).await {
            Ok(()) => Ok(()),
            Err(CallFailure::TimedOut) => Err(Error::service_unavailable(
                "ledger write timed out; resubmit the operation",
            )),
            Err(CallFailure::Store(err)) => Err(err.into()),
        }
    }

    async fn scan<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, Error> {
        let entries = match self.bounded(self.kv.get_by_prefix(prefix)).await {
            Ok(entries) => entries,
            Err(CallFailure::TimedOut) => {
                return Err(Error::service_unavailable("ledger scan timed out"));
            }
            Err(CallFailure::Store(err)) => return Err(err.into()),
        };
        entries
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value(value)
                    .map_err(|err| Error::internal(format!("corrupt record at {key}: {err}")))
            })
            .collect()
    }

    /// Marker update wrapper that converts a failed update after a
    /// successful record write into a partial-write error.
    async fn refresh_marker<F>(
        &self,
        operator_id: Uuid,
        deposit_id: Uuid,
        apply: F,
    ) -> Result<(), Error>
    where
        F: Fn(&mut UserRecord),
    {
        if let Err(err) = self.update_user_record(operator_id, apply).await {
            error!(
                %operator_id,
                %deposit_id,
                error = %err,
                "deposit recorded but marker update failed; record kept for reconciliation"
            );
            return Err(Error::partial_write(
                "deposit recorded but the login marker was not updated",
            )
            .with_details(json!({
                "operatorId": operator_id,
                "depositId": deposit_id,
            })));
        }
        Ok(())
    }

    /// Read-merge-write loop over the per-user record.
    ///
    /// Each attempt starts from a fresh read. A timed-out call is an
    /// unknown outcome and also restarts from a fresh read, which is safe
    /// because the merge is idempotent by value.
    async fn update_user_record<F>(&self, user_id: Uuid, apply: F) -> Result<UserRecord, Error>
    where
        F: Fn(&mut UserRecord),
    {
        let key = user_key(user_id);
        let mut timed_out = false;
        for _ in 0..self.cas_retry_budget {
            let current = match self.bounded(self.kv.get(&key)).await {
                Ok(value) => value,
                Err(CallFailure::TimedOut) => {
                    timed_out = true;
                    continue;
                }
                Err(CallFailure::Store(err)) => return Err(err.into()),
            };
            let mut record = match &current {
                Some(value) => serde_json::from_value::<UserRecord>(value.clone()).map_err(
                    |err| Error::internal(format!("corrupt user record for {user_id}: {err}")),
                )?,
                None => UserRecord::default(),
            };
            apply(&mut record);
            let new_value = serde_json::to_value(&record)
                .map_err(|err| Error::internal(format!("failed to encode user record: {err}")))?;
            match self
                .bounded(self.kv.compare_and_set(&key, current.as_ref(), new_value))
                .await
            {
                Ok(CasOutcome::Applied) => return Ok(record),
                Ok(CasOutcome::Conflict) => {
                    timed_out = false;
                    continue;
                }
                Err(CallFailure::TimedOut) => {
                    timed_out = true;
                    continue;
                }
                Err(CallFailure::Store(err)) => return Err(err.into()),
            }
        }
        if timed_out {
            Err(Error::service_unavailable(
                "user record update timed out; resubmit the operation",
            ))
        } else {
            Err(Error::conflict(
                "user record update lost the race repeatedly; resubmit the operation",
            ))
        }
    }

    /// Apply the caller-supplied timeout to one store call.
    async fn bounded<T, Fut>(&self, call: Fut) -> Result<T, CallFailure>
    where
        Fut: Future<Output = Result<T, KvStoreError>>,
    {
        match tokio::time::timeout(self.op_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(CallFailure::Store(err)),
            Err(_) => Err(CallFailure::TimedOut),
        }
    }
}

//! Deposit ledger records.
//!
//! Deposits are immutable once written: the ledger is append-only and a
//! record may represent real money received, so nothing ever mutates or
//! deletes one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;

/// Key prefix for deposit records belonging to one user.
pub fn deposit_prefix(user_id: Uuid) -> String {
    format!("deposit_{user_id}_")
}

/// Storage key for a single deposit record.
pub fn deposit_key(user_id: Uuid, deposit_id: Uuid) -> String {
    format!("deposit_{user_id}_{deposit_id}")
}

/// Shift during which a deposit was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    /// Morning collection shift.
    Morning,
    /// Afternoon collection shift.
    Afternoon,
    /// Night collection shift.
    Night,
    /// Synthetic shift used by owner overrides.
    Manual,
}

/// Lifecycle status of a deposit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    /// Normal operator submission.
    Completed,
    /// Owner-asserted ground truth bypassing the deposit flow.
    ManualOverride,
}

/// Immutable deposit ledger record.
///
/// Normal submissions carry cash and/or QRIS amounts with `manual_amount`
/// zero; override records carry only `manual_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    /// Record identifier, freshly generated per submission.
    pub id: Uuid,
    /// Operator whose ledger this record belongs to.
    pub user_id: Uuid,
    /// Cash amount in minor currency units.
    pub cash_amount: i64,
    /// QRIS amount in minor currency units.
    pub qris_amount: i64,
    /// Owner-asserted amount set only by manual overrides.
    #[serde(default)]
    pub manual_amount: i64,
    /// Collection shift.
    pub shift: Shift,
    /// Free-form operator notes.
    pub notes: String,
    /// Business date of the deposit.
    pub date: NaiveDate,
    /// Instant the record was written.
    pub timestamp: DateTime<Utc>,
    /// Submission path that produced the record.
    pub status: DepositStatus,
}

impl Deposit {
    /// Sum of all amount fields; the record's contribution to income.
    pub fn total_amount(&self) -> i64 {
        self.cash_amount + self.qris_amount + self.manual_amount
    }
}

/// Operator-supplied fields for a normal deposit submission.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositDraft {
    /// Cash amount; absent means zero.
    #[serde(default)]
    pub cash_amount: Option<i64>,
    /// QRIS amount; absent means zero.
    #[serde(default)]
    pub qris_amount: Option<i64>,
    /// Collection shift.
    pub shift: Shift,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl DepositDraft {
    /// Validate the draft, resolving defaults.
    ///
    /// Negative amounts are rejected before any write happens.
    pub fn validate(&self) -> Result<(i64, i64), Error> {
        let cash = self.cash_amount.unwrap_or(0);
        let qris = self.qris_amount.unwrap_or(0);
        if cash < 0 {
            return Err(Error::invalid_request("cash amount must not be negative")
                .with_details(json!({ "field": "cashAmount", "value": cash })));
        }
        if qris < 0 {
            return Err(Error::invalid_request("qris amount must not be negative")
                .with_details(json!({ "field": "qrisAmount", "value": qris })));
        }
        Ok((cash, qris))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn draft(cash: Option<i64>, qris: Option<i64>) -> DepositDraft {
        DepositDraft {
            cash_amount: cash,
            qris_amount: qris,
            shift: Shift::Morning,
            notes: None,
        }
    }

    #[rstest]
    #[case(Some(350_000), Some(150_000), (350_000, 150_000))]
    #[case(None, Some(150_000), (0, 150_000))]
    #[case(None, None, (0, 0))]
    fn validate_resolves_defaults(
        #[case] cash: Option<i64>,
        #[case] qris: Option<i64>,
        #[case] expected: (i64, i64),
    ) {
        assert_eq!(draft(cash, qris).validate().expect("valid"), expected);
    }

    #[rstest]
    #[case(Some(-1), None)]
    #[case(None, Some(-500))]
    fn validate_rejects_negative_amounts(#[case] cash: Option<i64>, #[case] qris: Option<i64>) {
        let error = draft(cash, qris).validate().expect_err("must fail");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn serde_uses_camel_case_and_snake_case_enums() {
        let record = Deposit {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            cash_amount: 10,
            qris_amount: 0,
            manual_amount: 0,
            shift: Shift::Night,
            notes: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 8, 23).expect("valid date"),
            timestamp: Utc::now(),
            status: DepositStatus::Completed,
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["cashAmount"], 10);
        assert_eq!(value["shift"], "night");
        assert_eq!(value["status"], "completed");
    }
}

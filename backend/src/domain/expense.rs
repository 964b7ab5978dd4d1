//! Expense ledger records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;

/// Key prefix for expense records belonging to one user.
pub fn expense_prefix(user_id: Uuid) -> String {
    format!("expense_{user_id}_")
}

/// Storage key for a single expense record.
pub fn expense_key(user_id: Uuid, expense_id: Uuid) -> String {
    format!("expense_{user_id}_{expense_id}")
}

/// Recurrence cadence of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
    /// Does not repeat.
    OneTime,
}

/// Immutable expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Record identifier.
    pub id: Uuid,
    /// User whose ledger this record belongs to.
    pub user_id: Uuid,
    /// Expense label.
    pub name: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// Free-form category label.
    pub category: String,
    /// Date the expense falls due.
    pub due_date: NaiveDate,
    /// Whether the expense repeats.
    pub is_recurring: bool,
    /// Cadence when recurring; absent for ad-hoc expenses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    /// Free-form notes.
    pub notes: String,
    /// Lifecycle status; initialised to `upcoming`.
    pub status: String,
    /// Instant the record was written.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new expense.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    /// Expense label.
    pub name: String,
    /// Amount in minor currency units.
    pub amount: i64,
    /// Free-form category label.
    pub category: String,
    /// Date the expense falls due.
    pub due_date: NaiveDate,
    /// Whether the expense repeats.
    #[serde(default)]
    pub is_recurring: bool,
    /// Cadence when recurring.
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExpenseDraft {
    /// Validate the draft before any write.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_request("expense name must not be empty")
                .with_details(json!({ "field": "name" })));
        }
        if self.amount < 0 {
            return Err(Error::invalid_request("amount must not be negative")
                .with_details(json!({ "field": "amount", "value": self.amount })));
        }
        Ok(())
    }
}

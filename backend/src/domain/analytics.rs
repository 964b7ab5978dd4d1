//! Read-only aggregation over the ledger.
//!
//! Snapshots are recomputed per request from prefix scans; nothing here
//! mutates state, so these calls are safe to run concurrently with writers
//! and may observe an in-flight submission.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::compliance::{UserRecord, USER_PREFIX};
use super::deposit::{deposit_prefix, Deposit};
use super::expense::{expense_prefix, Expense, Frequency};
use super::ports::{bounded, KeyValueStore};
use super::{Error, Principal, Role};

/// Derived income/expense metrics for one user; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    /// Sum of cash, QRIS, and manual amounts across all deposits.
    pub total_income: i64,
    /// Sum of all expense amounts.
    pub total_expenses: i64,
    /// Sum of recurring monthly expense amounts.
    pub monthly_recurring_expenses: i64,
    /// Income minus expenses.
    pub net_balance: i64,
    /// Monthly recurring expenses double as the break-even threshold.
    pub break_even_point: i64,
    /// Number of deposit records scanned.
    pub deposits_count: usize,
    /// Number of expense records scanned.
    pub expenses_count: usize,
}

/// One operator enriched with deposit totals for the owner dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSummary {
    /// Operator account id, recovered from the scanned key.
    pub id: Uuid,
    /// Profile and marker fields as stored.
    #[serde(flatten)]
    pub record: UserRecord,
    /// Lifetime deposit total across all amount fields.
    pub total_deposits: i64,
    /// Number of deposit records.
    pub deposits_count: usize,
}

/// Aggregator computing analytics and owner dashboards on demand.
pub struct AnalyticsService {
    kv: Arc<dyn KeyValueStore>,
    fan_out_width: usize,
    op_timeout: Duration,
}

impl AnalyticsService {
    /// Create an aggregator; `fan_out_width` bounds the per-operator
    /// enrichment concurrency and `op_timeout` caps each store call.
    pub fn new(kv: Arc<dyn KeyValueStore>, fan_out_width: usize, op_timeout: Duration) -> Self {
        Self {
            kv,
            fan_out_width: fan_out_width.max(1),
            op_timeout,
        }
    }

    /// Compute the income/expense snapshot for one user.
    pub async fn analytics(&self, user_id: Uuid) -> Result<AnalyticsSnapshot, Error> {
        let deposits = self.scan::<Deposit>(&deposit_prefix(user_id)).await?;
        let expenses = self.scan::<Expense>(&expense_prefix(user_id)).await?;

        let total_income: i64 = deposits.iter().map(Deposit::total_amount).sum();
        let total_expenses: i64 = expenses.iter().map(|expense| expense.amount).sum();
        let monthly_recurring_expenses: i64 = expenses
            .iter()
            .filter(|expense| expense.is_recurring && expense.frequency == Some(Frequency::Monthly))
            .map(|expense| expense.amount)
            .sum();

        Ok(AnalyticsSnapshot {
            total_income,
            total_expenses,
            monthly_recurring_expenses,
            net_balance: total_income - total_expenses,
            break_even_point: monthly_recurring_expenses,
            deposits_count: deposits.len(),
            expenses_count: expenses.len(),
        })
    }

    /// Owner-only operator listing enriched with deposit totals.
    ///
    /// The per-operator enrichment shares no mutable state, so it runs as
    /// unordered parallel scans capped at the configured fan-out width
    /// rather than a sequential loop.
    pub async fn list_operators(
        &self,
        principal: Principal,
    ) -> Result<Vec<OperatorSummary>, Error> {
        if !principal.is_owner() {
            return Err(Error::forbidden("owner access required"));
        }

        let users = bounded(
            self.op_timeout,
            "operator scan",
            self.kv.get_by_prefix(USER_PREFIX),
        )
        .await?;

        let operators = users
            .into_iter()
            .filter_map(|(key, value)| {
                // Singleton user keys carry no trailing entity id; anything
                // else under the prefix (none today) is skipped.
                let id = key.strip_prefix(USER_PREFIX)?.parse::<Uuid>().ok()?;
                let record = serde_json::from_value::<UserRecord>(value).ok()?;
                (record.role == Some(Role::Operator)).then_some((id, record))
            })
            .collect::<Vec<_>>();

        let mut summaries: Vec<OperatorSummary> = stream::iter(operators)
            .map(|(id, record)| async move {
                let deposits = self.scan::<Deposit>(&deposit_prefix(id)).await?;
                Ok::<_, Error>(OperatorSummary {
                    id,
                    record,
                    total_deposits: deposits.iter().map(Deposit::total_amount).sum(),
                    deposits_count: deposits.len(),
                })
            })
            .buffer_unordered(self.fan_out_width)
            .try_collect()
            .await?;

        // Unordered collection; give the dashboard a stable order.
        summaries.sort_by_key(|summary| summary.id);
        Ok(summaries)
    }

    async fn scan<T: serde::de::DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, Error> {
        let entries: Vec<(String, Value)> =
            bounded(self.op_timeout, "ledger scan", self.kv.get_by_prefix(prefix)).await?;
        entries
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value(value)
                    .map_err(|err| Error::internal(format!("corrupt record at {key}: {err}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::user_key;
    use crate::domain::ports::StalledStore;
    use crate::domain::ErrorCode;
    use crate::outbound::MemoryKvStore;
    use rstest::rstest;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn deposit_json(user: Uuid, id: &str, cash: i64, qris: i64, manual: i64) -> (String, Value) {
        (
            format!("deposit_{user}_{id}"),
            json!({
                "id": Uuid::new_v4(),
                "userId": user,
                "cashAmount": cash,
                "qrisAmount": qris,
                "manualAmount": manual,
                "shift": "morning",
                "notes": "",
                "date": "2026-08-22",
                "timestamp": "2026-08-22T09:30:00Z",
                "status": "completed",
            }),
        )
    }

    fn expense_json(user: Uuid, id: &str, amount: i64, recurring: bool) -> (String, Value) {
        (
            format!("expense_{user}_{id}"),
            json!({
                "id": Uuid::new_v4(),
                "userId": user,
                "name": "rent",
                "amount": amount,
                "category": "fixed",
                "dueDate": "2026-09-01",
                "isRecurring": recurring,
                "frequency": recurring.then_some("monthly"),
                "notes": "",
                "status": "upcoming",
                "createdAt": "2026-08-22T09:30:00Z",
            }),
        )
    }

    async fn seeded_store(user: Uuid) -> Arc<MemoryKvStore> {
        let kv = Arc::new(MemoryKvStore::new());
        for (key, value) in [
            deposit_json(user, "a", 350_000, 150_000, 0),
            deposit_json(user, "b", 0, 0, 500_000),
            expense_json(user, "a", 200_000, true),
            expense_json(user, "b", 75_000, false),
        ] {
            kv.seed(key, value).await;
        }
        kv
    }

    #[rstest]
    #[tokio::test]
    async fn analytics_sums_every_amount_field() {
        let user = Uuid::new_v4();
        let service = AnalyticsService::new(seeded_store(user).await, 4, TIMEOUT);

        let snapshot = service.analytics(user).await.expect("analytics");
        assert_eq!(snapshot.total_income, 1_000_000);
        assert_eq!(snapshot.total_expenses, 275_000);
        assert_eq!(snapshot.monthly_recurring_expenses, 200_000);
        assert_eq!(snapshot.net_balance, 725_000);
        assert_eq!(snapshot.break_even_point, 200_000);
        assert_eq!(snapshot.deposits_count, 2);
        assert_eq!(snapshot.expenses_count, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn analytics_is_idempotent_between_writes() {
        let user = Uuid::new_v4();
        let service = AnalyticsService::new(seeded_store(user).await, 4, TIMEOUT);

        let first = service.analytics(user).await.expect("analytics");
        let second = service.analytics(user).await.expect("analytics");
        assert_eq!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn analytics_for_an_empty_ledger_is_all_zero() {
        let service = AnalyticsService::new(Arc::new(MemoryKvStore::new()), 4, TIMEOUT);
        let snapshot = service.analytics(Uuid::new_v4()).await.expect("analytics");
        assert_eq!(snapshot.total_income, 0);
        assert_eq!(snapshot.deposits_count, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn list_operators_filters_roles_and_enriches_totals() {
        let operator = Uuid::new_v4();
        let other_owner = Uuid::new_v4();
        let kv = seeded_store(operator).await;
        kv.seed(
            user_key(operator),
            json!({ "name": "Budi", "role": "operator", "canLogin": true }),
        )
        .await;
        kv.seed(
            user_key(other_owner),
            json!({ "name": "Ibu", "role": "owner" }),
        )
        .await;

        let service = AnalyticsService::new(kv, 4, TIMEOUT);
        let owner = Principal::new(Uuid::new_v4(), Role::Owner);
        let summaries = service.list_operators(owner).await.expect("list");

        assert_eq!(summaries.len(), 1, "owners are filtered out");
        let summary = summaries.first().expect("one operator");
        assert_eq!(summary.id, operator, "id recovered from the scanned key");
        assert_eq!(summary.total_deposits, 1_000_000);
        assert_eq!(summary.deposits_count, 2);
        assert_eq!(summary.record.name.as_deref(), Some("Budi"));
    }

    #[rstest]
    #[tokio::test]
    async fn scans_fail_fast_when_the_store_stalls() {
        let service = AnalyticsService::new(Arc::new(StalledStore), 4, Duration::from_millis(10));

        let error = service
            .analytics(Uuid::new_v4())
            .await
            .expect_err("must time out");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);

        let owner = Principal::new(Uuid::new_v4(), Role::Owner);
        let error = service
            .list_operators(owner)
            .await
            .expect_err("must time out");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn list_operators_requires_the_owner_role() {
        let service = AnalyticsService::new(Arc::new(MemoryKvStore::new()), 4, TIMEOUT);
        let caller = Principal::new(Uuid::new_v4(), Role::Operator);
        let error = service.list_operators(caller).await.expect_err("must fail");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }
}

//! Rental catalogue entities: items offered for rent and their categories.
//!
//! Both are immutable appends on the same keyed store as the ledger.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ports::{bounded, KeyValueStore};
use super::Error;

fn item_key(user_id: Uuid, item_id: Uuid) -> String {
    format!("rental_item_{user_id}_{item_id}")
}

fn item_prefix(user_id: Uuid) -> String {
    format!("rental_item_{user_id}_")
}

fn category_key(user_id: Uuid, category_id: Uuid) -> String {
    format!("category_{user_id}_{category_id}")
}

fn category_prefix(user_id: Uuid) -> String {
    format!("category_{user_id}_")
}

/// An item offered for rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalItem {
    /// Record identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Item label.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Free-form description.
    pub description: String,
    /// Hourly rate in minor currency units.
    pub price_per_hour: i64,
    /// Daily rate in minor currency units.
    pub price_per_day: i64,
    /// Units owned.
    pub total_units: u32,
    /// Units currently rentable; starts equal to `total_units`.
    pub available_units: u32,
    /// Availability status; initialised to `available`.
    pub status: String,
    /// Instant the record was written.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new rental item.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalItemDraft {
    /// Item label.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Hourly rate in minor currency units.
    pub price_per_hour: i64,
    /// Daily rate in minor currency units.
    pub price_per_day: i64,
    /// Units owned.
    pub total_units: u32,
}

impl RentalItemDraft {
    fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_request("item name must not be empty")
                .with_details(json!({ "field": "name" })));
        }
        if self.price_per_hour < 0 || self.price_per_day < 0 {
            return Err(Error::invalid_request("prices must not be negative"));
        }
        Ok(())
    }
}

/// A user-defined expense or item category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Record identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Category label.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Icon hint for the dashboard.
    pub icon: String,
    /// Colour hint for the dashboard.
    pub color: String,
    /// Instant the record was written.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new category.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    /// Category label.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Icon hint.
    #[serde(default)]
    pub icon: Option<String>,
    /// Colour hint.
    #[serde(default)]
    pub color: Option<String>,
}

/// Catalogue writer and reader.
pub struct RentalService {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    op_timeout: Duration,
}

impl RentalService {
    /// Create a catalogue service over the given store and clock.
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, op_timeout: Duration) -> Self {
        Self {
            kv,
            clock,
            op_timeout,
        }
    }

    /// Append a rental item.
    pub async fn add_item(&self, user_id: Uuid, draft: RentalItemDraft) -> Result<RentalItem, Error> {
        draft.validate()?;
        let item = RentalItem {
            id: Uuid::new_v4(),
            user_id,
            name: draft.name,
            category: draft.category,
            description: draft.description.unwrap_or_default(),
            price_per_hour: draft.price_per_hour,
            price_per_day: draft.price_per_day,
            total_units: draft.total_units,
            available_units: draft.total_units,
            status: "available".into(),
            created_at: self.clock.utc(),
        };
        self.append(&item_key(user_id, item.id), &item).await?;
        Ok(item)
    }

    /// List all rental items for one user.
    pub async fn list_items(&self, user_id: Uuid) -> Result<Vec<RentalItem>, Error> {
        self.scan(&item_prefix(user_id)).await
    }

    /// Append a category.
    pub async fn add_category(&self, user_id: Uuid, draft: CategoryDraft) -> Result<Category, Error> {
        if draft.name.trim().is_empty() {
            return Err(Error::invalid_request("category name must not be empty")
                .with_details(json!({ "field": "name" })));
        }
        let category = Category {
            id: Uuid::new_v4(),
            user_id,
            name: draft.name,
            description: draft.description.unwrap_or_default(),
            icon: draft.icon.unwrap_or_default(),
            color: draft.color.unwrap_or_default(),
            created_at: self.clock.utc(),
        };
        self.append(&category_key(user_id, category.id), &category)
            .await?;
        Ok(category)
    }

    /// List all categories for one user.
    pub async fn list_categories(&self, user_id: Uuid) -> Result<Vec<Category>, Error> {
        self.scan(&category_prefix(user_id)).await
    }

    async fn append<T: Serialize>(&self, key: &str, record: &T) -> Result<(), Error> {
        let value = serde_json::to_value(record)
            .map_err(|err| Error::internal(format!("failed to encode record: {err}")))?;
        bounded(self.op_timeout, "catalogue write", self.kv.set(key, value)).await
    }

    async fn scan<T: serde::de::DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, Error> {
        let entries = bounded(
            self.op_timeout,
            "catalogue scan",
            self.kv.get_by_prefix(prefix),
        )
        .await?;
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
    use crate::domain::ports::StalledStore;
    use crate::domain::ErrorCode;
    use crate::outbound::MemoryKvStore;
    use chrono::TimeZone;
    use mockable::MockClock;
    use rstest::rstest;

    fn clock() -> Arc<dyn Clock> {
        let instant = Utc
            .with_ymd_and_hms(2026, 8, 23, 9, 0, 0)
            .single()
            .expect("valid instant");
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(instant);
        Arc::new(clock)
    }

    #[rstest]
    #[tokio::test]
    async fn add_item_initialises_availability_and_status() {
        let service = RentalService::new(
            Arc::new(MemoryKvStore::new()),
            clock(),
            Duration::from_secs(1),
        );
        let user = Uuid::new_v4();

        let item = service
            .add_item(
                user,
                RentalItemDraft {
                    name: "PS5 station".into(),
                    category: "console".into(),
                    description: None,
                    price_per_hour: 15_000,
                    price_per_day: 200_000,
                    total_units: 4,
                },
            )
            .await
            .expect("item created");

        assert_eq!(item.available_units, item.total_units);
        assert_eq!(item.status, "available");
        let listed = service.list_items(user).await.expect("scan");
        assert_eq!(listed, vec![item]);
    }

    #[rstest]
    #[tokio::test]
    async fn catalogue_calls_fail_fast_when_the_store_stalls() {
        let service = RentalService::new(
            Arc::new(StalledStore),
            Arc::new(MockClock::new()),
            Duration::from_millis(10),
        );

        let error = service
            .list_items(Uuid::new_v4())
            .await
            .expect_err("must time out");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}

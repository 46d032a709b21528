//! Submitted orders and the persistence contract.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maximum page size accepted by [`OrderRepository::list`].
pub const MAX_LIST_LIMIT: usize = 100;
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// One priced line of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: u32,
    pub subtotal: u32,
}

/// Immutable snapshot produced at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub order_id: String,
    pub items: Vec<OrderLine>,
    pub total_price: u32,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// A payload as kept by a repository, with the session it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOrder {
    pub session_id: String,
    pub payload: OrderPayload,
}

/// Filters for listing stored orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Only orders created on this UTC date.
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            date: None,
            status: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl OrderFilter {
    /// Effective page size, clamped to `1..=MAX_LIST_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIST_LIMIT)
    }

    pub fn matches(&self, order: &StoredOrder) -> bool {
        let date_ok = self
            .date
            .is_none_or(|date| order.payload.created_at.date_naive() == date);
        let status_ok = self
            .status
            .as_ref()
            .is_none_or(|status| &order.payload.status == status);
        date_ok && status_ok
    }

    /// Applies matching, newest-first ordering and paging.
    pub fn apply(&self, mut orders: Vec<StoredOrder>) -> Vec<StoredOrder> {
        orders.retain(|o| self.matches(o));
        orders.sort_by(|a, b| b.payload.created_at.cmp(&a.payload.created_at));
        orders
            .into_iter()
            .skip(self.offset)
            .take(self.effective_limit())
            .collect()
    }
}

/// Durable store for submitted orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a submitted order.
    ///
    /// # Arguments
    ///
    /// * `payload` - The frozen order payload
    /// * `session_id` - The session that produced it
    async fn save(&self, payload: &OrderPayload, session_id: &str) -> Result<()>;

    /// Finds an order by id.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no order with that id exists.
    async fn get(&self, order_id: &str) -> Result<Option<StoredOrder>>;

    /// Lists orders matching `filter`, newest first.
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<StoredOrder>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored(id: &str, day: u32, status: &str) -> StoredOrder {
        StoredOrder {
            session_id: "s".into(),
            payload: OrderPayload {
                order_id: id.into(),
                items: vec![],
                total_price: 0,
                created_at: Utc.with_ymd_and_hms(2026, 3, day, 8, 0, 0).unwrap(),
                status: status.into(),
            },
        }
    }

    #[test]
    fn test_limit_is_clamped() {
        let filter = OrderFilter {
            limit: 1000,
            ..Default::default()
        };
        assert_eq!(filter.effective_limit(), MAX_LIST_LIMIT);
        let filter = OrderFilter {
            limit: 0,
            ..Default::default()
        };
        assert_eq!(filter.effective_limit(), 1);
    }

    #[test]
    fn test_apply_filters_and_orders_newest_first() {
        let orders = vec![
            stored("a", 1, "submitted"),
            stored("b", 3, "submitted"),
            stored("c", 2, "cancelled"),
        ];
        let filter = OrderFilter {
            status: Some("submitted".into()),
            ..Default::default()
        };
        let ids: Vec<_> = filter
            .apply(orders.clone())
            .into_iter()
            .map(|o| o.payload.order_id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);

        let filter = OrderFilter {
            date: NaiveDate::from_ymd_opt(2026, 3, 2),
            ..Default::default()
        };
        assert_eq!(filter.apply(orders).len(), 1);
    }
}

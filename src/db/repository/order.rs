//! Order Repository
//!
//! Orders are append-only historical records: creation and a status update
//! are the only mutations, and no delete is exposed.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus, OrderView, PaymentMethod, ShippingAddress};
use crate::utils::now_millis;
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Priced line item ready to persist (product kept as a native record link)
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub product: RecordId,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// New order document (id assigned by the store)
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user: RecordId,
    pub order_items: Vec<NewOrderItem>,
    pub total_price: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Projection resolving the user and per-item product links for display
const POPULATE: &str = "FETCH user, order_items.product";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a priced order
    pub async fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create("order").content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// All orders, newest first, with user and product details attached
    pub async fn find_all_populated(&self) -> RepoResult<Vec<OrderView>> {
        let orders: Vec<OrderView> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM order ORDER BY created_at DESC {POPULATE}"
            ))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders belonging to one user (insertion order), populated
    pub async fn find_by_user_populated(&self, user: &RecordId) -> RepoResult<Vec<OrderView>> {
        let orders: Vec<OrderView> = self
            .base
            .db()
            .query(format!("SELECT * FROM order WHERE user = $user {POPULATE}"))
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Parse an order id, mapping malformed input to a not-found-class error
    /// whose message names the format problem (not a generic "not found").
    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid order ID format: {}", id)))
    }

    /// Find order by id (raw record, links unresolved)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = Self::parse_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find order by id with user and product details attached
    pub async fn find_by_id_populated(&self, id: &str) -> RepoResult<Option<OrderView>> {
        let thing = Self::parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query(format!("SELECT * FROM order WHERE id = $id {POPULATE}"))
            .bind(("id", thing))
            .await?;
        let orders: Vec<OrderView> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Overwrite the order status
    ///
    /// Only `status` and `updated_at` change; items, total and user are
    /// untouched. Transition legality is the caller's concern.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let thing = Self::parse_id(id)?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = $status,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Sum of `total_price` over delivered orders, recomputed from the live
    /// store on every call (no cached aggregate to invalidate)
    pub async fn total_revenue(&self) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                r#"RETURN math::sum(
                    (SELECT VALUE total_price FROM order WHERE status = 'Delivered')
                ) OR 0"#,
            )
            .await?;
        let revenue: Option<f64> = result.take(0)?;
        Ok(revenue.unwrap_or(0.0))
    }

    /// Count all orders (dashboard)
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}

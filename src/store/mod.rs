// ============================================================================
// Store - Persistence boundary
// ============================================================================
//
// Responsibilities:
// 1. CRUD for outlets, menu items and orders
// 2. Uniqueness: outlet name, (menu item name, outlet)
// 3. Cascade: deleting an outlet deletes its menu items atomically
// 4. Filtered, ordered listings
//
// Implementations:
// - PgStore: PostgreSQL via sqlx
// - MemoryStore: process-local tables, used by tests and `STORE_BACKEND=memory`
//
// ============================================================================

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::menu_item::MenuItem;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::outlet::{Outlet, OutletSummary};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Default)]
pub struct MenuItemFilter {
    pub outlet_id: Option<Uuid>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub outlet_id: Option<Uuid>,
    pub limit: Option<usize>,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the health check.
    async fn ping(&self) -> StoreResult<()>;

    // --- Outlets ---

    /// All outlets ordered by name.
    async fn list_outlets(&self) -> StoreResult<Vec<Outlet>>;
    async fn get_outlet(&self, id: Uuid) -> StoreResult<Option<Outlet>>;
    async fn find_outlet_by_name(&self, name: &str) -> StoreResult<Option<Outlet>>;
    async fn insert_outlet(&self, outlet: &Outlet) -> StoreResult<()>;
    /// Replace a stored outlet. Returns false if it does not exist.
    async fn update_outlet(&self, outlet: &Outlet) -> StoreResult<bool>;
    /// Delete an outlet and its menu items. Returns the number of menu items
    /// removed, or `None` if the outlet does not exist.
    async fn delete_outlet(&self, id: Uuid) -> StoreResult<Option<u64>>;
    async fn count_outlets(&self) -> StoreResult<u64>;
    /// Summaries for the outlets that still exist among `ids`, in no particular order.
    async fn outlet_summaries(&self, ids: &[Uuid]) -> StoreResult<Vec<OutletSummary>>;

    // --- Menu items ---

    /// Matching menu items, most recently updated first.
    async fn list_menu_items(&self, filter: &MenuItemFilter) -> StoreResult<Vec<MenuItem>>;
    async fn get_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>>;
    async fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<()>;
    async fn update_menu_item(&self, item: &MenuItem) -> StoreResult<bool>;
    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<bool>;
    async fn count_menu_items(&self) -> StoreResult<u64>;
    /// Distinct categories, sorted.
    async fn menu_categories(&self) -> StoreResult<Vec<String>>;

    // --- Orders ---

    /// Matching orders, newest first.
    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>>;
    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>>;
    async fn insert_order(&self, order: &Order) -> StoreResult<()>;
    async fn update_order(&self, order: &Order) -> StoreResult<bool>;
    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Order>>;
    async fn delete_order(&self, id: Uuid) -> StoreResult<bool>;
}

use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::menu_item::MenuItem;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::outlet::{Outlet, OutletSummary};

use super::{MenuItemFilter, OrderFilter, Store, StoreError, StoreResult};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// All tables sit behind one lock so the outlet cascade and the uniqueness
// checks see a consistent view. Constraint names mirror the PostgreSQL
// schema.
//
// ============================================================================

#[derive(Default)]
struct Tables {
    outlets: HashMap<Uuid, Outlet>,
    menu_items: HashMap<Uuid, MenuItem>,
    orders: HashMap<Uuid, Order>,
}

impl Tables {
    fn outlet_name_taken(&self, name: &str, except: Uuid) -> bool {
        self.outlets.values().any(|o| o.id != except && o.name == name)
    }

    fn menu_item_taken(&self, item: &MenuItem) -> bool {
        self.menu_items
            .values()
            .any(|m| m.id != item.id && m.outlet_id == item.outlet_id && m.name == item.name)
    }

    fn check_menu_item(&self, item: &MenuItem) -> StoreResult<()> {
        if !self.outlets.contains_key(&item.outlet_id) {
            return Err(StoreError::MissingReference("menu_items_outlet_id_fkey".to_string()));
        }
        if self.menu_item_taken(item) {
            return Err(StoreError::UniqueViolation("menu_items_name_outlet_key".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn take_limit<T>(mut rows: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        let _tables = self.tables.read().await;
        Ok(())
    }

    async fn list_outlets(&self) -> StoreResult<Vec<Outlet>> {
        let tables = self.tables.read().await;
        let mut outlets: Vec<Outlet> = tables.outlets.values().cloned().collect();
        outlets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(outlets)
    }

    async fn get_outlet(&self, id: Uuid) -> StoreResult<Option<Outlet>> {
        Ok(self.tables.read().await.outlets.get(&id).cloned())
    }

    async fn find_outlet_by_name(&self, name: &str) -> StoreResult<Option<Outlet>> {
        let tables = self.tables.read().await;
        Ok(tables.outlets.values().find(|o| o.name == name).cloned())
    }

    async fn outlet_summaries(&self, ids: &[Uuid]) -> StoreResult<Vec<OutletSummary>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.outlets.get(id))
            .map(OutletSummary::from)
            .collect())
    }

    async fn insert_outlet(&self, outlet: &Outlet) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.outlet_name_taken(&outlet.name, outlet.id) {
            return Err(StoreError::UniqueViolation("outlets_name_key".to_string()));
        }
        tables.outlets.insert(outlet.id, outlet.clone());
        Ok(())
    }

    async fn update_outlet(&self, outlet: &Outlet) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.outlets.contains_key(&outlet.id) {
            return Ok(false);
        }
        if tables.outlet_name_taken(&outlet.name, outlet.id) {
            return Err(StoreError::UniqueViolation("outlets_name_key".to_string()));
        }
        tables.outlets.insert(outlet.id, outlet.clone());
        Ok(true)
    }

    async fn delete_outlet(&self, id: Uuid) -> StoreResult<Option<u64>> {
        let mut tables = self.tables.write().await;
        if tables.outlets.remove(&id).is_none() {
            return Ok(None);
        }

        let before = tables.menu_items.len();
        tables.menu_items.retain(|_, item| item.outlet_id != id);
        Ok(Some((before - tables.menu_items.len()) as u64))
    }

    async fn count_outlets(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.outlets.len() as u64)
    }

    async fn list_menu_items(&self, filter: &MenuItemFilter) -> StoreResult<Vec<MenuItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<MenuItem> = tables
            .menu_items
            .values()
            .filter(|item| filter.outlet_id.map_or(true, |id| item.outlet_id == id))
            .filter(|item| filter.category.as_ref().map_or(true, |c| &item.category == c))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(take_limit(items, filter.limit))
    }

    async fn get_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        Ok(self.tables.read().await.menu_items.get(&id).cloned())
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_menu_item(item)?;
        tables.menu_items.insert(item.id, item.clone());
        Ok(())
    }

    async fn update_menu_item(&self, item: &MenuItem) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.menu_items.contains_key(&item.id) {
            return Ok(false);
        }
        tables.check_menu_item(item)?;
        tables.menu_items.insert(item.id, item.clone());
        Ok(true)
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.menu_items.remove(&id).is_some())
    }

    async fn count_menu_items(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.menu_items.len() as u64)
    }

    async fn menu_categories(&self) -> StoreResult<Vec<String>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<String> =
            tables.menu_items.values().map(|item| item.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| filter.status.map_or(true, |s| order.status == s))
            .filter(|order| filter.outlet_id.map_or(true, |id| order.outlet_id == id))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(take_limit(orders, filter.limit))
    }

    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        self.tables.write().await.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn update_order(&self, order: &Order) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&order.id) {
            Some(stored) => {
                *stored = order.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.get_mut(&id).map(|order| {
            order.status = status;
            order.updated_at = updated_at;
            order.clone()
        }))
    }

    async fn delete_order(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.orders.remove(&id).is_some())
    }
}

use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::menu_item::MenuItem;
use crate::domain::order::{Customer, Email, Order, OrderItem, OrderStatus, PhoneNumber};
use crate::domain::outlet::{Outlet, OutletSummary};
use crate::utils::IsTransient;

use super::{MenuItemFilter, OrderFilter, Store, StoreError, StoreResult};

// ============================================================================
// PostgreSQL Store
// ============================================================================
//
// Tables:
// - outlets:     name is unique
// - menu_items:  (name, outlet_id) is unique, outlet_id cascades on delete
// - orders:      items stored as a JSONB snapshot, outlet_id is not a foreign
//                key so historical orders outlive their outlet
//
// ============================================================================

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS outlets (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        location TEXT NOT NULL,
        timings TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL,
        categories TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT outlets_name_key UNIQUE (name)
    )",
    "CREATE TABLE IF NOT EXISTS menu_items (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        price NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
        category TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL,
        outlet_id UUID NOT NULL,
        is_available BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT menu_items_outlet_id_fkey FOREIGN KEY (outlet_id)
            REFERENCES outlets (id) ON DELETE CASCADE,
        CONSTRAINT menu_items_name_outlet_key UNIQUE (name, outlet_id)
    )",
    "CREATE INDEX IF NOT EXISTS menu_items_category_idx ON menu_items (category)",
    "CREATE TABLE IF NOT EXISTS orders (
        id UUID PRIMARY KEY,
        customer_name TEXT NOT NULL,
        customer_email TEXT NOT NULL,
        customer_phone TEXT NOT NULL,
        outlet_id UUID NOT NULL,
        items JSONB NOT NULL,
        total_amount NUMERIC(12, 2) NOT NULL,
        status TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS orders_status_idx ON orders (status)",
    "CREATE INDEX IF NOT EXISTS orders_outlet_idx ON orders (outlet_id)",
    "CREATE INDEX IF NOT EXISTS orders_created_at_idx ON orders (created_at DESC)",
];

const OUTLET_COLUMNS: &str =
    "id, name, location, timings, description, image, categories, created_at, updated_at";

const MENU_ITEM_COLUMNS: &str =
    "id, name, price, category, description, image, outlet_id, is_available, created_at, updated_at";

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, outlet_id, \
     items, total_amount, status, notes, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Create tables and indexes if they do not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!("✅ Database schema ready");
        Ok(())
    }
}

impl IsTransient for sqlx::Error {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_)
        )
    }
}

/// Map constraint violations onto store errors.
fn classify(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &error {
        let constraint = db_err.constraint().unwrap_or_default().to_string();
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation(constraint);
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingReference(constraint);
        }
    }
    StoreError::Database(error)
}

fn outlet_from_row(row: &PgRow) -> Result<Outlet, sqlx::Error> {
    Ok(Outlet {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        timings: row.try_get("timings")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        categories: row.try_get("categories")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn menu_item_from_row(row: &PgRow) -> Result<MenuItem, sqlx::Error> {
    Ok(MenuItem {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        outlet_id: row.try_get("outlet_id")?,
        is_available: row.try_get("is_available")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn order_from_row(row: &PgRow) -> StoreResult<Order> {
    let id: Uuid = row.try_get("id")?;
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<OrderStatus>()
        .map_err(|e| StoreError::Corrupt(format!("order {}: {}", id, e)))?;
    let Json(items): Json<Vec<OrderItem>> = row.try_get("items")?;

    Ok(Order {
        id,
        customer: Customer {
            name: row.try_get("customer_name")?,
            email: Email(row.try_get("customer_email")?),
            phone: PhoneNumber(row.try_get("customer_phone")?),
        },
        outlet_id: row.try_get("outlet_id")?,
        items,
        total_amount: row.try_get("total_amount")?,
        status,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_outlets(&self) -> StoreResult<Vec<Outlet>> {
        let sql = format!("SELECT {} FROM outlets ORDER BY name", OUTLET_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(outlet_from_row).collect::<Result<_, _>>()?)
    }

    async fn get_outlet(&self, id: Uuid) -> StoreResult<Option<Outlet>> {
        let sql = format!("SELECT {} FROM outlets WHERE id = $1", OUTLET_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(outlet_from_row).transpose()?)
    }

    async fn find_outlet_by_name(&self, name: &str) -> StoreResult<Option<Outlet>> {
        let sql = format!("SELECT {} FROM outlets WHERE name = $1", OUTLET_COLUMNS);
        let row = sqlx::query(&sql).bind(name).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(outlet_from_row).transpose()?)
    }

    async fn outlet_summaries(&self, ids: &[Uuid]) -> StoreResult<Vec<OutletSummary>> {
        let rows = sqlx::query("SELECT id, name, location FROM outlets WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let summaries = rows
            .iter()
            .map(|row| {
                Ok(OutletSummary {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    location: row.try_get("location")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(summaries)
    }

    async fn insert_outlet(&self, outlet: &Outlet) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO outlets (
                id, name, location, timings, description, image, categories, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(outlet.id)
        .bind(&outlet.name)
        .bind(&outlet.location)
        .bind(&outlet.timings)
        .bind(&outlet.description)
        .bind(&outlet.image)
        .bind(&outlet.categories)
        .bind(outlet.created_at)
        .bind(outlet.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(())
    }

    async fn update_outlet(&self, outlet: &Outlet) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE outlets SET
                name = $2, location = $3, timings = $4, description = $5,
                image = $6, categories = $7, updated_at = $8
            WHERE id = $1",
        )
        .bind(outlet.id)
        .bind(&outlet.name)
        .bind(&outlet.location)
        .bind(&outlet.timings)
        .bind(&outlet.description)
        .bind(&outlet.image)
        .bind(&outlet.categories)
        .bind(outlet.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_outlet(&self, id: Uuid) -> StoreResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        // Items first so the removed count can be reported
        let removed = sqlx::query("DELETE FROM menu_items WHERE outlet_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM outlets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(removed))
    }

    async fn count_outlets(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM outlets")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn list_menu_items(&self, filter: &MenuItemFilter) -> StoreResult<Vec<MenuItem>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM menu_items WHERE TRUE",
            MENU_ITEM_COLUMNS
        ));
        if let Some(outlet_id) = filter.outlet_id {
            query.push(" AND outlet_id = ").push_bind(outlet_id);
        }
        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        query.push(" ORDER BY updated_at DESC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = query.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(menu_item_from_row).collect::<Result<_, _>>()?)
    }

    async fn get_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        let sql = format!("SELECT {} FROM menu_items WHERE id = $1", MENU_ITEM_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(menu_item_from_row).transpose()?)
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO menu_items (
                id, name, price, category, description, image, outlet_id,
                is_available, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.description)
        .bind(&item.image)
        .bind(item.outlet_id)
        .bind(item.is_available)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(())
    }

    async fn update_menu_item(&self, item: &MenuItem) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE menu_items SET
                name = $2, price = $3, category = $4, description = $5, image = $6,
                outlet_id = $7, is_available = $8, updated_at = $9
            WHERE id = $1",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.description)
        .bind(&item.image)
        .bind(item.outlet_id)
        .bind(item.is_available)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_menu_items(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn menu_categories(&self) -> StoreResult<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM menu_items ORDER BY category")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM orders WHERE TRUE", ORDER_COLUMNS));
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(outlet_id) = filter.outlet_id {
            query.push(" AND outlet_id = ").push_bind(outlet_id);
        }
        query.push(" ORDER BY created_at DESC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(order_from_row).collect()
    }

    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(order_from_row).transpose()
    }

    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO orders (
                id, customer_name, customer_email, customer_phone, outlet_id,
                items, total_amount, status, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(order.id)
        .bind(&order.customer.name)
        .bind(order.customer.email.as_str())
        .bind(order.customer.phone.as_str())
        .bind(order.outlet_id)
        .bind(Json(&order.items))
        .bind(order.total_amount)
        .bind(order.status.as_str())
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(())
    }

    async fn update_order(&self, order: &Order) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE orders SET
                customer_name = $2, customer_email = $3, customer_phone = $4,
                status = $5, notes = $6, updated_at = $7
            WHERE id = $1",
        )
        .bind(order.id)
        .bind(&order.customer.name)
        .bind(order.customer.email.as_str())
        .bind(order.customer.phone.as_str())
        .bind(order.status.as_str())
        .bind(&order.notes)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Order>> {
        let sql = format!(
            "UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            ORDER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(order_from_row).transpose()
    }

    async fn delete_order(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_transient() {
        assert!(sqlx::Error::PoolTimedOut.is_transient());
        assert!(sqlx::Error::Io(std::io::Error::from(std::io::ErrorKind::ConnectionRefused)).is_transient());
        assert!(!sqlx::Error::RowNotFound.is_transient());
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        assert!(matches!(classify(sqlx::Error::RowNotFound), StoreError::Database(_)));
    }
}

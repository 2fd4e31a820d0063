use std::sync::Arc;
use chrono::Utc;
use futures_util::future::try_join_all;
use uuid::Uuid;

use crate::domain::{max_amount, required_text};
use crate::metrics::Metrics;
use crate::store::{OrderFilter, Store};

use super::commands::{CustomerDetails, OrderQuery, PlaceOrder, RequestedItem, UpdateOrder};
use super::errors::OrderError;
use super::value_objects::{order_total, Customer, Email, Order, OrderItem, OrderStatus, PhoneNumber};

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Orchestrates: Command → Validation → Referential checks → Pricing → Store
//
// Prices always come from the stored menu items. The order keeps a snapshot
// of name, price and quantity so later menu edits never change it.
//
// ============================================================================

#[derive(Clone)]
pub struct OrderCommandHandler {
    store: Arc<dyn Store>,
    metrics: Arc<Metrics>,
}

impl OrderCommandHandler {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Validate a checkout, price it from server-side data and persist it.
    pub async fn place_order(&self, command: PlaceOrder) -> Result<Order, OrderError> {
        let outlet_id = command.outlet;
        let result = self.try_place_order(command).await;

        match &result {
            Ok(order) => self.metrics.record_order_created(order.total_amount),
            Err(e) => {
                tracing::warn!(outlet_id = %outlet_id, error = %e, "Order rejected");
                self.metrics.record_order_rejected(e.reason());
            }
        }

        result
    }

    async fn try_place_order(&self, command: PlaceOrder) -> Result<Order, OrderError> {
        if command.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        if let Some(bad) = command.items.iter().find(|item| item.quantity < 1) {
            return Err(OrderError::InvalidQuantity(bad.quantity));
        }
        let customer = validate_customer(&command.customer)?;

        if self.store.get_outlet(command.outlet).await?.is_none() {
            return Err(OrderError::InvalidOutlet(command.outlet));
        }

        let items = try_join_all(command.items.iter().map(|requested| self.snapshot(requested))).await?;
        let total_amount = order_total(&items)
            .filter(|total| *total <= max_amount())
            .ok_or(OrderError::TotalTooLarge)?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer,
            outlet_id: command.outlet,
            items,
            total_amount,
            status: OrderStatus::Pending,
            notes: command.notes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_order(&order).await?;

        tracing::info!(
            order_id = %order.id,
            outlet_id = %order.outlet_id,
            item_count = order.items.len(),
            total_amount = %order.total_amount,
            "✅ Order placed"
        );

        Ok(order)
    }

    async fn snapshot(&self, requested: &RequestedItem) -> Result<OrderItem, OrderError> {
        let menu_item = self
            .store
            .get_menu_item(requested.menu_item)
            .await?
            .ok_or(OrderError::MenuItemNotFound(requested.menu_item))?;

        Ok(OrderItem {
            menu_item_id: menu_item.id,
            name: menu_item.name,
            price: menu_item.price,
            quantity: requested.quantity,
        })
    }

    /// Orders matching the filters, newest first.
    pub async fn list(&self, query: &OrderQuery) -> Result<Vec<Order>, OrderError> {
        let filter = OrderFilter {
            status: query.status,
            outlet_id: query.outlet,
            limit: None,
        };
        Ok(self.store.list_orders(&filter).await?)
    }

    /// The `limit` newest orders.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Order>, OrderError> {
        let filter = OrderFilter {
            limit: Some(limit),
            ..OrderFilter::default()
        };
        Ok(self.store.list_orders(&filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Order, OrderError> {
        self.store.get_order(id).await?.ok_or(OrderError::NotFound(id))
    }

    pub async fn update(&self, id: Uuid, command: UpdateOrder) -> Result<Order, OrderError> {
        let mut order = self.get(id).await?;

        if let Some(customer) = command.customer {
            order.customer = validate_customer(&customer)?;
        }
        if let Some(notes) = command.notes {
            order.notes = notes;
        }
        if let Some(status) = command.status {
            if status != order.status {
                self.metrics.record_status_change(status);
            }
            order.status = status;
        }
        order.updated_at = Utc::now();

        if !self.store.update_order(&order).await? {
            return Err(OrderError::NotFound(id));
        }

        tracing::info!(order_id = %id, status = %order.status, "Order updated");
        Ok(order)
    }

    /// Set the status without any transition rules.
    pub async fn change_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, OrderError> {
        let order = self
            .store
            .update_order_status(id, status, Utc::now())
            .await?
            .ok_or(OrderError::NotFound(id))?;

        self.metrics.record_status_change(status);
        tracing::info!(order_id = %id, status = %status, "Order status changed");
        Ok(order)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), OrderError> {
        if !self.store.delete_order(id).await? {
            return Err(OrderError::NotFound(id));
        }

        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }
}

fn validate_customer(details: &CustomerDetails) -> Result<Customer, OrderError> {
    let name = required_text(&details.name, || OrderError::EmptyCustomerName)?;
    let email = Email::parse(&details.email)
        .ok_or_else(|| OrderError::InvalidEmail(details.email.trim().to_string()))?;
    let phone = required_text(&details.phone, || OrderError::EmptyCustomerPhone)?;

    Ok(Customer {
        name,
        email,
        phone: PhoneNumber::new(phone),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use crate::domain::menu_item::{CreateMenuItem, MenuItemCommandHandler, UpdateMenuItem};
    use crate::domain::outlet::{CreateOutlet, OutletCommandHandler};
    use crate::store::MemoryStore;

    struct Fixture {
        store: Arc<dyn Store>,
        metrics: Arc<Metrics>,
        outlets: OutletCommandHandler,
        menu: MenuItemCommandHandler,
        orders: OrderCommandHandler,
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let metrics = Arc::new(Metrics::new().unwrap());
        Fixture {
            outlets: OutletCommandHandler::new(store.clone()),
            menu: MenuItemCommandHandler::new(store.clone()),
            orders: OrderCommandHandler::new(store.clone(), metrics.clone()),
            store,
            metrics,
        }
    }

    async fn cafe_with_burger(fixture: &Fixture) -> (Uuid, Uuid) {
        let outlet = fixture
            .outlets
            .create(CreateOutlet {
                name: "Cafe A".to_string(),
                location: "Block 1".to_string(),
                timings: "9-5".to_string(),
                ..CreateOutlet::default()
            })
            .await
            .unwrap();

        let burger = fixture
            .menu
            .create(CreateMenuItem {
                name: "Burger".to_string(),
                price: Some(Decimal::from(100)),
                category: "Meals".to_string(),
                outlet: Some(outlet.id),
                ..CreateMenuItem::default()
            })
            .await
            .unwrap();

        (outlet.id, burger.id)
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Asha".to_string(),
            email: "Asha@Campus.edu".to_string(),
            phone: "9999999999".to_string(),
        }
    }

    fn checkout(outlet: Uuid, items: Vec<(Uuid, i32)>) -> PlaceOrder {
        PlaceOrder {
            customer: customer(),
            outlet,
            items: items
                .into_iter()
                .map(|(menu_item, quantity)| RequestedItem { menu_item, quantity })
                .collect(),
            notes: None,
        }
    }

    async fn order_count(fixture: &Fixture) -> usize {
        fixture.store.list_orders(&OrderFilter::default()).await.unwrap().len()
    }

    #[tokio::test]
    async fn test_total_uses_server_prices() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;

        let order = fixture.orders.place_order(checkout(outlet, vec![(burger, 2)])).await.unwrap();

        assert_eq!(order.total_amount, Decimal::from(200));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Burger");
        assert_eq!(order.items[0].price, Decimal::from(100));
        assert_eq!(order.customer.email.as_str(), "asha@campus.edu");
        assert_eq!(order_count(&fixture).await, 1);
    }

    #[tokio::test]
    async fn test_total_over_several_items() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;
        let tea = fixture
            .menu
            .create(CreateMenuItem {
                name: "Tea".to_string(),
                price: Some(Decimal::new(1550, 2)),
                category: "Drinks".to_string(),
                outlet: Some(outlet),
                ..CreateMenuItem::default()
            })
            .await
            .unwrap();

        let order = fixture
            .orders
            .place_order(checkout(outlet, vec![(burger, 1), (tea.id, 3)]))
            .await
            .unwrap();

        assert_eq!(order.total_amount, Decimal::new(14650, 2));
    }

    #[tokio::test]
    async fn test_total_beyond_money_column_is_rejected() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;

        let result = fixture
            .orders
            .place_order(checkout(outlet, vec![(burger, 2_000_000_000)]))
            .await;

        assert!(matches!(result, Err(OrderError::TotalTooLarge)));
        assert_eq!(order_count(&fixture).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_outlet_is_rejected() {
        let fixture = fixture();
        let (_, burger) = cafe_with_burger(&fixture).await;

        let result = fixture
            .orders
            .place_order(checkout(Uuid::new_v4(), vec![(burger, 1)]))
            .await;

        assert!(matches!(result, Err(OrderError::InvalidOutlet(_))));
        assert_eq!(order_count(&fixture).await, 0);
    }

    #[tokio::test]
    async fn test_empty_items_rejected() {
        let fixture = fixture();
        let (outlet, _) = cafe_with_burger(&fixture).await;

        let result = fixture.orders.place_order(checkout(outlet, vec![])).await;
        assert!(matches!(result, Err(OrderError::EmptyItems)));
        assert_eq!(order_count(&fixture).await, 0);
    }

    #[tokio::test]
    async fn test_missing_menu_item_persists_nothing() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;
        let ghost = Uuid::new_v4();

        let result = fixture
            .orders
            .place_order(checkout(outlet, vec![(burger, 1), (ghost, 1)]))
            .await;

        assert!(matches!(result, Err(OrderError::MenuItemNotFound(id)) if id == ghost));
        assert_eq!(order_count(&fixture).await, 0);
    }

    #[tokio::test]
    async fn test_deleted_menu_item_cannot_be_ordered() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;
        fixture.menu.delete(burger).await.unwrap();

        let result = fixture.orders.place_order(checkout(outlet, vec![(burger, 1)])).await;
        assert!(matches!(result, Err(OrderError::MenuItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;

        let result = fixture.orders.place_order(checkout(outlet, vec![(burger, 0)])).await;
        assert!(matches!(result, Err(OrderError::InvalidQuantity(0))));
    }

    #[tokio::test]
    async fn test_customer_is_validated() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;

        let mut command = checkout(outlet, vec![(burger, 1)]);
        command.customer.email = "not-an-email".to_string();
        let result = fixture.orders.place_order(command).await;
        assert!(matches!(result, Err(OrderError::InvalidEmail(_))));

        let mut command = checkout(outlet, vec![(burger, 1)]);
        command.customer.phone = "  ".to_string();
        let result = fixture.orders.place_order(command).await;
        assert!(matches!(result, Err(OrderError::EmptyCustomerPhone)));
    }

    #[tokio::test]
    async fn test_snapshot_survives_price_change() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;
        let order = fixture.orders.place_order(checkout(outlet, vec![(burger, 2)])).await.unwrap();

        fixture
            .menu
            .update(
                burger,
                UpdateMenuItem {
                    price: Some(Decimal::from(150)),
                    ..UpdateMenuItem::default()
                },
            )
            .await
            .unwrap();

        let stored = fixture.orders.get(order.id).await.unwrap();
        assert_eq!(stored.items[0].price, Decimal::from(100));
        assert_eq!(stored.total_amount, Decimal::from(200));
    }

    #[tokio::test]
    async fn test_any_status_transition_allowed() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;
        let order = fixture.orders.place_order(checkout(outlet, vec![(burger, 1)])).await.unwrap();

        let completed = fixture.orders.change_status(order.id, OrderStatus::Completed).await.unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);

        let reopened = fixture.orders.change_status(order.id, OrderStatus::Pending).await.unwrap();
        assert_eq!(reopened.status, OrderStatus::Pending);

        let missing = fixture.orders.change_status(Uuid::new_v4(), OrderStatus::Ready).await;
        assert!(matches!(missing, Err(OrderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_items_and_total() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;
        let order = fixture.orders.place_order(checkout(outlet, vec![(burger, 3)])).await.unwrap();

        let updated = fixture
            .orders
            .update(
                order.id,
                UpdateOrder {
                    notes: Some("No onions".to_string()),
                    status: Some(OrderStatus::Preparing),
                    ..UpdateOrder::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.notes, "No onions");
        assert_eq!(updated.status, OrderStatus::Preparing);
        assert_eq!(updated.items, order.items);
        assert_eq!(updated.total_amount, Decimal::from(300));
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_outlet() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;
        let first = fixture.orders.place_order(checkout(outlet, vec![(burger, 1)])).await.unwrap();
        fixture.orders.place_order(checkout(outlet, vec![(burger, 2)])).await.unwrap();
        fixture.orders.change_status(first.id, OrderStatus::Ready).await.unwrap();

        let ready = fixture
            .orders
            .list(&OrderQuery {
                status: Some(OrderStatus::Ready),
                ..OrderQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id, first.id);

        let elsewhere = fixture
            .orders
            .list(&OrderQuery {
                outlet: Some(Uuid::new_v4()),
                ..OrderQuery::default()
            })
            .await
            .unwrap();
        assert!(elsewhere.is_empty());

        assert_eq!(fixture.orders.recent(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_metrics_recorded() {
        let fixture = fixture();
        let (outlet, burger) = cafe_with_burger(&fixture).await;
        fixture.orders.place_order(checkout(outlet, vec![(burger, 1)])).await.unwrap();
        let _ = fixture.orders.place_order(checkout(outlet, vec![])).await;

        let rendered = fixture.metrics.render().unwrap();
        assert!(rendered.contains("orders_created_total 1"));
        assert!(rendered.contains("order_rejections_total{reason=\"empty_items\"} 1"));
    }
}

use std::sync::Arc;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{fits_money_scale, max_amount, required_text, DEFAULT_IMAGE};
use crate::store::{MenuItemFilter, Store, StoreError};

use super::commands::{CreateMenuItem, MenuItemQuery, UpdateMenuItem};
use super::errors::MenuItemError;
use super::value_objects::MenuItem;

// ============================================================================
// Menu Item Command Handler
// ============================================================================
//
// Orchestrates: Command → Validation → Outlet existence check → Store
//
// ============================================================================

#[derive(Clone)]
pub struct MenuItemCommandHandler {
    store: Arc<dyn Store>,
}

impl MenuItemCommandHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Filtered listing, most recently updated first.
    ///
    /// The `outlet` filter is tried as an id first and then as an outlet
    /// name. A name that matches no outlet yields an empty list.
    pub async fn list(&self, query: &MenuItemQuery) -> Result<Vec<MenuItem>, MenuItemError> {
        let outlet_id = match query.outlet.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
            None => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => match self.store.find_outlet_by_name(raw).await? {
                    Some(outlet) => Some(outlet.id),
                    None => {
                        tracing::debug!(outlet = %raw, "No outlet with this name");
                        return Ok(Vec::new());
                    }
                },
            },
        };

        let filter = MenuItemFilter {
            outlet_id,
            category: query
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            limit: query.parsed_limit(),
        };

        Ok(self.store.list_menu_items(&filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<MenuItem, MenuItemError> {
        self.store.get_menu_item(id).await?.ok_or(MenuItemError::NotFound(id))
    }

    /// Distinct categories across all menu items, sorted.
    pub async fn categories(&self) -> Result<Vec<String>, MenuItemError> {
        Ok(self.store.menu_categories().await?)
    }

    pub async fn create(&self, command: CreateMenuItem) -> Result<MenuItem, MenuItemError> {
        let outlet_id = command.outlet.ok_or(MenuItemError::MissingOutlet)?;
        self.ensure_outlet(outlet_id).await?;

        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4(),
            name: required_text(&command.name, || MenuItemError::EmptyName)?,
            price: validate_price(command.price.ok_or(MenuItemError::MissingPrice)?)?,
            category: required_text(&command.category, || MenuItemError::EmptyCategory)?,
            description: command.description.unwrap_or_default(),
            image: command.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            outlet_id,
            is_available: command.is_available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_menu_item(&item)
            .await
            .map_err(|e| classify(e, &item))?;

        tracing::info!(
            menu_item_id = %item.id,
            outlet_id = %item.outlet_id,
            name = %item.name,
            price = %item.price,
            "✅ Menu item created"
        );
        Ok(item)
    }

    pub async fn update(&self, id: Uuid, command: UpdateMenuItem) -> Result<MenuItem, MenuItemError> {
        if let Some(outlet_id) = command.outlet {
            self.ensure_outlet(outlet_id).await?;
        }

        let mut item = self.store.get_menu_item(id).await?.ok_or(MenuItemError::NotFound(id))?;

        if let Some(name) = command.name {
            item.name = required_text(&name, || MenuItemError::EmptyName)?;
        }
        if let Some(price) = command.price {
            item.price = validate_price(price)?;
        }
        if let Some(category) = command.category {
            item.category = required_text(&category, || MenuItemError::EmptyCategory)?;
        }
        if let Some(description) = command.description {
            item.description = description;
        }
        if let Some(image) = command.image {
            item.image = image;
        }
        if let Some(outlet_id) = command.outlet {
            item.outlet_id = outlet_id;
        }
        if let Some(is_available) = command.is_available {
            item.is_available = is_available;
        }
        item.updated_at = Utc::now();

        let updated = self
            .store
            .update_menu_item(&item)
            .await
            .map_err(|e| classify(e, &item))?;
        if !updated {
            return Err(MenuItemError::NotFound(id));
        }

        tracing::info!(menu_item_id = %id, "Menu item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MenuItemError> {
        if !self.store.delete_menu_item(id).await? {
            return Err(MenuItemError::NotFound(id));
        }

        tracing::info!(menu_item_id = %id, "Menu item deleted");
        Ok(())
    }

    async fn ensure_outlet(&self, outlet_id: Uuid) -> Result<(), MenuItemError> {
        match self.store.get_outlet(outlet_id).await? {
            Some(_) => Ok(()),
            None => {
                tracing::warn!(outlet_id = %outlet_id, "Menu item references unknown outlet");
                Err(MenuItemError::InvalidOutlet(outlet_id))
            }
        }
    }
}

fn validate_price(price: Decimal) -> Result<Decimal, MenuItemError> {
    if price < Decimal::ZERO {
        return Err(MenuItemError::NegativePrice(price));
    }
    if !fits_money_scale(price) {
        return Err(MenuItemError::PriceTooPrecise(price));
    }
    if price > max_amount() {
        return Err(MenuItemError::PriceTooLarge(price));
    }
    Ok(price)
}

fn classify(err: StoreError, item: &MenuItem) -> MenuItemError {
    match err {
        StoreError::UniqueViolation(_) => MenuItemError::Duplicate {
            name: item.name.clone(),
            outlet_id: item.outlet_id,
        },
        // The outlet vanished between the existence check and the write.
        StoreError::MissingReference(_) => MenuItemError::InvalidOutlet(item.outlet_id),
        other => MenuItemError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outlet::{CreateOutlet, OutletCommandHandler};
    use crate::store::MemoryStore;

    struct Fixture {
        outlets: OutletCommandHandler,
        menu: MenuItemCommandHandler,
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        Fixture {
            outlets: OutletCommandHandler::new(store.clone()),
            menu: MenuItemCommandHandler::new(store),
        }
    }

    async fn outlet(fixture: &Fixture, name: &str) -> Uuid {
        fixture
            .outlets
            .create(CreateOutlet {
                name: name.to_string(),
                location: "Campus".to_string(),
                timings: "All day".to_string(),
                ..CreateOutlet::default()
            })
            .await
            .unwrap()
            .id
    }

    fn dish(name: &str, price: i64, outlet: Uuid) -> CreateMenuItem {
        CreateMenuItem {
            name: name.to_string(),
            price: Some(Decimal::from(price)),
            category: "Meals".to_string(),
            outlet: Some(outlet),
            ..CreateMenuItem::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_existing_outlet() {
        let fixture = fixture();
        let result = fixture.menu.create(dish("Burger", 100, Uuid::new_v4())).await;
        assert!(matches!(result, Err(MenuItemError::InvalidOutlet(_))));

        let result = fixture
            .menu
            .create(CreateMenuItem {
                outlet: None,
                ..dish("Burger", 100, Uuid::new_v4())
            })
            .await;
        assert!(matches!(result, Err(MenuItemError::MissingOutlet)));
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let fixture = fixture();
        let cafe = outlet(&fixture, "Cafe A").await;

        let item = fixture.menu.create(dish("Burger", 100, cafe)).await.unwrap();
        assert!(item.is_available);
        assert_eq!(item.image, DEFAULT_IMAGE);
        assert_eq!(item.price, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let fixture = fixture();
        let cafe = outlet(&fixture, "Cafe A").await;

        let result = fixture.menu.create(dish("Burger", -1, cafe)).await;
        assert!(matches!(result, Err(MenuItemError::NegativePrice(_))));

        let free = fixture.menu.create(dish("Water", 0, cafe)).await.unwrap();
        assert_eq!(free.price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_price_must_fit_money_column() {
        let fixture = fixture();
        let cafe = outlet(&fixture, "Cafe A").await;

        let mut precise = dish("Tea", 0, cafe);
        precise.price = Some(Decimal::new(1005, 3));
        let result = fixture.menu.create(precise).await;
        assert!(matches!(result, Err(MenuItemError::PriceTooPrecise(_))));

        let mut huge = dish("Gold Leaf Cake", 0, cafe);
        huge.price = Some(Decimal::from_i128_with_scale(10_i128.pow(28), 0));
        let result = fixture.menu.create(huge).await;
        assert!(matches!(result, Err(MenuItemError::PriceTooLarge(_))));

        let mut priciest = dish("Banquet", 0, cafe);
        priciest.price = Some(max_amount());
        let item = fixture.menu.create(priciest).await.unwrap();
        assert_eq!(item.price, max_amount());

        assert_eq!(fixture.menu.list(&MenuItemQuery::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_name_unique_per_outlet_only() {
        let fixture = fixture();
        let cafe_a = outlet(&fixture, "Cafe A").await;
        let cafe_b = outlet(&fixture, "Cafe B").await;

        fixture.menu.create(dish("Burger", 100, cafe_a)).await.unwrap();

        let duplicate = fixture.menu.create(dish("Burger", 120, cafe_a)).await;
        assert!(matches!(duplicate, Err(MenuItemError::Duplicate { .. })));

        let elsewhere = fixture.menu.create(dish("Burger", 120, cafe_b)).await;
        assert!(elsewhere.is_ok());
    }

    #[tokio::test]
    async fn test_update_to_unknown_outlet_leaves_item_intact() {
        let fixture = fixture();
        let cafe = outlet(&fixture, "Cafe A").await;
        let item = fixture.menu.create(dish("Burger", 100, cafe)).await.unwrap();

        let result = fixture
            .menu
            .update(
                item.id,
                UpdateMenuItem {
                    outlet: Some(Uuid::new_v4()),
                    price: Some(Decimal::from(5)),
                    ..UpdateMenuItem::default()
                },
            )
            .await;
        assert!(matches!(result, Err(MenuItemError::InvalidOutlet(_))));

        let stored = fixture.menu.get(item.id).await.unwrap();
        assert_eq!(stored.outlet_id, cafe);
        assert_eq!(stored.price, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_list_filters_by_outlet_name_and_category() {
        let fixture = fixture();
        let cafe_a = outlet(&fixture, "Cafe A").await;
        let cafe_b = outlet(&fixture, "Cafe B").await;

        fixture.menu.create(dish("Burger", 100, cafe_a)).await.unwrap();
        fixture
            .menu
            .create(CreateMenuItem {
                category: "Drinks".to_string(),
                ..dish("Cola", 40, cafe_a)
            })
            .await
            .unwrap();
        fixture.menu.create(dish("Wrap", 90, cafe_b)).await.unwrap();

        let by_name = fixture
            .menu
            .list(&MenuItemQuery {
                outlet: Some("Cafe A".to_string()),
                ..MenuItemQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 2);
        assert!(by_name.iter().all(|item| item.outlet_id == cafe_a));

        let by_id_and_category = fixture
            .menu
            .list(&MenuItemQuery {
                outlet: Some(cafe_a.to_string()),
                category: Some("Drinks".to_string()),
                ..MenuItemQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_id_and_category.len(), 1);
        assert_eq!(by_id_and_category[0].name, "Cola");

        let unknown = fixture
            .menu
            .list(&MenuItemQuery {
                outlet: Some("Nowhere".to_string()),
                ..MenuItemQuery::default()
            })
            .await
            .unwrap();
        assert!(unknown.is_empty());

        let limited = fixture
            .menu
            .list(&MenuItemQuery {
                limit: Some("2".to_string()),
                ..MenuItemQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_categories_are_distinct_and_sorted() {
        let fixture = fixture();
        let cafe = outlet(&fixture, "Cafe A").await;

        for (name, category) in [("Tea", "Drinks"), ("Burger", "Meals"), ("Cola", "Drinks")] {
            fixture
                .menu
                .create(CreateMenuItem {
                    category: category.to_string(),
                    ..dish(name, 10, cafe)
                })
                .await
                .unwrap();
        }

        assert_eq!(fixture.menu.categories().await.unwrap(), vec!["Drinks", "Meals"]);
    }

    #[tokio::test]
    async fn test_delete_missing_item() {
        let fixture = fixture();
        let result = fixture.menu.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(MenuItemError::NotFound(_))));
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Menu Item Value Objects
// ============================================================================

/// A purchasable dish. `(name, outlet_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub description: String,
    pub image: String,
    #[serde(rename = "outlet")]
    pub outlet_id: Uuid,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_json_shape() {
        let now = Utc::now();
        let outlet_id = Uuid::new_v4();
        let item = MenuItem {
            id: Uuid::new_v4(),
            name: "Burger".to_string(),
            price: Decimal::new(9950, 2),
            category: "Meals".to_string(),
            description: String::new(),
            image: crate::domain::DEFAULT_IMAGE.to_string(),
            outlet_id,
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["outlet"], outlet_id.to_string());
        assert_eq!(json["isAvailable"], true);
        assert_eq!(json["price"].as_f64(), Some(99.5));
    }
}

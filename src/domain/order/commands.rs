use serde::Deserialize;
use uuid::Uuid;

use super::value_objects::OrderStatus;

// ============================================================================
// Order Commands - Represent customer and admin intent
// ============================================================================

/// Customer details as submitted at checkout, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// One cart line. Only the id and quantity are read; names and prices
/// always come from the stored menu item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedItem {
    pub menu_item: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    #[serde(default)]
    pub customer: CustomerDetails,
    pub outlet: Uuid,
    #[serde(default)]
    pub items: Vec<RequestedItem>,
    pub notes: Option<String>,
}

/// Admin edit of an existing order. Items and total are fixed at checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrder {
    pub customer: Option<CustomerDetails>,
    pub notes: Option<String>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatus {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub outlet: Option<Uuid>,
}

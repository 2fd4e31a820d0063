use rust_decimal::Decimal;
use uuid::Uuid;

use crate::store::StoreError;

// ============================================================================
// Menu Item Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MenuItemError {
    #[error("Menu item name is required")]
    EmptyName,

    #[error("Menu item category is required")]
    EmptyCategory,

    #[error("Menu item price is required")]
    MissingPrice,

    #[error("Menu item price cannot be negative: {0}")]
    NegativePrice(Decimal),

    #[error("Menu item price can have at most two decimal places: {0}")]
    PriceTooPrecise(Decimal),

    #[error("Menu item price is too large: {0}")]
    PriceTooLarge(Decimal),

    #[error("Outlet is required")]
    MissingOutlet,

    #[error("Invalid outlet")]
    InvalidOutlet(Uuid),

    #[error("Menu item not found")]
    NotFound(Uuid),

    #[error("Menu item already exists for this outlet")]
    Duplicate { name: String, outlet_id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}

use uuid::Uuid;

use crate::store::StoreError;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order must contain items")]
    EmptyItems,

    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Invalid outlet")]
    InvalidOutlet(Uuid),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(Uuid),

    #[error("Order total is too large")]
    TotalTooLarge,

    #[error("Customer name is required")]
    EmptyCustomerName,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Customer phone is required")]
    EmptyCustomerPhone,

    #[error("Order not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrderError {
    /// Short label used when counting rejected checkouts.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::EmptyItems => "empty_items",
            OrderError::InvalidQuantity(_) => "invalid_quantity",
            OrderError::InvalidOutlet(_) => "invalid_outlet",
            OrderError::MenuItemNotFound(_) => "menu_item_not_found",
            OrderError::TotalTooLarge => "total_too_large",
            OrderError::EmptyCustomerName
            | OrderError::InvalidEmail(_)
            | OrderError::EmptyCustomerPhone => "invalid_customer",
            OrderError::NotFound(_) => "not_found",
            OrderError::Store(_) => "store_error",
        }
    }
}

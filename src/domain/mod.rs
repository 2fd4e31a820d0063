// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each entity has its own subdirectory with:
// - Value objects (the persisted record and its parts)
// - Commands (validated user intent)
// - Errors
// - Command handler (validation, referential checks, persistence)
//
// Persistence is reached only through the `Store` trait.
//
// ============================================================================

use rust_decimal::Decimal;

pub mod outlet;
pub mod menu_item;
pub mod order;

/// Image used for outlets and menu items created without one.
pub const DEFAULT_IMAGE: &str = "/img/373.png";

/// Trim a required text field, failing with `err` when nothing is left.
pub(crate) fn required_text<E>(value: &str, err: impl FnOnce() -> E) -> Result<String, E> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err());
    }
    Ok(trimmed.to_string())
}

/// Decimal places kept for prices and totals.
pub const MONEY_SCALE: u32 = 2;

/// Largest price or total the money columns hold (`NUMERIC(12, 2)`).
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, MONEY_SCALE)
}

/// True when `amount` has no more than two decimal places.
pub(crate) fn fits_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

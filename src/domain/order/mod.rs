// ============================================================================
// Order Domain - Checkout and order administration
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (Order, OrderItem snapshot, Customer, OrderStatus)
// - Commands (PlaceOrder, UpdateOrder, ChangeStatus)
// - Errors (OrderError enum)
// - Command Handler (OrderCommandHandler, owns pricing)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use command_handler::*;

// ============================================================================
// Outlet Domain - Food vendors and their lifecycle
// ============================================================================
//
// - Value objects (Outlet, CategoryList)
// - Commands (CreateOutlet, UpdateOutlet)
// - Errors (OutletError)
// - Command Handler (OutletCommandHandler, cascades deletes to menu items)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod command_handler;

pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use command_handler::*;

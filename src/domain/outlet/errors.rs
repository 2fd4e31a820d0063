use uuid::Uuid;

use crate::store::StoreError;

// ============================================================================
// Outlet Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OutletError {
    #[error("Outlet name is required")]
    EmptyName,

    #[error("Outlet location is required")]
    EmptyLocation,

    #[error("Outlet timings are required")]
    EmptyTimings,

    #[error("Outlet not found")]
    NotFound(Uuid),

    #[error("Outlet with this name already exists")]
    DuplicateName(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

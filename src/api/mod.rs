// ============================================================================
// HTTP API - actix-web routes under /api
// ============================================================================
//
// Handlers are thin: extract, call the domain handler, wrap the result in a
// JSON envelope. Extractor failures (bad JSON, non-UUID ids, bad query
// strings) answer 400 with the same `{message}` body as domain errors.
//
// ============================================================================

mod dashboard;
pub mod error;
mod menu_items;
mod orders;
mod outlet_refs;
mod outlets;

use actix_web::web;

pub use error::{not_found, ApiError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| ApiError::Validation("Invalid id".to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .configure(outlets::configure)
            .configure(menu_items::configure)
            .configure(orders::configure)
            .configure(dashboard::configure),
    );
}

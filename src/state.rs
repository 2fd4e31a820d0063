use std::sync::Arc;

use crate::domain::menu_item::MenuItemCommandHandler;
use crate::domain::order::OrderCommandHandler;
use crate::domain::outlet::OutletCommandHandler;
use crate::metrics::Metrics;
use crate::store::Store;

/// Shared by every actix-web worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub metrics: Arc<Metrics>,
    pub outlets: OutletCommandHandler,
    pub menu_items: MenuItemCommandHandler,
    pub orders: OrderCommandHandler,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self {
            outlets: OutletCommandHandler::new(store.clone()),
            menu_items: MenuItemCommandHandler::new(store.clone()),
            orders: OrderCommandHandler::new(store.clone(), metrics.clone()),
            store,
            metrics,
        }
    }
}

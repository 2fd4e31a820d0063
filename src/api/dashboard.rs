use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::state::AppState;

use super::error::ApiError;
use super::outlet_refs::with_outlets;

const RECENT_ORDERS: usize = 5;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(dashboard));
}

async fn dashboard(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let (total_outlets, total_menu_items, recent_orders) = tokio::try_join!(
        async { state.store.count_outlets().await.map_err(ApiError::from) },
        async { state.store.count_menu_items().await.map_err(ApiError::from) },
        async { state.orders.recent(RECENT_ORDERS).await.map_err(ApiError::from) },
    )?;
    let recent_orders = with_outlets(state.store.as_ref(), &recent_orders).await?;

    Ok(HttpResponse::Ok().json(json!({
        "totalOutlets": total_outlets,
        "totalMenuItems": total_menu_items,
        "recentOrders": recent_orders,
    })))
}

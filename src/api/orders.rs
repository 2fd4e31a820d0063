use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::domain::order::{ChangeStatus, OrderQuery, PlaceOrder, UpdateOrder};
use crate::state::AppState;

use super::error::ApiError;
use super::outlet_refs::{with_outlet, with_outlets};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(list_orders))
            .route("", web::post().to(place_order))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::put().to(update_order))
            .route("/{id}", web::delete().to(delete_order))
            .route("/{id}/status", web::patch().to(change_status)),
    );
}

async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list(&query).await?;
    let orders = with_outlets(state.store.as_ref(), &orders).await?;
    Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

async fn place_order(
    state: web::Data<AppState>,
    body: web::Json<PlaceOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = state.orders.place_order(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "order": order })))
}

async fn get_order(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let order = state.orders.get(id.into_inner()).await?;
    let order = with_outlet(state.store.as_ref(), &order).await?;
    Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

async fn update_order(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdateOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = state.orders.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

async fn change_status(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<ChangeStatus>,
) -> Result<HttpResponse, ApiError> {
    let order = state.orders.change_status(id.into_inner(), body.status).await?;
    Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

async fn delete_order(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state.orders.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Order deleted successfully" })))
}

use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::domain::menu_item::{CreateMenuItem, MenuItemQuery, UpdateMenuItem};
use crate::state::AppState;

use super::error::ApiError;
use super::outlet_refs::{with_outlet, with_outlets};

pub fn configure(cfg: &mut web::ServiceConfig) {
    // `/categories` must be registered before `/{id}`
    cfg.service(
        web::scope("/menu-items")
            .route("", web::get().to(list_menu_items))
            .route("", web::post().to(create_menu_item))
            .route("/categories", web::get().to(list_categories))
            .route("/{id}", web::get().to(get_menu_item))
            .route("/{id}", web::put().to(update_menu_item))
            .route("/{id}", web::delete().to(delete_menu_item)),
    );
}

async fn list_menu_items(
    state: web::Data<AppState>,
    query: web::Query<MenuItemQuery>,
) -> Result<HttpResponse, ApiError> {
    let menu_items = state.menu_items.list(&query).await?;
    let menu_items = with_outlets(state.store.as_ref(), &menu_items).await?;
    Ok(HttpResponse::Ok().json(json!({ "menuItems": menu_items })))
}

async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories = state.menu_items.categories().await?;
    Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

async fn get_menu_item(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let menu_item = state.menu_items.get(id.into_inner()).await?;
    let menu_item = with_outlet(state.store.as_ref(), &menu_item).await?;
    Ok(HttpResponse::Ok().json(json!({ "menuItem": menu_item })))
}

async fn create_menu_item(
    state: web::Data<AppState>,
    body: web::Json<CreateMenuItem>,
) -> Result<HttpResponse, ApiError> {
    let menu_item = state.menu_items.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "menuItem": menu_item })))
}

async fn update_menu_item(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdateMenuItem>,
) -> Result<HttpResponse, ApiError> {
    let menu_item = state.menu_items.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "menuItem": menu_item })))
}

async fn delete_menu_item(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state.menu_items.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Menu item deleted successfully" })))
}

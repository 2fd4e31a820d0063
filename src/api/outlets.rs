use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::domain::outlet::{CreateOutlet, UpdateOutlet};
use crate::state::AppState;

use super::error::ApiError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/outlets")
            .route("", web::get().to(list_outlets))
            .route("", web::post().to(create_outlet))
            .route("/{id}", web::get().to(get_outlet))
            .route("/{id}", web::put().to(update_outlet))
            .route("/{id}", web::delete().to(delete_outlet)),
    );
}

async fn list_outlets(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let outlets = state.outlets.list().await?;
    Ok(HttpResponse::Ok().json(json!({ "outlets": outlets })))
}

async fn get_outlet(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let (outlet, menu_items) = state.outlets.get_with_menu(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "outlet": outlet, "menuItems": menu_items })))
}

async fn create_outlet(
    state: web::Data<AppState>,
    body: web::Json<CreateOutlet>,
) -> Result<HttpResponse, ApiError> {
    let outlet = state.outlets.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "outlet": outlet })))
}

async fn update_outlet(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdateOutlet>,
) -> Result<HttpResponse, ApiError> {
    let outlet = state.outlets.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "outlet": outlet })))
}

async fn delete_outlet(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    state.outlets.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Outlet deleted successfully" })))
}

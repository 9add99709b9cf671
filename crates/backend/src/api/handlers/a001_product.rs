use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_product::{Product, ProductDto, ProductListResponse, ProductPatch};
use contracts::enums::WebhookEventType;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::domain::a001_product::repository::ProductListParams;
use crate::domain::a001_product::service;
use crate::shared::error::ApiError;
use crate::state::AppState;

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::bad_request("Invalid product ID"))
}

/// Payload события для вебхуков каталога
fn product_payload(product: &Product) -> Value {
    json!({
        "id": product.id,
        "sku": product.sku,
        "name": product.name,
        "description": product.description,
        "active": product.active,
    })
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let page = service::list(&state.db, params).await?;
    Ok(Json(page))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let product = service::get_by_id(&state.db, id).await?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(dto): Json<ProductDto>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = service::create(&state.db, dto).await?;
    state
        .notifier
        .notify(WebhookEventType::ProductCreated, product_payload(&product));
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let product = service::update(&state.db, id, patch).await?;
    state
        .notifier
        .notify(WebhookEventType::ProductUpdated, product_payload(&product));
    Ok(Json(product))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let product = service::delete(&state.db, id).await?;
    state
        .notifier
        .notify(WebhookEventType::ProductDeleted, product_payload(&product));
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/products/bulk/all
pub async fn delete_all_products(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let deleted_count = service::delete_all(&state.db).await?;
    Ok(Json(json!({
        "message": format!("Deleted {} products", deleted_count),
        "deleted_count": deleted_count,
    })))
}

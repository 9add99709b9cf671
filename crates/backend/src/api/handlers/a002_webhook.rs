use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a002_webhook::{DeliveryResult, Webhook, WebhookDto, WebhookPatch};
use uuid::Uuid;

use crate::domain::a002_webhook::service;
use crate::shared::error::ApiError;
use crate::state::AppState;

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::bad_request("Invalid webhook ID"))
}

/// GET /api/webhooks
pub async fn list_webhooks(State(state): State<AppState>) -> Result<Json<Vec<Webhook>>, ApiError> {
    let webhooks = service::list_all(&state.db).await?;
    Ok(Json(webhooks))
}

/// GET /api/webhooks/:id
pub async fn get_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Webhook>, ApiError> {
    let id = parse_id(&id)?;
    let webhook = service::get_by_id(&state.db, id).await?;
    Ok(Json(webhook))
}

/// POST /api/webhooks
pub async fn create_webhook(
    State(state): State<AppState>,
    Json(dto): Json<WebhookDto>,
) -> Result<(StatusCode, Json<Webhook>), ApiError> {
    let webhook = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(webhook)))
}

/// PUT /api/webhooks/:id
pub async fn update_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WebhookPatch>,
) -> Result<Json<Webhook>, ApiError> {
    let id = parse_id(&id)?;
    let webhook = service::update(&state.db, id, patch).await?;
    Ok(Json(webhook))
}

/// DELETE /api/webhooks/:id
pub async fn delete_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/webhooks/:id/test — пробная доставка на подписку
pub async fn test_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeliveryResult>, ApiError> {
    let id = parse_id(&id)?;
    let webhook = service::get_by_id(&state.db, id).await?;
    let result = state
        .delivery
        .test_delivery(&webhook.url, webhook.secret.as_deref())
        .await;
    Ok(Json(result))
}

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::api::handlers::{a001_product, a002_webhook, u501_csv_import};
use crate::state::AppState;

async fn root() -> Json<Value> {
    Json(json!({ "message": "Product Importer API is running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // ========================================
        // A001 Product handlers
        // ========================================
        .route(
            "/api/products",
            get(a001_product::list_products).post(a001_product::create_product),
        )
        .route(
            "/api/products/:id",
            get(a001_product::get_product)
                .put(a001_product::update_product)
                .delete(a001_product::delete_product),
        )
        .route(
            "/api/products/bulk/all",
            delete(a001_product::delete_all_products),
        )
        // ========================================
        // A002 Webhook handlers
        // ========================================
        .route(
            "/api/webhooks",
            get(a002_webhook::list_webhooks).post(a002_webhook::create_webhook),
        )
        .route(
            "/api/webhooks/:id",
            get(a002_webhook::get_webhook)
                .put(a002_webhook::update_webhook)
                .delete(a002_webhook::delete_webhook),
        )
        .route("/api/webhooks/:id/test", post(a002_webhook::test_webhook))
        // ========================================
        // UseCase u501: CSV import
        // ========================================
        .route(
            "/api/upload",
            post(u501_csv_import::upload_csv).layer(DefaultBodyLimit::max(100 * 1024 * 1024)),
        )
        .route(
            "/api/upload/status/:job_id",
            get(u501_csv_import::get_import_status),
        )
        .route(
            "/api/upload/stream/:job_id",
            get(u501_csv_import::stream_import_progress),
        )
        .with_state(state)
}

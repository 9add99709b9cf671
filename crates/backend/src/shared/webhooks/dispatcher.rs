use std::sync::Arc;

use contracts::domain::a002_webhook::DeliveryResult;
use contracts::enums::WebhookEventType;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::domain::a002_webhook::repository;

use super::delivery::{epoch_seconds, DeliveryClient};

/// Диспетчер вебхуков: fan-out события всем включенным подпискам
/// данного типа. Доставки стартуют одновременно, каждая живет своим
/// исходом; итог собирается после завершения всех в порядке подписок
pub struct WebhookDispatcher {
    db: DatabaseConnection,
    client: Arc<DeliveryClient>,
}

impl WebhookDispatcher {
    pub fn new(db: DatabaseConnection, client: Arc<DeliveryClient>) -> Self {
        Self { db, client }
    }

    pub async fn dispatch(
        &self,
        event: WebhookEventType,
        data: Value,
    ) -> anyhow::Result<Vec<DeliveryResult>> {
        let subscriptions = repository::list_enabled_for_event(&self.db, event).await?;
        if subscriptions.is_empty() {
            return Ok(Vec::new());
        }

        let envelope = serde_json::json!({
            "event": event.code(),
            "data": data,
            "timestamp": epoch_seconds(),
        });

        let mut handles = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            let client = Arc::clone(&self.client);
            let payload = envelope.clone();
            handles.push(tokio::spawn(async move {
                client
                    .deliver(&subscription.url, &payload, subscription.secret.as_deref())
                    .await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => results.push(DeliveryResult {
                    success: false,
                    status_code: None,
                    response_time_ms: 0.0,
                    message: "Webhook delivery failed".to_string(),
                    error: Some(e.to_string()),
                }),
            }
        }

        let delivered = results.iter().filter(|result| result.success).count();
        tracing::info!(
            "Dispatched {} to {} endpoint(s), {} delivered",
            event.code(),
            results.len(),
            delivered
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_webhook::service;
    use crate::shared::data::db::connect_and_bootstrap;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use contracts::domain::a002_webhook::WebhookDto;
    use std::time::{Duration, Instant};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn dto(url: String, event_type: &str, enabled: bool) -> WebhookDto {
        WebhookDto {
            url,
            event_type: event_type.to_string(),
            enabled: Some(enabled),
            secret: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_without_subscriptions_is_empty() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let dispatcher = WebhookDispatcher::new(
            db,
            Arc::new(DeliveryClient::new(Duration::from_secs(1))),
        );

        let results = dispatcher
            .dispatch(WebhookEventType::ProductCreated, serde_json::json!({}))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_collects_independent_results() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();

        let ok_base = spawn_server(Router::new().route("/hook", post(|| async { StatusCode::OK }))).await;
        let err_base = spawn_server(Router::new().route(
            "/hook",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let slow_base = spawn_server(Router::new().route(
            "/hook",
            post(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                StatusCode::OK
            }),
        ))
        .await;

        // Порядок подписок задает порядок результатов
        service::create(&db, dto(format!("{}/hook", slow_base), "product.created", true))
            .await
            .unwrap();
        service::create(&db, dto(format!("{}/hook", err_base), "product.created", true))
            .await
            .unwrap();
        service::create(&db, dto(format!("{}/hook", ok_base), "product.created", true))
            .await
            .unwrap();
        // Выключенная и чужая подписки не участвуют
        service::create(&db, dto(format!("{}/hook", ok_base), "product.created", false))
            .await
            .unwrap();
        service::create(&db, dto(format!("{}/hook", ok_base), "product.deleted", true))
            .await
            .unwrap();

        let dispatcher = WebhookDispatcher::new(
            db,
            Arc::new(DeliveryClient::new(Duration::from_millis(100))),
        );

        let started = Instant::now();
        let results = dispatcher
            .dispatch(
                WebhookEventType::ProductCreated,
                serde_json::json!({ "sku": "ABC-1" }),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(!results[0].success);
        assert_eq!(results[0].error.as_deref(), Some("Request timeout"));
        assert!(!results[1].success);
        assert_eq!(results[1].status_code, Some(500));
        assert!(results[2].success);
        assert_eq!(results[2].status_code, Some(200));

        // Медленный endpoint не задержал остальных дольше своего таймаута
        assert!(started.elapsed() < Duration::from_millis(450));
    }

    #[tokio::test]
    async fn test_dispatch_runs_deliveries_concurrently() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let slow = Router::new().route(
            "/hook",
            post(|| async {
                tokio::time::sleep(Duration::from_millis(150)).await;
                StatusCode::OK
            }),
        );
        let base_a = spawn_server(slow.clone()).await;
        let base_b = spawn_server(slow).await;

        service::create(&db, dto(format!("{}/hook", base_a), "product.updated", true))
            .await
            .unwrap();
        service::create(&db, dto(format!("{}/hook", base_b), "product.updated", true))
            .await
            .unwrap();

        let dispatcher = WebhookDispatcher::new(
            db,
            Arc::new(DeliveryClient::new(Duration::from_secs(2))),
        );

        let started = Instant::now();
        let results = dispatcher
            .dispatch(WebhookEventType::ProductUpdated, serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|result| result.success));
        // Последовательные доставки заняли бы не меньше 300 мс
        assert!(started.elapsed() < Duration::from_millis(290));
    }
}

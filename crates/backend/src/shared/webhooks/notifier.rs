use contracts::enums::WebhookEventType;
use serde_json::Value;
use tokio::sync::mpsc;

use super::dispatcher::WebhookDispatcher;

#[derive(Debug)]
struct Notification {
    event: WebhookEventType,
    payload: Value,
}

/// Очередь уведомлений о мутациях каталога. `notify` ставит событие в
/// очередь и сразу возвращается: вызывающий не ждет доставку и не
/// узнает ее исход
#[derive(Clone)]
pub struct WebhookNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl WebhookNotifier {
    /// Запустить фоновый цикл доставки и вернуть ручку очереди
    pub fn spawn(dispatcher: WebhookDispatcher) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
        tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                if let Err(e) = dispatcher
                    .dispatch(notification.event, notification.payload)
                    .await
                {
                    tracing::error!(
                        "Webhook dispatch failed for {}: {}",
                        notification.event.code(),
                        e
                    );
                }
            }
        });
        Self { tx }
    }

    /// Поставить событие в очередь после зафиксированной мутации
    pub fn notify(&self, event: WebhookEventType, payload: Value) {
        if self.tx.send(Notification { event, payload }).is_err() {
            tracing::warn!("Webhook notifier queue is closed, dropping {}", event.code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_webhook::service;
    use crate::shared::data::db::connect_and_bootstrap;
    use crate::shared::webhooks::DeliveryClient;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use contracts::domain::a002_webhook::WebhookDto;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[tokio::test]
    async fn test_notify_is_fire_and_forget() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();

        let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route(
                "/hook",
                post(
                    |State(received): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                        received.lock().unwrap().push(body);
                        StatusCode::OK
                    },
                ),
            )
            .with_state(received.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        service::create(
            &db,
            WebhookDto {
                url: format!("http://{}/hook", addr),
                event_type: "product.created".to_string(),
                enabled: Some(true),
                secret: None,
                description: None,
            },
        )
        .await
        .unwrap();

        let dispatcher = WebhookDispatcher::new(
            db,
            Arc::new(DeliveryClient::new(Duration::from_secs(2))),
        );
        let notifier = WebhookNotifier::spawn(dispatcher);

        notifier.notify(
            WebhookEventType::ProductCreated,
            serde_json::json!({ "sku": "ABC-1" }),
        );

        // Доставка происходит в фоне, дожидаемся ее появления
        let mut delivered = Vec::new();
        for _ in 0..100 {
            delivered = received.lock().unwrap().clone();
            if !delivered.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0]["event"], "product.created");
        assert_eq!(delivered[0]["data"]["sku"], "ABC-1");
        assert!(delivered[0]["timestamp"].is_f64());
    }
}

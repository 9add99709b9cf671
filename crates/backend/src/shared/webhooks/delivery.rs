use std::time::{Duration, Instant};

use contracts::domain::a002_webhook::DeliveryResult;
use serde_json::Value;

/// HTTP клиент доставки вебхуков. Таймаут фиксируется при создании и
/// действует на каждую доставку целиком
pub struct DeliveryClient {
    client: reqwest::Client,
}

impl DeliveryClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Доставить payload на endpoint. Любой исход, включая таймаут и
    /// сетевые сбои, выражается значением DeliveryResult
    pub async fn deliver(&self, url: &str, payload: &Value, secret: Option<&str>) -> DeliveryResult {
        let started = Instant::now();

        let mut request = self.client.post(url).json(payload);
        if let Some(secret) = secret {
            request = request.header("X-Webhook-Secret", secret);
        }

        match request.send().await {
            Ok(response) => {
                let response_time_ms = elapsed_ms(started);
                let status = response.status().as_u16();
                if response.status().is_success() {
                    DeliveryResult {
                        success: true,
                        status_code: Some(status),
                        response_time_ms,
                        message: "Webhook delivered successfully".to_string(),
                        error: None,
                    }
                } else {
                    DeliveryResult {
                        success: false,
                        status_code: Some(status),
                        response_time_ms,
                        message: format!("Webhook delivery failed with status {}", status),
                        error: Some(format!("HTTP {}", status)),
                    }
                }
            }
            Err(e) if e.is_timeout() => DeliveryResult {
                success: false,
                status_code: None,
                response_time_ms: elapsed_ms(started),
                message: "Webhook delivery timed out".to_string(),
                error: Some("Request timeout".to_string()),
            },
            Err(e) => DeliveryResult {
                success: false,
                status_code: None,
                response_time_ms: elapsed_ms(started),
                message: "Webhook delivery failed".to_string(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Пробная доставка фиксированного тестового события
    pub async fn test_delivery(&self, url: &str, secret: Option<&str>) -> DeliveryResult {
        let payload = serde_json::json!({
            "event": "webhook.test",
            "data": { "message": "This is a test webhook delivery" },
            "timestamp": epoch_seconds(),
        });
        self.deliver(url, &payload, secret).await
    }
}

/// Секунды эпохи как float — формат поля timestamp в конверте события
pub fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

fn elapsed_ms(started: Instant) -> f64 {
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    (ms * 100.0).round() / 100.0
}

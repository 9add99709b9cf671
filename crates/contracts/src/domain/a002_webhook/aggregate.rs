use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::WebhookEventType;

/// Подписка на событие каталога
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    pub event_type: WebhookEventType,
    pub enabled: bool,
    /// Общий секрет, передается в заголовке доставки как есть
    pub secret: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Webhook {
    /// Создать новую подписку для вставки в БД
    pub fn new_for_insert(
        url: String,
        event_type: WebhookEventType,
        enabled: bool,
        secret: Option<String>,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            url,
            event_type,
            enabled,
            secret,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Данные для создания подписки
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookDto {
    pub url: String,
    pub event_type: String,
    pub enabled: Option<bool>,
    pub secret: Option<String>,
    pub description: Option<String>,
}

impl WebhookDto {
    pub fn validate(&self) -> Result<(), String> {
        validate_url(&self.url)?;
        validate_secret(self.secret.as_deref())?;
        validate_webhook_description(self.description.as_deref())?;
        Ok(())
    }
}

/// Частичное обновление подписки
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPatch {
    pub url: Option<String>,
    pub event_type: Option<String>,
    pub enabled: Option<bool>,
    pub secret: Option<String>,
    pub description: Option<String>,
}

impl WebhookPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        validate_secret(self.secret.as_deref())?;
        validate_webhook_description(self.description.as_deref())?;
        Ok(())
    }

    /// Применить патч к подписке. event_type должен быть провалидирован
    /// заранее через parse_event_type
    pub fn apply(&self, webhook: &mut Webhook) {
        if let Some(url) = &self.url {
            webhook.url = url.clone();
        }
        if let Some(event_type) = &self.event_type {
            if let Some(parsed) = WebhookEventType::from_code(event_type) {
                webhook.event_type = parsed;
            }
        }
        if let Some(enabled) = self.enabled {
            webhook.enabled = enabled;
        }
        if let Some(secret) = &self.secret {
            webhook.secret = Some(secret.clone());
        }
        if let Some(description) = &self.description {
            webhook.description = Some(description.clone());
        }
    }
}

/// Результат одной попытки доставки вебхука
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub response_time_ms: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Распарсить код события. Ошибка содержит список допустимых значений
pub fn parse_event_type(value: &str) -> Result<WebhookEventType, String> {
    WebhookEventType::from_code(value).ok_or_else(|| {
        let valid = WebhookEventType::all()
            .iter()
            .map(|e| e.code())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Invalid event type. Must be one of: {}", valid)
    })
}

fn validate_url(url: &str) -> Result<(), String> {
    if url.is_empty() || url.chars().count() > 2000 {
        return Err("URL must be between 1 and 2000 characters".to_string());
    }
    Ok(())
}

fn validate_secret(secret: Option<&str>) -> Result<(), String> {
    if let Some(s) = secret {
        if s.chars().count() > 255 {
            return Err("Secret must be at most 255 characters".to_string());
        }
    }
    Ok(())
}

fn validate_webhook_description(description: Option<&str>) -> Result<(), String> {
    if let Some(d) = description {
        if d.chars().count() > 1000 {
            return Err("Description must be at most 1000 characters".to_string());
        }
    }
    Ok(())
}

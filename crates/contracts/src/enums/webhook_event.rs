use serde::{Deserialize, Serialize};

/// Типы событий каталога, на которые можно подписаться
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    #[serde(rename = "product.created")]
    ProductCreated,
    #[serde(rename = "product.updated")]
    ProductUpdated,
    #[serde(rename = "product.deleted")]
    ProductDeleted,
}

impl WebhookEventType {
    /// Получить код события
    pub fn code(&self) -> &'static str {
        match self {
            WebhookEventType::ProductCreated => "product.created",
            WebhookEventType::ProductUpdated => "product.updated",
            WebhookEventType::ProductDeleted => "product.deleted",
        }
    }

    /// Получить все типы событий
    pub fn all() -> Vec<WebhookEventType> {
        vec![
            WebhookEventType::ProductCreated,
            WebhookEventType::ProductUpdated,
            WebhookEventType::ProductDeleted,
        ]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "product.created" => Some(WebhookEventType::ProductCreated),
            "product.updated" => Some(WebhookEventType::ProductUpdated),
            "product.deleted" => Some(WebhookEventType::ProductDeleted),
            _ => None,
        }
    }
}

impl ToString for WebhookEventType {
    fn to_string(&self) -> String {
        self.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for event in WebhookEventType::all() {
            assert_eq!(WebhookEventType::from_code(event.code()), Some(event));
        }
        assert_eq!(WebhookEventType::from_code("product.archived"), None);
    }

    #[test]
    fn test_serializes_as_wire_code() {
        let json = serde_json::to_string(&WebhookEventType::ProductCreated).unwrap();
        assert_eq!(json, "\"product.created\"");

        let parsed: WebhookEventType = serde_json::from_str("\"product.deleted\"").unwrap();
        assert_eq!(parsed, WebhookEventType::ProductDeleted);
    }
}

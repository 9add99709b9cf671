use contracts::domain::a002_webhook::{parse_event_type, Webhook, WebhookDto, WebhookPatch};
use uuid::Uuid;

use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::{ServiceError, ServiceResult};

/// Создание подписки на событие каталога
pub async fn create(db: &DatabaseConnection, dto: WebhookDto) -> ServiceResult<Webhook> {
    dto.validate().map_err(ServiceError::Validation)?;
    let event_type = parse_event_type(&dto.event_type).map_err(ServiceError::Validation)?;

    let webhook = Webhook::new_for_insert(
        dto.url,
        event_type,
        dto.enabled.unwrap_or(true),
        dto.secret,
        dto.description,
    );
    let inserted = repository::insert(db, &webhook).await?;
    Ok(inserted)
}

/// Частичное обновление подписки
pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    patch: WebhookPatch,
) -> ServiceResult<Webhook> {
    patch.validate().map_err(ServiceError::Validation)?;
    if let Some(event_type) = &patch.event_type {
        parse_event_type(event_type).map_err(ServiceError::Validation)?;
    }

    let mut webhook = repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Webhook not found".to_string()))?;

    patch.apply(&mut webhook);
    let updated = repository::update(db, &webhook).await?;
    Ok(updated)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> ServiceResult<()> {
    let deleted = repository::delete(db, id).await?;
    if !deleted {
        return Err(ServiceError::NotFound("Webhook not found".to_string()));
    }
    Ok(())
}

pub async fn get_by_id(db: &DatabaseConnection, id: Uuid) -> ServiceResult<Webhook> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Webhook not found".to_string()))
}

pub async fn list_all(db: &DatabaseConnection) -> ServiceResult<Vec<Webhook>> {
    let items = repository::list_all(db).await?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_and_bootstrap;

    fn dto(url: &str, event_type: &str) -> WebhookDto {
        WebhookDto {
            url: url.to_string(),
            event_type: event_type.to_string(),
            enabled: None,
            secret: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_event_type() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let err = create(&db, dto("http://a", "order.created")).await.unwrap_err();
        match err {
            ServiceError::Validation(msg) => assert!(msg.starts_with("Invalid event type")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_enabled_true() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let created = create(&db, dto("http://a", "product.created")).await.unwrap();
        assert!(created.enabled);
    }

    #[tokio::test]
    async fn test_update_validates_event_type_before_applying() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let created = create(&db, dto("http://a", "product.created")).await.unwrap();
        let id = Uuid::parse_str(&created.id).unwrap();

        let err = update(
            &db,
            id,
            WebhookPatch {
                event_type: Some("order.created".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // Запись не изменилась
        let loaded = get_by_id(&db, id).await.unwrap();
        assert_eq!(loaded.event_type.code(), "product.created");
    }
}

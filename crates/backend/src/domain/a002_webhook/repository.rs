use chrono::Utc;
use contracts::domain::a002_webhook::Webhook;
use contracts::enums::WebhookEventType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_webhook")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub url: String,
    pub event_type: String,
    pub enabled: bool,
    pub secret: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Webhook {
    fn from(m: Model) -> Self {
        Webhook {
            id: m.id,
            url: m.url,
            // Неизвестный код в БД невозможен при записи через сервис,
            // но на всякий случай не паникуем
            event_type: WebhookEventType::from_code(&m.event_type)
                .unwrap_or(WebhookEventType::ProductCreated),
            enabled: m.enabled,
            secret: m.secret,
            description: m.description,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<Option<Webhook>> {
    let result = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<Webhook>> {
    let items = Entity::find()
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Включенные подписки на событие. Порядок стабилен (по created_at),
/// от него зависит порядок результатов fan-out
pub async fn list_enabled_for_event<C: ConnectionTrait>(
    db: &C,
    event: WebhookEventType,
) -> anyhow::Result<Vec<Webhook>> {
    let items = Entity::find()
        .filter(Column::EventType.eq(event.code()))
        .filter(Column::Enabled.eq(true))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert<C: ConnectionTrait>(db: &C, webhook: &Webhook) -> anyhow::Result<Webhook> {
    let active = ActiveModel {
        id: Set(webhook.id.clone()),
        url: Set(webhook.url.clone()),
        event_type: Set(webhook.event_type.code().to_string()),
        enabled: Set(webhook.enabled),
        secret: Set(webhook.secret.clone()),
        description: Set(webhook.description.clone()),
        created_at: Set(Some(webhook.created_at)),
        updated_at: Set(Some(webhook.updated_at)),
    };
    let model = active.insert(db).await?;
    Ok(model.into())
}

pub async fn update<C: ConnectionTrait>(db: &C, webhook: &Webhook) -> anyhow::Result<Webhook> {
    let active = ActiveModel {
        id: Set(webhook.id.clone()),
        url: Set(webhook.url.clone()),
        event_type: Set(webhook.event_type.code().to_string()),
        enabled: Set(webhook.enabled),
        secret: Set(webhook.secret.clone()),
        description: Set(webhook.description.clone()),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    };
    let model = active.update(db).await?;
    Ok(model.into())
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

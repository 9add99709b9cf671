use chrono::Utc;
use contracts::domain::a001_product::Product;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            id: m.id,
            sku: m.sku,
            name: m.name,
            description: m.description,
            active: m.active,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Нормализованный ключ SKU: trim + lowercase
pub fn normalize_sku(sku: &str) -> String {
    sku.trim().to_lowercase()
}

/// lower(sku) = normalized, ключевое выражение регистронезависимого поиска
fn sku_lower_eq(normalized: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(Column::Sku))).eq(normalized)
}

/// Фильтры и пагинация списка товаров
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> anyhow::Result<Option<Product>> {
    let result = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

/// Найти товар по SKU без учета регистра
pub async fn find_by_sku_ci<C: ConnectionTrait>(
    db: &C,
    sku: &str,
) -> anyhow::Result<Option<Product>> {
    let normalized = normalize_sku(sku);
    let result = Entity::find()
        .filter(sku_lower_eq(&normalized))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

/// Страница товаров по фильтрам. Возвращает (элементы, всего записей)
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    params: &ProductListParams,
    page: u64,
    page_size: u64,
) -> anyhow::Result<(Vec<Product>, u64)> {
    let mut query = Entity::find();

    if let Some(sku) = params.sku.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col(Column::Sku)))
                .like(format!("%{}%", sku.to_lowercase())),
        );
    }
    if let Some(name) = params.name.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(Column::Name.contains(name));
    }
    if let Some(description) = params.description.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(Column::Description.contains(description));
    }
    if let Some(active) = params.active {
        query = query.filter(Column::Active.eq(active));
    }

    let paginator = query
        .order_by_asc(Column::CreatedAt)
        .paginate(db, page_size);
    let total = paginator.num_items().await?;
    let items = paginator
        .fetch_page(page.saturating_sub(1))
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok((items, total))
}

pub async fn insert<C: ConnectionTrait>(db: &C, product: &Product) -> anyhow::Result<Product> {
    let model = new_active_model(product).insert(db).await?;
    Ok(model.into())
}

/// Вставить пачку товаров одним запросом (для импорта)
pub async fn insert_many<C: ConnectionTrait>(db: &C, products: &[Product]) -> anyhow::Result<()> {
    if products.is_empty() {
        return Ok(());
    }
    let models: Vec<ActiveModel> = products.iter().map(new_active_model).collect();
    Entity::insert_many(models).exec(db).await?;
    Ok(())
}

/// Перезаписать изменяемые поля товара. created_at не трогаем,
/// updated_at назначается здесь
pub async fn update<C: ConnectionTrait>(db: &C, product: &Product) -> anyhow::Result<Product> {
    let active = ActiveModel {
        id: Set(product.id.clone()),
        sku: Set(product.sku.clone()),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        active: Set(product.active),
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

pub async fn delete_all<C: ConnectionTrait>(db: &C) -> anyhow::Result<u64> {
    let result = Entity::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}

fn new_active_model(product: &Product) -> ActiveModel {
    ActiveModel {
        id: Set(product.id.clone()),
        sku: Set(product.sku.clone()),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        active: Set(product.active),
        created_at: Set(Some(product.created_at)),
        updated_at: Set(Some(product.updated_at)),
    }
}

use contracts::domain::a001_product::{Product, ProductDto, ProductListResponse, ProductPatch};
use uuid::Uuid;

use sea_orm::DatabaseConnection;

use super::repository::{self, ProductListParams};
use crate::shared::error::{ServiceError, ServiceResult};

/// Создание нового товара. SKU уникален без учета регистра
pub async fn create(db: &DatabaseConnection, dto: ProductDto) -> ServiceResult<Product> {
    dto.validate().map_err(ServiceError::Validation)?;

    if repository::find_by_sku_ci(db, &dto.sku).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Product with SKU '{}' already exists",
            dto.sku
        )));
    }

    let product = Product::new_for_insert(
        dto.sku,
        dto.name,
        dto.description,
        dto.active.unwrap_or(true),
    );
    let inserted = repository::insert(db, &product).await?;
    Ok(inserted)
}

/// Частичное обновление товара
pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    patch: ProductPatch,
) -> ServiceResult<Product> {
    patch.validate().map_err(ServiceError::Validation)?;

    let mut product = repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;

    // Проверка уникальности SKU не учитывает саму запись
    if let Some(new_sku) = &patch.sku {
        if let Some(existing) = repository::find_by_sku_ci(db, new_sku).await? {
            if existing.id != product.id {
                return Err(ServiceError::Conflict(format!(
                    "Product with SKU '{}' already exists",
                    new_sku
                )));
            }
        }
    }

    patch.apply(&mut product);
    let updated = repository::update(db, &product).await?;
    Ok(updated)
}

/// Удаление товара. Возвращает удаленную запись для уведомления
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> ServiceResult<Product> {
    let product = repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;

    repository::delete(db, id).await?;
    Ok(product)
}

/// Удаление всех товаров. Возвращает число удаленных записей
pub async fn delete_all(db: &DatabaseConnection) -> ServiceResult<u64> {
    let count = repository::delete_all(db).await?;
    Ok(count)
}

pub async fn get_by_id(db: &DatabaseConnection, id: Uuid) -> ServiceResult<Product> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))
}

/// Страница списка товаров с фильтрами
pub async fn list(
    db: &DatabaseConnection,
    params: ProductListParams,
) -> ServiceResult<ProductListResponse> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(10);
    if page < 1 {
        return Err(ServiceError::Validation("page must be >= 1".to_string()));
    }
    if !(1..=100).contains(&page_size) {
        return Err(ServiceError::Validation(
            "page_size must be between 1 and 100".to_string(),
        ));
    }

    let (items, total) = repository::list_page(db, &params, page, page_size).await?;
    let total_pages = (total + page_size - 1) / page_size;

    Ok(ProductListResponse {
        items,
        total,
        page,
        page_size,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_and_bootstrap;

    fn dto(sku: &str, name: &str) -> ProductDto {
        ProductDto {
            sku: sku.to_string(),
            name: name.to_string(),
            description: None,
            active: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_sku_case_insensitively() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        create(&db, dto("ABC-1", "Widget")).await.unwrap();

        let err = create(&db, dto("abc-1", "Widget 2")).await.unwrap_err();
        match err {
            ServiceError::Conflict(msg) => {
                assert_eq!(msg, "Product with SKU 'abc-1' already exists")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_applies_patch_and_keeps_other_fields() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let created = create(
            &db,
            ProductDto {
                sku: "ABC-1".to_string(),
                name: "Widget".to_string(),
                description: Some("Blue".to_string()),
                active: Some(true),
            },
        )
        .await
        .unwrap();

        let id = Uuid::parse_str(&created.id).unwrap();
        let updated = update(
            &db,
            id,
            ProductPatch {
                name: Some("Widget v2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Widget v2");
        assert_eq!(updated.sku, "ABC-1");
        assert_eq!(updated.description.as_deref(), Some("Blue"));
    }

    #[tokio::test]
    async fn test_update_allows_own_sku_but_not_foreign() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let first = create(&db, dto("ABC-1", "Widget")).await.unwrap();
        create(&db, dto("DEF-2", "Gadget")).await.unwrap();

        let id = Uuid::parse_str(&first.id).unwrap();

        // Перезапись своего SKU другим регистром допустима
        let updated = update(
            &db,
            id,
            ProductPatch {
                sku: Some("abc-1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.sku, "abc-1");

        // Чужой SKU занят
        let err = update(
            &db,
            id,
            ProductPatch {
                sku: Some("def-2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_then_not_found() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let created = create(&db, dto("ABC-1", "Widget")).await.unwrap();
        let id = Uuid::parse_str(&created.id).unwrap();

        let deleted = delete(&db, id).await.unwrap();
        assert_eq!(deleted.sku, "ABC-1");

        let err = delete(&db, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_validates_page_bounds() {
        let db = connect_and_bootstrap("sqlite::memory:").await.unwrap();
        let err = list(
            &db,
            ProductListParams {
                page_size: Some(500),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}

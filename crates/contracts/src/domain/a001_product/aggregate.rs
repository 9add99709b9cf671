use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Товар каталога
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Артикул. Уникален без учета регистра
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Создать новый товар для вставки в БД
    pub fn new_for_insert(
        sku: String,
        name: String,
        description: Option<String>,
        active: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            sku,
            name,
            description,
            active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Данные для создания товара
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDto {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl ProductDto {
    pub fn validate(&self) -> Result<(), String> {
        validate_sku(&self.sku)?;
        validate_name(&self.name)?;
        validate_description(self.description.as_deref())?;
        Ok(())
    }
}

/// Частичное обновление товара. Отсутствующее поле остается без изменений
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.sku.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.active.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(sku) = &self.sku {
            validate_sku(sku)?;
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_description(self.description.as_deref())?;
        Ok(())
    }

    /// Применить патч к товару. Чистая функция слияния, не трогает
    /// created_at/updated_at (их назначает хранилище)
    pub fn apply(&self, product: &mut Product) {
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = Some(description.clone());
        }
        if let Some(active) = self.active {
            product.active = active;
        }
    }
}

/// Страница списка товаров
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

fn validate_sku(sku: &str) -> Result<(), String> {
    if sku.is_empty() || sku.chars().count() > 255 {
        return Err("SKU must be between 1 and 255 characters".to_string());
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.chars().count() > 500 {
        return Err("Name must be between 1 and 500 characters".to_string());
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), String> {
    if let Some(d) = description {
        if d.chars().count() > 2000 {
            return Err("Description must be at most 2000 characters".to_string());
        }
    }
    Ok(())
}

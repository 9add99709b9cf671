use std::collections::HashMap;

use contracts::domain::a001_product::Product;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::domain::a001_product::repository::{self, normalize_sku};

use super::validator::ValidRow;

/// Итог зафиксированного чанка
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOutcome {
    pub inserted: usize,
    pub updated: usize,
}

/// Применить чанк валидных строк одной транзакцией.
///
/// Дубликаты SKU внутри чанка схлопываются до одной записи: выживает
/// целиком последняя строка, но на позиции первого вхождения ключа.
/// Каждая выжившая строка либо обновляет существующий товар (поиск по
/// SKU без учета регистра), либо вставляет новый. `active` при импорте
/// всегда выставляется в true. Ошибка откатывает весь чанк
pub async fn upsert_chunk(
    db: &DatabaseConnection,
    rows: &[ValidRow],
) -> anyhow::Result<ChunkOutcome> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut staged: Vec<&ValidRow> = Vec::new();
    for row in rows {
        let key = normalize_sku(&row.sku);
        match positions.get(&key) {
            Some(&index) => staged[index] = row,
            None => {
                positions.insert(key, staged.len());
                staged.push(row);
            }
        }
    }

    let txn = db.begin().await?;

    let mut to_insert: Vec<Product> = Vec::new();
    let mut outcome = ChunkOutcome::default();

    for row in &staged {
        match repository::find_by_sku_ci(&txn, &row.sku).await? {
            Some(mut existing) => {
                existing.sku = row.sku.clone();
                existing.name = row.name.clone();
                existing.description = row.description.clone();
                existing.active = true;
                repository::update(&txn, &existing).await?;
                outcome.updated += 1;
            }
            None => {
                to_insert.push(Product::new_for_insert(
                    row.sku.clone(),
                    row.name.clone(),
                    row.description.clone(),
                    true,
                ));
                outcome.inserted += 1;
            }
        }
    }

    repository::insert_many(&txn, &to_insert).await?;
    txn.commit().await?;

    Ok(outcome)
}

use std::collections::HashMap;

/// Строка CSV, прошедшая проверку обязательных полей
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRow {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
}

/// Проверить сырую строку каталога. `row_num` — номер строки данных
/// в файле (с единицы), он попадает в текст ошибки
pub fn validate_row(row: &HashMap<String, String>, row_num: usize) -> Result<ValidRow, String> {
    let sku = match field(row, "sku") {
        Some(value) => value,
        None => return Err(format!("Row {}: SKU is required", row_num)),
    };

    let name = match field(row, "name") {
        Some(value) => value,
        None => return Err(format!("Row {}: Name is required", row_num)),
    };

    Ok(ValidRow {
        sku,
        name,
        description: field(row, "description"),
    })
}

/// Значение колонки после trim. Пустая строка равносильна отсутствию
fn field(row: &HashMap<String, String>, key: &str) -> Option<String> {
    row.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_row_trims_fields() {
        let parsed = validate_row(
            &row(&[("sku", "  ABC-1  "), ("name", " Widget "), ("description", " Blue ")]),
            1,
        )
        .unwrap();

        assert_eq!(parsed.sku, "ABC-1");
        assert_eq!(parsed.name, "Widget");
        assert_eq!(parsed.description.as_deref(), Some("Blue"));
    }

    #[test]
    fn test_missing_sku_message() {
        let err = validate_row(&row(&[("name", "Widget")]), 7).unwrap_err();
        assert_eq!(err, "Row 7: SKU is required");

        let err = validate_row(&row(&[("sku", "   "), ("name", "Widget")]), 8).unwrap_err();
        assert_eq!(err, "Row 8: SKU is required");
    }

    #[test]
    fn test_missing_name_message() {
        let err = validate_row(&row(&[("sku", "ABC-1")]), 3).unwrap_err();
        assert_eq!(err, "Row 3: Name is required");

        let err = validate_row(&row(&[("sku", "ABC-1"), ("name", "")]), 4).unwrap_err();
        assert_eq!(err, "Row 4: Name is required");
    }

    #[test]
    fn test_description_optional() {
        let parsed = validate_row(&row(&[("sku", "ABC-1"), ("name", "Widget")]), 1).unwrap();
        assert_eq!(parsed.description, None);

        let parsed = validate_row(
            &row(&[("sku", "ABC-1"), ("name", "Widget"), ("description", "  ")]),
            1,
        )
        .unwrap();
        assert_eq!(parsed.description, None);
    }

    #[test]
    fn test_unknown_columns_ignored() {
        let parsed = validate_row(
            &row(&[("sku", "ABC-1"), ("name", "Widget"), ("price", "10.5")]),
            1,
        )
        .unwrap();
        assert_eq!(parsed.sku, "ABC-1");
    }
}

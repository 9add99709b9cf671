use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

/// Открыть файл БД и подготовить схему.
/// Соединение возвращается вызывающему и дальше передается явно,
/// глобального состояния нет
pub async fn initialize_database(db_path: &str) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_path).is_absolute() {
        std::path::PathBuf::from(db_path)
    } else {
        std::env::current_dir()?.join(db_path)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    connect_and_bootstrap(&db_url).await
}

/// Подключиться по URL и создать недостающие таблицы.
/// Для sqlite::memory: пул ограничен одним соединением, иначе каждое
/// соединение пула получает свою пустую БД
pub async fn connect_and_bootstrap(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(db_url.to_string());
    if db_url.contains(":memory:") {
        options.max_connections(1);
    }
    let conn = Database::connect(options).await?;

    bootstrap_schema(&conn).await?;
    tracing::info!("Database ready at {}", db_url);
    Ok(conn)
}

async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let ddl = [
        r#"
        CREATE TABLE IF NOT EXISTS a001_product (
            id TEXT PRIMARY KEY NOT NULL,
            sku TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
        // Уникальность SKU без учета регистра держит индекс по lower(sku)
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS ix_a001_product_sku_lower
            ON a001_product (lower(sku));
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS a002_webhook (
            id TEXT PRIMARY KEY NOT NULL,
            url TEXT NOT NULL,
            event_type TEXT NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 1,
            secret TEXT,
            description TEXT,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS ix_a002_webhook_event_type
            ON a002_webhook (event_type);
        "#,
    ];

    for statement in ddl {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            statement.to_string(),
        ))
        .await?;
    }

    Ok(())
}

#![allow(clippy::manual_div_ceil)]

pub mod api;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod state;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    use crate::shared::progress::{spawn_cleanup_task, InMemoryProgressStore, ProgressStore};
    use crate::shared::webhooks::{DeliveryClient, WebhookDispatcher, WebhookNotifier};
    use crate::state::AppState;
    use crate::system::jobs::{spawn_import_workers, ImportJobQueue};
    use crate::usecases::u501_csv_import::ImportExecutor;

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Отключаем логи SQL запросов, но оставляем логи приложения
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Простой middleware для логирования запросов. Тело ответа не
    // читается: SSE-потоки должны уходить клиенту по мере генерации
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        use chrono::Utc;

        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;

        let duration = start.elapsed();
        let timestamp = Utc::now() + chrono::Duration::hours(3);

        // Выбираем цвет для времени: голубой для 200, коричневый для остальных
        let color_code = if response.status().as_u16() == 200 {
            "36"
        } else {
            "33"
        };

        println!(
            "\x1b[{}m{}\x1b[0m | {:>5}ms | {} {:>6} {}",
            color_code,
            timestamp.format("%H:%M:%S"),
            duration.as_millis(),
            response.status().as_u16(),
            method,
            uri.path()
        );

        response
    }

    let config = Arc::new(shared::config::load_config()?);

    // Initialize database (path comes from config.toml)
    let db_path = shared::config::get_database_path(&config)?;
    let db = shared::data::db::initialize_database(&db_path.to_string_lossy())
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    // Хранилище прогресса импорта и его периодическая очистка
    let store = Arc::new(InMemoryProgressStore::new(Duration::from_secs(
        config.progress.retention_seconds,
    )));
    spawn_cleanup_task(Arc::clone(&store), Duration::from_secs(60));

    // Вебхуки: клиент доставки, диспетчер и очередь уведомлений
    let delivery = Arc::new(DeliveryClient::new(Duration::from_secs(
        config.webhooks.timeout_seconds,
    )));
    let dispatcher = WebhookDispatcher::new(db.clone(), Arc::clone(&delivery));
    let notifier = WebhookNotifier::spawn(dispatcher);

    // Очередь задач импорта и пул воркеров
    let (imports, jobs_rx) = ImportJobQueue::new();
    let executor = Arc::new(ImportExecutor::new(
        db.clone(),
        store.clone() as Arc<dyn ProgressStore>,
        config.import.chunk_size,
    ));
    spawn_import_workers(config.import.workers, jobs_rx, executor);

    let state = AppState {
        db,
        config: Arc::clone(&config),
        progress: store as Arc<dyn ProgressStore>,
        imports,
        notifier,
        delivery,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(state)
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            // Propagate the error to stop the application
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}

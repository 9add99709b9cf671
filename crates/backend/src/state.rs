use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::shared::config::Config;
use crate::shared::progress::ProgressStore;
use crate::shared::webhooks::{DeliveryClient, WebhookNotifier};
use crate::system::jobs::ImportJobQueue;

/// Общие зависимости HTTP-слоя. Все компоненты собираются на старте
/// и передаются хендлерам явно
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub progress: Arc<dyn ProgressStore>,
    pub imports: ImportJobQueue,
    pub notifier: WebhookNotifier,
    pub delivery: Arc<DeliveryClient>,
}

pub mod delivery;
pub mod dispatcher;
pub mod notifier;

pub use delivery::DeliveryClient;
pub use dispatcher::WebhookDispatcher;
pub use notifier::WebhookNotifier;

pub mod aggregate;

pub use aggregate::{parse_event_type, DeliveryResult, Webhook, WebhookDto, WebhookPatch};

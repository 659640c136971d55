use anyhow::Result;

use crate::{domain::events::NotificationEvent, infra::config::AppConfig};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Delivery channel for new-message notifications.
pub trait Notifier {
    fn notify(&self, event: &NotificationEvent);
}

/// Opens a target (an image URL) in an external viewer.
pub trait ExternalOpener {
    fn open(&self, target: &str) -> Result<()>;
}

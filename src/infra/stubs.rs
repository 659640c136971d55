//! Test doubles for the infra contracts.

#[cfg(test)]
use anyhow::Result;

#[cfg(test)]
use crate::{
    domain::events::NotificationEvent,
    infra::{
        config::AppConfig,
        contracts::{ConfigAdapter, ExternalOpener, Notifier},
    },
};

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

#[cfg(test)]
impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct NoopOpener;

#[cfg(test)]
impl ExternalOpener for NoopOpener {
    fn open(&self, _target: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub events: std::sync::Mutex<Vec<NotificationEvent>>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, event: &NotificationEvent) {
        self.events
            .lock()
            .expect("notifier lock")
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_config_returns_defaults() {
        let adapter = StubConfigAdapter;
        let config = adapter.load().expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn recording_notifier_captures_events() {
        let notifier = RecordingNotifier::default();
        notifier.notify(&NotificationEvent {
            chat_name: "General".to_owned(),
            preview: "hola".to_owned(),
            is_image: false,
        });

        assert_eq!(notifier.events.lock().expect("lock").len(), 1);
    }
}

use serde::Deserialize;

use crate::infra::config::{
    AppConfig, LogConfig, NotificationConfig, PollingConfig, ServerConfig,
};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub server: Option<FileServerConfig>,
    pub polling: Option<FilePollingConfig>,
    pub notifications: Option<FileNotificationConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(server) = self.server {
            server.merge_into(&mut config.server);
        }

        if let Some(polling) = self.polling {
            polling.merge_into(&mut config.polling);
        }

        if let Some(notifications) = self.notifications {
            notifications.merge_into(&mut config.notifications);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileServerConfig {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FileServerConfig {
    fn merge_into(self, config: &mut ServerConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(email) = self.email {
            config.email = email;
        }

        if let Some(password) = self.password {
            config.password = password;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FilePollingConfig {
    pub message_interval_ms: Option<u64>,
    pub presence_interval_ms: Option<u64>,
    pub activity_debounce_ms: Option<u64>,
}

impl FilePollingConfig {
    fn merge_into(self, config: &mut PollingConfig) {
        if let Some(interval) = self.message_interval_ms {
            config.message_interval_ms = interval;
        }

        if let Some(interval) = self.presence_interval_ms {
            config.presence_interval_ms = interval;
        }

        if let Some(debounce) = self.activity_debounce_ms {
            config.activity_debounce_ms = debounce;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileNotificationConfig {
    pub enabled: Option<bool>,
}

impl FileNotificationConfig {
    fn merge_into(self, config: &mut NotificationConfig) {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
    }
}

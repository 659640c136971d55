use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub server: ServerConfig,
    pub polling: PollingConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            email: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollingConfig {
    /// Message/chat-info refresh interval for the active chat.
    pub message_interval_ms: u64,
    /// Presence heartbeat interval, independent of the active chat.
    pub presence_interval_ms: u64,
    /// Minimum gap between activity-triggered presence posts.
    pub activity_debounce_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            message_interval_ms: 3_000,
            presence_interval_ms: 30_000,
            activity_debounce_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NotificationConfig {
    /// Acts as the notification permission: when false, notification events
    /// are not emitted at all.
    pub enabled: bool,
}

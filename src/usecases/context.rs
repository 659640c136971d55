use tokio::runtime::Runtime;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    api::client::HttpChatApi,
    domain::chat::LocalUser,
    infra::{config::AppConfig, storage_layout::StorageLayout},
};

pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub runtime: Runtime,
    pub api: HttpChatApi,
    pub local_user: LocalUser,
    /// Keeps the non-blocking log writer alive for the process lifetime.
    _log_guard: WorkerGuard,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("local_user", &self.local_user)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        layout: StorageLayout,
        runtime: Runtime,
        api: HttpChatApi,
        local_user: LocalUser,
        log_guard: WorkerGuard,
    ) -> Self {
        Self {
            config,
            layout,
            runtime,
            api,
            local_user,
            _log_guard: log_guard,
        }
    }
}

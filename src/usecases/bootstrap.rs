use std::{path::Path, time::Duration};

use crate::{
    api::{
        blocking::BlockingChatApi,
        client::HttpChatApi,
        poller::TokioPollDriver,
        presence::{PresenceHandle, PresenceHeartbeat},
    },
    infra::{
        self,
        config::FileConfigAdapter,
        contracts::ConfigAdapter,
        error::AppError,
        notifier::TerminalBellNotifier,
        opener::SystemOpener,
        session_vault::SessionVault,
        storage_layout::StorageLayout,
    },
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        controller::SyncController,
        session_store::SessionStore,
    },
};

pub fn bootstrap(
    config_path: Option<&Path>,
    server_override: Option<&str>,
) -> Result<AppContext, AppError> {
    let config_adapter = FileConfigAdapter::new(config_path);
    let mut config = config_adapter.load().map_err(AppError::Other)?;
    if let Some(server) = server_override {
        config.server.base_url = server.to_owned();
    }

    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    let log_guard = infra::logging::init(&config.logging, &layout)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|source| AppError::RuntimeBuild { source })?;

    let api = HttpChatApi::new(&config.server.base_url)
        .map_err(|error| AppError::Other(error.into()))?;

    let blocking = BlockingChatApi::new(api.clone(), runtime.handle().clone());
    let local_user = blocking
        .login(&config.server.email, &config.server.password)
        .map_err(|error| AppError::LoginFailed {
            base_url: config.server.base_url.clone(),
            details: error.to_string(),
        })?;

    tracing::info!(
        user_id = local_user.user_id,
        user_name = %local_user.name,
        "authenticated against chat server"
    );

    Ok(AppContext::new(
        config, layout, runtime, api, local_user, log_guard,
    ))
}

/// Wiring for one shell run: the orchestrator with its background tasks and
/// the channel their results arrive on.
pub struct Shell {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
    pub background_rx: std::sync::mpsc::Receiver<crate::domain::events::AppEvent>,
    pub presence: PresenceHeartbeat,
    pub presence_handle: PresenceHandle,
}

pub fn compose_shell(context: &AppContext) -> Shell {
    let handle = context.runtime.handle().clone();
    let blocking = BlockingChatApi::new(context.api.clone(), handle.clone());

    let (event_tx, background_rx) = std::sync::mpsc::channel();
    let poll_driver = TokioPollDriver::new(
        handle.clone(),
        context.api.clone(),
        Duration::from_millis(context.config.polling.message_interval_ms),
        event_tx,
    );

    let session_store = SessionStore::new(
        SessionVault::new(context.layout.session_file()),
        blocking.clone(),
    );

    let mut controller = SyncController::new(
        blocking,
        session_store,
        poll_driver,
        TerminalBellNotifier,
        SystemOpener,
        context.local_user.clone(),
        context.config.notifications.enabled,
        context.api.base_url().to_owned(),
    );
    controller.run_startup();

    let (presence, presence_handle) = PresenceHeartbeat::start(
        &handle,
        context.api.clone(),
        Duration::from_millis(context.config.polling.presence_interval_ms),
        Duration::from_millis(context.config.polling.activity_debounce_ms),
    );

    Shell {
        event_source: Box::new(crate::ui::event_source::CrosstermEventSource::default()),
        orchestrator: Box::new(controller),
        background_rx,
        presence,
        presence_handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_config_fails_before_any_network_call() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "not [valid toml").expect("fixture");

        let error = bootstrap(Some(&config_path), None).expect_err("must fail");

        assert!(matches!(error, AppError::Other(_)));
    }
}

use std::path::Path;

use anyhow::Result;

use crate::{
    api::{blocking::BlockingChatApi, client::HttpChatApi},
    cli::{Cli, Command},
    domain, infra,
    infra::{error::AppError, session_vault::SessionVault, storage_layout::StorageLayout},
    ui,
    usecases::{self, bootstrap, logout::logout_and_reset},
};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap::bootstrap(cli.config.as_deref(), cli.server.as_deref())?;

            tracing::debug!(
                ui = ui::module_name(),
                domain = domain::module_name(),
                api = crate::api::module_name(),
                usecases = usecases::module_name(),
                infra = infra::module_name(),
                "module boundaries loaded"
            );

            let mut shell = bootstrap::compose_shell(&context);
            let result = ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
                &shell.background_rx,
                &shell.presence_handle,
            );

            // Teardown mirrors a page unload: stop the heartbeat, then one
            // fire-and-forget presence farewell.
            shell.presence.stop();
            let beacon =
                BlockingChatApi::new(context.api.clone(), context.runtime.handle().clone());
            beacon.fire_logout_beacon();

            result
        }
        Command::Logout => run_logout(cli.config.as_deref(), cli.server.as_deref()),
    }
}

/// CLI logout: clears the durable session slot and posts the logout beacon
/// without entering the TUI (and without logging in).
fn run_logout(config_path: Option<&Path>, server_override: Option<&str>) -> Result<()> {
    let mut config = infra::config::load(config_path)?;
    if let Some(server) = server_override {
        config.server.base_url = server.to_owned();
    }
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    let _log_guard = infra::logging::init(&config.logging, &layout)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|source| AppError::RuntimeBuild { source })?;

    let api = HttpChatApi::new(&config.server.base_url)
        .map_err(|error| AppError::Other(error.into()))?;
    let blocking = BlockingChatApi::new(api, runtime.handle().clone());

    let vault = SessionVault::new(layout.session_file());
    let outcome = logout_and_reset(&vault, &blocking)?;

    tracing::info!(
        vault_cleared = outcome.vault_cleared,
        server_notified = outcome.server_notified,
        "logout completed"
    );
    println!("Logout completed. Stored session cleared.");

    Ok(())
}

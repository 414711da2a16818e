mod cli;
mod commands;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ynab_client::YnabClient;
use ynab_core::{load_dotenv, Config};
use ynab_notify::{
    Dispatcher, LogNotifier, Notifier, NotifierOptions, PushoverCredentials, PushoverNotifier,
};
use ynab_rules::ObservationStore;

use crate::cli::{CliArgs, Command};
use crate::service::Service;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    load_dotenv();

    let mut config =
        Config::load(args.config.as_deref()).context("failed to load configuration")?;
    config
        .apply_overrides(&args.overrides())
        .context("invalid command-line value")?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run(config).await,
        Command::ListBudgets => commands::list_budgets(&config).await,
        Command::ListAccounts { budget } => {
            commands::list_accounts(&config, budget.as_deref()).await
        }
        Command::Lint => commands::lint(&config),
    }
}

async fn run(config: Config) -> Result<()> {
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let client = YnabClient::new(config.api_token.clone(), &config.base_url)
        .context("failed to build YNAB client")?;
    let store = ObservationStore::open(config.observe_path.clone())
        .context("failed to open observation store")?;
    let dispatcher = build_dispatcher(&config)?;

    let service = Service::new(&config, Box::new(client), store, dispatcher);

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    info!("ynab-alerts started");
    service.run(&shutdown).await;
    info!("ynab-alerts stopped");
    Ok(())
}

/// The configured notifier is the default; `log` and (with credentials)
/// `pushover` are also available to rules that name them.
fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let credentials = PushoverCredentials {
        app_token: config.pushover.app_token.clone(),
        user_key: config.pushover.user_key.clone(),
        device: Some(config.pushover.device.clone()).filter(|d| !d.is_empty()),
    };
    let default = ynab_notify::build(&NotifierOptions {
        kind: config.notifier.clone(),
        pushover: credentials.clone(),
    })
    .context("failed to build notifier")?;

    let mut dispatcher =
        Dispatcher::new(default).with_channel("log", Box::new(LogNotifier::new()));
    if credentials.is_complete() {
        let pushover = PushoverNotifier::new(credentials).context("failed to build pushover")?;
        dispatcher = dispatcher.with_channel("pushover", Box::new(pushover));
    }
    info!(default = dispatcher.default_channel().channel_name(), "notifier ready");
    Ok(dispatcher)
}

/// Cancel `token` on SIGINT or SIGTERM.
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to register SIGTERM handler");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }

    info!("shutdown signal received");
    token.cancel();
}

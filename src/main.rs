use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;

use sitedrop::cli::{Cli, Commands};
use sitedrop::core::web_server::start_web_server;
use sitedrop::core::{Config, init_logger, log_startup_configuration};
use sitedrop::deploy::{DeployOutcome, Deployer, Upload};
use sitedrop::telegram::handler::DEFAULT_FILE_NAME;
use sitedrop::telegram::{TelegramApi, UpdateContext, messages, register_webhook};

/// Main entry point
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration, bind).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger()?;

    // Log panics from update tasks instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!("Panic caught: {}", panic_info);
    }));

    let config = Arc::new(Config::load()?);

    match cli.command {
        Some(Commands::Serve) | None => run_server(config).await,
        Some(Commands::SetWebhook) => run_set_webhook(&config).await,
        Some(Commands::Deploy { file, mime }) => run_cli_deploy(&config, &file, mime).await,
    }
}

/// Run the webhook and static file server
async fn run_server(config: Arc<Config>) -> Result<()> {
    log_startup_configuration(&config);

    let deployer = Arc::new(Deployer::from_config(&config));
    deployer.store().ensure_root().await?;

    let api = Arc::new(TelegramApi::new(&config)?);
    let ctx = UpdateContext::new(api, deployer);

    start_web_server(config, ctx).await
}

/// Register the webhook with Telegram
async fn run_set_webhook(config: &Config) -> Result<()> {
    let api = TelegramApi::new(config)?;
    register_webhook(api.bot(), config).await?;
    println!("Webhook set to {}", config.webhook_url_redacted());
    Ok(())
}

/// Deploy a local file and print the link
async fn run_cli_deploy(config: &Config, file: &Path, mime: Option<String>) -> Result<()> {
    let bytes = fs_err::tokio::read(file).await?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

    let deployer = Deployer::from_config(config);
    let upload = Upload {
        file_name,
        mime_type: mime,
        bytes,
    };

    match deployer.deploy(upload).await {
        DeployOutcome::Deployed(deployment) => {
            println!("{}", deployment.url);
            Ok(())
        }
        DeployOutcome::Rejected(rejection) => Err(anyhow::anyhow!("{}", messages::rejection(&rejection))),
        DeployOutcome::Aborted(e) => Err(e.into()),
    }
}

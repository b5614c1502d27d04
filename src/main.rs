//! Artdesk - article management CLI
//!
#![doc = "Main entry point for the Artdesk application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use artdesk::cli::{ArticleCommand, Cli, Commands};
use artdesk::commands;
use artdesk::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse first so the logging flags are known
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;
    tracing::debug!("Using backend {}", config.api.base_url);

    let mut manager = commands::build_manager(&config)?;

    match cli.command {
        Commands::Register {
            email,
            username,
            password,
        } => {
            tracing::info!("Registering {}", username);
            commands::auth::register(&mut manager, &email, &username, &password).await
        }
        Commands::Login {
            identifier,
            password,
        } => {
            tracing::info!("Logging in as {}", identifier);
            commands::auth::login(&mut manager, &identifier, &password).await
        }
        Commands::Logout => commands::auth::logout(&mut manager),
        Commands::Whoami => commands::auth::whoami(&mut manager).await,
        Commands::Articles { command } => match command {
            ArticleCommand::List { json } => commands::articles::list(&mut manager, json).await,
            ArticleCommand::Create { title, description } => {
                commands::articles::create(&mut manager, &title, &description).await?;
                Ok(())
            }
            ArticleCommand::Update {
                id,
                title,
                description,
            } => {
                commands::articles::update(&mut manager, id, title, description).await?;
                Ok(())
            }
            ArticleCommand::Delete { id } => commands::articles::delete(&mut manager, id).await,
        },
        Commands::Shell => commands::shell::run_shell(manager).await,
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so table and JSON output on stdout stay clean.
fn init_tracing(verbose: bool, json: bool) {
    let default_directive = if verbose { "artdesk=debug" } else { "artdesk=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

//! chatterm - terminal chat client
//!
#![doc = "chatterm - terminal chat client"]
#![doc = "Main entry point for the chatterm application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatterm::cli::{Cli, Commands};
use chatterm::commands::{self, chats, data, profile, settings};
use chatterm::config::Config;
use chatterm::profile::StaticProfileSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat { chat } => {
            tracing::info!("Starting interactive chat");
            if let Some(c) = &chat {
                tracing::debug!("Opening chat: {}", c);
            }
            commands::chat::run_chat(config, chat).await?;
            Ok(())
        }
        Commands::Chats { command } => {
            tracing::info!("Starting chats command");
            let prefs = commands::open_settings(&config)?;
            let session = commands::build_session(&config, prefs)?;
            chats::handle_chats(&session, command).await?;
            Ok(())
        }
        Commands::Settings { command } => {
            tracing::info!("Starting settings command");
            let prefs = commands::open_settings(&config)?;
            let notifier = chatterm::notify::TerminalNotifier;
            settings::handle_settings(&prefs, &notifier, command)?;
            Ok(())
        }
        Commands::Profile => {
            let prefs = commands::open_settings(&config)?;
            let source = StaticProfileSource::new(config.profile.clone());
            let session = commands::build_session(&config, prefs)?;
            profile::show_profile(&session, &source).await;
            Ok(())
        }
        Commands::Export { output } => {
            let prefs = commands::open_settings(&config)?;
            let session = commands::build_session(&config, prefs)?;
            if !data::export_with_notice(&session, output).await {
                anyhow::bail!("Export failed");
            }
            Ok(())
        }
        Commands::Import { path } => {
            let notifier = chatterm::notify::TerminalNotifier;
            if !data::import_with_notice(&notifier, &path) {
                anyhow::bail!("Import failed");
            }
            Ok(())
        }
    }
}

/// Initialize tracing
///
/// `RUST_LOG` wins when set. Logs go to stderr so they never mix with
/// conversation output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "chatterm=debug" } else { "chatterm=warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

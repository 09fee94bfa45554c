//! MedAssist command-line client.
//!
//! Binary name: `medassist`
//!
//! Parses CLI arguments, sets up tracing, opens the local store and the chat
//! API client, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use medassist_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, SessionsCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions {
        default_filter: TracingOptions::filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: cli.json,
        enable_otel: cli.otel,
    };
    init_tracing(&options).map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "medassist", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.ephemeral).await?;
    tracing::debug!(
        api = %state.config.api_base_url,
        data_dir = %state.data_dir.display(),
        ephemeral = cli.ephemeral,
        "Client initialized"
    );

    match cli.command {
        Commands::Chat => {
            cli::chat::loop_runner::run_chat_loop(&state, cli.ephemeral).await?;
        }
        Commands::Send {
            message,
            attachments,
        } => {
            cli::send::send(&state, message, attachments, cli.json, cli.quiet).await?;
        }
        Commands::Regen => {
            cli::send::regen(&state, cli.json, cli.quiet).await?;
        }
        Commands::History => {
            cli::conversation::history(&state, cli.json).await?;
        }
        Commands::Clear => {
            cli::conversation::clear(&state, cli.json).await?;
        }
        Commands::Export { format, output } => {
            cli::conversation::export(&state, format, output, cli.json).await?;
        }
        Commands::Pin { path } => {
            cli::pins::pin(&state, &path, cli.json).await?;
        }
        Commands::Pins => {
            cli::pins::list_pins(&state, cli.json).await?;
        }
        Commands::Unpin => {
            cli::pins::unpin_all(&state, cli.json).await?;
        }
        Commands::Sessions { action } => match action {
            SessionsCommand::List => {
                cli::sessions::list_sessions(&state, cli.json).await?;
            }
            SessionsCommand::Show { id } => {
                cli::sessions::show_session(&state, &id, cli.json).await?;
            }
            SessionsCommand::Delete { id, force } => {
                cli::sessions::delete_session(&state, &id, force, cli.json).await?;
            }
        },
        // Handled before state initialization
        Commands::Completions { .. } => {}
    }

    Ok(())
}

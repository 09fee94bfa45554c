//! CLI command definitions for the `medassist` binary.
//!
//! Uses clap derive macros for argument parsing. Every command works on the
//! local conversation kept in the data directory and talks to the chat API
//! configured in `config.toml`.

pub mod chat;
pub mod conversation;
pub mod pins;
pub mod render;
pub mod send;
pub mod sessions;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use medassist_core::chat::export::ExportFormat;

/// Talk to the MedAssist medical chat service from the terminal.
#[derive(Parser)]
#[command(name = "medassist", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Keep the conversation in memory only; nothing is written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat.
    Chat,

    /// Send one message (with optional attachments) and print the reply.
    Send {
        /// Message text. May be empty when files are attached.
        #[arg(default_value = "")]
        message: String,

        /// Attach a file (repeatable).
        #[arg(short, long = "attach", value_name = "PATH")]
        attachments: Vec<PathBuf>,
    },

    /// Resend the last question and replace the latest reply.
    Regen,

    /// Show the local conversation.
    History,

    /// Forget the local conversation and its session id. Pinned files are kept.
    Clear,

    /// Write the conversation to a file.
    Export {
        /// Transcript format (text or json).
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        /// Destination path. Defaults to medical-chat.txt / medical-chat.json.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pin a file by path.
    Pin {
        path: PathBuf,
    },

    /// List pinned files.
    Pins,

    /// Remove every pinned file.
    Unpin,

    /// Server-side chat sessions.
    Sessions {
        #[command(subcommand)]
        action: SessionsCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// List every session of this API key.
    #[command(alias = "ls")]
    List,

    /// Show the server-side history of one session.
    Show {
        /// Session id.
        id: String,
    },

    /// Delete a session on the server.
    #[command(alias = "rm")]
    Delete {
        /// Session id.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_send_with_attachments() {
        let cli = Cli::parse_from(["medassist", "send", "Please review", "-a", "labs.pdf", "--attach", "scan.png"]);
        match cli.command {
            Commands::Send { message, attachments } => {
                assert_eq!(message, "Please review");
                assert_eq!(attachments, vec![PathBuf::from("labs.pdf"), PathBuf::from("scan.png")]);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_parse_export_format() {
        let cli = Cli::parse_from(["medassist", "--json", "export", "--format", "json"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Export { format: ExportFormat::Json, output: None }
        ));
        assert!(Cli::try_parse_from(["medassist", "export", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["medassist", "history", "-vv", "--ephemeral"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.ephemeral);
    }
}

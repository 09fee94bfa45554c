//! Slash command parsing for the chat loop.

use std::path::PathBuf;

use console::style;
use medassist_core::chat::export::ExportFormat;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Forget the conversation and its session id.
    Clear,
    /// Resend the last question.
    Regen,
    /// Attach a file to the next message.
    Attach(PathBuf),
    Pin(PathBuf),
    Pins,
    Unpin,
    Export {
        format: ExportFormat,
        path: Option<PathBuf>,
    },
    History,
    /// Abandon the turn in flight.
    Stop,
    Exit,
    /// Unknown command or bad arguments; carries the message to show.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" => ChatCommand::Clear,
        "/regen" | "/retry" => ChatCommand::Regen,
        "/attach" | "/a" => match arg {
            "" => ChatCommand::Unknown("/attach requires a file path".to_string()),
            path => ChatCommand::Attach(PathBuf::from(path)),
        },
        "/pin" => match arg {
            "" => ChatCommand::Unknown("/pin requires a file path".to_string()),
            path => ChatCommand::Pin(PathBuf::from(path)),
        },
        "/pins" => ChatCommand::Pins,
        "/unpin" => ChatCommand::Unpin,
        "/export" => parse_export(arg),
        "/history" => ChatCommand::History,
        "/stop" => ChatCommand::Stop,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(format!("Unknown command: {other}")),
    };
    Some(command)
}

fn parse_export(arg: &str) -> ChatCommand {
    let mut parts = arg.splitn(2, char::is_whitespace);
    let format = match parts.next().filter(|f| !f.is_empty()) {
        None => ExportFormat::Text,
        Some(f) => match f.parse::<ExportFormat>() {
            Ok(format) => format,
            Err(e) => return ChatCommand::Unknown(e),
        },
    };
    let path = parts
        .next()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    ChatCommand::Export { format, path }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Forget this conversation (pins are kept)"),
        ("/regen", "Resend your last question"),
        ("/attach <path>", "Attach a file to your next message"),
        ("/pin <path>", "Pin a file"),
        ("/pins", "List pinned files"),
        ("/unpin", "Remove all pinned files"),
        ("/export [text|json] [path]", "Save the conversation"),
        ("/history", "Show the conversation"),
        ("/stop", "Stop waiting for the current reply"),
        ("/exit", "Leave the chat"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (command, description) in rows {
        println!("  {} {description}", style(format!("{command:<28}")).cyan());
    }
    println!();
    println!(
        "  {}",
        style("Ctrl+C while waiting stops the reply; Ctrl+D exits").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/CLEAR"), Some(ChatCommand::Clear));
        assert_eq!(parse("/regen"), Some(ChatCommand::Regen));
        assert_eq!(parse("/stop"), Some(ChatCommand::Stop));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
        assert_eq!(parse("  /pins  "), Some(ChatCommand::Pins));
    }

    #[test]
    fn test_parse_attach_and_pin() {
        assert_eq!(
            parse("/attach reports/blood test.pdf"),
            Some(ChatCommand::Attach(PathBuf::from("reports/blood test.pdf")))
        );
        assert_eq!(parse("/pin scan.png"), Some(ChatCommand::Pin(PathBuf::from("scan.png"))));
        assert!(matches!(parse("/attach"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(
            parse("/export"),
            Some(ChatCommand::Export { format: ExportFormat::Text, path: None })
        );
        assert_eq!(
            parse("/export json /tmp/chat.json"),
            Some(ChatCommand::Export {
                format: ExportFormat::Json,
                path: Some(PathBuf::from("/tmp/chat.json"))
            })
        );
        assert!(matches!(parse("/export pdf"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("What is fever?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/foo bar"),
            Some(ChatCommand::Unknown("Unknown command: /foo".to_string()))
        );
    }
}

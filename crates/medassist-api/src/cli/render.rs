//! Terminal rendering shared by the chat loop and one-shot commands.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use medassist_core::chat::export::{ASSISTANT_LABEL, USER_LABEL};
use medassist_types::chat::{ChatMessage, MessageRole};
use medassist_types::remote::RemoteMessage;

/// Spinner shown while a turn is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

fn speaker(role: MessageRole) -> String {
    match role {
        MessageRole::User => format!("{}", style(USER_LABEL).green().bold()),
        MessageRole::Assistant => format!("{}", style(ASSISTANT_LABEL).cyan().bold()),
    }
}

/// Indent every continuation line so multi-line replies stay aligned.
fn indent(content: &str) -> String {
    content.lines().collect::<Vec<_>>().join("\n    ")
}

/// Print one message with its speaker label and any citations.
pub fn print_message(message: &ChatMessage) {
    println!();
    println!("  {}", speaker(message.role));
    println!("    {}", indent(&message.content));

    if !message.sources.is_empty() {
        println!("    {}", style("Sources:").dim());
        for (i, source) in message.sources.iter().enumerate() {
            let title = source.title.as_deref().unwrap_or("(untitled)");
            match source.url.as_deref() {
                Some(url) => println!("    {} {} {}", style(format!("[{}]", i + 1)).dim(), title, style(url).underlined()),
                None => println!("    {} {}", style(format!("[{}]", i + 1)).dim(), title),
            }
        }
    }
}

/// Print the whole local conversation.
pub fn print_conversation(messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages yet. Start with: {}",
            style("i").blue().bold(),
            style("medassist chat").yellow()
        );
        println!();
        return;
    }
    for message in messages {
        print_message(message);
    }
    println!();
}

/// Print a message fetched from the backend.
pub fn print_remote_message(message: &RemoteMessage) {
    let timestamp = message.timestamp.as_deref().unwrap_or("");
    println!();
    println!("  {} {}", speaker(message.role), style(timestamp).dim());
    println!("    {}", indent(message.content.as_deref().unwrap_or("")));
}

pub fn print_error(context: &str, err: &dyn std::fmt::Display) {
    eprintln!("\n  {} {context}: {err}", style("!").red().bold());
}

pub fn print_success(message: &str) {
    println!("\n  {} {message}\n", style("✓").green().bold());
}

/// Shorten `text` to at most `max` characters, on a char boundary.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

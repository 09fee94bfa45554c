//! One-shot turns: `medassist send` and `medassist regen`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use medassist_infra::filesystem::read_attachment;
use medassist_types::chat::ChatMessage;

use super::render;
use crate::state::AppState;

/// Send one message, optionally with attachments, and print the reply.
///
/// # Examples
///
/// ```bash
/// medassist send "What is fever?"
/// medassist send --attach labs.pdf
/// ```
pub async fn send(
    state: &AppState,
    message: String,
    attachments: Vec<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let mut controller = state.controller().await;
    for path in &attachments {
        let file = read_attachment(path)
            .await
            .with_context(|| format!("Failed to read attachment {}", path.display()))?;
        controller.attach(file);
    }
    controller.set_input(message);

    let spinner = (!json && !quiet).then(|| render::spinner("thinking..."));
    let result = controller.submit().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let reply = result.context("Message not sent")?;
    print_reply(reply.as_ref(), json, quiet)
}

/// Resend the last question of the local conversation.
pub async fn regen(state: &AppState, json: bool, quiet: bool) -> Result<()> {
    let mut controller = state.controller().await;

    let spinner = (!json && !quiet).then(|| render::spinner("regenerating..."));
    let result = controller.regenerate_last().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let reply = result.context("Regeneration failed")?;
    if reply.is_none() && !json && !quiet {
        println!();
        println!(
            "  {} Need at least one question and one reply to regenerate.",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }
    print_reply(reply.as_ref(), json, quiet)
}

fn print_reply(reply: Option<&ChatMessage>, json: bool, quiet: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }
    match reply {
        Some(message) if quiet => println!("{}", message.content),
        Some(message) => {
            render::print_message(message);
            println!();
        }
        None if quiet => {}
        None => {
            println!();
            println!("  {} Nothing to send.", style("i").blue().bold());
            println!();
        }
    }
    Ok(())
}

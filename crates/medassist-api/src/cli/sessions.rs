//! Server-side session commands: list, show, delete.
//!
//! These call the chat API directly; only `delete` touches local state, and
//! only to forget the active session id when that session is deleted.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;
use medassist_core::remote::backend::ChatBackend;
use medassist_types::remote::RemoteSession;

use super::render;
use crate::state::AppState;

/// List every session of this API key.
///
/// # Examples
///
/// ```bash
/// medassist sessions list
/// medassist sessions list --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let list = state
        .backend
        .get_all_chats()
        .await
        .context("Failed to list sessions")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions on {}",
            style("i").blue().bold(),
            style(&state.config.api_base_url).dim()
        );
        println!();
        return Ok(());
    }

    let active = state.controller().await.session_id().map(str::to_string);

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
    ]);

    for session in &list.sessions {
        let id_cell = if active.as_deref() == Some(session.id.as_str()) {
            Cell::new(format!("{} (active)", session.id)).fg(Color::Green)
        } else {
            Cell::new(&session.id).fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(render::truncate(&session_title(session), 40)).fg(Color::Cyan),
            id_cell,
            Cell::new(format_timestamp(&session.updated_at)).fg(Color::White),
            Cell::new(session.messages.len().to_string()).fg(Color::White),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(list.sessions.len()).bold(),
        if list.sessions.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

/// Show the server-side history of one session.
pub async fn show_session(state: &AppState, id: &str, json: bool) -> Result<()> {
    let session = state
        .backend
        .get_chat_history(id)
        .await
        .with_context(|| format!("Failed to load session '{id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(session_title(&session)).cyan().bold());
    println!(
        "  {} {}   {} {}",
        style("ID:").bold(),
        style(&session.id).dim(),
        style("Created:").bold(),
        style(format_timestamp(&session.created_at)).dim()
    );
    for message in &session.messages {
        render::print_remote_message(message);
    }
    println!();
    Ok(())
}

/// Delete a session on the server after confirmation.
pub async fn delete_session(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete session '{id}' on the server?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let mut controller = state.controller().await;
    let ack = controller
        .delete_remote(id)
        .await
        .with_context(|| format!("Failed to delete session '{id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ack)?);
    } else {
        let message = ack.message.unwrap_or_else(|| format!("Session {id} deleted"));
        render::print_success(&message);
    }
    Ok(())
}

fn session_title(session: &RemoteSession) -> String {
    if session.title.trim().is_empty() {
        "(untitled)".to_string()
    } else {
        session.title.clone()
    }
}

/// Backend timestamps are ISO-8601 without an offset; show them to the minute.
fn format_timestamp(raw: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .or_else(|_| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        })
        .unwrap_or_else(|_| raw.to_string())
}

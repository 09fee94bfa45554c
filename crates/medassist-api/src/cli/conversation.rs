//! Local conversation commands: history, clear, export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use medassist_core::chat::export::ExportFormat;
use medassist_infra::filesystem::write_export;
use medassist_types::chat::ChatMessage;

use super::render;
use crate::state::AppState;

/// Print the local conversation.
pub async fn history(state: &AppState, json: bool) -> Result<()> {
    let controller = state.controller().await;

    if json {
        println!("{}", serde_json::to_string_pretty(controller.messages())?);
        return Ok(());
    }

    if let Some(id) = controller.session_id() {
        println!();
        println!("  {} {}", style("Session:").bold(), style(id).dim());
    }
    render::print_conversation(controller.messages());
    Ok(())
}

/// Forget the local conversation and session id.
pub async fn clear(state: &AppState, json: bool) -> Result<()> {
    let mut controller = state.controller().await;
    let count = controller.messages().len();
    controller.clear().await.context("Failed to clear conversation")?;

    if json {
        println!("{}", serde_json::json!({ "cleared": count }));
    } else {
        render::print_success(&format!(
            "Cleared {count} message{}",
            if count == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}

/// Write the conversation to `output` (or the format's default file name).
pub async fn export(
    state: &AppState,
    format: ExportFormat,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let controller = state.controller().await;
    let path = output.unwrap_or_else(|| PathBuf::from(format.file_name()));
    let written = export_to(controller.messages(), format, &path).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "path": path.display().to_string(), "format": format.to_string(), "messages": written })
        );
    } else {
        render::print_success(&format!(
            "Exported {written} message{} to {}",
            if written == 1 { "" } else { "s" },
            style(path.display()).cyan()
        ));
    }
    Ok(())
}

/// Render and write a transcript; returns the number of messages written.
pub async fn export_to(
    messages: &[ChatMessage],
    format: ExportFormat,
    path: &Path,
) -> Result<usize> {
    let content = format
        .render(messages)
        .context("Failed to render transcript")?;
    write_export(path, &content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), format = %format, "Conversation exported");
    Ok(messages.len())
}

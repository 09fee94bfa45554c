//! Pinned file commands: pin, pins, unpin.

use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use medassist_core::chat::pinned::PinnedFiles;
use medassist_core::storage::kv_store::KvStore;
use medassist_infra::filesystem::guess_mime_type;
use medassist_types::pinned::{FileCategory, PinnedFile};

use super::render;
use crate::state::AppState;

/// Pin the file at `path`. Returns the pinned entry and whether it was new.
pub async fn pin_path<K: KvStore>(
    pins: &mut PinnedFiles<K>,
    path: &Path,
) -> Result<(PinnedFile, bool)> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Cannot pin {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = guess_mime_type(path);

    let added = pins
        .pin(&name, &mime_type)
        .await
        .context("Failed to save pinned files")?;
    Ok((PinnedFile::new(name, &mime_type), added))
}

pub async fn pin(state: &AppState, path: &Path, json: bool) -> Result<()> {
    let mut controller = state.controller().await;
    let (file, added) = pin_path(controller.pins_mut(), path).await?;

    if json {
        println!("{}", serde_json::json!({ "file": file, "added": added }));
    } else if added {
        render::print_success(&format!("Pinned {} ({})", style(&file.name).cyan(), file.category));
    } else {
        println!();
        println!("  {} {} is already pinned", style("i").blue().bold(), style(&file.name).cyan());
        println!();
    }
    Ok(())
}

pub async fn list_pins(state: &AppState, json: bool) -> Result<()> {
    let controller = state.controller().await;
    let files = controller.pins().files();

    if json {
        println!("{}", serde_json::to_string_pretty(files)?);
        return Ok(());
    }

    print_pins(files);
    Ok(())
}

pub fn print_pins(files: &[PinnedFile]) {
    if files.is_empty() {
        println!();
        println!(
            "  {} No pinned files. Pin one with: {}",
            style("i").blue().bold(),
            style("medassist pin <path>").yellow()
        );
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Type").fg(Color::White),
    ]);

    for file in files {
        let type_color = match file.category {
            FileCategory::Pdf => Color::Red,
            FileCategory::Image => Color::Magenta,
            FileCategory::Document => Color::Blue,
        };
        table.add_row(vec![
            Cell::new(&file.name).fg(Color::Cyan),
            Cell::new(file.category.to_string()).fg(type_color),
        ]);
    }

    println!();
    println!("{table}");
    println!();
}

pub async fn unpin_all(state: &AppState, json: bool) -> Result<()> {
    let mut controller = state.controller().await;
    let count = controller.pins().files().len();
    controller
        .pins_mut()
        .unpin_all()
        .await
        .context("Failed to remove pinned files")?;

    if json {
        println!("{}", serde_json::json!({ "removed": count }));
    } else {
        render::print_success(&format!(
            "Removed {count} pinned file{}",
            if count == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_infra::memory::InMemoryKvStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pin_path_derives_category_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xray.png");
        tokio::fs::write(&path, [0u8; 4]).await.unwrap();

        let mut pins = PinnedFiles::load(Arc::new(InMemoryKvStore::new())).await;
        let (file, added) = pin_path(&mut pins, &path).await.unwrap();
        assert!(added);
        assert_eq!(file.name, "xray.png");
        assert_eq!(file.category, FileCategory::Image);

        let (_, added) = pin_path(&mut pins, &path).await.unwrap();
        assert!(!added);
        assert_eq!(pins.files().len(), 1);
    }

    #[tokio::test]
    async fn test_pin_path_rejects_missing_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut pins = PinnedFiles::load(Arc::new(InMemoryKvStore::new())).await;

        assert!(pin_path(&mut pins, &dir.path().join("missing.pdf")).await.is_err());
        assert!(pin_path(&mut pins, dir.path()).await.is_err());
        assert!(pins.files().is_empty());
    }
}

//! Filesystem helpers: data directory layout, attachments, and exports.

use std::path::{Path, PathBuf};

use medassist_types::attachment::Attachment;

/// Resolve the data directory from environment or home directory.
///
/// Priority:
/// 1. `MEDASSIST_DATA_DIR` environment variable
/// 2. `~/.medassist`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MEDASSIST_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".medassist");
    }

    PathBuf::from(".medassist")
}

/// MIME type inferred from the file extension.
pub fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// Read a file from disk as an attachment named after its file name.
pub async fn read_attachment(path: &Path) -> Result<Attachment, std::io::Error> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Attachment::new(name, guess_mime_type(path), bytes))
}

/// Write export content, creating parent directories as needed.
pub async fn write_export(path: &Path, content: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}

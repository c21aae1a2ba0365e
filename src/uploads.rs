//! Attachment storage
//!
//! Writes uploaded files to disk and hands back the relative path that gets
//! persisted on the record and served under `/uploads`.

use std::path::Path;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Save uploaded bytes under `<upload_dir>/<subdir>/` with a generated name,
/// keeping the original extension. Returns the public relative path.
pub async fn save_upload(
    upload_dir: &Path,
    subdir: &str,
    original_name: &str,
    bytes: &[u8],
) -> AppResult<String> {
    let file_name = match extension(original_name) {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    };

    let dir = upload_dir.join(subdir);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;
    tokio::fs::write(dir.join(&file_name), bytes)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store upload: {e}")))?;

    Ok(format!("uploads/{subdir}/{file_name}"))
}

fn extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}

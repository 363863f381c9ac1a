use crate::error::{AppError, AppResult};
use std::path::Path;
use tokio::fs;
use uuid::Uuid;

/// Filesystem root for uploaded media, served under `/media/`.
#[derive(Clone)]
pub struct UploadConfig {
    pub media_root: String,
}

const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024; // 5 MB

/// Check the magic bytes and return the file extension for the declared
/// content type, or None when the content does not match.
fn photo_extension(data: &[u8], content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" if data.len() >= 3 && data[..3] == [0xFF, 0xD8, 0xFF] => Some("jpg"),
        "image/png" if data.len() >= 4 && data[..4] == [0x89, 0x50, 0x4E, 0x47] => Some("png"),
        "image/gif" if data.len() >= 4 && data[..4] == [0x47, 0x49, 0x46, 0x38] => Some("gif"),
        "image/webp"
            if data.len() >= 12
                && data[..4] == [0x52, 0x49, 0x46, 0x46]
                && data[8..12] == [0x57, 0x45, 0x42, 0x50] =>
        {
            Some("webp")
        }
        _ => None,
    }
}

pub struct UploadService;

impl UploadService {
    /// Save an uploaded photo under `MEDIA_ROOT/<subdirectory>/`.
    /// Returns the public URL path (e.g. `/media/complaint_photos/<uuid>.jpg`).
    pub async fn save_photo(
        config: &UploadConfig,
        data: &[u8],
        content_type: &str,
        subdirectory: &str,
    ) -> AppResult<String> {
        if data.len() > MAX_PHOTO_SIZE {
            return Err(AppError::PayloadTooLarge);
        }

        let ext = photo_extension(data, content_type).ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported or corrupt image ({}). Allowed: jpeg, png, gif, webp",
                content_type
            ))
        })?;

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let dir = Path::new(&config.media_root).join(subdirectory);

        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::Validation(format!("Failed to create media directory: {}", e))
        })?;

        let file_path = dir.join(&filename);
        fs::write(&file_path, data)
            .await
            .map_err(|e| AppError::Validation(format!("Failed to write file: {}", e)))?;

        Ok(format!("/media/{}/{}", subdirectory, filename))
    }

    /// Best-effort removal of a saved photo by its public URL. Called when
    /// the row the photo belongs to fails to insert, so the file does not
    /// stay orphaned on disk.
    pub async fn delete_photo(config: &UploadConfig, url: &str) {
        let Some(relative) = url.strip_prefix("/media/") else {
            return;
        };
        let path = Path::new(&config.media_root).join(relative);
        if let Err(e) = fs::remove_file(&path).await {
            tracing::warn!("Failed to remove orphaned upload {}: {}", url, e);
        }
    }
}

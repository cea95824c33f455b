//! Uploaded media storage.
//!
//! Post images land on the local filesystem under the configured media
//! directory. Files are renamed to a UUID so user-supplied names never
//! touch the disk; only the extension survives, and only if it is on the
//! allowlist.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Extensions accepted for post images.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Subdirectory under the media root for post images.
const POSTS_SUBDIR: &str = "posts";

/// Errors that can occur when storing uploads.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The file extension is missing or not an accepted image type.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// Filesystem error while writing the upload.
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores uploaded files under a media root directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Save an uploaded post image and return its media-relative path.
    ///
    /// The returned path (e.g. `posts/3f8a….jpg`) is what gets stored on the
    /// post row and served under `/media/`.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::UnsupportedType` for non-image extensions and
    /// `MediaError::Io` when the file cannot be written.
    pub async fn save_image(
        &self,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, MediaError> {
        let ext = image_extension(original_name)
            .ok_or_else(|| MediaError::UnsupportedType(original_name.to_owned()))?;

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        let dir = self.root.join(POSTS_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), data).await?;

        Ok(format!("{POSTS_SUBDIR}/{file_name}"))
    }
}

/// Extract a lowercased, allowlisted image extension from a file name.
fn image_extension(name: &str) -> Option<String> {
    let ext = name.rsplit('.').next()?;
    if ext.len() == name.len() {
        // No dot at all
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_accepts_known_types() {
        assert_eq!(image_extension("photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(image_extension("a.b.webp").as_deref(), Some("webp"));
    }

    #[test]
    fn test_image_extension_rejects_unknown_types() {
        assert_eq!(image_extension("script.exe"), None);
        assert_eq!(image_extension("archive.tar.gz"), None);
    }

    #[test]
    fn test_image_extension_requires_a_dot() {
        assert_eq!(image_extension("png"), None);
        assert_eq!(image_extension(""), None);
    }
}

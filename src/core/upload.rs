use anyhow::Context;
use chrono::Utc;
use poem_openapi::types::multipart::Upload;
use rand::Rng;

use super::{error::AppError, file_store::FileStore};

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Checks an incoming file before anything touches the disk.
pub fn validate_upload(content_type: Option<&str>, size: usize) -> Result<(), AppError> {
    let allowed = content_type.is_some_and(|x| ALLOWED_MIME_TYPES.contains(&x));
    if !allowed {
        return Err(AppError::Validation(
            "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.".to_string(),
        ));
    }
    if size > MAX_FILE_SIZE {
        return Err(AppError::Validation(format!(
            "File too large. Max size: {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }
    Ok(())
}

/// Base name of `file_name` with everything outside `[A-Za-z0-9.-]` replaced by `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base_name = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    base_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension including the dot. A leading dot alone (`.bashrc`) or a trailing
/// dot (`photo.`, `..`) is not an extension.
fn extension_of(sanitized: &str) -> &str {
    match sanitized.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < sanitized.len() => &sanitized[idx..],
        _ => "",
    }
}

/// `profile-<millis>-<random>.<ext>`; never contains a path separator.
pub fn generate_file_name(original_name: &str) -> String {
    let sanitized = sanitize_file_name(original_name);
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!(
        "profile-{}-{}{}",
        Utc::now().timestamp_millis(),
        suffix,
        extension_of(&sanitized)
    )
}

/// Validates and stores raw bytes, returning the public path of the stored file.
pub async fn accept_bytes(
    store: &FileStore,
    content_type: Option<&str>,
    file_name: Option<&str>,
    bytes: &[u8],
) -> Result<String, AppError> {
    validate_upload(content_type, bytes.len())?;
    let name = generate_file_name(file_name.unwrap_or_default());
    Ok(store.save(&name, bytes).await?)
}

/// Same as [`accept_bytes`] for a multipart upload. The size is checked
/// before the body is read into memory.
pub async fn accept_upload(store: &FileStore, upload: Upload) -> Result<String, AppError> {
    validate_upload(upload.content_type(), upload.size())?;
    let name = generate_file_name(upload.file_name().unwrap_or_default());
    let bytes = upload.into_vec().await.context("read uploaded file")?;
    Ok(store.save(&name, &bytes).await?)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const MIB: usize = 1024 * 1024;

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload(Some("image/png"), 4 * MIB).is_ok());
        assert!(validate_upload(Some("image/webp"), MAX_FILE_SIZE).is_ok());

        let too_large = validate_upload(Some("image/jpeg"), 6 * MIB).unwrap_err();
        assert!(matches!(too_large, AppError::Validation(_)));
        assert_eq!(too_large.to_string(), "File too large. Max size: 5MB");

        let pdf = validate_upload(Some("application/pdf"), 1024).unwrap_err();
        assert!(matches!(pdf, AppError::Validation(_)));
        assert!(validate_upload(None, 1024).is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.png"), "photo.png");
        assert_eq!(sanitize_file_name("my photo (1).JPG"), "my_photo__1_.JPG");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\face.webp"), "face.webp");
        assert_eq!(sanitize_file_name("fötö.gif"), "f_t_.gif");
    }

    #[test]
    fn test_generate_file_name() {
        let name = generate_file_name("my avatar.png");
        assert!(name.starts_with("profile-"));
        assert!(name.ends_with(".png"));
        let parts: Vec<&str> = name.trim_end_matches(".png").split('-').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u32>().unwrap() < 1_000_000_000);

        assert!(!generate_file_name("noext").contains('.'));
        assert!(!generate_file_name(".bashrc").contains('.'));
        assert!(!generate_file_name("..").contains('.'));
        assert!(!generate_file_name("photo.").contains('.'));
        let traversal = generate_file_name("../../x/evil.sh/..png");
        assert!(!traversal.contains('/'));
        assert!(traversal.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_accept_bytes() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());

        let path = accept_bytes(&store, Some("image/png"), Some("face.png"), &vec![0u8; 4 * MIB])
            .await?;
        assert!(path.starts_with("/uploads/profile-pictures/profile-"));
        assert!(store.exists(&path).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_accept_bytes_rejects_before_write() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());

        let jpeg = accept_bytes(&store, Some("image/jpeg"), Some("big.jpg"), &vec![0u8; 6 * MIB]).await;
        assert!(matches!(jpeg, Err(AppError::Validation(_))));
        let pdf = accept_bytes(&store, Some("application/pdf"), Some("cv.pdf"), b"%PDF").await;
        assert!(matches!(pdf, Err(AppError::Validation(_))));

        assert!(store.list().await?.is_empty());
        Ok(())
    }
}

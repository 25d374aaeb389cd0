use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::Context;

/// Prefix under which the upload root is served.
pub const PUBLIC_PREFIX: &str = "/uploads";
pub const PROFILE_PICTURE_DIR: &str = "profile-pictures";

/// Directory-backed store for uploaded profile pictures.
///
/// Rows reference files by their public path
/// (`/uploads/profile-pictures/<name>`); the store maps that back onto
/// `<upload_dir>/profile-pictures/<name>`.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(upload_dir: impl AsRef<Path>) -> Self {
        Self {
            root: upload_dir.as_ref().join(PROFILE_PICTURE_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_path(name: &str) -> String {
        format!("{}/{}/{}", PUBLIC_PREFIX, PROFILE_PICTURE_DIR, name)
    }

    /// File name referenced by a stored path, if the path belongs to this store.
    pub fn file_name_of(path: &str) -> Option<&str> {
        let prefix = format!("{}/{}/", PUBLIC_PREFIX, PROFILE_PICTURE_DIR);
        let name = path.strip_prefix(prefix.as_str()).unwrap_or(path);
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return None;
        }
        Some(name)
    }

    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        Self::file_name_of(path).map(|name| self.root.join(name))
    }

    /// Writes `bytes` under `name` and returns the public path to record.
    pub async fn save(&self, name: &str, bytes: &[u8]) -> anyhow::Result<String> {
        let full_path = self
            .resolve(name)
            .with_context(|| format!("invalid stored file name {:?}", name))?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload directory {}", self.root.display()))?;
        tokio::fs::write(&full_path, bytes)
            .await
            .with_context(|| format!("write uploaded file {}", full_path.display()))?;
        tracing::debug!("stored upload {}", full_path.display());
        Ok(Self::public_path(name))
    }

    /// Best-effort delete. An already missing file counts as deleted; any
    /// other failure is logged and reported as `false`, never as an error.
    pub async fn delete(&self, path: &str) -> bool {
        let Some(full_path) = self.resolve(path) else {
            tracing::warn!("refusing to delete {:?}: not a stored upload path", path);
            return false;
        };
        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => {
                tracing::debug!("deleted stored upload {}", full_path.display());
                true
            }
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => {
                tracing::warn!("failed to delete {}: {}", full_path.display(), err);
                false
            }
        }
    }

    pub async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Some(full_path) => tokio::fs::try_exists(full_path).await.unwrap_or(false),
            None => false,
        }
    }

    /// Last modification time of a stored file, `None` if it cannot be read.
    pub async fn modified_at(&self, path: &str) -> Option<SystemTime> {
        let full_path = self.resolve(path)?;
        tokio::fs::metadata(full_path).await.ok()?.modified().ok()
    }

    /// Names of all files currently held by the store.
    pub async fn list(&self) -> anyhow::Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(val) => val,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read upload directory {}", self.root.display()))
            }
        };
        let mut names: Vec<String> = vec![];
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

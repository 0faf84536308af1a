//! File ingestion guard for document uploads.
//!
//! Validates the declared file extension, names the stored file with a random
//! token, and streams the body to disk under a hard byte ceiling. A failed
//! or cancelled ingest never leaves a partial file behind: the file on disk
//! is owned by a drop guard until the caller calls [`StoredFile::keep`].

use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

use crate::error::CoreError;

/// Lowercase extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "jpg", "jpeg", "png", "gif", "zip",
];

/// Default upload ceiling (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Size of each read from the upload stream.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// MIME type recorded when the client declares none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Failure modes of [`ingest`].
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(
        "File type '{extension}' is not allowed. Allowed types: {allowed}",
        allowed = ALLOWED_EXTENSIONS.join(", ")
    )]
    UnsupportedType { extension: String },

    #[error("File too large. Maximum size: {limit} bytes")]
    TooLarge { limit: u64 },

    /// The upload stream itself failed (client disconnect, malformed body).
    #[error("Failed to read upload stream: {0}")]
    Read(std::io::Error),

    /// Writing to or removing from the upload directory failed.
    #[error("Failed to write upload: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<IngestError> for CoreError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedType { .. } | IngestError::Read(_) => {
                CoreError::Validation(err.to_string())
            }
            IngestError::TooLarge { .. } => CoreError::TooLarge(err.to_string()),
            IngestError::Storage(_) => CoreError::Storage(err.to_string()),
        }
    }
}

/// Where uploads go and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub upload_dir: PathBuf,
    pub max_bytes: u64,
}

impl UploadPolicy {
    pub fn new(upload_dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_bytes,
        }
    }
}

/// A successfully ingested file.
///
/// The file is removed when this value is dropped unless [`StoredFile::keep`]
/// was called first.
#[derive(Debug)]
pub struct StoredFile {
    /// Opaque, collision-free name on disk (`<uuid>.<ext>`).
    pub stored_name: String,
    pub storage_path: PathBuf,
    pub byte_size: u64,
    pub mime_type: String,
    guard: RemoveOnDrop,
}

impl StoredFile {
    /// Take ownership of the file on disk; it will no longer be removed on drop.
    pub fn keep(mut self) -> PathBuf {
        self.guard.disarm();
        self.storage_path
    }
}

/// Deletes `path` on drop while armed.
///
/// Runs synchronously so it also fires when the owning future is dropped
/// mid-await (request timeout, client disconnect).
#[derive(Debug)]
struct RemoveOnDrop {
    path: PathBuf,
    armed: bool,
}

impl RemoveOnDrop {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed unclaimed upload");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove partial upload"
                );
            }
        }
    }
}

/// Return the lowercase extension of `declared_name` if it is on the allow-list.
///
/// Only the final path component is considered, so directory parts supplied by
/// the client have no effect.
pub fn allowed_extension(declared_name: &str) -> Result<String, IngestError> {
    let extension = Path::new(declared_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(IngestError::UnsupportedType { extension })
    }
}

/// Build a fresh storage name for a file with the given extension.
pub fn generate_stored_name(extension: &str) -> String {
    format!("{}.{extension}", Uuid::new_v4().simple())
}

/// Resolve the MIME type to record for an upload.
pub fn resolve_mime_type(declared_mime: Option<&str>) -> String {
    match declared_mime.map(str::trim) {
        Some(mime) if !mime.is_empty() => mime.to_string(),
        _ => DEFAULT_MIME_TYPE.to_string(),
    }
}

/// Stream `reader` into the upload directory.
///
/// The extension is checked before anything touches the disk. The byte
/// count is checked after every chunk; as soon as it passes
/// `policy.max_bytes` the partial file is deleted and
/// [`IngestError::TooLarge`] is returned. Dropping the returned future
/// before it completes also deletes the partial file.
pub async fn ingest<R>(
    mut reader: R,
    declared_name: &str,
    declared_mime: Option<&str>,
    policy: &UploadPolicy,
) -> Result<StoredFile, IngestError>
where
    R: AsyncRead + Unpin,
{
    let extension = allowed_extension(declared_name)?;

    fs::create_dir_all(&policy.upload_dir).await?;

    let stored_name = generate_stored_name(&extension);
    let storage_path = policy.upload_dir.join(&stored_name);

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&storage_path)
        .await?;
    let guard = RemoveOnDrop::new(storage_path.clone());

    // On error the guard goes out of scope and removes the partial file.
    let byte_size = write_capped(&mut reader, file, policy.max_bytes).await?;

    tracing::debug!(
        stored_name = %stored_name,
        byte_size,
        "Upload written to disk"
    );
    Ok(StoredFile {
        stored_name,
        storage_path,
        byte_size,
        mime_type: resolve_mime_type(declared_mime),
        guard,
    })
}

/// Best-effort removal of a stored file.
///
/// Returns `Ok(false)` when the file was already gone.
pub async fn remove_stored_file(path: &Path) -> Result<bool, IngestError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(IngestError::Storage(e)),
    }
}

async fn write_capped<R>(reader: &mut R, mut file: File, max_bytes: u64) -> Result<u64, IngestError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = reader.read(&mut buf).await.map_err(IngestError::Read)?;
        if n == 0 {
            break;
        }
        total += n as u64;
        if total > max_bytes {
            return Err(IngestError::TooLarge { limit: max_bytes });
        }
        file.write_all(&buf[..n]).await?;
    }

    file.flush().await?;
    Ok(total)
}

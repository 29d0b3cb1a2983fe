use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::domain::{DocumentDescriptor, PendingDocument};

/// Byte budget for the sanitized part of a stored name. With the 32-byte uuid and
/// separator the stored name stays under the 255-byte NAME_MAX.
pub const MAX_STORED_NAME_BYTES: usize = 200;
const MAX_EXTENSION_BYTES: usize = 16;

/// Errors raised while writing uploads to disk.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to prepare upload directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Local-disk staging area for uploaded identity documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    upload_dir: PathBuf,
}

impl DocumentStore {
    /// Create the store, making sure the upload directory exists.
    pub async fn open(upload_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let upload_dir = upload_dir.into();
        fs::create_dir_all(&upload_dir)
            .await
            .map_err(|source| StorageError::Directory {
                path: upload_dir.clone(),
                source,
            })?;

        Ok(Self { upload_dir })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Write one upload under a collision-free name and describe where it landed.
    pub async fn stage(&self, document: &PendingDocument) -> Result<DocumentDescriptor, StorageError> {
        let stored_name = format!(
            "{}-{}",
            uuid::Uuid::new_v4().simple(),
            sanitize_filename(&document.file_name)
        );
        let path = self.upload_dir.join(&stored_name);

        let mut file = fs::File::create(&path)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;
        file.write_all(&document.data)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;
        file.sync_all().await.map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = document.data.len(),
            kind = %document.kind,
            "staged uploaded document"
        );

        Ok(DocumentDescriptor {
            file_name: document.file_name.clone(),
            file_type: document.kind,
            file_path: path.to_string_lossy().into_owned(),
        })
    }

    /// Stage every document in order. Files written before a failure are left in place.
    pub async fn stage_all(
        &self,
        documents: &[PendingDocument],
    ) -> Result<Vec<DocumentDescriptor>, StorageError> {
        let mut descriptors = Vec::with_capacity(documents.len());
        for document in documents {
            descriptors.push(self.stage(document).await?);
        }
        Ok(descriptors)
    }
}

/// Reduce a client-supplied name to a safe single path component of at most
/// [`MAX_STORED_NAME_BYTES`] bytes, keeping a short extension intact.
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_start_matches('.');
    if trimmed.is_empty() {
        return "document".to_string();
    }
    if trimmed.len() <= MAX_STORED_NAME_BYTES {
        return trimmed.to_string();
    }

    let (stem, extension) = match trimmed.rfind('.') {
        Some(dot) if trimmed.len() - dot <= MAX_EXTENSION_BYTES => trimmed.split_at(dot),
        _ => (trimmed, ""),
    };
    let stem = truncate_on_char_boundary(stem, MAX_STORED_NAME_BYTES - extension.len());
    format!("{stem}{extension}")
}

fn truncate_on_char_boundary(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

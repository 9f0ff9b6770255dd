//! Filesystem-backed implementations of the transport traits.
//!
//! [`LocalStorage`] treats a [`FileHandle`](crate::transport::FileHandle) as a
//! local path and copies the file into an upload directory. [`CsvAuditLog`]
//! appends one CSV row per upload to a per-user file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::config::RetryPolicy;
use crate::error::{ContactpackError, Result};
use crate::format::split_file_name;
use crate::retry::with_retry;
use crate::transport::{AuditEntry, AuditSink, IncomingFile, Storage, UserId};

/// Copies uploads into a directory under collision-free names.
///
/// Stored files are named `<stem>_<user>_<millis>_<n><ext>`, where `n` is a
/// per-storage counter, so two uploads with the same name never clash.
#[derive(Debug)]
pub struct LocalStorage {
    upload_dir: PathBuf,
    policy: RetryPolicy,
    counter: AtomicU64,
}

impl LocalStorage {
    /// Creates a storage rooted at `upload_dir`. The directory is created on
    /// first use.
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            policy: RetryPolicy::io(),
            counter: AtomicU64::new(0),
        }
    }

    /// Sets the retry policy for copies.
    #[must_use]
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Directory that receives stored uploads.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    fn target_for(&self, user: UserId, file_name: &str) -> PathBuf {
        let (stem, ext) = split_file_name(file_name);
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let millis = Utc::now().timestamp_millis();
        self.upload_dir.join(format!("{stem}_{user}_{millis}_{n}{ext}"))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, user: UserId, file: &IncomingFile) -> Result<PathBuf> {
        let source = PathBuf::from(&file.handle.0);
        let target = self.target_for(user, &file.file_name);
        let dir = self.upload_dir.as_path();

        with_retry(&self.policy, "store upload", || {
            let (source, target) = (&source, &target);
            async move {
                tokio::fs::create_dir_all(dir).await?;
                tokio::fs::copy(source, target).await?;
                Ok::<_, ContactpackError>(())
            }
        })
        .await
        .map_err(|e| ContactpackError::storage(e.to_string(), Some(source.clone())))?;

        tracing::debug!(user = %user, file = %file.file_name, path = %target.display(), "Upload stored");
        Ok(target)
    }

    async fn delete(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ContactpackError::storage(e.to_string(), Some(path.to_path_buf()))),
        }
    }
}

/// Appends uploads to `<dir>/<user>.csv` with the header
/// `user,file_name,timestamp`.
#[derive(Debug, Clone)]
pub struct CsvAuditLog {
    dir: PathBuf,
}

impl CsvAuditLog {
    /// Creates a log writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the log file for `user`.
    pub fn path_for(&self, user: UserId) -> PathBuf {
        self.dir.join(format!("{user}.csv"))
    }

    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(entry.user);
        let exists = tokio::fs::try_exists(&path).await?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!exists)
            .from_writer(Vec::new());
        writer.serialize(entry)?;
        let row = writer
            .into_inner()
            .map_err(|e| ContactpackError::storage(e.to_string(), Some(path.clone())))?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&row).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl AuditSink for CsvAuditLog {
    async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.append(&entry).await {
            tracing::warn!(user = %entry.user, file = %entry.file_name, error = %e, "Failed to write audit entry");
        }
    }
}

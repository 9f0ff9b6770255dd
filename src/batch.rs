//! Per-workflow scratch resources: the upload batch and the output directory.
//!
//! Both are owned by one session and released together when the workflow
//! ends, whichever way it ends. Release never fails: individual deletion
//! errors are logged and the rest of the cleanup continues.

use std::path::{Path, PathBuf};

use futures::future::join_all;

use crate::config::RetryPolicy;
use crate::error::{ContactpackError, Result};
use crate::format::{FileFormat, extension_of, split_file_name};
use crate::transport::{Storage, UserId};

/// One stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Local copy made by the [`Storage`]
    pub path: PathBuf,

    /// Name the user sent the file under
    pub file_name: String,

    /// Ingestion-order token of the upload event
    pub sequence: u64,
}

impl Upload {
    /// Lowercased extension of the original name, with the dot (`.txt`).
    pub fn extension(&self) -> String {
        extension_of(Path::new(&self.file_name))
    }

    /// Original name without its extension.
    pub fn stem(&self) -> &str {
        split_file_name(&self.file_name).0
    }

    /// Format detected from the original name.
    pub fn format(&self) -> Result<FileFormat> {
        FileFormat::from_path(&self.file_name)
    }
}

/// Uploads collected during one workflow.
#[derive(Debug, Default)]
pub struct UploadBatch {
    uploads: Vec<Upload>,
}

impl UploadBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an upload.
    pub fn push(&mut self, upload: Upload) {
        self.uploads.push(upload);
    }

    /// Number of uploads.
    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    /// Returns true when nothing has been uploaded.
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    /// Uploads in their current order.
    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    /// Iterates over the uploads.
    pub fn iter(&self) -> std::slice::Iter<'_, Upload> {
        self.uploads.iter()
    }

    /// Puts the uploads in ingestion order.
    pub fn sort_by_sequence(&mut self) {
        self.uploads.sort_by_key(|u| u.sequence);
    }

    /// Returns true if any upload has the given format.
    pub fn contains_format(&self, format: FileFormat) -> bool {
        self.uploads.iter().any(|u| u.format().ok() == Some(format))
    }

    /// Deletes every stored upload concurrently and empties the batch.
    ///
    /// Returns how many deletions failed.
    pub async fn release(&mut self, storage: &dyn Storage) -> usize {
        let uploads = std::mem::take(&mut self.uploads);
        if uploads.is_empty() {
            return 0;
        }

        let results = join_all(uploads.iter().map(|u| storage.delete(&u.path))).await;

        let mut failed = 0;
        for (upload, result) in uploads.iter().zip(results) {
            match result {
                Ok(()) => tracing::debug!(file = %upload.file_name, "Upload released"),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(file = %upload.file_name, path = %upload.path.display(), error = %e, "Failed to delete upload");
                }
            }
        }
        failed
    }
}

impl<'a> IntoIterator for &'a UploadBatch {
    type Item = &'a Upload;
    type IntoIter = std::slice::Iter<'a, Upload>;

    fn into_iter(self) -> Self::IntoIter {
        self.uploads.iter()
    }
}

/// Directory that holds the generated files of one workflow run.
///
/// The directory is created lazily on the first output and removed as a whole
/// when the run ends.
#[derive(Debug)]
pub struct OutputDir {
    path: PathBuf,
    created: bool,
}

impl OutputDir {
    /// Plans `<work_dir>/<user>_<run>` without touching the filesystem.
    pub fn new(work_dir: &Path, user: UserId, run: u64) -> Self {
        Self {
            path: work_dir.join(format!("{user}_{run}")),
            created: false,
        }
    }

    /// The run directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path for an output named `name`, creating the directory if
    /// needed. Path separators in `name` are replaced and names that would
    /// resolve to the directory itself (`""`, `"."`, `".."`) get a leading `_`,
    /// so outputs always land inside as plain files.
    pub async fn file(&mut self, name: &str, policy: &RetryPolicy) -> Result<PathBuf> {
        if !self.created {
            let dir = self.path.as_path();
            crate::retry::with_retry(policy, "create output directory", || async move {
                tokio::fs::create_dir_all(dir).await.map_err(ContactpackError::from)
            })
            .await?;
            self.created = true;
        }
        let mut safe: String = name.chars().map(|c| if matches!(c, '/' | '\\') { '_' } else { c }).collect();
        if matches!(safe.as_str(), "" | "." | "..") {
            safe.insert(0, '_');
        }
        Ok(self.path.join(safe))
    }

    /// Removes the directory and everything left in it.
    pub async fn remove(&mut self) {
        if !self.created {
            return;
        }
        self.created = false;
        if let Err(e) = tokio::fs::remove_dir_all(&self.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove output directory");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::transport::IncomingFile;

    #[derive(Default)]
    struct FlakyStorage {
        deleted: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl Storage for FlakyStorage {
        async fn store(&self, _user: UserId, _file: &IncomingFile) -> Result<PathBuf> {
            unreachable!()
        }

        async fn delete(&self, path: &Path) -> Result<()> {
            if path.ends_with("bad") {
                return Err(ContactpackError::storage("locked", Some(path.to_path_buf())));
            }
            self.deleted.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    fn upload(path: &str, name: &str, sequence: u64) -> Upload {
        Upload {
            path: PathBuf::from(path),
            file_name: name.to_string(),
            sequence,
        }
    }

    #[test]
    fn test_upload_name_parts() {
        let u = upload("/x/1", "Data.XLS", 1);
        assert_eq!(u.extension(), ".xls");
        assert_eq!(u.stem(), "Data");
        assert_eq!(u.format().unwrap(), FileFormat::Xlsx);
        assert!(upload("/x/2", "doc.pdf", 2).format().is_err());
    }

    #[test]
    fn test_sort_by_sequence() {
        let mut batch = UploadBatch::new();
        batch.push(upload("/b", "b.txt", 9));
        batch.push(upload("/a", "a.txt", 3));
        batch.sort_by_sequence();
        let names: Vec<_> = batch.iter().map(|u| u.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert!(batch.contains_format(FileFormat::Txt));
        assert!(!batch.contains_format(FileFormat::Vcf));
    }

    #[tokio::test]
    async fn test_release_continues_past_failures() {
        let storage = FlakyStorage::default();
        let mut batch = UploadBatch::new();
        batch.push(upload("/tmp/one", "1.txt", 1));
        batch.push(upload("/tmp/bad", "2.txt", 2));
        batch.push(upload("/tmp/three", "3.txt", 3));

        let failed = batch.release(&storage).await;
        assert_eq!(failed, 1);
        assert!(batch.is_empty());
        assert_eq!(storage.deleted.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_output_dir_lifecycle() {
        let work = tempfile::tempdir().unwrap();
        let policy = RetryPolicy::new(1, Duration::ZERO);
        let mut out = OutputDir::new(work.path(), UserId(4), 17);
        assert!(!out.path().exists());

        let file = out.file("a/b.txt", &policy).await.unwrap();
        assert_eq!(file.parent().unwrap(), out.path());
        assert_eq!(file.file_name().unwrap(), "a_b.txt");
        tokio::fs::write(&file, "x").await.unwrap();

        out.remove().await;
        assert!(!work.path().join("4_17").exists());
    }

    #[tokio::test]
    async fn test_output_file_never_escapes_run_dir() {
        let work = tempfile::tempdir().unwrap();
        let policy = RetryPolicy::new(1, Duration::ZERO);
        let mut out = OutputDir::new(work.path(), UserId(4), 18);

        for (name, expected) in [("..", "_.."), (".", "_."), ("", "_"), ("../..", ".._.."), ("..x", "..x")] {
            let file = out.file(name, &policy).await.unwrap();
            assert_eq!(file.parent().unwrap(), out.path(), "name {name:?}");
            assert_eq!(file.file_name().unwrap(), expected);
        }
        out.remove().await;
    }
}

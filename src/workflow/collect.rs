//! File collection phase shared by the upload workflows.
//!
//! Rules:
//!
//! - An upload with an extension the workflow does not take empties the batch
//!   (stored files are deleted right away) and raises a sticky error flag.
//! - While the flag is up every further upload is ignored without a reply.
//! - With `same_format`, an upload whose extension differs from the first one
//!   is treated the same way.
//! - The first accepted upload (or the second, for merge) is confirmed.

use tracing::{debug, info, warn};

use super::{Command, Cx};
use crate::batch::{Upload, UploadBatch};
use crate::prompts;
use crate::transport::IncomingFile;

/// Extensions accepted by the five contact formats.
pub const CONTACT_EXTENSIONS: &[&str] = &[".txt", ".csv", ".vcf", ".xlsx", ".xls"];

/// Which uploads a workflow takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// Only these lowercased extensions (with dot)
    Extensions(&'static [&'static str]),

    /// Any file
    Any,
}

impl Accept {
    /// Returns true if `extension` (lowercased, with dot) is accepted.
    pub fn allows(&self, extension: &str) -> bool {
        match self {
            Accept::Extensions(list) => list.contains(&extension),
            Accept::Any => true,
        }
    }
}

/// Result of offering one upload to a [`Collector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingest {
    /// Stored; the batch now holds this many files
    Accepted(usize),

    /// Extension not allowed; batch reset, error flag raised
    Rejected(String),

    /// Extension differs from the first upload; batch reset, error flag raised
    Mismatch,

    /// The error flag was already up
    Ignored,

    /// Storage failed; the batch is unchanged
    Failed,
}

/// Upload batch plus the collection-phase rules.
#[derive(Debug)]
pub struct Collector {
    /// Accepted uploads
    pub batch: UploadBatch,
    command: Command,
    accept: Accept,
    same_format: bool,
    confirm_at: usize,
    file_error: bool,
    first_extension: Option<String>,
}

impl Collector {
    /// Creates a collector for `command`.
    pub fn new(command: Command, accept: Accept) -> Self {
        Self {
            batch: UploadBatch::new(),
            command,
            accept,
            same_format: false,
            confirm_at: 1,
            file_error: false,
            first_extension: None,
        }
    }

    /// Requires every upload to share the first upload's extension.
    #[must_use]
    pub fn same_format(mut self) -> Self {
        self.same_format = true;
        self
    }

    /// Confirms on the `n`th accepted upload instead of the first.
    #[must_use]
    pub fn confirm_at(mut self, n: usize) -> Self {
        self.confirm_at = n;
        self
    }

    /// Returns true once a rejected upload raised the sticky flag.
    pub fn has_error(&self) -> bool {
        self.file_error
    }

    /// Offers an upload without replying.
    pub async fn ingest(&mut self, cx: &Cx<'_>, file: &IncomingFile, sequence: u64) -> Ingest {
        info!(user = %cx.user, file = %file.file_name, "user: kirim file");

        if self.file_error {
            debug!(user = %cx.user, file = %file.file_name, "Upload ignored after earlier rejection");
            return Ingest::Ignored;
        }

        let upload_ext = crate::format::extension_of(std::path::Path::new(&file.file_name));

        if !self.accept.allows(&upload_ext) {
            self.fail(cx).await;
            return Ingest::Rejected(upload_ext);
        }

        if self.same_format {
            match &self.first_extension {
                Some(first) if *first != upload_ext => {
                    self.fail(cx).await;
                    return Ingest::Mismatch;
                }
                Some(_) => {}
                None => self.first_extension = Some(upload_ext),
            }
        }

        match cx.store(file).await {
            Ok(path) => {
                self.batch.push(Upload {
                    path,
                    file_name: file.file_name.clone(),
                    sequence,
                });
                Ingest::Accepted(self.batch.len())
            }
            Err(e) => {
                warn!(user = %cx.user, file = %file.file_name, error = %e, "Failed to store upload");
                Ingest::Failed
            }
        }
    }

    /// Offers an upload and sends the standard reply for the outcome.
    pub async fn collect(&mut self, cx: &Cx<'_>, file: &IncomingFile, sequence: u64) {
        match self.ingest(cx, file, sequence).await {
            Ingest::Accepted(n) if n == self.confirm_at => {
                let text = match self.command {
                    Command::Merge | Command::Split | Command::Count | Command::Nodup => prompts::FILE_RECEIVED_MORE,
                    _ => prompts::FILE_RECEIVED,
                };
                cx.reply(text).await;
            }
            Ingest::Rejected(ext) => cx.reply(&prompts::rejection(self.command, &ext)).await,
            Ingest::Mismatch => cx.reply(prompts::MERGE_MISMATCH).await,
            Ingest::Failed => cx.reply(prompts::RECEIVE_FAILED).await,
            Ingest::Accepted(_) | Ingest::Ignored => {}
        }
    }

    /// Handles `/done`: requires at least `min` files, then sorts the batch
    /// into ingestion order. Returns false (after re-prompting) when there are
    /// too few files.
    pub async fn finish(&mut self, cx: &Cx<'_>, min: usize) -> bool {
        if self.batch.len() < min.max(1) {
            let text = if min > 1 { prompts::MERGE_TOO_FEW } else { prompts::NO_FILES };
            cx.reply(text).await;
            return false;
        }
        self.batch.sort_by_sequence();
        for upload in &self.batch {
            info!(user = %cx.user, "bot: File {} diterima", upload.file_name);
        }
        true
    }

    async fn fail(&mut self, cx: &Cx<'_>) {
        let released = self.batch.len();
        self.batch.release(cx.storage_handle()).await;
        self.file_error = true;
        self.first_extension = None;
        debug!(user = %cx.user, released, "Batch reset after rejected upload");
    }
}

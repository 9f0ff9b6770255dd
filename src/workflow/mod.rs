//! Conversation workflows.
//!
//! Every top-level command starts one [`Workflow`]: a small state machine with
//! an explicit state enum and exactly the fields that command needs. Most of
//! them share the same shape:
//!
//! ```text
//! idle -> collecting files -> /done -> parameter 1 .. parameter k -> finish
//! ```
//!
//! The engine owns the sessions and feeds each workflow [`Input`]s. A workflow
//! answers with [`Step::Continue`] to stay active or [`Step::Finish`] to end; an
//! `Err` ends it as a failure. Either way the engine cleans up afterwards.
//! Workflows talk to the outside world only through [`Cx`].

mod add;
mod collect;
mod count;
mod delete;
mod manual;
mod merge;
mod nodup;
mod rename_contact;
mod rename_file;
mod split;
mod to_txt;
mod to_vcf;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;

pub use add::Add;
pub use collect::{Accept, Collector, Ingest};
pub use count::Count;
pub use delete::Delete;
pub use manual::Manual;
pub use merge::Merge;
pub use nodup::Nodup;
pub use rename_contact::RenameContact;
pub use rename_file::RenameFile;
pub use split::Split;
pub use to_txt::ToTxt;
pub use to_vcf::ToVcf;

use crate::batch::{OutputDir, Upload, UploadBatch};
use crate::codec;
use crate::config::{EngineConfig, RetryPolicy};
use crate::delivery;
use crate::error::{ContactpackError, Result};
use crate::format::FileFormat;
use crate::transport::{AuditEntry, AuditSink, Choice, IncomingFile, Responder, Storage, UserId};

/// Commands understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Help,
    ToVcf,
    ToTxt,
    Manual,
    Add,
    Delete,
    RenameContact,
    RenameFile,
    Merge,
    Split,
    Count,
    Nodup,
    /// Advance from file collection to the first parameter
    Done,
}

impl Command {
    /// Command name without the slash.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::ToVcf => "to_vcf",
            Command::ToTxt => "to_txt",
            Command::Manual => "manual",
            Command::Add => "add",
            Command::Delete => "delete",
            Command::RenameContact => "renamectc",
            Command::RenameFile => "renamefile",
            Command::Merge => "merge",
            Command::Split => "split",
            Command::Count => "count",
            Command::Nodup => "nodup",
            Command::Done => "done",
        }
    }

    /// Every command.
    pub fn all() -> &'static [Command] {
        &[
            Command::Start,
            Command::Help,
            Command::ToVcf,
            Command::ToTxt,
            Command::Manual,
            Command::Add,
            Command::Delete,
            Command::RenameContact,
            Command::RenameFile,
            Command::Merge,
            Command::Split,
            Command::Count,
            Command::Nodup,
            Command::Done,
        ]
    }

    /// Returns true if the text looks like a command (`/` followed by a name).
    pub fn is_command(text: &str) -> bool {
        text.trim_start()
            .strip_prefix('/')
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_'))
    }

    /// Parses the leading command of a message.
    ///
    /// Arguments after the command are ignored and a bot-name suffix
    /// (`/done@my_bot`) is accepted. Unknown commands and plain text give `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contactpack::workflow::Command;
    ///
    /// assert_eq!(Command::parse("/to_vcf"), Some(Command::ToVcf));
    /// assert_eq!(Command::parse(" /done@contact_bot "), Some(Command::Done));
    /// assert_eq!(Command::parse("/admin"), None);
    /// assert_eq!(Command::parse("hello"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.trim().strip_prefix('/')?.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        Command::all().iter().copied().find(|c| c.name() == name)
    }

    /// Returns true for commands that start (or interrupt into) a workflow or
    /// a one-shot reply. Only `/done` is not.
    pub fn is_top_level(&self) -> bool {
        !matches!(self, Command::Done)
    }

    /// Returns true for commands that open a session.
    pub fn starts_session(&self) -> bool {
        !matches!(self, Command::Start | Command::Help | Command::Done)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ContactpackError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim_start_matches('/');
        Command::all()
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| ContactpackError::validation(format!("unknown command '{s}'")))
    }
}

/// Creates the workflow for a session-starting command.
pub fn create(command: Command) -> Option<Box<dyn Workflow>> {
    let workflow: Box<dyn Workflow> = match command {
        Command::ToVcf => Box::new(ToVcf::new()),
        Command::ToTxt => Box::new(ToTxt::new()),
        Command::Manual => Box::new(Manual::new()),
        Command::Add => Box::new(Add::new()),
        Command::Delete => Box::new(Delete::new()),
        Command::RenameContact => Box::new(RenameContact::new()),
        Command::RenameFile => Box::new(RenameFile::new()),
        Command::Merge => Box::new(Merge::new()),
        Command::Split => Box::new(Split::new()),
        Command::Count => Box::new(Count::new()),
        Command::Nodup => Box::new(Nodup::new()),
        Command::Start | Command::Help | Command::Done => return None,
    };
    Some(workflow)
}

/// One event, as seen by a workflow.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// Plain text (never a command)
    Text(&'a str),

    /// An upload with its ingestion-order token
    File(&'a IncomingFile, u64),

    /// Inline-button callback data
    Choice(&'a str),

    /// The `/done` command, only delivered while collecting files
    Done,
}

/// What the engine should do after a workflow handled an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep the session and wait for the next input
    Continue,

    /// End the session and clean up
    Finish,
}

/// A per-user conversation state machine.
#[async_trait]
pub trait Workflow: Send {
    /// The command that started the workflow.
    fn command(&self) -> Command;

    /// Returns true while the workflow is collecting uploads.
    fn is_collecting(&self) -> bool;

    /// The upload batch, for cleanup.
    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        None
    }

    /// Sends the opening prompt.
    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step>;

    /// Applies one input.
    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step>;
}

/// Everything a workflow may touch while handling one input.
pub struct Cx<'a> {
    /// The user being served
    pub user: UserId,

    /// Engine settings
    pub config: &'a EngineConfig,

    responder: &'a dyn Responder,
    storage: &'a dyn Storage,
    audit: &'a dyn AuditSink,
    outputs: &'a mut OutputDir,
}

impl<'a> Cx<'a> {
    /// Bundles the collaborators for one call into a workflow.
    pub fn new(
        user: UserId,
        config: &'a EngineConfig,
        responder: &'a dyn Responder,
        storage: &'a dyn Storage,
        audit: &'a dyn AuditSink,
        outputs: &'a mut OutputDir,
    ) -> Self {
        Self {
            user,
            config,
            responder,
            storage,
            audit,
            outputs,
        }
    }

    /// The storage behind uploads.
    pub(crate) fn storage_handle(&self) -> &'a dyn Storage {
        self.storage
    }

    /// Retry policy for local file operations.
    pub fn io(&self) -> &RetryPolicy {
        &self.config.io_retry
    }

    /// Sends a text reply. Failures are logged, never raised.
    pub async fn reply(&self, text: &str) {
        tracing::info!(user = %self.user, "bot: {text}");
        if let Err(e) = self.responder.reply(self.user, text).await {
            tracing::warn!(user = %self.user, error = %e, "Failed to send reply");
        }
    }

    /// Sends a reply with inline buttons. Failures are logged, never raised.
    pub async fn reply_with_choices(&self, text: &str, choices: &[Choice]) {
        tracing::info!(user = %self.user, "bot: {text}");
        if let Err(e) = self.responder.reply_with_choices(self.user, text, choices).await {
            tracing::warn!(user = %self.user, error = %e, "Failed to send reply");
        }
    }

    /// Materializes an upload and records it in the audit log.
    pub async fn store(&self, file: &IncomingFile) -> Result<PathBuf> {
        self.audit.record(AuditEntry::now(self.user, &file.file_name)).await;
        self.storage.store(self.user, file).await
    }

    /// Reads a stored upload.
    ///
    /// A file that has disappeared makes the batch unusable, so `NotFound`
    /// becomes a batch consistency error.
    pub async fn read(&self, upload: &Upload) -> Result<Vec<u8>> {
        match codec::read_bytes(&upload.path, self.io()).await {
            Err(ContactpackError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Err(
                ContactpackError::batch(format!("uploaded file {} is missing", upload.file_name)),
            ),
            other => other,
        }
    }

    /// Reads a stored upload as text.
    pub async fn read_text(&self, upload: &Upload) -> Result<String> {
        codec::decode_text(self.read(upload).await?)
    }

    /// Writes an output file, delivers it, and deletes it again.
    ///
    /// Write failures are errors. A delivery failure is reported to the user
    /// by the delivery layer and returned as `Ok(false)`.
    pub async fn send_output(&mut self, name: &str, bytes: &[u8]) -> Result<bool> {
        let path = self.outputs.file(name, &self.config.io_retry).await?;
        codec::write_bytes(&path, bytes, &self.config.io_retry).await?;

        let delivered = delivery::deliver(
            self.responder,
            self.user,
            &path,
            name,
            &self.config.delivery_retry,
        )
        .await;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete output");
        }
        Ok(delivered)
    }
}

/// Name of the rewritten version of `upload` in `format`.
///
/// The original name is kept, except that spreadsheets are always written as
/// `.xlsx`.
pub(crate) fn output_name(upload: &Upload, format: FileFormat) -> String {
    if format == FileFormat::Xlsx && upload.extension() != ".xlsx" {
        format!("{}.xlsx", upload.stem())
    } else {
        upload.file_name.clone()
    }
}

/// Numbers typed by the user: one per line (commas and semicolons also split),
/// normalized and deduplicated.
pub(crate) fn typed_numbers(text: &str) -> Vec<crate::PhoneNumber> {
    crate::number::extract_unique(crate::number::split_input(text))
}

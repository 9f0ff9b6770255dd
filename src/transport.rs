//! Boundary types and traits between the engine and the chat transport.
//!
//! The engine never talks to a network itself. Inbound traffic arrives as
//! [`Event`] values; everything outbound goes through four traits:
//!
//! - [`Responder`] sends text replies and result files back to a user
//! - [`Storage`] materializes uploads as local files and deletes them again
//! - [`MembershipGate`] decides whether a user may start a workflow
//! - [`AuditSink`] receives a fire-and-forget record of every upload
//!
//! Implementations for local use live in [`crate::local`].

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identity of one chat user. Sessions are keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque transport reference to an uploaded file.
///
/// For the local storage this is a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle(pub String);

/// An uploaded document as announced by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    /// Where the transport can fetch the content from
    pub handle: FileHandle,

    /// File name as the user sent it
    pub file_name: String,
}

impl IncomingFile {
    /// Creates an upload whose handle and name are taken from a local path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            handle: FileHandle(path.to_string_lossy().into_owned()),
            file_name,
        }
    }

    /// Overrides the user-visible file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A text message, including commands such as `/done`
    Text(String),

    /// A document upload
    File(IncomingFile),

    /// A press on an inline button, carrying its callback data
    Choice(String),
}

/// One inbound message from one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Who sent it
    pub sender: UserId,

    /// Ingestion-order token. Uploads are processed sorted by this.
    pub sequence: u64,

    /// Payload
    pub kind: EventKind,
}

impl Event {
    /// Creates a text event.
    pub fn text(sender: UserId, sequence: u64, text: impl Into<String>) -> Self {
        Self {
            sender,
            sequence,
            kind: EventKind::Text(text.into()),
        }
    }

    /// Creates a file event.
    pub fn file(sender: UserId, sequence: u64, file: IncomingFile) -> Self {
        Self {
            sender,
            sequence,
            kind: EventKind::File(file),
        }
    }

    /// Creates a button-press event.
    pub fn choice(sender: UserId, sequence: u64, data: impl Into<String>) -> Self {
        Self {
            sender,
            sequence,
            kind: EventKind::Choice(data.into()),
        }
    }
}

/// An inline button offered with a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Button text
    pub label: String,

    /// Callback data sent back as [`EventKind::Choice`]
    pub data: String,
}

impl Choice {
    /// Creates a button.
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Outbound side of the chat transport.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Sends a text message.
    async fn reply(&self, user: UserId, text: &str) -> Result<()>;

    /// Sends a text message with inline buttons.
    ///
    /// Transports without buttons can keep the default, which appends one
    /// `[data] label` line per choice.
    async fn reply_with_choices(&self, user: UserId, text: &str, choices: &[Choice]) -> Result<()> {
        let mut message = text.to_string();
        for choice in choices {
            message.push_str(&format!("\n[{}] {}", choice.data, choice.label));
        }
        self.reply(user, &message).await
    }

    /// Sends a local file under `display_name`.
    ///
    /// Network hiccups should be reported as
    /// [`ContactpackError::transient_delivery`](crate::ContactpackError::transient_delivery)
    /// so the caller retries them.
    async fn send_file(&self, user: UserId, path: &Path, display_name: &str) -> Result<()>;
}

/// Temporary storage for uploads.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Materializes an upload as a local file and returns its path.
    async fn store(&self, user: UserId, file: &IncomingFile) -> Result<PathBuf>;

    /// Releases a stored file.
    async fn delete(&self, path: &Path) -> Result<()>;
}

/// Authorization check consulted before any workflow starts.
#[async_trait]
pub trait MembershipGate: Send + Sync {
    /// Returns true if `user` may use the bot.
    async fn is_authorized(&self, user: UserId) -> bool;

    /// Message shown to a user who is not authorized.
    fn deny(&self, _user: UserId) -> String {
        "🚫 Kamu belum gabung grup & channel!\nSetelah join, balik lagi dan ketik /start👍".to_string()
    }
}

/// A gate that lets everybody in.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

#[async_trait]
impl MembershipGate for OpenGate {
    async fn is_authorized(&self, _user: UserId) -> bool {
        true
    }
}

/// One upload, as written to the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Uploader
    pub user: UserId,

    /// File name as sent
    pub file_name: String,

    /// When the upload arrived
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(user: UserId, file_name: impl Into<String>) -> Self {
        Self {
            user,
            file_name: file_name.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Write-only audit trail. Failures stay inside the sink.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one upload.
    async fn record(&self, entry: AuditEntry);
}

/// Audit sink that only emits a log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudit;

#[async_trait]
impl AuditSink for TracingAudit {
    async fn record(&self, entry: AuditEntry) {
        tracing::info!(user = %entry.user, file = %entry.file_name, "Upload received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Captured(Mutex<Vec<String>>);

    #[async_trait]
    impl Responder for Captured {
        async fn reply(&self, _user: UserId, text: &str) -> Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn send_file(&self, _user: UserId, _path: &Path, _name: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_choices_render_as_text() {
        let responder = Captured::default();
        let choices = [Choice::new("🔄 Otomatis", "auto"), Choice::new("✏️ Manual", "manual")];
        responder
            .reply_with_choices(UserId(1), "Pilih:", &choices)
            .await
            .unwrap();
        let sent = responder.0.lock().unwrap();
        assert_eq!(sent[0], "Pilih:\n[auto] 🔄 Otomatis\n[manual] ✏️ Manual");
    }

    #[test]
    fn test_incoming_file_from_path() {
        let file = IncomingFile::from_path("/tmp/uploads/list.txt");
        assert_eq!(file.file_name, "list.txt");
        assert_eq!(file.handle.0, "/tmp/uploads/list.txt");

        let renamed = file.with_file_name("other.vcf");
        assert_eq!(renamed.file_name, "other.vcf");
    }

    #[tokio::test]
    async fn test_open_gate() {
        assert!(OpenGate.is_authorized(UserId(7)).await);
        assert!(OpenGate.deny(UserId(7)).contains("/start"));
    }
}

//! Console driver: one local user talking to the engine through stdin/stdout.
//!
//! Each input line is one event:
//!
//! | Line | Event |
//! |------|-------|
//! | `@file <path>` | upload of a local file |
//! | `@choice <data>` | inline-button press |
//! | anything else | text message (commands included) |
//!
//! Replies are printed to stdout. Delivered files are copied into the output
//! directory. Logs go to stderr.
//!
//! ```text
//! $ printf '/count\n@file phones.txt\n/done\n' | contactpack -o out
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::{EngineConfig, RetryPolicy};
use crate::engine::Engine;
use crate::error::{ContactpackError, Result};
use crate::local::{CsvAuditLog, LocalStorage};
use crate::retry::with_retry;
use crate::transport::{Event, IncomingFile, Responder, UserId};

/// Convert, edit, merge and split contact files from a chat-style console.
#[derive(Parser, Debug, Clone)]
#[command(name = "contactpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "INPUT LINES:
    /to_vcf, /count, /done ...   commands
    @file ./phones.txt           upload a file
    @choice split_file           press an inline button
    anything else                plain text")]
pub struct Args {
    /// Directory for uploads and intermediate outputs
    #[arg(short, long, default_value = "contactpack-work")]
    pub work_dir: PathBuf,

    /// Directory that receives delivered files
    #[arg(short, long, default_value = "contactpack-out")]
    pub out_dir: PathBuf,

    /// User id of the console user
    #[arg(short, long, default_value_t = 1)]
    pub user: i64,

    /// Write the upload audit log (one CSV per user) to this directory
    #[arg(long, value_name = "DIR")]
    pub audit_dir: Option<PathBuf>,

    /// Delay between retries, in milliseconds (default: 2000)
    #[arg(long, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Engine configuration for these arguments.
    pub fn config(&self) -> EngineConfig {
        let config = EngineConfig::new(&self.work_dir);
        match self.retry_delay_ms {
            Some(ms) => config.with_retry_delay(Duration::from_millis(ms)),
            None => config,
        }
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    File(PathBuf),
    Choice(String),
    Text(String),
}

impl ConsoleLine {
    /// Parses a line. Blank lines give `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contactpack::cli::ConsoleLine;
    ///
    /// assert_eq!(ConsoleLine::parse("@choice split_file"), Some(ConsoleLine::Choice("split_file".into())));
    /// assert_eq!(ConsoleLine::parse("/done"), Some(ConsoleLine::Text("/done".into())));
    /// assert_eq!(ConsoleLine::parse("   "), None);
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }
        if let Some(path) = line.strip_prefix("@file ") {
            return Some(ConsoleLine::File(PathBuf::from(path.trim())));
        }
        if let Some(data) = line.strip_prefix("@choice ") {
            return Some(ConsoleLine::Choice(data.trim().to_string()));
        }
        Some(ConsoleLine::Text(line.to_string()))
    }

    /// Turns the line into an engine event.
    pub fn into_event(self, user: UserId, sequence: u64) -> Event {
        match self {
            ConsoleLine::File(path) => Event::file(user, sequence, IncomingFile::from_path(path)),
            ConsoleLine::Choice(data) => Event::choice(user, sequence, data),
            ConsoleLine::Text(text) => Event::text(user, sequence, text),
        }
    }
}

/// Prints replies and copies delivered files into a directory.
#[derive(Debug)]
pub struct ConsoleResponder {
    out_dir: PathBuf,
    policy: RetryPolicy,
}

impl ConsoleResponder {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            policy: RetryPolicy::io(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl Responder for ConsoleResponder {
    async fn reply(&self, _user: UserId, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }

    async fn send_file(&self, _user: UserId, path: &Path, display_name: &str) -> Result<()> {
        let target = self.out_dir.join(display_name);
        let (dir, target_ref) = (self.out_dir.as_path(), target.as_path());
        with_retry(&self.policy, "copy delivered file", || async move {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::copy(path, target_ref).await?;
            Ok::<(), ContactpackError>(())
        })
        .await
        .map_err(|e| ContactpackError::permanent_delivery(format!("{display_name}: {e}")))?;
        println!("📎 {display_name}");
        Ok(())
    }
}

/// Feeds stdin to a fresh engine until end of input.
pub async fn run(args: &Args) -> Result<()> {
    let config = args.config();
    let storage = LocalStorage::new(config.work_dir.join("uploads")).with_retry(config.io_retry);
    let responder = ConsoleResponder::new(&args.out_dir).with_retry(config.io_retry);

    let mut engine = Engine::new(config, Arc::new(responder), Arc::new(storage));
    if let Some(dir) = &args.audit_dir {
        engine = engine.with_audit(Arc::new(CsvAuditLog::new(dir)));
    }

    let user = UserId(args.user);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut sequence = 0;
    while let Some(line) = lines.next_line().await? {
        let Some(input) = ConsoleLine::parse(&line) else {
            continue;
        };
        sequence += 1;
        engine.handle(input.into_event(user, sequence)).await;
    }

    tracing::debug!(events = sequence, "Input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(
            ConsoleLine::parse("@file ./a b.txt"),
            Some(ConsoleLine::File(PathBuf::from("./a b.txt")))
        );
        assert_eq!(ConsoleLine::parse("0812\r"), Some(ConsoleLine::Text("0812".into())));
        assert_eq!(ConsoleLine::parse("@filex"), Some(ConsoleLine::Text("@filex".into())));
    }

    #[test]
    fn test_file_event_uses_file_name() {
        let event = ConsoleLine::File("dir/phones.txt".into()).into_event(UserId(3), 9);
        match event.kind {
            crate::transport::EventKind::File(file) => assert_eq!(file.file_name, "phones.txt"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(event.sequence, 9);
    }

    #[test]
    fn test_args_retry_delay() {
        let args = Args::parse_from(["contactpack", "--retry-delay-ms", "0"]);
        assert_eq!(args.config().delivery_retry.delay, Duration::ZERO);
        assert_eq!(args.user, 1);
    }

    #[tokio::test]
    async fn test_send_file_copies() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src.txt");
        std::fs::write(&source, "x").unwrap();
        let responder = ConsoleResponder::new(dir.path().join("out"));
        responder.send_file(UserId(1), &source, "hasil.txt").await.unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("out/hasil.txt")).unwrap(), "x");
    }
}

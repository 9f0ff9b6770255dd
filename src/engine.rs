//! Event routing and session lifecycle.
//!
//! [`Engine::handle`] takes one [`Event`] at a time. Events of one user are
//! applied in arrival order (the user's session slot is locked for the whole
//! event); events of different users run concurrently.
//!
//! Routing rules:
//!
//! | Event | No session | Collecting | Parameter step |
//! |-------|------------|------------|----------------|
//! | top-level command | gate, then start | discard, gate, start | discard, gate, start |
//! | `/done` | ignored | advance | discard |
//! | unknown `/command` | ignored | ignored | discard |
//! | text, file, choice | ignored | to workflow | to workflow |
//!
//! Whenever a session ends (finished, failed, interrupted or discarded) its
//! uploads are released and its output directory is removed.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::batch::OutputDir;
use crate::config::EngineConfig;
use crate::prompts;
use crate::session::{Session, SessionStore};
use crate::transport::{AuditSink, Event, EventKind, MembershipGate, OpenGate, Responder, Storage, TracingAudit, UserId};
use crate::workflow::{self, Command, Cx, Input, Step};

/// The conversation engine.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use contactpack::config::EngineConfig;
/// use contactpack::engine::Engine;
/// use contactpack::local::LocalStorage;
/// use contactpack::transport::{Event, UserId};
/// # use contactpack::transport::Responder;
/// # async fn run(responder: Arc<dyn Responder>) {
///
/// let config = EngineConfig::new("/tmp/contactpack");
/// let storage = Arc::new(LocalStorage::new(config.work_dir.join("uploads")));
/// let engine = Engine::new(config, responder, storage);
///
/// engine.handle(Event::text(UserId(7), 1, "/count")).await;
/// # }
/// ```
pub struct Engine {
    config: EngineConfig,
    responder: Arc<dyn Responder>,
    storage: Arc<dyn Storage>,
    gate: Arc<dyn MembershipGate>,
    audit: Arc<dyn AuditSink>,
    sessions: SessionStore,
    runs: AtomicU64,
}

impl Engine {
    /// Creates an engine that lets every user in and audits uploads to the log.
    pub fn new(config: EngineConfig, responder: Arc<dyn Responder>, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            responder,
            storage,
            gate: Arc::new(OpenGate),
            audit: Arc::new(TracingAudit),
            sessions: SessionStore::new(),
            runs: AtomicU64::new(0),
        }
    }

    /// Sets the membership gate.
    #[must_use]
    pub fn with_gate(mut self, gate: Arc<dyn MembershipGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Sets the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Command of the active session of `user`, if any.
    pub async fn active(&self, user: UserId) -> Option<Command> {
        self.sessions.active(user).await
    }

    /// Returns true if `user` has an active session.
    pub async fn has_session(&self, user: UserId) -> bool {
        self.active(user).await.is_some()
    }

    /// Applies one event.
    pub async fn handle(&self, event: Event) {
        let user = event.sender;
        let slot = self.sessions.slot(user).await;
        {
            let mut current = slot.lock().await;
            self.dispatch(&mut current, &event).await;
        }
        drop(slot);
        self.sessions.release(user).await;
    }

    async fn dispatch(&self, current: &mut Option<Session>, event: &Event) {
        let user = event.sender;
        match &event.kind {
            EventKind::Text(text) => {
                if let Some(command) = Command::parse(text) {
                    info!(user = %user, "user: /{command}");
                    self.command(current, user, command).await;
                } else if Command::is_command(text) {
                    info!(user = %user, text = %text.trim(), "Unknown command");
                    if current.as_ref().is_some_and(|s| !s.workflow.is_collecting()) {
                        self.end(current, "unknown command").await;
                    }
                } else if current.is_some() {
                    info!(user = %user, "user: {text}");
                    self.drive(current, user, Some(Input::Text(text))).await;
                } else {
                    debug!(user = %user, "Text without a session ignored");
                }
            }
            EventKind::File(file) => {
                if current.is_some() {
                    self.drive(current, user, Some(Input::File(file, event.sequence))).await;
                } else {
                    debug!(user = %user, file = %file.file_name, "Upload without a session ignored");
                }
            }
            EventKind::Choice(data) => {
                if current.is_some() {
                    info!(user = %user, choice = %data, "user: pilih");
                    self.drive(current, user, Some(Input::Choice(data))).await;
                } else {
                    debug!(user = %user, choice = %data, "Choice without a session ignored");
                }
            }
        }
    }

    async fn command(&self, current: &mut Option<Session>, user: UserId, command: Command) {
        if !command.is_top_level() {
            match current.as_ref().map(|s| s.workflow.is_collecting()) {
                Some(true) => self.drive(current, user, Some(Input::Done)).await,
                Some(false) => self.end(current, "/done outside file collection").await,
                None => debug!(user = %user, "/done without a session ignored"),
            }
            return;
        }

        if let Some(active) = current.as_ref().map(Session::command) {
            info!(user = %user, from = %active, to = %command, "Session interrupted");
            self.end(current, "interrupted").await;
        }

        if !self.gate.is_authorized(user).await {
            info!(user = %user, command = %command, "User not authorized");
            self.reply(user, &self.gate.deny(user)).await;
            return;
        }

        if !command.starts_session() {
            let text = match command {
                Command::Start => prompts::welcome("pengguna"),
                _ => prompts::help(),
            };
            self.reply(user, &text).await;
            return;
        }

        let Some(workflow) = workflow::create(command) else {
            return;
        };
        let run = self.runs.fetch_add(1, Ordering::Relaxed);
        let outputs = OutputDir::new(&self.config.work_dir, user, run);
        debug!(user = %user, command = %command, run, "Session started");
        *current = Some(Session::new(workflow, outputs));
        self.drive(current, user, None).await;
    }

    /// Runs the workflow on one input (`None` sends the opening prompt) and
    /// ends the session when it finishes, fails or panics.
    async fn drive(&self, current: &mut Option<Session>, user: UserId, input: Option<Input<'_>>) {
        let Some(session) = current.as_mut() else {
            return;
        };
        let command = session.command();

        let outcome = {
            let Session { workflow, outputs } = session;
            let mut cx = Cx::new(
                user,
                &self.config,
                self.responder.as_ref(),
                self.storage.as_ref(),
                self.audit.as_ref(),
                outputs,
            );
            let step = async {
                match input {
                    None => workflow.enter(&mut cx).await,
                    Some(input) => workflow.handle(&mut cx, input).await,
                }
            };
            AssertUnwindSafe(step).catch_unwind().await
        };

        match outcome {
            Ok(Ok(Step::Continue)) => {}
            Ok(Ok(Step::Finish)) => self.end(current, "finished").await,
            Ok(Err(e)) => {
                if e.is_validation() {
                    warn!(user = %user, command = %command, error = %e, "Workflow stopped on invalid input");
                } else {
                    error!(user = %user, command = %command, error = %e, "Workflow failed");
                }
                self.reply(user, &prompts::failure(command)).await;
                self.end(current, "failed").await;
            }
            Err(_) => {
                error!(user = %user, command = %command, "Workflow panicked");
                self.reply(user, &prompts::failure(command)).await;
                self.end(current, "panicked").await;
            }
        }
    }

    /// Drops the session and releases everything it holds.
    async fn end(&self, current: &mut Option<Session>, reason: &str) {
        let Some(mut session) = current.take() else {
            return;
        };
        let command = session.command();
        let released = match session.workflow.batch_mut() {
            Some(batch) => {
                let count = batch.len();
                let failed = batch.release(self.storage.as_ref()).await;
                count - failed
            }
            None => 0,
        };
        session.outputs.remove().await;
        debug!(command = %command, reason, released, "Session ended");
    }

    async fn reply(&self, user: UserId, text: &str) {
        info!(user = %user, "bot: {text}");
        if let Err(e) = self.responder.reply(user, text).await {
            warn!(user = %user, error = %e, "Failed to send reply");
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::Result;
    use crate::local::LocalStorage;
    use crate::transport::IncomingFile;

    #[derive(Default)]
    struct Recorder {
        texts: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<String> {
            self.texts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Responder for Recorder {
        async fn reply(&self, _user: UserId, text: &str) -> Result<()> {
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn send_file(&self, _user: UserId, _path: &Path, _name: &str) -> Result<()> {
            Ok(())
        }
    }

    struct ClosedGate;

    #[async_trait]
    impl MembershipGate for ClosedGate {
        async fn is_authorized(&self, _user: UserId) -> bool {
            false
        }
    }

    fn engine(dir: &Path) -> (Engine, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let config = EngineConfig::new(dir).with_retry_delay(Duration::ZERO);
        let storage = Arc::new(LocalStorage::new(dir.join("uploads")));
        (Engine::new(config, recorder.clone(), storage), recorder)
    }

    fn upload(dir: &Path, name: &str, content: &str) -> IncomingFile {
        let path: PathBuf = dir.join(name);
        std::fs::write(&path, content).unwrap();
        IncomingFile::from_path(path)
    }

    const ME: UserId = UserId(1);

    #[tokio::test]
    async fn test_help_has_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, recorder) = engine(dir.path());
        engine.handle(Event::text(ME, 1, "/help")).await;
        assert!(recorder.texts()[0].starts_with("Fitur bot:"));
        assert!(!engine.has_session(ME).await);
    }

    #[tokio::test]
    async fn test_interruption_replaces_session() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _) = engine(dir.path());
        engine.handle(Event::text(ME, 1, "/merge")).await;
        engine.handle(Event::file(ME, 2, upload(dir.path(), "a.txt", "0811111111"))).await;
        assert_eq!(engine.active(ME).await, Some(Command::Merge));

        engine.handle(Event::text(ME, 3, "/count")).await;
        assert_eq!(engine.active(ME).await, Some(Command::Count));
        let left = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
        assert_eq!(left, 0);
    }

    #[tokio::test]
    async fn test_done_in_parameter_step_discards() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _) = engine(dir.path());
        engine.handle(Event::text(ME, 1, "/manual")).await;
        engine.handle(Event::text(ME, 2, "/done")).await;
        assert!(!engine.has_session(ME).await);
    }

    #[tokio::test]
    async fn test_unknown_command_while_collecting_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, recorder) = engine(dir.path());
        engine.handle(Event::text(ME, 1, "/count")).await;
        engine.handle(Event::text(ME, 2, "/whatever")).await;
        assert_eq!(engine.active(ME).await, Some(Command::Count));
        assert_eq!(recorder.texts().len(), 1);

        engine.handle(Event::text(ME, 3, "/manual")).await;
        engine.handle(Event::text(ME, 4, "/whatever")).await;
        assert!(!engine.has_session(ME).await);
    }

    #[tokio::test]
    async fn test_gate_denies_start() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, recorder) = engine(dir.path());
        let engine = engine.with_gate(Arc::new(ClosedGate));
        engine.handle(Event::text(ME, 1, "/to_vcf")).await;
        assert!(!engine.has_session(ME).await);
        assert!(recorder.texts()[0].starts_with("🚫"));
    }

    #[tokio::test]
    async fn test_count_finishes_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, recorder) = engine(dir.path());
        engine.handle(Event::text(ME, 1, "/count")).await;
        engine
            .handle(Event::file(ME, 2, upload(dir.path(), "a.txt", "0811111111\n0822222222")))
            .await;
        engine.handle(Event::text(ME, 3, "/done")).await;

        assert!(!engine.has_session(ME).await);
        let report = recorder.texts().last().cloned().unwrap();
        assert!(report.contains("a.txt: 2 kontak"));
        assert!(report.contains("Total semua file: 2 kontak"));
        assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
    }
}

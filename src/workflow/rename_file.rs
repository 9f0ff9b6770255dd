//! `/renamefile`: send uploads back under new names.
//!
//! Two modes, picked with an inline button before any upload:
//!
//! - **auto**: one base name, numbered per file (see [`auto_file_names`]);
//! - **manual**: one name per file, asked in upload order.
//!
//! Each file keeps its own extension and content.

use async_trait::async_trait;

use super::collect::{Accept, Collector};
use super::{Command, Cx, Input, Step, Workflow};
use crate::batch::UploadBatch;
use crate::error::Result;
use crate::format::split_file_name;
use crate::naming::{UniqueNames, auto_file_names};
use crate::prompts;
use crate::transport::Choice;

const AUTO: &str = "renamefile_auto";
const MANUAL: &str = "renamefile_manual";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Auto,
    Manual,
}

#[derive(Debug)]
enum State {
    ChooseMode,
    Collecting(Mode),
    BaseName,
    ManualNames { names: Vec<String>, used: UniqueNames },
}

#[derive(Debug)]
pub struct RenameFile {
    files: Collector,
    state: State,
}

impl RenameFile {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::RenameFile, Accept::Any),
            state: State::ChooseMode,
        }
    }

    /// Original-case extensions, in batch order.
    fn extensions(&self) -> Vec<&str> {
        self.files
            .batch
            .iter()
            .map(|upload| split_file_name(&upload.file_name).1)
            .collect()
    }

    async fn send_renamed(&self, cx: &mut Cx<'_>, names: &[String]) -> Result<()> {
        for (upload, name) in self.files.batch.iter().zip(names) {
            let bytes = cx.read(upload).await?;
            cx.send_output(name, &bytes).await?;
        }
        cx.reply(prompts::FILES_SENT_SHORT).await;
        Ok(())
    }
}

impl Default for RenameFile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for RenameFile {
    fn command(&self) -> Command {
        Command::RenameFile
    }

    fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting(_))
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        let choices = [Choice::new("🔄 Otomatis", AUTO), Choice::new("✏️ Manual", MANUAL)];
        cx.reply_with_choices(prompts::RENAME_FILE_START, &choices).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match (&mut self.state, input) {
            (State::ChooseMode, Input::Choice(data)) => {
                let mode = match data {
                    AUTO => Mode::Auto,
                    MANUAL => Mode::Manual,
                    _ => return Ok(Step::Continue),
                };
                cx.reply(prompts::RENAME_FILE_SEND_FILES).await;
                self.state = State::Collecting(mode);
            }
            (State::Collecting(_), Input::File(file, sequence)) => {
                self.files.collect(cx, file, sequence).await;
            }
            (State::Collecting(mode), Input::Done) => {
                let mode = *mode;
                if !self.files.finish(cx, 1).await {
                    return Ok(Step::Continue);
                }
                match mode {
                    Mode::Auto => {
                        cx.reply(prompts::RENAME_FILE_ASK_BASE).await;
                        self.state = State::BaseName;
                    }
                    Mode::Manual => {
                        if let Some(first) = self.files.batch.uploads().first() {
                            cx.reply(&prompts::ask_new_file_name(&first.file_name)).await;
                        }
                        self.state = State::ManualNames {
                            names: Vec::new(),
                            used: UniqueNames::new(),
                        };
                    }
                }
            }
            (State::BaseName, Input::Text(text)) => {
                let base = text.trim();
                if base.is_empty() {
                    cx.reply(prompts::EMPTY_NEW_FILE_NAME).await;
                    return Ok(Step::Continue);
                }
                let names = auto_file_names(base, &self.extensions());
                self.send_renamed(cx, &names).await?;
                return Ok(Step::Finish);
            }
            (State::ManualNames { names, used }, Input::Text(text)) => {
                let name = text.trim();
                if name.is_empty() {
                    cx.reply(prompts::EMPTY_NEW_FILE_NAME).await;
                    return Ok(Step::Continue);
                }

                let uploads = self.files.batch.uploads();
                let Some(current) = uploads.get(names.len()) else {
                    return Ok(Step::Continue);
                };
                let ext = split_file_name(&current.file_name).1;
                names.push(used.claim(&format!("{name}{ext}")));

                if let Some(next) = uploads.get(names.len()) {
                    cx.reply(&prompts::ask_new_file_name(&next.file_name)).await;
                    return Ok(Step::Continue);
                }

                let names = std::mem::take(names);
                self.send_renamed(cx, &names).await?;
                return Ok(Step::Finish);
            }
            _ => {}
        }
        Ok(Step::Continue)
    }
}

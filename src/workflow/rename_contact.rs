//! `/renamectc`: replace a contact name inside vCard files.

use async_trait::async_trait;

use super::collect::{Accept, Collector};
use super::{Command, Cx, Input, Step, Workflow};
use crate::batch::UploadBatch;
use crate::error::Result;
use crate::prompts;
use crate::transform::{contains_name, replace_contact_name};

const EXTENSIONS: &[&str] = &[".vcf"];

#[derive(Debug)]
enum State {
    Collecting,
    OldName,
    NewName { old: String, contents: Vec<String> },
}

#[derive(Debug)]
pub struct RenameContact {
    files: Collector,
    state: State,
}

impl RenameContact {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::RenameContact, Accept::Extensions(EXTENSIONS)),
            state: State::Collecting,
        }
    }

    async fn contents(&self, cx: &Cx<'_>) -> Result<Vec<String>> {
        let mut contents = Vec::with_capacity(self.files.batch.len());
        for upload in &self.files.batch {
            contents.push(cx.read_text(upload).await?);
        }
        Ok(contents)
    }
}

impl Default for RenameContact {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for RenameContact {
    fn command(&self) -> Command {
        Command::RenameContact
    }

    fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting)
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::RENAME_CONTACT_START).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match (&self.state, input) {
            (State::Collecting, Input::File(file, sequence)) => {
                self.files.collect(cx, file, sequence).await;
            }
            (State::Collecting, Input::Done) => {
                if self.files.finish(cx, 1).await {
                    cx.reply(prompts::RENAME_CONTACT_ASK_OLD).await;
                    self.state = State::OldName;
                }
            }
            (State::OldName, Input::Text(text)) => {
                let old = text.trim();
                if old.is_empty() {
                    cx.reply(prompts::RENAME_CONTACT_EMPTY_OLD).await;
                    return Ok(Step::Continue);
                }
                let contents = self.contents(cx).await?;
                if !contains_name(&contents, old) {
                    cx.reply(prompts::RENAME_CONTACT_NOT_FOUND).await;
                    return Ok(Step::Finish);
                }
                cx.reply(prompts::RENAME_CONTACT_ASK_NEW).await;
                self.state = State::NewName {
                    old: old.to_string(),
                    contents,
                };
            }
            (State::NewName { old, contents }, Input::Text(text)) => {
                let new = text.trim();
                if new.is_empty() {
                    cx.reply(prompts::RENAME_CONTACT_EMPTY_NEW).await;
                    return Ok(Step::Continue);
                }
                for (upload, content) in self.files.batch.iter().zip(contents) {
                    // Files without the old name go back unchanged.
                    let out = replace_contact_name(content, old, new).unwrap_or_else(|| content.clone());
                    cx.send_output(&upload.file_name, out.as_bytes()).await?;
                }
                cx.reply(prompts::FILES_SENT_SHORT).await;
                return Ok(Step::Finish);
            }
            _ => {}
        }
        Ok(Step::Continue)
    }
}

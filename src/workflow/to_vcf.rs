//! `/to_vcf`: number lists to vCard files.

use async_trait::async_trait;

use super::collect::{Accept, Collector};
use super::{Command, Cx, Input, Step, Workflow};
use crate::batch::UploadBatch;
use crate::codec::{self, vcard};
use crate::error::Result;
use crate::number;
use crate::prompts;
use crate::transform::{SplitChoice, plan_vcf};

const EXTENSIONS: &[&str] = &[".txt", ".xlsx", ".xls"];

#[derive(Debug)]
enum State {
    Collecting,
    ContactName,
    FileName { contact: String },
    SplitChoice { contact: String, file: String },
}

/// Converts uploaded number lists into named vCard contacts.
#[derive(Debug)]
pub struct ToVcf {
    files: Collector,
    state: State,
}

impl ToVcf {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::ToVcf, Accept::Extensions(EXTENSIONS)),
            state: State::Collecting,
        }
    }

    async fn convert(&self, cx: &mut Cx<'_>, contact: &str, file: &str, choice: SplitChoice) -> Result<()> {
        let mut inputs = Vec::with_capacity(self.files.batch.len());
        for upload in &self.files.batch {
            let bytes = cx.read(upload).await?;
            let numbers = codec::decode_numbers(upload.format()?, &bytes)?;
            tracing::debug!(user = %cx.user, file = %upload.file_name, numbers = numbers.len(), "Numbers extracted");
            inputs.push(number::unique(numbers));
        }

        let plan = plan_vcf(&inputs, file, contact, choice);

        for (idx, upload) in self.files.batch.iter().enumerate() {
            if plan.empty_sources.contains(&idx) {
                cx.reply(&prompts::no_numbers_in(&upload.file_name)).await;
                continue;
            }
            for output in plan.outputs.iter().filter(|o| o.source == idx) {
                let content = vcard::encode(&output.records);
                cx.send_output(&output.file_name, content.as_bytes()).await?;
            }
        }

        cx.reply(prompts::FILES_SENT).await;
        Ok(())
    }
}

impl Default for ToVcf {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for ToVcf {
    fn command(&self) -> Command {
        Command::ToVcf
    }

    fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting)
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::TO_VCF_START).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match (&self.state, input) {
            (State::Collecting, Input::File(file, sequence)) => {
                self.files.collect(cx, file, sequence).await;
            }
            (State::Collecting, Input::Done) => {
                if self.files.finish(cx, 1).await {
                    cx.reply(prompts::ASK_CONTACT_NAME).await;
                    self.state = State::ContactName;
                }
            }
            (State::ContactName, Input::Text(text)) => {
                let contact = text.trim();
                if contact.is_empty() {
                    cx.reply(prompts::EMPTY_CONTACT_NAME).await;
                } else {
                    cx.reply(prompts::ASK_FILE_NAME).await;
                    self.state = State::FileName {
                        contact: contact.to_string(),
                    };
                }
            }
            (State::FileName { contact }, Input::Text(text)) => {
                let file = text.trim();
                if file.is_empty() {
                    cx.reply(prompts::EMPTY_FILE_NAME).await;
                } else {
                    cx.reply(prompts::ASK_SPLIT_CHOICE).await;
                    self.state = State::SplitChoice {
                        contact: contact.clone(),
                        file: file.to_string(),
                    };
                }
            }
            (State::SplitChoice { contact, file }, Input::Text(text)) => match SplitChoice::parse(text) {
                Some(choice) => {
                    self.convert(cx, contact, file, choice).await?;
                    return Ok(Step::Finish);
                }
                None => cx.reply(prompts::INVALID_SPLIT_CHOICE).await,
            },
            _ => {}
        }
        Ok(Step::Continue)
    }
}

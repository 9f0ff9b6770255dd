//! `/add`: put new numbers in front of every uploaded file.

use async_trait::async_trait;

use super::collect::{Accept, CONTACT_EXTENSIONS, Collector};
use super::{Command, Cx, Input, Step, Workflow, output_name, typed_numbers};
use crate::batch::{Upload, UploadBatch};
use crate::codec::{self, vcard};
use crate::error::Result;
use crate::format::FileFormat;
use crate::number::PhoneNumber;
use crate::prompts;
use crate::transform::{add_contacts, add_numbers};

#[derive(Debug)]
enum State {
    Collecting,
    Numbers,
    ContactName { numbers: Vec<PhoneNumber> },
}

#[derive(Debug)]
pub struct Add {
    files: Collector,
    state: State,
}

impl Add {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::Add, Accept::Extensions(CONTACT_EXTENSIONS)),
            state: State::Collecting,
        }
    }

    async fn rewrite(&self, cx: &mut Cx<'_>, upload: &Upload, new: &[PhoneNumber], base: &str) -> Result<()> {
        let format = upload.format()?;
        let bytes = cx.read(upload).await?;

        let out = match format {
            FileFormat::Vcf => {
                let existing = codec::decode_records(format, &bytes)?;
                let records = add_contacts(new, &existing, base, &cx.config.default_contact_name);
                vcard::encode(&records).into_bytes()
            }
            _ => {
                let existing = codec::decode_numbers(format, &bytes)?;
                codec::encode_numbers(format, &add_numbers(new, &existing))?
            }
        };

        cx.send_output(&output_name(upload, format), &out).await?;
        Ok(())
    }

    async fn apply(&self, cx: &mut Cx<'_>, new: &[PhoneNumber], base: &str) -> Result<()> {
        for upload in &self.files.batch {
            self.rewrite(cx, upload, new, base).await?;
        }
        cx.reply(prompts::FILES_SENT).await;
        Ok(())
    }
}

impl Default for Add {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for Add {
    fn command(&self) -> Command {
        Command::Add
    }

    fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting)
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::ADD_START).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match (&self.state, input) {
            (State::Collecting, Input::File(file, sequence)) => {
                self.files.collect(cx, file, sequence).await;
            }
            (State::Collecting, Input::Done) => {
                if self.files.finish(cx, 1).await {
                    cx.reply(prompts::ADD_ASK_NUMBERS).await;
                    self.state = State::Numbers;
                }
            }
            (State::Numbers, Input::Text(text)) => {
                let numbers = typed_numbers(text);
                if numbers.is_empty() {
                    cx.reply(prompts::INVALID_NUMBERS).await;
                } else if self.files.batch.contains_format(FileFormat::Vcf) {
                    cx.reply(prompts::ADD_ASK_CONTACT_NAME).await;
                    self.state = State::ContactName { numbers };
                } else {
                    let base = cx.config.default_contact_name.clone();
                    self.apply(cx, &numbers, &base).await?;
                    return Ok(Step::Finish);
                }
            }
            (State::ContactName { numbers }, Input::Text(text)) => {
                let base = text.trim();
                if base.is_empty() {
                    cx.reply(prompts::EMPTY_CONTACT_NAME).await;
                } else {
                    self.apply(cx, numbers, base).await?;
                    return Ok(Step::Finish);
                }
            }
            _ => {}
        }
        Ok(Step::Continue)
    }
}

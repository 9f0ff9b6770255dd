//! `/delete`: remove numbers from every uploaded file.

use std::collections::HashSet;

use async_trait::async_trait;

use super::collect::{Accept, CONTACT_EXTENSIONS, Collector};
use super::{Command, Cx, Input, Step, Workflow, output_name, typed_numbers};
use crate::batch::UploadBatch;
use crate::codec::{self, vcard};
use crate::error::Result;
use crate::format::FileFormat;
use crate::number::PhoneNumber;
use crate::prompts;
use crate::transform::delete_numbers;

#[derive(Debug)]
enum State {
    Collecting,
    Numbers,
}

#[derive(Debug)]
pub struct Delete {
    files: Collector,
    state: State,
}

impl Delete {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::Delete, Accept::Extensions(CONTACT_EXTENSIONS)),
            state: State::Collecting,
        }
    }

    async fn apply(&self, cx: &mut Cx<'_>, remove: &HashSet<PhoneNumber>) -> Result<()> {
        for upload in &self.files.batch {
            let format = upload.format()?;
            let bytes = cx.read(upload).await?;
            let out = match format {
                // Card structure stays; only matching TEL lines go.
                FileFormat::Vcf => vcard::remove_numbers(&codec::decode_text(bytes)?, remove).into_bytes(),
                _ => {
                    let numbers = codec::decode_numbers(format, &bytes)?;
                    codec::encode_numbers(format, &delete_numbers(&numbers, remove))?
                }
            };
            cx.send_output(&output_name(upload, format), &out).await?;
        }
        cx.reply(prompts::FILES_SENT).await;
        Ok(())
    }
}

impl Default for Delete {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for Delete {
    fn command(&self) -> Command {
        Command::Delete
    }

    fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting)
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::DELETE_START).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match (&self.state, input) {
            (State::Collecting, Input::File(file, sequence)) => {
                self.files.collect(cx, file, sequence).await;
            }
            (State::Collecting, Input::Done) => {
                if self.files.finish(cx, 1).await {
                    cx.reply(prompts::DELETE_ASK_NUMBERS).await;
                    self.state = State::Numbers;
                }
            }
            (State::Numbers, Input::Text(text)) => {
                let remove: HashSet<PhoneNumber> = typed_numbers(text).into_iter().collect();
                if remove.is_empty() {
                    cx.reply(prompts::DELETE_INVALID_NUMBERS).await;
                } else {
                    self.apply(cx, &remove).await?;
                    return Ok(Step::Finish);
                }
            }
            _ => {}
        }
        Ok(Step::Continue)
    }
}

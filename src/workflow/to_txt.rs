//! `/to_txt`: every upload to a plain number list.

use async_trait::async_trait;

use super::collect::{Accept, Collector};
use super::{Command, Cx, Input, Step, Workflow};
use crate::batch::UploadBatch;
use crate::codec::{self, text};
use crate::error::Result;
use crate::naming::UniqueNames;
use crate::prompts;

const EXTENSIONS: &[&str] = &[".csv", ".vcf", ".xlsx", ".xls"];

#[derive(Debug)]
pub struct ToTxt {
    files: Collector,
}

impl ToTxt {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::ToTxt, Accept::Extensions(EXTENSIONS)),
        }
    }

    async fn convert(&self, cx: &mut Cx<'_>) -> Result<()> {
        let mut names = UniqueNames::new();
        for upload in &self.files.batch {
            let bytes = cx.read(upload).await?;
            let numbers = codec::decode_numbers(upload.format()?, &bytes)?;
            if numbers.is_empty() {
                cx.reply(&prompts::no_numbers_in(&upload.file_name)).await;
                continue;
            }
            let name = names.claim(&format!("{}.txt", upload.stem()));
            cx.send_output(&name, text::to_text(&numbers).as_bytes()).await?;
        }
        cx.reply(prompts::FILES_SENT).await;
        Ok(())
    }
}

impl Default for ToTxt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for ToTxt {
    fn command(&self) -> Command {
        Command::ToTxt
    }

    fn is_collecting(&self) -> bool {
        true
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::TO_TXT_START).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match input {
            Input::File(file, sequence) => self.files.collect(cx, file, sequence).await,
            Input::Done => {
                if self.files.finish(cx, 1).await {
                    self.convert(cx).await?;
                    return Ok(Step::Finish);
                }
            }
            Input::Text(_) | Input::Choice(_) => {}
        }
        Ok(Step::Continue)
    }
}

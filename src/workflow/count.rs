//! `/count`: report how many contacts each file holds.

use async_trait::async_trait;

use super::collect::{Accept, CONTACT_EXTENSIONS, Collector};
use super::{Command, Cx, Input, Step, Workflow};
use crate::batch::UploadBatch;
use crate::codec;
use crate::error::Result;
use crate::prompts;
use crate::transform::CountReport;

#[derive(Debug)]
pub struct Count {
    files: Collector,
}

impl Count {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::Count, Accept::Extensions(CONTACT_EXTENSIONS)),
        }
    }

    async fn count(&self, cx: &Cx<'_>) -> Result<CountReport> {
        let mut report = CountReport::new();
        for upload in &self.files.batch {
            let bytes = cx.read(upload).await?;
            let numbers = codec::decode_all_numbers(upload.format()?, &bytes)?;
            report.push(upload.file_name.clone(), numbers.len());
        }
        Ok(report)
    }
}

impl Default for Count {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for Count {
    fn command(&self) -> Command {
        Command::Count
    }

    fn is_collecting(&self) -> bool {
        true
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::COUNT_START).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match input {
            Input::File(file, sequence) => self.files.collect(cx, file, sequence).await,
            Input::Done => {
                if self.files.finish(cx, 1).await {
                    let report = self.count(cx).await?;
                    tracing::debug!(user = %cx.user, total = report.total(), "Contacts counted");
                    cx.reply(&prompts::count_report(&report.files, report.total())).await;
                    return Ok(Step::Finish);
                }
            }
            Input::Text(_) | Input::Choice(_) => {}
        }
        Ok(Step::Continue)
    }
}

//! `/merge`: concatenate two or more files of one format.

use async_trait::async_trait;

use super::collect::{Accept, CONTACT_EXTENSIONS, Collector};
use super::{Command, Cx, Input, Step, Workflow};
use crate::batch::UploadBatch;
use crate::codec;
use crate::error::{ContactpackError, Result};
use crate::format::FileFormat;
use crate::prompts;
use crate::transform::{merge_lines, merge_tables, merge_vcards};

#[derive(Debug)]
enum State {
    Collecting,
    FileName,
}

#[derive(Debug)]
pub struct Merge {
    files: Collector,
    state: State,
}

impl Merge {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::Merge, Accept::Extensions(CONTACT_EXTENSIONS))
                .same_format()
                .confirm_at(2),
            state: State::Collecting,
        }
    }

    async fn merge(&self, cx: &mut Cx<'_>, name: &str) -> Result<()> {
        let first = self
            .files
            .batch
            .uploads()
            .first()
            .ok_or_else(|| ContactpackError::batch("merge batch is empty"))?;
        let format = first.format()?;

        let mut contents = Vec::with_capacity(self.files.batch.len());
        for upload in &self.files.batch {
            if upload.format()? != format {
                return Err(ContactpackError::batch(format!(
                    "{} does not match the {format} batch",
                    upload.file_name
                )));
            }
            contents.push(cx.read(upload).await?);
        }

        let (bytes, ext) = match format {
            FileFormat::Xlsx => {
                let tables = contents
                    .iter()
                    .map(|b| codec::decode_table(b))
                    .collect::<Result<Vec<_>>>()?;
                let merged = merge_tables(&tables);
                tracing::debug!(user = %cx.user, rows = merged.len(), "Sheets merged");
                (codec::encode_table(&merged)?, ".xlsx".to_string())
            }
            FileFormat::Vcf | FileFormat::Txt | FileFormat::Csv => {
                let texts = contents
                    .into_iter()
                    .map(codec::decode_text)
                    .collect::<Result<Vec<_>>>()?;
                let merged = if format == FileFormat::Vcf {
                    merge_vcards(&texts)
                } else {
                    merge_lines(&texts)
                };
                (merged.into_bytes(), first.extension())
            }
        };

        cx.send_output(&format!("{name}{ext}"), &bytes).await?;
        cx.reply(prompts::MERGE_SENT).await;
        Ok(())
    }
}

impl Default for Merge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for Merge {
    fn command(&self) -> Command {
        Command::Merge
    }

    fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting)
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::MERGE_START).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match (&self.state, input) {
            (State::Collecting, Input::File(file, sequence)) => {
                self.files.collect(cx, file, sequence).await;
            }
            (State::Collecting, Input::Done) => {
                if self.files.finish(cx, 2).await {
                    cx.reply(prompts::MERGE_ASK_NAME).await;
                    self.state = State::FileName;
                }
            }
            (State::FileName, Input::Text(text)) => {
                let name = text.trim();
                if name.is_empty() {
                    cx.reply(prompts::MERGE_EMPTY_NAME).await;
                } else {
                    self.merge(cx, name).await?;
                    return Ok(Step::Finish);
                }
            }
            _ => {}
        }
        Ok(Step::Continue)
    }
}

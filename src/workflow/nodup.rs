//! `/nodup`: drop repeated numbers from every file.

use async_trait::async_trait;

use super::collect::{Accept, CONTACT_EXTENSIONS, Collector};
use super::{Command, Cx, Input, Step, Workflow, output_name};
use crate::batch::{Upload, UploadBatch};
use crate::codec::{self, vcard};
use crate::error::Result;
use crate::format::FileFormat;
use crate::prompts;
use crate::transform::{dedupe_cards, dedupe_numbers};

#[derive(Debug)]
pub struct Nodup {
    files: Collector,
}

impl Nodup {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::Nodup, Accept::Extensions(CONTACT_EXTENSIONS)),
        }
    }

    /// Writes the deduplicated copy of one upload and returns how many
    /// entries were dropped.
    async fn dedupe(&self, cx: &mut Cx<'_>, upload: &Upload) -> Result<usize> {
        let format = upload.format()?;
        let bytes = cx.read(upload).await?;

        let (out, removed) = match format {
            FileFormat::Vcf => {
                let outcome = dedupe_cards(vcard::parse_cards(&codec::decode_text(bytes)?));
                let raws: Vec<&str> = outcome.kept.iter().map(|c| c.raw.as_str()).collect();
                (vcard::join_cards(&raws).into_bytes(), outcome.removed)
            }
            _ => {
                let outcome = dedupe_numbers(codec::decode_all_numbers(format, &bytes)?);
                (codec::encode_numbers(format, &outcome.kept)?, outcome.removed)
            }
        };

        cx.send_output(&output_name(upload, format), &out).await?;
        Ok(removed)
    }
}

impl Default for Nodup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for Nodup {
    fn command(&self) -> Command {
        Command::Nodup
    }

    fn is_collecting(&self) -> bool {
        true
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::NODUP_START).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match input {
            Input::File(file, sequence) => self.files.collect(cx, file, sequence).await,
            Input::Done => {
                if !self.files.finish(cx, 1).await {
                    return Ok(Step::Continue);
                }

                let mut lines = Vec::new();
                let mut total = 0;
                for upload in &self.files.batch {
                    let removed = self.dedupe(cx, upload).await?;
                    if removed > 0 {
                        lines.push(prompts::duplicates_in(&upload.file_name, removed));
                        total += removed;
                    }
                }

                if total == 0 {
                    cx.reply(prompts::NODUP_NONE).await;
                } else {
                    lines.push(prompts::duplicates_removed(total));
                    cx.reply(&lines.join("\n")).await;
                }
                return Ok(Step::Finish);
            }
            Input::Text(_) | Input::Choice(_) => {}
        }
        Ok(Step::Continue)
    }
}

//! `/split`: cut every upload into consecutive parts.

use async_trait::async_trait;

use super::collect::{Accept, CONTACT_EXTENSIONS, Collector};
use super::{Command, Cx, Input, Step, Workflow, output_name};
use crate::batch::{Upload, UploadBatch};
use crate::codec::sheet::SheetTable;
use crate::codec::{self, text, vcard};
use crate::error::Result;
use crate::format::{FileFormat, split_file_name};
use crate::prompts;
use crate::transform::{SplitMode, partition_sizes, split_items};
use crate::transport::Choice;

const BY_FILE_COUNT: &str = "split_file";
const BY_CONTACTS: &str = "split_kontak";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    FileCount,
    PerFile,
}

impl Mode {
    fn with(self, count: usize) -> SplitMode {
        match self {
            Mode::FileCount => SplitMode::FileCount(count),
            Mode::PerFile => SplitMode::PerFile(count),
        }
    }
}

#[derive(Debug)]
enum State {
    ChooseMode,
    Collecting(Mode),
    Count(Mode),
}

/// Split units of one file.
enum Items {
    Cards(Vec<String>),
    Lines(Vec<String>),
    Rows(SheetTable),
}

impl Items {
    fn len(&self) -> usize {
        match self {
            Items::Cards(cards) => cards.len(),
            Items::Lines(lines) => lines.len(),
            Items::Rows(table) => table.len(),
        }
    }

    /// What the user calls one unit, for the "too few" notice.
    fn noun(&self) -> &'static str {
        match self {
            Items::Cards(_) => "Kontak",
            Items::Lines(_) => "Baris",
            Items::Rows(_) => "Data",
        }
    }

    fn parts(&self, mode: SplitMode) -> Result<Vec<Vec<u8>>> {
        let parts: Vec<Vec<u8>> = match self {
            Items::Cards(cards) => split_items(cards, mode)
                .unwrap_or_default()
                .into_iter()
                .map(|part| vcard::join_cards(&part).into_bytes())
                .collect(),
            Items::Lines(lines) => split_items(lines, mode)
                .unwrap_or_default()
                .into_iter()
                .map(|part| text::join_lines(&part).into_bytes())
                .collect(),
            Items::Rows(table) => split_items(&table.rows, mode)
                .unwrap_or_default()
                .into_iter()
                .map(|rows| codec::encode_table(&table.with_rows(rows)))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(parts)
    }
}

#[derive(Debug)]
pub struct Split {
    files: Collector,
    state: State,
}

impl Split {
    pub fn new() -> Self {
        Self {
            files: Collector::new(Command::Split, Accept::Extensions(CONTACT_EXTENSIONS)),
            state: State::ChooseMode,
        }
    }

    async fn load(&self, cx: &Cx<'_>, upload: &Upload) -> Result<Items> {
        let bytes = cx.read(upload).await?;
        let items = match upload.format()? {
            FileFormat::Vcf => Items::Cards(vcard::split_cards(&codec::decode_text(bytes)?)),
            FileFormat::Txt | FileFormat::Csv => {
                let content = codec::decode_text(bytes)?;
                Items::Lines(
                    text::lines(&content)
                        .into_iter()
                        .filter(|line| !line.trim().is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            }
            FileFormat::Xlsx => Items::Rows(codec::decode_table(&bytes)?),
        };
        Ok(items)
    }

    /// Splits every file. Returns false (after a notice) when a file-count
    /// split asks for more parts than some file has units; nothing is sent then.
    async fn split(&self, cx: &mut Cx<'_>, mode: SplitMode) -> Result<bool> {
        let mut loaded = Vec::with_capacity(self.files.batch.len());
        for upload in &self.files.batch {
            loaded.push(self.load(cx, upload).await?);
        }

        if let SplitMode::FileCount(count) = mode {
            if let Some(short) = loaded.iter().find(|items| partition_sizes(items.len(), mode).is_none()) {
                cx.reply(&prompts::split_too_few(short.noun(), short.len(), count)).await;
                return Ok(false);
            }
        }

        for (upload, items) in self.files.batch.iter().zip(&loaded) {
            let format = upload.format()?;
            let name = output_name(upload, format);
            let (stem, ext) = split_file_name(&name);
            let parts = items.parts(mode)?;
            tracing::debug!(user = %cx.user, file = %upload.file_name, parts = parts.len(), "File split");
            for (i, bytes) in parts.iter().enumerate() {
                cx.send_output(&format!("{stem}_{}{ext}", i + 1), bytes).await?;
            }
        }

        cx.reply(prompts::SPLIT_SENT).await;
        Ok(true)
    }
}

impl Default for Split {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for Split {
    fn command(&self) -> Command {
        Command::Split
    }

    fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting(_))
    }

    fn batch_mut(&mut self) -> Option<&mut UploadBatch> {
        Some(&mut self.files.batch)
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        let choices = [
            Choice::new("🔢 Per File", BY_FILE_COUNT),
            Choice::new("📦 Per Kontak", BY_CONTACTS),
        ];
        cx.reply_with_choices(prompts::SPLIT_START, &choices).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        match (&self.state, input) {
            (State::ChooseMode, Input::Choice(data)) => {
                let mode = match data {
                    BY_FILE_COUNT => Mode::FileCount,
                    BY_CONTACTS => Mode::PerFile,
                    _ => return Ok(Step::Continue),
                };
                cx.reply(prompts::SPLIT_SEND_FILES).await;
                self.state = State::Collecting(mode);
            }
            (State::Collecting(_), Input::File(file, sequence)) => {
                self.files.collect(cx, file, sequence).await;
            }
            (State::Collecting(mode), Input::Done) => {
                let mode = *mode;
                if self.files.finish(cx, 1).await {
                    let ask = match mode {
                        Mode::FileCount => prompts::SPLIT_ASK_FILE_COUNT,
                        Mode::PerFile => prompts::SPLIT_ASK_PER_FILE,
                    };
                    cx.reply(ask).await;
                    self.state = State::Count(mode);
                }
            }
            (State::Count(mode), Input::Text(text)) => match text.trim().parse::<usize>() {
                Ok(count) if count > 0 => {
                    if self.split(cx, mode.with(count)).await? {
                        return Ok(Step::Finish);
                    }
                }
                _ => cx.reply(prompts::SPLIT_INVALID_COUNT).await,
            },
            _ => {}
        }
        Ok(Step::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_parts() {
        let items = Items::Lines(vec!["a".into(), "b".into(), "c".into()]);
        let parts = items.parts(SplitMode::PerFile(2)).unwrap();
        assert_eq!(parts, vec![b"a\nb".to_vec(), b"c".to_vec()]);
        assert_eq!(items.noun(), "Baris");
    }

    #[test]
    fn test_card_parts_even() {
        let items = Items::Cards(vec!["c1".into(), "c2".into(), "c3".into(), "c4".into(), "c5".into()]);
        let parts = items.parts(SplitMode::FileCount(2)).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], b"c1\nc2\nc3".to_vec());
    }
}

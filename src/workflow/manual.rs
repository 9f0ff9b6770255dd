//! `/manual`: typed numbers to one vCard file.

use async_trait::async_trait;

use super::{Command, Cx, Input, Step, Workflow, typed_numbers};
use crate::codec::vcard;
use crate::error::Result;
use crate::naming::{contact_names, ensure_extension};
use crate::number::PhoneNumber;
use crate::prompts;

#[derive(Debug)]
enum State {
    Numbers,
    ContactName {
        numbers: Vec<PhoneNumber>,
    },
    FileName {
        numbers: Vec<PhoneNumber>,
        contact: String,
    },
}

/// Builds a vCard from numbers typed into the chat. No uploads involved.
#[derive(Debug)]
pub struct Manual {
    state: State,
}

impl Manual {
    pub fn new() -> Self {
        Self { state: State::Numbers }
    }
}

impl Default for Manual {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Workflow for Manual {
    fn command(&self) -> Command {
        Command::Manual
    }

    fn is_collecting(&self) -> bool {
        false
    }

    async fn enter(&mut self, cx: &mut Cx<'_>) -> Result<Step> {
        cx.reply(prompts::MANUAL_ASK_NUMBERS).await;
        Ok(Step::Continue)
    }

    async fn handle(&mut self, cx: &mut Cx<'_>, input: Input<'_>) -> Result<Step> {
        let Input::Text(text) = input else {
            return Ok(Step::Continue);
        };

        match &mut self.state {
            State::Numbers => {
                let numbers = typed_numbers(text);
                if numbers.is_empty() {
                    cx.reply(prompts::INVALID_NUMBERS).await;
                } else {
                    cx.reply(prompts::MANUAL_ASK_CONTACT_NAME).await;
                    self.state = State::ContactName { numbers };
                }
            }
            State::ContactName { numbers } => {
                let contact = text.trim();
                if contact.is_empty() {
                    cx.reply(prompts::EMPTY_CONTACT_NAME).await;
                } else {
                    cx.reply(prompts::MANUAL_ASK_FILE_NAME).await;
                    self.state = State::FileName {
                        numbers: std::mem::take(numbers),
                        contact: contact.to_string(),
                    };
                }
            }
            State::FileName { numbers, contact } => {
                let file = text.trim();
                if file.is_empty() {
                    cx.reply(prompts::EMPTY_FILE_NAME).await;
                    return Ok(Step::Continue);
                }
                let names = contact_names(contact, numbers.len(), 0, 1);
                let content = vcard::encode_named(&names, numbers);
                cx.send_output(&ensure_extension(file, ".vcf"), content.as_bytes()).await?;
                cx.reply(prompts::MANUAL_SENT).await;
                return Ok(Step::Finish);
            }
        }
        Ok(Step::Continue)
    }
}

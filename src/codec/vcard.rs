//! vCard codec.
//!
//! Parsing is deliberately lenient. The document is split on `BEGIN:VCARD`,
//! the empty preamble is dropped, and each block becomes a [`VCard`]. Inside a
//! block, every line starting with `TEL` contributes its last `:`-delimited
//! value as a candidate number and the first `FN:` line gives the display name.
//! A block without a usable `TEL` line yields no record but does not fail the
//! parse.
//!
//! Output cards always use the fixed vCard 3.0 layout:
//!
//! ```text
//! BEGIN:VCARD
//! VERSION:3.0
//! FN:<name>
//! TEL;TYPE=CELL:<number>
//! END:VCARD
//! ```
//!
//! # Example
//!
//! ```rust
//! use contactpack::codec::vcard;
//!
//! let doc = "BEGIN:VCARD\nVERSION:3.0\nFN:Ani\nTEL;TYPE=CELL:0812 3456 789\nEND:VCARD\n";
//! let records = vcard::parse_records(doc);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].name(), Some("Ani"));
//! assert_eq!(records[0].number.as_str(), "+08123456789");
//! ```

use std::collections::HashSet;

use crate::number::{self, PhoneNumber};
use crate::record::Record;

const BEGIN: &str = "BEGIN:VCARD";

/// One `BEGIN:VCARD` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VCard {
    /// The block text, starting with `BEGIN:VCARD`, trimmed.
    pub raw: String,

    /// Value of the first `FN:` line.
    pub name: Option<String>,

    /// Raw values of every `TEL` line, in order.
    pub tel_values: Vec<String>,
}

impl VCard {
    fn parse(block: &str) -> Self {
        let raw = format!("{BEGIN}\n{block}");
        let mut name = None;
        let mut tel_values = Vec::new();

        for line in block.lines() {
            let line = line.trim();
            if let Some(value) = tel_value(line) {
                tel_values.push(value.to_string());
            } else if name.is_none() {
                if let Some(fn_value) = line.strip_prefix("FN:") {
                    name = Some(fn_value.trim().to_string());
                }
            }
        }

        Self {
            raw,
            name,
            tel_values,
        }
    }

    /// Returns the first `TEL` value that normalizes successfully.
    pub fn number(&self) -> Option<PhoneNumber> {
        self.tel_values.iter().find_map(|v| number::normalize(v))
    }

    /// Returns every `TEL` value that normalizes successfully.
    pub fn numbers(&self) -> Vec<PhoneNumber> {
        number::extract_valid(&self.tel_values)
    }

    /// Converts the card into a record using its first valid number.
    pub fn to_record(&self) -> Option<Record> {
        self.number().map(|number| Record {
            number,
            name: self.name.clone(),
        })
    }
}

/// Returns the `:`-delimited tail of a `TEL` line.
fn tel_value(line: &str) -> Option<&str> {
    if !line.starts_with("TEL") {
        return None;
    }
    line.rsplit(':').next().map(str::trim)
}

/// Splits a document into cards. The text before the first `BEGIN:VCARD` and
/// blank blocks are discarded.
pub fn parse_cards(content: &str) -> Vec<VCard> {
    content
        .split(BEGIN)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(VCard::parse)
        .collect()
}

/// Returns the raw text of every card, each starting with `BEGIN:VCARD`.
pub fn split_cards(content: &str) -> Vec<String> {
    parse_cards(content).into_iter().map(|card| card.raw).collect()
}

/// Parses one record per card, using the first valid `TEL` of each card.
pub fn parse_records(content: &str) -> Vec<Record> {
    parse_cards(content).iter().filter_map(VCard::to_record).collect()
}

/// Extracts every valid `TEL` value in the document, across all cards.
///
/// A card with two phone lines contributes two numbers.
pub fn extract_numbers(content: &str) -> Vec<PhoneNumber> {
    parse_cards(content).iter().flat_map(VCard::numbers).collect()
}

/// Formats a single card.
pub fn card(name: &str, number: &PhoneNumber) -> String {
    format!("{BEGIN}\nVERSION:3.0\nFN:{name}\nTEL;TYPE=CELL:{number}\nEND:VCARD")
}

/// Serializes records as cards joined with `\n`. Unnamed records get an empty `FN`.
pub fn encode(records: &[Record]) -> String {
    let cards: Vec<String> = records
        .iter()
        .map(|r| card(r.name_or(""), &r.number))
        .collect();
    cards.join("\n")
}

/// Serializes numbers with the matching names, pairwise.
///
/// Extra entries on either side are dropped.
pub fn encode_named(names: &[String], numbers: &[PhoneNumber]) -> String {
    let cards: Vec<String> = names
        .iter()
        .zip(numbers)
        .map(|(name, number)| card(name, number))
        .collect();
    cards.join("\n")
}

/// Joins raw cards with `\n`.
pub fn join_cards<S: AsRef<str>>(cards: &[S]) -> String {
    super::text::join_lines(cards)
}

/// Removes every `TEL` line whose normalized value is in `numbers`.
///
/// All other lines are kept byte for byte, including their line endings, so
/// card structure (names, notes, `END:VCARD`) survives untouched.
pub fn remove_numbers(content: &str, numbers: &HashSet<PhoneNumber>) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| {
            tel_value(line.trim())
                .and_then(number::normalize)
                .is_none_or(|n| !numbers.contains(&n))
        })
        .collect()
}

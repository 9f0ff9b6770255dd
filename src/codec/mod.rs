//! Format codecs and retried file I/O.
//!
//! Each [`FileFormat`] has a decoder that turns file bytes into normalized
//! numbers and an encoder that writes a number list back in the same format:
//!
//! | Format | Candidates | Output |
//! |--------|------------|--------|
//! | txt | every line | numbers joined with `\n` |
//! | csv | first field of every record | numbers joined with `\n` |
//! | vcf | every `TEL` line | cards (names required, see [`vcard`]) |
//! | xlsx | every cell of every sheet | single "Nomor" column |
//!
//! Reads and writes go through [`with_retry`] with the caller's
//! [`RetryPolicy`], so a transient failure is repeated before it surfaces.
//!
//! # Example
//!
//! ```rust
//! use contactpack::codec;
//! use contactpack::format::FileFormat;
//!
//! let numbers = codec::decode_numbers(FileFormat::Txt, b"0812 3456 7890\nhello\n").unwrap();
//! assert_eq!(numbers.len(), 1);
//! ```

pub mod sheet;
pub mod text;
pub mod vcard;

use std::path::Path;

use crate::config::RetryPolicy;
use crate::error::{ContactpackError, Result};
use crate::format::FileFormat;
use crate::number::PhoneNumber;
use crate::record::Record;
use crate::retry::with_retry;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads a file, retrying transient failures.
pub async fn read_bytes(path: &Path, policy: &RetryPolicy) -> Result<Vec<u8>> {
    with_retry(policy, "read file", || async move {
        tokio::fs::read(path).await.map_err(ContactpackError::from)
    })
    .await
}

/// Writes a file, retrying transient failures.
pub async fn write_bytes(path: &Path, bytes: &[u8], policy: &RetryPolicy) -> Result<()> {
    with_retry(policy, "write file", || async move {
        tokio::fs::write(path, bytes).await.map_err(ContactpackError::from)
    })
    .await
}

/// Converts raw bytes to text, dropping a UTF-8 byte-order mark.
pub fn decode_text(mut bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    Ok(String::from_utf8(bytes)?)
}

fn as_text(bytes: &[u8]) -> Result<String> {
    decode_text(bytes.to_vec())
}

#[cfg(feature = "xlsx")]
fn sheet_numbers(bytes: &[u8], keep_duplicates: bool) -> Result<Vec<PhoneNumber>> {
    if keep_duplicates {
        sheet::scan_numbers(bytes)
    } else {
        sheet::read_numbers(bytes)
    }
}

#[cfg(not(feature = "xlsx"))]
fn sheet_numbers(_bytes: &[u8], _keep_duplicates: bool) -> Result<Vec<PhoneNumber>> {
    Err(ContactpackError::unsupported(".xlsx", "builds without the xlsx feature"))
}

/// Extracts numbers the way conversions see a file.
///
/// Line formats and vCard keep duplicates; spreadsheets are deduplicated in
/// first-seen order.
pub fn decode_numbers(format: FileFormat, bytes: &[u8]) -> Result<Vec<PhoneNumber>> {
    match format {
        FileFormat::Txt => Ok(text::parse_lines(&as_text(bytes)?)),
        FileFormat::Csv => text::parse_csv(&as_text(bytes)?),
        FileFormat::Vcf => Ok(vcard::extract_numbers(&as_text(bytes)?)),
        FileFormat::Xlsx => sheet_numbers(bytes, false),
    }
}

/// Extracts every valid candidate, duplicates included.
///
/// This is the view used for counting and duplicate removal.
pub fn decode_all_numbers(format: FileFormat, bytes: &[u8]) -> Result<Vec<PhoneNumber>> {
    match format {
        FileFormat::Xlsx => sheet_numbers(bytes, true),
        _ => decode_numbers(format, bytes),
    }
}

/// Decodes records. vCard yields one record per card (first valid `TEL`, with
/// its `FN` name); other formats yield unnamed records.
pub fn decode_records(format: FileFormat, bytes: &[u8]) -> Result<Vec<Record>> {
    match format {
        FileFormat::Vcf => Ok(vcard::parse_records(&as_text(bytes)?)),
        _ => Ok(decode_numbers(format, bytes)?.into_iter().map(Record::new).collect()),
    }
}

/// Encodes records in `format`.
///
/// vCard output uses each record's name; unnamed records get an empty `FN`.
pub fn encode_records(format: FileFormat, records: &[Record]) -> Result<Vec<u8>> {
    match format {
        FileFormat::Vcf => Ok(vcard::encode(records).into_bytes()),
        _ => {
            let numbers: Vec<PhoneNumber> = records.iter().map(|r| r.number.clone()).collect();
            encode_numbers(format, &numbers)
        }
    }
}

/// Encodes a plain number list. vCard output is not supported here because it
/// needs names; use [`vcard::encode_named`].
pub fn encode_numbers(format: FileFormat, numbers: &[PhoneNumber]) -> Result<Vec<u8>> {
    match format {
        FileFormat::Txt | FileFormat::Csv => Ok(text::to_text(numbers).into_bytes()),
        FileFormat::Xlsx => encode_sheet(numbers),
        FileFormat::Vcf => Err(ContactpackError::unsupported(".vcf", "unnamed number lists")),
    }
}

#[cfg(feature = "xlsx")]
fn encode_sheet(numbers: &[PhoneNumber]) -> Result<Vec<u8>> {
    sheet::write_numbers(numbers)
}

#[cfg(not(feature = "xlsx"))]
fn encode_sheet(_numbers: &[PhoneNumber]) -> Result<Vec<u8>> {
    Err(ContactpackError::unsupported(".xlsx", "builds without the xlsx feature"))
}

/// Decodes the first sheet of a workbook as a table.
#[cfg(feature = "xlsx")]
pub fn decode_table(bytes: &[u8]) -> Result<sheet::SheetTable> {
    sheet::read_table(bytes)
}

#[cfg(not(feature = "xlsx"))]
pub fn decode_table(_bytes: &[u8]) -> Result<sheet::SheetTable> {
    Err(ContactpackError::unsupported(".xlsx", "builds without the xlsx feature"))
}

/// Encodes a table as a new `.xlsx` workbook.
#[cfg(feature = "xlsx")]
pub fn encode_table(table: &sheet::SheetTable) -> Result<Vec<u8>> {
    sheet::write_table(table)
}

#[cfg(not(feature = "xlsx"))]
pub fn encode_table(_table: &sheet::SheetTable) -> Result<Vec<u8>> {
    Err(ContactpackError::unsupported(".xlsx", "builds without the xlsx feature"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number;
    use std::time::Duration;

    fn policy() -> RetryPolicy {
        RetryPolicy::io().with_delay(Duration::ZERO)
    }

    #[test]
    fn test_decode_text_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"0811111111");
        assert_eq!(decode_text(bytes).unwrap(), "0811111111");
    }

    #[test]
    fn test_decode_text_rejects_invalid_utf8() {
        assert!(matches!(
            decode_text(vec![0xff, 0x00]),
            Err(ContactpackError::Utf8 { .. })
        ));
    }

    #[test]
    fn test_decode_numbers_dispatch() {
        let txt = decode_numbers(FileFormat::Txt, b"08111111111\n08111111111").unwrap();
        assert_eq!(txt.len(), 2);

        let csv = decode_numbers(FileFormat::Csv, b"08111111111,Ani\n08222222222,Budi").unwrap();
        assert_eq!(csv.len(), 2);

        let vcf = decode_numbers(
            FileFormat::Vcf,
            b"BEGIN:VCARD\nFN:A\nTEL:08111111111\nTEL:08222222222\nEND:VCARD",
        )
        .unwrap();
        assert_eq!(vcf.len(), 2);
    }

    #[test]
    fn test_decode_records_vcf_has_names() {
        let records = decode_records(
            FileFormat::Vcf,
            b"BEGIN:VCARD\nFN:Ani\nTEL:08111111111\nEND:VCARD",
        )
        .unwrap();
        assert_eq!(records[0].name(), Some("Ani"));

        let records = decode_records(FileFormat::Txt, b"08111111111").unwrap();
        assert_eq!(records[0].name(), None);
    }

    #[test]
    fn test_encode_numbers_text() {
        let numbers = number::extract_valid(["08111111111", "08222222222"]);
        let out = encode_numbers(FileFormat::Csv, &numbers).unwrap();
        assert_eq!(out, b"+08111111111\n+08222222222");
        assert!(encode_numbers(FileFormat::Vcf, &numbers).is_err());
    }

    #[tokio::test]
    async fn test_read_write_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        write_bytes(&path, b"0811111111\n0811111111\n0822222222", &policy())
            .await
            .unwrap();

        let bytes = read_bytes(&path, &policy()).await.unwrap();
        assert_eq!(decode_numbers(FileFormat::Txt, &bytes).unwrap().len(), 3);
        assert_eq!(number::unique(decode_numbers(FileFormat::Txt, &bytes).unwrap()).len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_bytes(&dir.path().join("gone.txt"), &RetryPolicy::io())
            .await
            .unwrap_err();
        // NotFound is permanent, so no 2s sleeps happen here.
        assert!(matches!(err, ContactpackError::Io(_)));
    }
}

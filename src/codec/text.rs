//! Line-oriented codecs: plain text and CSV.
//!
//! Plain text carries one candidate per line. CSV input is read with the
//! `csv` crate and only the first field of every record is a candidate; there
//! is no header row. Both serialize as numbers joined with `\n`.

use crate::error::Result;
use crate::number::{self, PhoneNumber};

/// Returns the lines of `text` with line terminators (`\n`, `\r\n`) removed.
pub fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Extracts valid numbers from plain text, one candidate per line.
///
/// Duplicates are kept.
pub fn parse_lines(text: &str) -> Vec<PhoneNumber> {
    number::extract_valid(text.lines())
}

/// Returns the first field of every CSV record.
///
/// Records of different widths are accepted. Blank lines are skipped by the
/// reader.
pub fn csv_first_column(text: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut fields = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(first) = record.get(0) {
            fields.push(first.to_string());
        }
    }
    Ok(fields)
}

/// Extracts valid numbers from the first CSV column. Duplicates are kept.
pub fn parse_csv(text: &str) -> Result<Vec<PhoneNumber>> {
    Ok(number::extract_valid(csv_first_column(text)?))
}

/// Joins items with `\n` and no trailing newline.
pub fn join_lines<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Serializes numbers one per line.
pub fn to_text(numbers: &[PhoneNumber]) -> String {
    join_lines(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_skips_invalid() {
        let text = "0812-3456-7890\nhello\n\n+62 811 2222 333\r\n123";
        let numbers = parse_lines(text);
        let texts: Vec<_> = numbers.iter().map(PhoneNumber::as_str).collect();
        assert_eq!(texts, vec!["+081234567890", "+628112222333"]);
    }

    #[test]
    fn test_parse_lines_keeps_duplicates() {
        let numbers = parse_lines("08123456789\n08123456789");
        assert_eq!(numbers.len(), 2);
    }

    #[test]
    fn test_csv_first_column() {
        let text = "08111111111,Ani\n\"0822 2222 222\",Budi,extra\n";
        let fields = csv_first_column(text).unwrap();
        assert_eq!(fields, vec!["08111111111", "0822 2222 222"]);
    }

    #[test]
    fn test_parse_csv_ignores_header_text() {
        let numbers = parse_csv("nomor,nama\n08111111111,Ani\n").unwrap();
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers[0].as_str(), "+08111111111");
    }

    #[test]
    fn test_to_text_has_no_trailing_newline() {
        let numbers = parse_lines("08111111111\n08222222222");
        assert_eq!(to_text(&numbers), "+08111111111\n+08222222222");
    }

    #[test]
    fn test_join_lines_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(join_lines(&empty), "");
    }

    #[test]
    fn test_lines_strip_crlf() {
        assert_eq!(lines("a\r\nb\n"), vec!["a", "b"]);
    }
}

//! Phone number normalization.
//!
//! Normalization is purely syntactic: no country-code inference, no
//! reachability checks. A candidate is trimmed, all non-digit characters are
//! dropped, and the result is prefixed with `+`. Candidates with fewer than
//! [`MIN_DIGITS`] digits are rejected.
//!
//! # Example
//!
//! ```rust
//! use contactpack::number::normalize;
//!
//! assert_eq!(normalize(" 0812-3456-7890 ").unwrap().as_str(), "+081234567890");
//! assert_eq!(normalize("+62 812 3456").unwrap().as_str(), "+628123456");
//! assert!(normalize("12345").is_none());
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum number of digits a normalized number must contain.
pub const MIN_DIGITS: usize = 8;

/// A normalized phone number: `+` followed by at least [`MIN_DIGITS`] ASCII digits.
///
/// The only way to obtain one is through [`normalize`], so every value of this
/// type upholds the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Returns the normalized text, including the leading `+`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the digits without the leading `+`.
    pub fn digits(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for String {
    fn from(number: PhoneNumber) -> Self {
        number.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize(&value).ok_or_else(|| format!("'{value}' is not a valid phone number"))
    }
}

/// Normalizes a raw candidate into a [`PhoneNumber`].
///
/// Only ASCII `0`-`9` count as digits; every other character is dropped.
/// Returns `None` when fewer than [`MIN_DIGITS`] digits remain. Applying
/// `normalize` to an already-normalized number returns it unchanged.
pub fn normalize(raw: &str) -> Option<PhoneNumber> {
    let digits: String = raw.trim().chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_DIGITS {
        return None;
    }
    Some(PhoneNumber(format!("+{digits}")))
}

/// Normalizes each line, dropping invalid ones. Duplicates and order are kept.
pub fn extract_valid<I, S>(lines: I) -> Vec<PhoneNumber>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().filter_map(|line| normalize(line.as_ref())).collect()
}

/// Like [`extract_valid`], but keeps only the first occurrence of each number.
pub fn extract_unique<I, S>(lines: I) -> Vec<PhoneNumber>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    unique(extract_valid(lines))
}

/// Removes repeated numbers, keeping first occurrences in order.
pub fn unique(numbers: Vec<PhoneNumber>) -> Vec<PhoneNumber> {
    let mut seen = HashSet::with_capacity(numbers.len());
    numbers.into_iter().filter(|n| seen.insert(n.clone())).collect()
}

/// Splits free-form user text into candidate lines.
///
/// Users paste numbers one per line; commas and semicolons are accepted as
/// separators too.
pub fn split_input(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', ',', ';'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize("0812-3456-7890").unwrap().as_str(), "+081234567890");
        assert_eq!(normalize("(021) 555 1234").unwrap().as_str(), "+0215551234");
        assert_eq!(normalize("  +62 812 345 678\r").unwrap().as_str(), "+62812345678");
    }

    #[test]
    fn test_normalize_rejects_short() {
        assert!(normalize("1234567").is_none());
        assert!(normalize("+123 4567").is_none());
        assert!(normalize("").is_none());
        assert!(normalize("no digits here").is_none());
    }

    #[test]
    fn test_normalize_minimum_length() {
        assert_eq!(normalize("12345678").unwrap().as_str(), "+12345678");
    }

    #[test]
    fn test_normalize_ascii_digits_only() {
        assert!(normalize("０８１２３４５６７８").is_none());
        assert!(normalize("٠٨١٢٣٤٥٦٧٨").is_none());
        assert_eq!(normalize("0812３4567８9").unwrap().as_str(), "+081245679");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize("0812 3456 789").unwrap();
        let twice = normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_plus_in_the_middle_is_dropped() {
        assert_eq!(normalize("62+8123456789").unwrap().as_str(), "+628123456789");
    }

    #[test]
    fn test_digits_accessor() {
        let n = normalize("+628123456789").unwrap();
        assert_eq!(n.digits(), "628123456789");
        assert_eq!(n.to_string(), "+628123456789");
    }

    #[test]
    fn test_extract_valid_keeps_duplicates() {
        let lines = ["08123456789", "bad", "08123456789", "021 5551 2345"];
        let numbers = extract_valid(lines);
        assert_eq!(numbers.len(), 3);
        assert_eq!(numbers[0], numbers[1]);
    }

    #[test]
    fn test_extract_unique_preserves_order() {
        let lines = ["0222222222", "0111111111", "0222222222"];
        let numbers = extract_unique(lines);
        let texts: Vec<_> = numbers.iter().map(PhoneNumber::as_str).collect();
        assert_eq!(texts, vec!["+0222222222", "+0111111111"]);
    }

    #[test]
    fn test_split_input() {
        let parts: Vec<_> = split_input("0811111111\n\n 0822222222 ,0833333333").collect();
        assert_eq!(parts, vec!["0811111111", "0822222222", "0833333333"]);
    }

    #[test]
    fn test_serde_validates() {
        let ok: Result<PhoneNumber, _> = PhoneNumber::try_from("0812345678".to_string());
        assert_eq!(ok.unwrap().as_str(), "+0812345678");
        assert!(PhoneNumber::try_from("12".to_string()).is_err());
    }
}

//! Contact record type shared by every codec and transform.
//!
//! # Examples
//!
//! ```
//! use contactpack::{Record, number::normalize};
//!
//! let number = normalize("0812 3456 7890").unwrap();
//! let record = Record::new(number).with_name("Kontak 01");
//!
//! assert_eq!(record.number.as_str(), "+081234567890");
//! assert_eq!(record.name(), Some("Kontak 01"));
//! ```

use serde::{Deserialize, Serialize};

use crate::number::PhoneNumber;

/// A normalized (phone number, optional display name) pair.
///
/// Records are only ever built from a [`PhoneNumber`], so a candidate that
/// failed normalization never becomes a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// The normalized number.
    pub number: PhoneNumber,

    /// Display name, when the source carried one (vCard `FN`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl Record {
    /// Creates a record with no display name.
    pub fn new(number: PhoneNumber) -> Self {
        Self { number, name: None }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the display name or `fallback` when there is none.
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}

impl From<PhoneNumber> for Record {
    fn from(number: PhoneNumber) -> Self {
        Self::new(number)
    }
}

/// Pairs numbers with names positionally into records.
///
/// Extra names are ignored; missing names leave records unnamed.
pub fn named<I, N>(numbers: I, names: N) -> Vec<Record>
where
    I: IntoIterator<Item = PhoneNumber>,
    N: IntoIterator<Item = String>,
{
    let mut names = names.into_iter();
    numbers
        .into_iter()
        .map(|number| Record {
            number,
            name: names.next(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::normalize;

    fn num(s: &str) -> PhoneNumber {
        normalize(s).unwrap()
    }

    #[test]
    fn test_record_builder() {
        let r = Record::new(num("08111111111")).with_name("Ani");
        assert_eq!(r.name(), Some("Ani"));
        assert_eq!(r.name_or("x"), "Ani");
    }

    #[test]
    fn test_record_without_name() {
        let r = Record::from(num("08111111111"));
        assert_eq!(r.name(), None);
        assert_eq!(r.name_or("Kontak"), "Kontak");
    }

    #[test]
    fn test_named_pairs_positionally() {
        let records = named(
            vec![num("08111111111"), num("08222222222")],
            vec!["A 01".to_string()],
        );
        assert_eq!(records[0].name(), Some("A 01"));
        assert_eq!(records[1].name(), None);
    }
}

//! Duplicate removal.

use std::collections::HashSet;
use std::hash::Hash;

use crate::codec::vcard::VCard;
use crate::number::PhoneNumber;

/// Items that survived deduplication and how many were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeOutcome<T> {
    /// Items in first-seen order
    pub kept: Vec<T>,

    /// Number of later duplicates removed
    pub removed: usize,
}

/// Keeps the first item for every key. Items whose key is `None` always pass
/// through and are never counted as duplicates.
pub fn dedupe_by<T, K, F>(items: Vec<T>, mut key: F) -> DedupeOutcome<T>
where
    K: Hash + Eq,
    F: FnMut(&T) -> Option<K>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut removed = 0;

    for item in items {
        let duplicate = key(&item).is_some_and(|k| !seen.insert(k));
        if duplicate {
            removed += 1;
        } else {
            kept.push(item);
        }
    }

    DedupeOutcome { kept, removed }
}

/// Deduplicates a number list.
pub fn dedupe_numbers(numbers: Vec<PhoneNumber>) -> DedupeOutcome<PhoneNumber> {
    dedupe_by(numbers, |n| Some(n.clone()))
}

/// Deduplicates cards by their first valid number. Cards without one are kept.
pub fn dedupe_cards(cards: Vec<VCard>) -> DedupeOutcome<VCard> {
    dedupe_by(cards, VCard::number)
}

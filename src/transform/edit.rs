//! Add and delete.

use std::collections::HashSet;

use crate::naming::sequential_names;
use crate::number::{self, PhoneNumber};
use crate::record::Record;

/// Puts `new` numbers first, then the `existing` numbers that are not among them.
///
/// Both lists are deduplicated (first occurrence wins) before combining.
///
/// # Example
///
/// ```rust
/// use contactpack::number::extract_valid;
/// use contactpack::transform::add_numbers;
///
/// let existing = extract_valid(["62812345678", "0811111111"]);
/// let new = extract_valid(["+628199999999", "0811111111"]);
/// let out: Vec<_> = add_numbers(&new, &existing).iter().map(|n| n.to_string()).collect();
/// assert_eq!(out, vec!["+628199999999", "+0811111111", "+62812345678"]);
/// ```
pub fn add_numbers(new: &[PhoneNumber], existing: &[PhoneNumber]) -> Vec<PhoneNumber> {
    let new = number::unique(new.to_vec());
    let fresh: HashSet<&PhoneNumber> = new.iter().collect();
    let kept: Vec<PhoneNumber> = number::unique(existing.to_vec())
        .into_iter()
        .filter(|n| !fresh.contains(n))
        .collect();
    new.iter().cloned().chain(kept).collect()
}

/// Record-level add for vCard output.
///
/// New numbers are named `"<base> 01".."<base> NN"`. Existing records keep
/// their own name; an unnamed one at position `i` of the deduplicated existing
/// list is named `"<fallback> NN"` with `NN = i + 1 + new.len()`.
pub fn add_contacts(new: &[PhoneNumber], existing: &[Record], base: &str, fallback: &str) -> Vec<Record> {
    let new = number::unique(new.to_vec());
    let fresh: HashSet<&PhoneNumber> = new.iter().collect();

    let mut seen = HashSet::new();
    let existing: Vec<&Record> = existing.iter().filter(|r| seen.insert(&r.number)).collect();

    let mut out: Vec<Record> = new
        .iter()
        .zip(sequential_names(base, 1, new.len()))
        .map(|(number, name)| Record::new(number.clone()).with_name(name))
        .collect();

    for (i, record) in existing.iter().enumerate() {
        if fresh.contains(&record.number) {
            continue;
        }
        let name = match record.name() {
            Some(name) => name.to_string(),
            None => format!("{fallback} {:02}", i + 1 + new.len()),
        };
        out.push(Record::new(record.number.clone()).with_name(name));
    }
    out
}

/// Drops every number contained in `remove`, keeping order and duplicates.
pub fn delete_numbers(numbers: &[PhoneNumber], remove: &HashSet<PhoneNumber>) -> Vec<PhoneNumber> {
    numbers.iter().filter(|n| !remove.contains(*n)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::normalize;

    fn nums(items: &[&str]) -> Vec<PhoneNumber> {
        items.iter().map(|s| normalize(s).unwrap()).collect()
    }

    fn texts(numbers: &[PhoneNumber]) -> Vec<String> {
        numbers.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_add_new_first() {
        let out = add_numbers(&nums(&["+628199999999"]), &nums(&["62812345678"]));
        assert_eq!(texts(&out), vec!["+628199999999", "+62812345678"]);
    }

    #[test]
    fn test_add_removes_overlap_and_repeats() {
        let existing = nums(&["0811111111", "0822222222", "0811111111"]);
        let new = nums(&["0833333333", "0822222222", "0833333333"]);
        let out = add_numbers(&new, &existing);
        assert_eq!(texts(&out), vec!["+0833333333", "+0822222222", "+0811111111"]);
    }

    #[test]
    fn test_add_to_empty_file() {
        let out = add_numbers(&nums(&["0811111111"]), &[]);
        assert_eq!(texts(&out), vec!["+0811111111"]);
    }

    #[test]
    fn test_add_contacts_naming() {
        let existing = vec![
            Record::new(normalize("0811111111").unwrap()).with_name("Ani"),
            Record::new(normalize("0822222222").unwrap()),
            Record::new(normalize("0833333333").unwrap()).with_name("Cici"),
        ];
        let new = nums(&["0844444444", "0833333333"]);
        let out = add_contacts(&new, &existing, "Baru", "Kontak");

        let pairs: Vec<(String, &str)> = out
            .iter()
            .map(|r| (r.number.to_string(), r.name().unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("+0844444444".to_string(), "Baru 01"),
                ("+0833333333".to_string(), "Baru 02"),
                ("+0811111111".to_string(), "Ani"),
                ("+0822222222".to_string(), "Kontak 04"),
            ]
        );
    }

    #[test]
    fn test_delete_numbers() {
        let numbers = nums(&["0811111111", "0822222222", "0811111111"]);
        let remove: HashSet<_> = nums(&["0811111111"]).into_iter().collect();
        assert_eq!(texts(&delete_numbers(&numbers, &remove)), vec!["+0822222222"]);
    }
}

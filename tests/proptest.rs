//! Property-based tests for contactpack.
//!
//! These tests generate random inputs to find edge cases.

use proptest::prelude::*;

use contactpack::codec::vcard;
use contactpack::number::{extract_valid, normalize};
use contactpack::record::Record;
use contactpack::transform::{SplitMode, dedupe_numbers, partition_sizes, split_items};

/// Phone-like strings: digits with the punctuation people actually type.
fn arb_raw_number() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "+", "(", " "]),
        prop::collection::vec((0u8..10, prop::sample::select(vec!["", "", "-", " ", ".", ")"])), 0..16),
    )
        .prop_map(|(prefix, parts)| {
            let mut out = prefix.to_string();
            for (digit, sep) in parts {
                out.push(char::from(b'0' + digit));
                out.push_str(sep);
            }
            out
        })
}

/// A small pool so duplicates actually occur.
fn arb_numbers(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec![
            "081111111111".to_string(),
            "0812-2222-2222".to_string(),
            "+62 813 3333 3333".to_string(),
            "6281444444444".to_string(),
            "not a number".to_string(),
            "0811 1111 1111".to_string(),
        ]),
        0..max_len,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================
    // NORMALIZATION
    // ============================================

    /// Normalizing twice changes nothing
    #[test]
    fn normalize_is_idempotent(raw in arb_raw_number()) {
        if let Some(once) = normalize(&raw) {
            let twice = normalize(once.as_str());
            prop_assert_eq!(twice.as_ref(), Some(&once));
        }
    }

    /// Fewer than 8 digits is rejected; otherwise the result is `+` and digits
    #[test]
    fn normalize_digit_floor(raw in arb_raw_number()) {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        match normalize(&raw) {
            None => prop_assert!(digits.len() < 8),
            Some(number) => {
                prop_assert!(digits.len() >= 8);
                prop_assert_eq!(number.as_str(), format!("+{digits}"));
            }
        }
    }

    // ============================================
    // DEDUPE
    // ============================================

    /// First occurrences survive in order, later repeats are gone
    #[test]
    fn dedupe_keeps_first_occurrences(raw in arb_numbers(30)) {
        let numbers = extract_valid(&raw);
        let outcome = dedupe_numbers(numbers.clone());

        prop_assert!(outcome.kept.len() <= numbers.len());
        prop_assert_eq!(outcome.kept.len() + outcome.removed, numbers.len());

        let mut expected = Vec::new();
        for n in &numbers {
            if !expected.contains(n) {
                expected.push(n.clone());
            }
        }
        prop_assert_eq!(outcome.kept, expected);
    }

    // ============================================
    // SPLIT
    // ============================================

    /// File-count split covers everything, evenly, in order
    #[test]
    fn split_by_file_count_covers_input(total in 0usize..200, parts in 1usize..20) {
        let items: Vec<usize> = (0..total).collect();
        match split_items(&items, SplitMode::FileCount(parts)) {
            None => prop_assert!(parts > total),
            Some(split) => {
                prop_assert_eq!(split.len(), parts);
                let sizes: Vec<usize> = split.iter().map(Vec::len).collect();
                prop_assert_eq!(sizes.iter().sum::<usize>(), total);
                let max = sizes.iter().max().copied().unwrap_or(0);
                let min = sizes.iter().min().copied().unwrap_or(0);
                prop_assert!(max - min <= 1);
                prop_assert_eq!(split.concat(), items);
            }
        }
    }

    /// Per-file split yields ceil(total / size) parts, only the last one short
    #[test]
    fn split_per_file_sizes(total in 0usize..200, size in 1usize..30) {
        let sizes = partition_sizes(total, SplitMode::PerFile(size)).unwrap();
        prop_assert_eq!(sizes.len(), total.div_ceil(size));
        if let Some((last, full)) = sizes.split_last() {
            prop_assert!(full.iter().all(|&s| s == size));
            prop_assert!(*last >= 1 && *last <= size);
        }
    }

    // ============================================
    // VCARD
    // ============================================

    /// Encoding named records and parsing them back gives the same records
    #[test]
    fn vcard_round_trip(entries in prop::collection::vec(
        (prop::sample::select(vec!["Ani", "Budi Santoso", "Kontak 01", "Teman A 12"]), 10_000_000u64..99_999_999_999),
        0..20,
    )) {
        let records: Vec<Record> = entries
            .iter()
            .filter_map(|(name, digits)| normalize(&digits.to_string()).map(|n| Record::new(n).with_name(*name)))
            .collect();

        let parsed = vcard::parse_records(&vcard::encode(&records));
        prop_assert_eq!(parsed, records);
    }
}

//! Contact and file naming rules.
//!
//! # Contact names
//!
//! - One output file: `"<base> 01"`, `"<base> 02"`, ... (at least two digits)
//! - Several output files: numbering restarts at 01 per file and a file label
//!   goes in front: `"<base> A 01"`, `"<base> B 01"`, ... The label is a letter
//!   repeated `index / 26 + 1` times: `A`..`Z`, `AA`, `BB`, ...
//!
//! # File names
//!
//! A base name that ends in digits "continues" that number with no separator
//! (`list3`, `list4`, ...). Any other base gets a space and a 1-based index
//! (`list 1`, `list 2`, ...). See [`output_file_names`] for the four layouts.
//!
//! # Example
//!
//! ```rust
//! use contactpack::naming::{alphabet_label, contact_names, output_file_names, OutputLayout};
//!
//! assert_eq!(alphabet_label(27), "BB");
//! assert_eq!(contact_names("Kontak", 2, 0, 1), vec!["Kontak 01", "Kontak 02"]);
//! assert_eq!(
//!     output_file_names("list3", &OutputLayout::Whole { files: 2 }),
//!     vec!["list3", "list4"]
//! );
//! ```

use std::collections::HashSet;

use crate::format::split_file_name;

/// Returns the file label for a 0-based file index.
pub fn alphabet_label(index: usize) -> String {
    let repeat = index / 26 + 1;
    let letter = char::from(b'A' + (index % 26) as u8);
    std::iter::repeat_n(letter, repeat).collect()
}

/// Returns `count` names `"<base> NN"` numbered from `start`.
pub fn sequential_names(base: &str, start: usize, count: usize) -> Vec<String> {
    (start..start + count).map(|i| format!("{base} {i:02}")).collect()
}

/// Names for the contacts of one output file.
///
/// `file_index` is the position of the file among `total_files` outputs. With a
/// single output the label is omitted.
pub fn contact_names(base: &str, count: usize, file_index: usize, total_files: usize) -> Vec<String> {
    if total_files <= 1 {
        sequential_names(base, 1, count)
    } else {
        let label = alphabet_label(file_index);
        sequential_names(&format!("{base} {label}"), 1, count)
    }
}

/// Splits `"list12"` into `("list", Some("12"))`.
///
/// The number is the whole trailing run of ASCII digits, of any length.
pub fn split_trailing_number(s: &str) -> (&str, Option<&str>) {
    let digits = s.bytes().rev().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return (s, None);
    }
    let (prefix, run) = s.split_at(s.len() - digits);
    (prefix, Some(run))
}

/// Adds `offset` to a run of decimal digits, dropping leading zeros
/// (`"007"` + 1 is `"8"`). Works on the text, so any length is fine.
///
/// # Example
///
/// ```rust
/// use contactpack::naming::continue_number;
///
/// assert_eq!(continue_number("7", 2), "9");
/// assert_eq!(continue_number("18446744073709551615", 1), "18446744073709551616");
/// ```
pub fn continue_number(digits: &str, offset: usize) -> String {
    let mut reversed: Vec<usize> = digits
        .trim_start_matches('0')
        .bytes()
        .rev()
        .map(|b| usize::from(b - b'0'))
        .collect();

    let mut carry = offset;
    let mut i = 0;
    while carry > 0 {
        if i == reversed.len() {
            reversed.push(0);
        }
        let total = reversed[i] + carry;
        reversed[i] = total % 10;
        carry = total / 10;
        i += 1;
    }

    if reversed.is_empty() {
        return "0".to_string();
    }
    reversed
        .iter()
        .rev()
        .map(|&d| char::from(b'0' + d as u8))
        .collect()
}

/// How input files map to output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    /// Each input file becomes one output file.
    Whole {
        /// Number of input files
        files: usize,
    },

    /// Each input file is split into parts.
    Parts {
        /// Number of parts for each input file, in order
        part_counts: Vec<usize>,
    },
}

/// Generates output file names (without extension) for a layout.
///
/// - One file, whole: exactly `base`.
/// - Several files, whole: continuing suffix per file.
/// - One file in parts: continuing suffix per part.
/// - Several files in parts: `<base><file>_<part>` when `base` ends in digits,
///   otherwise `<base> <file>_<part>`, with `part` starting at 1.
pub fn output_file_names(base: &str, layout: &OutputLayout) -> Vec<String> {
    let (prefix, last) = split_trailing_number(base);
    let continuing = |i: usize| match last {
        Some(run) => format!("{prefix}{}", continue_number(run, i)),
        None => format!("{base} {}", i + 1),
    };

    match layout {
        OutputLayout::Whole { files } if *files <= 1 => vec![base.to_string()],
        OutputLayout::Whole { files } => (0..*files).map(continuing).collect(),
        OutputLayout::Parts { part_counts } if part_counts.len() <= 1 => {
            let parts = part_counts.first().copied().unwrap_or(1);
            (0..parts).map(continuing).collect()
        }
        OutputLayout::Parts { part_counts } => part_counts
            .iter()
            .enumerate()
            .flat_map(|(file, &parts)| {
                let file_label = continuing(file);
                (1..=parts).map(move |part| format!("{file_label}_{part}"))
            })
            .collect(),
    }
}

/// Appends `ext` (with dot) unless `name` already ends with it, ignoring case.
pub fn ensure_extension(name: &str, ext: &str) -> String {
    if name.to_ascii_lowercase().ends_with(&ext.to_ascii_lowercase()) {
        name.to_string()
    } else {
        format!("{name}{ext}")
    }
}

/// Tracks names already handed out and resolves collisions with `" (k)"`.
#[derive(Debug, Default, Clone)]
pub struct UniqueNames {
    used: HashSet<String>,
}

impl UniqueNames {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `name`, or `"<stem> (k)<ext>"` with the smallest `k >= 1` that is
    /// still free, and marks the result as used.
    pub fn claim(&mut self, name: &str) -> String {
        let mut candidate = name.to_string();
        let (stem, ext) = split_file_name(name);
        let mut k = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{stem} ({k}){ext}");
            k += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Makes every name in the list unique, preserving order.
pub fn disambiguate<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique = UniqueNames::new();
    names.into_iter().map(|n| unique.claim(n.as_ref())).collect()
}

/// Output names for vCard conversion: [`output_file_names`] plus `.vcf`, made unique.
pub fn vcf_file_names(base: &str, layout: &OutputLayout) -> Vec<String> {
    disambiguate(
        output_file_names(base, layout)
            .iter()
            .map(|n| ensure_extension(n, ".vcf")),
    )
}

/// Automatic rename: one new name per file, keeping each file's own extension.
///
/// A base ending in digits continues that number (`data7.txt`, `data8.vcf`);
/// otherwise `"<base> 1.txt"`, `"<base> 2.vcf"`. Collisions get `" (k)"`.
pub fn auto_file_names<S: AsRef<str>>(base: &str, extensions: &[S]) -> Vec<String> {
    let (prefix, start) = split_trailing_number(base);
    let names = extensions.iter().enumerate().map(|(i, ext)| {
        let ext = ext.as_ref();
        match start {
            Some(run) => format!("{prefix}{}{ext}", continue_number(run, i)),
            None => format!("{base} {}{ext}", i + 1),
        }
    });
    disambiguate(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_label() {
        assert_eq!(alphabet_label(0), "A");
        assert_eq!(alphabet_label(1), "B");
        assert_eq!(alphabet_label(25), "Z");
        assert_eq!(alphabet_label(26), "AA");
        assert_eq!(alphabet_label(27), "BB");
        assert_eq!(alphabet_label(52), "AAA");
    }

    #[test]
    fn test_contact_names_single_file() {
        let names = contact_names("Kontak", 3, 0, 1);
        assert_eq!(names, vec!["Kontak 01", "Kontak 02", "Kontak 03"]);
    }

    #[test]
    fn test_contact_names_multi_file() {
        let names = contact_names("Teman", 2, 1, 3);
        assert_eq!(names, vec!["Teman B 01", "Teman B 02"]);
    }

    #[test]
    fn test_sequential_names_past_99() {
        let names = sequential_names("K", 99, 2);
        assert_eq!(names, vec!["K 99", "K 100"]);
    }

    #[test]
    fn test_split_trailing_number() {
        assert_eq!(split_trailing_number("list3"), ("list", Some("3")));
        assert_eq!(split_trailing_number("list 12"), ("list ", Some("12")));
        assert_eq!(split_trailing_number("007"), ("", Some("007")));
        assert_eq!(split_trailing_number("list"), ("list", None));
        assert_eq!(split_trailing_number(""), ("", None));
    }

    #[test]
    fn test_continue_number() {
        assert_eq!(continue_number("3", 0), "3");
        assert_eq!(continue_number("007", 1), "8");
        assert_eq!(continue_number("99", 1), "100");
        assert_eq!(continue_number("000", 0), "0");
        assert_eq!(continue_number("99999999999999999999999", 2), "100000000000000000000001");
    }

    #[test]
    fn test_names_continue_past_u64() {
        let names = output_file_names("x18446744073709551615", &OutputLayout::Whole { files: 2 });
        assert_eq!(names, vec!["x18446744073709551615", "x18446744073709551616"]);

        let names = auto_file_names("d18446744073709551615", &[".txt", ".vcf"]);
        assert_eq!(names, vec!["d18446744073709551615.txt", "d18446744073709551616.vcf"]);
    }

    #[test]
    fn test_names_one_file_whole() {
        let names = output_file_names("hasil", &OutputLayout::Whole { files: 1 });
        assert_eq!(names, vec!["hasil"]);
    }

    #[test]
    fn test_names_many_files_whole() {
        let names = output_file_names("list3", &OutputLayout::Whole { files: 3 });
        assert_eq!(names, vec!["list3", "list4", "list5"]);

        let names = output_file_names("list", &OutputLayout::Whole { files: 2 });
        assert_eq!(names, vec!["list 1", "list 2"]);
    }

    #[test]
    fn test_names_one_file_parts() {
        let names = output_file_names("part9", &OutputLayout::Parts { part_counts: vec![3] });
        assert_eq!(names, vec!["part9", "part10", "part11"]);

        let names = output_file_names("part", &OutputLayout::Parts { part_counts: vec![2] });
        assert_eq!(names, vec!["part 1", "part 2"]);
    }

    #[test]
    fn test_names_many_files_parts() {
        let layout = OutputLayout::Parts {
            part_counts: vec![2, 1],
        };
        assert_eq!(
            output_file_names("batch5", &layout),
            vec!["batch5_1", "batch5_2", "batch6_1"]
        );
        assert_eq!(
            output_file_names("batch", &layout),
            vec!["batch 1_1", "batch 1_2", "batch 2_1"]
        );
    }

    #[test]
    fn test_vcf_file_names_adds_extension() {
        let names = vcf_file_names("kontak.VCF", &OutputLayout::Whole { files: 1 });
        assert_eq!(names, vec!["kontak.VCF"]);

        let names = vcf_file_names("a", &OutputLayout::Whole { files: 2 });
        assert_eq!(names, vec!["a 1.vcf", "a 2.vcf"]);
    }

    #[test]
    fn test_disambiguate() {
        let names = disambiguate(["a.txt", "a.txt", "a.txt", "b.vcf"]);
        assert_eq!(names, vec!["a.txt", "a (1).txt", "a (2).txt", "b.vcf"]);
    }

    #[test]
    fn test_unique_names_skips_taken_suffix() {
        let mut unique = UniqueNames::new();
        assert_eq!(unique.claim("x (1).txt"), "x (1).txt");
        assert_eq!(unique.claim("x.txt"), "x.txt");
        assert_eq!(unique.claim("x.txt"), "x (2).txt");
    }

    #[test]
    fn test_auto_file_names() {
        assert_eq!(
            auto_file_names("data7", &[".txt", ".vcf"]),
            vec!["data7.txt", "data8.vcf"]
        );
        assert_eq!(
            auto_file_names("data", &[".txt", ".txt"]),
            vec!["data 1.txt", "data 2.txt"]
        );
    }
}

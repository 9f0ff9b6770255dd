//! Number lists to vCard outputs.
//!
//! Combines the naming rules with an optional per-file split to produce the
//! full set of vCard files for a conversion.

use crate::naming::{OutputLayout, alphabet_label, contact_names, sequential_names, vcf_file_names};
use crate::number::PhoneNumber;
use crate::record::{self, Record};

/// Whether each input becomes one output or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitChoice {
    /// One output per input file
    All,

    /// Outputs of at most this many contacts
    PerFile(usize),
}

impl SplitChoice {
    /// Parses `semua` (any case) or a positive integer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contactpack::transform::SplitChoice;
    ///
    /// assert_eq!(SplitChoice::parse(" Semua "), Some(SplitChoice::All));
    /// assert_eq!(SplitChoice::parse("50"), Some(SplitChoice::PerFile(50)));
    /// assert_eq!(SplitChoice::parse("0"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("semua") {
            return Some(SplitChoice::All);
        }
        match input.parse::<usize>() {
            Ok(n) if n > 0 => Some(SplitChoice::PerFile(n)),
            _ => None,
        }
    }
}

/// One planned vCard file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfOutput {
    /// Index of the input file this output came from
    pub source: usize,

    /// Output file name, including `.vcf`
    pub file_name: String,

    /// Named contacts in output order
    pub records: Vec<Record>,
}

/// Every output of a conversion, plus the inputs that had no numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcfPlan {
    /// Files to write, in delivery order
    pub outputs: Vec<VcfOutput>,

    /// Indices of inputs without a single valid number
    pub empty_sources: Vec<usize>,
}

/// Plans the vCard outputs for `inputs` (one deduplicated number list per file).
///
/// With [`SplitChoice::All`] each input keeps its contacts together and, when
/// there are several inputs, contacts get a per-file letter label. With
/// [`SplitChoice::PerFile`] a single input is cut into parts whose contact
/// numbering continues from part to part; several inputs are cut the same way
/// but every part restarts at 01 behind its file's label.
pub fn plan_vcf(inputs: &[Vec<PhoneNumber>], file_base: &str, contact_base: &str, choice: SplitChoice) -> VcfPlan {
    let total_files = inputs.len();
    let mut plan = VcfPlan::default();

    match choice {
        SplitChoice::All => {
            let names = vcf_file_names(file_base, &OutputLayout::Whole { files: total_files });
            for (idx, (numbers, file_name)) in inputs.iter().zip(names).enumerate() {
                if numbers.is_empty() {
                    plan.empty_sources.push(idx);
                    continue;
                }
                let contacts = contact_names(contact_base, numbers.len(), idx, total_files);
                plan.outputs.push(VcfOutput {
                    source: idx,
                    file_name,
                    records: record::named(numbers.iter().cloned(), contacts),
                });
            }
        }
        SplitChoice::PerFile(size) => {
            let size = size.max(1);
            let part_counts: Vec<usize> = inputs.iter().map(|n| n.len().div_ceil(size)).collect();
            let mut names = vcf_file_names(file_base, &OutputLayout::Parts { part_counts }).into_iter();

            for (idx, numbers) in inputs.iter().enumerate() {
                if numbers.is_empty() {
                    plan.empty_sources.push(idx);
                    continue;
                }
                let mut next_number = 1;
                for part in numbers.chunks(size) {
                    let Some(file_name) = names.next() else { break };
                    let contacts = if total_files == 1 {
                        sequential_names(contact_base, next_number, part.len())
                    } else {
                        let label = alphabet_label(idx);
                        sequential_names(&format!("{contact_base} {label}"), 1, part.len())
                    };
                    next_number += part.len();
                    plan.outputs.push(VcfOutput {
                        source: idx,
                        file_name,
                        records: record::named(part.iter().cloned(), contacts),
                    });
                }
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::extract_valid;

    fn numbers(n: usize, seed: u64) -> Vec<PhoneNumber> {
        extract_valid((0..n).map(|i| format!("08{:09}", seed * 1000 + i as u64)))
    }

    fn names(output: &VcfOutput) -> Vec<&str> {
        output.records.iter().filter_map(Record::name).collect()
    }

    #[test]
    fn test_single_file_all() {
        let plan = plan_vcf(&[numbers(2, 1)], "hasil", "Kontak", SplitChoice::All);
        assert_eq!(plan.outputs.len(), 1);
        assert_eq!(plan.outputs[0].file_name, "hasil.vcf");
        assert_eq!(names(&plan.outputs[0]), vec!["Kontak 01", "Kontak 02"]);
    }

    #[test]
    fn test_multi_file_all_labels() {
        let plan = plan_vcf(&[numbers(1, 1), numbers(2, 2)], "list3", "K", SplitChoice::All);
        assert_eq!(plan.outputs[0].file_name, "list3.vcf");
        assert_eq!(plan.outputs[1].file_name, "list4.vcf");
        assert_eq!(names(&plan.outputs[0]), vec!["K A 01"]);
        assert_eq!(names(&plan.outputs[1]), vec!["K B 01", "K B 02"]);
    }

    #[test]
    fn test_single_file_split_continues_numbering() {
        let plan = plan_vcf(&[numbers(5, 1)], "part", "K", SplitChoice::PerFile(2));
        let files: Vec<_> = plan.outputs.iter().map(|o| o.file_name.as_str()).collect();
        assert_eq!(files, vec!["part 1.vcf", "part 2.vcf", "part 3.vcf"]);
        assert_eq!(names(&plan.outputs[0]), vec!["K 01", "K 02"]);
        assert_eq!(names(&plan.outputs[1]), vec!["K 03", "K 04"]);
        assert_eq!(names(&plan.outputs[2]), vec!["K 05"]);
    }

    #[test]
    fn test_multi_file_split_restarts_per_part() {
        let plan = plan_vcf(&[numbers(3, 1), numbers(1, 2)], "b", "K", SplitChoice::PerFile(2));
        let files: Vec<_> = plan.outputs.iter().map(|o| o.file_name.as_str()).collect();
        assert_eq!(files, vec!["b 1_1.vcf", "b 1_2.vcf", "b 2_1.vcf"]);
        assert_eq!(names(&plan.outputs[1]), vec!["K A 01"]);
        assert_eq!(names(&plan.outputs[2]), vec!["K B 01"]);
    }

    #[test]
    fn test_empty_inputs_are_reported() {
        let plan = plan_vcf(&[Vec::new(), numbers(1, 1)], "x", "K", SplitChoice::All);
        assert_eq!(plan.empty_sources, vec![0]);
        assert_eq!(plan.outputs.len(), 1);
        assert_eq!(plan.outputs[0].source, 1);
        assert_eq!(plan.outputs[0].file_name, "x 2.vcf");
    }
}

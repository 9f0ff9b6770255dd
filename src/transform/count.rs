//! Contact counting.

use serde::{Deserialize, Serialize};

/// Per-file counts plus their total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountReport {
    /// `(file name, count)` in batch order
    pub files: Vec<(String, usize)>,
}

impl CountReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the count for one file.
    pub fn push(&mut self, file_name: impl Into<String>, count: usize) {
        self.files.push((file_name.into(), count));
    }

    /// Sum over all files.
    pub fn total(&self) -> usize {
        self.files.iter().map(|(_, n)| n).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        let mut report = CountReport::new();
        report.push("a.txt", 3);
        report.push("b.vcf", 4);
        assert_eq!(report.total(), 7);
        assert_eq!(report.files[1], ("b.vcf".to_string(), 4));
    }

    #[test]
    fn test_empty_total() {
        assert_eq!(CountReport::new().total(), 0);
    }
}

//! File format types for the contactpack library.
//!
//! Every codec and workflow dispatches on [`FileFormat`] instead of comparing
//! extension strings. `.xls` uploads are read through the same spreadsheet
//! reader as `.xlsx`, so both map to [`FileFormat::Xlsx`].
//!
//! # Example
//!
//! ```rust
//! use contactpack::format::FileFormat;
//!
//! assert_eq!(FileFormat::from_path("Daftar.VCF").unwrap(), FileFormat::Vcf);
//! assert_eq!(FileFormat::from_path("old.xls").unwrap(), FileFormat::Xlsx);
//! assert!(FileFormat::from_path("scan.pdf").is_err());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContactpackError;

/// Contact file encoding.
///
/// - [`Txt`](FileFormat::Txt) - one candidate number per line
/// - [`Csv`](FileFormat::Csv) - first field of every record is a candidate
/// - [`Vcf`](FileFormat::Vcf) - vCard 3.0 cards
/// - [`Xlsx`](FileFormat::Xlsx) - spreadsheet, every cell of every sheet is a candidate
///
/// # Example
///
/// ```rust
/// use contactpack::format::FileFormat;
/// use std::str::FromStr;
///
/// let format = FileFormat::from_str("vcf").unwrap();
/// assert_eq!(format, FileFormat::Vcf);
/// assert_eq!(format.extension(), "vcf");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Plain text, one number per line
    Txt,

    /// Comma-separated values
    Csv,

    /// vCard
    Vcf,

    /// Excel workbook (`.xlsx` or legacy `.xls`)
    Xlsx,
}

impl FileFormat {
    /// Returns the canonical file extension for this format (without dot).
    ///
    /// # Example
    ///
    /// ```rust
    /// use contactpack::format::FileFormat;
    ///
    /// assert_eq!(FileFormat::Txt.extension(), "txt");
    /// assert_eq!(FileFormat::Xlsx.extension(), "xlsx");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Txt => "txt",
            FileFormat::Csv => "csv",
            FileFormat::Vcf => "vcf",
            FileFormat::Xlsx => "xlsx",
        }
    }

    /// Returns all accepted extension names.
    pub fn all_names() -> &'static [&'static str] {
        &["txt", "csv", "vcf", "xlsx", "xls"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [FileFormat] {
        &[FileFormat::Txt, FileFormat::Csv, FileFormat::Vcf, FileFormat::Xlsx]
    }

    /// Maps an extension (with or without the leading dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" => Some(FileFormat::Txt),
            "csv" => Some(FileFormat::Csv),
            "vcf" => Some(FileFormat::Vcf),
            "xlsx" | "xls" => Some(FileFormat::Xlsx),
            _ => None,
        }
    }

    /// Detects format from a file name or path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contactpack::format::FileFormat;
    ///
    /// let format = FileFormat::from_path("/tmp/upload/list.csv").unwrap();
    /// assert_eq!(format, FileFormat::Csv);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContactpackError> {
        let ext = extension_of(path.as_ref());
        Self::from_extension(&ext).ok_or_else(|| ContactpackError::unsupported(ext, "contact files"))
    }
}

/// Returns the lowercased extension of `path` including the dot, or an empty
/// string when there is none.
///
/// # Example
///
/// ```rust
/// use contactpack::format::extension_of;
///
/// assert_eq!(extension_of("Report.PDF".as_ref()), ".pdf");
/// assert_eq!(extension_of("README".as_ref()), "");
/// ```
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Splits a file name into stem and extension (extension keeps its dot and case).
///
/// # Example
///
/// ```rust
/// use contactpack::format::split_file_name;
///
/// assert_eq!(split_file_name("data.part.vcf"), ("data.part", ".vcf"));
/// assert_eq!(split_file_name("noext"), ("noext", ""));
/// ```
pub fn split_file_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Txt => write!(f, "TXT"),
            FileFormat::Csv => write!(f, "CSV"),
            FileFormat::Vcf => write!(f, "VCF"),
            FileFormat::Xlsx => write!(f, "XLSX"),
        }
    }
}

impl std::str::FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| {
            format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                FileFormat::all_names().join(", ")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_from_str() {
        assert_eq!(FileFormat::from_str("txt").unwrap(), FileFormat::Txt);
        assert_eq!(FileFormat::from_str("CSV").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_str(".vcf").unwrap(), FileFormat::Vcf);
        assert_eq!(FileFormat::from_str("xls").unwrap(), FileFormat::Xlsx);
        assert!(FileFormat::from_str("pdf").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(FileFormat::Txt.to_string(), "TXT");
        assert_eq!(FileFormat::Vcf.to_string(), "VCF");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path("a.txt").unwrap(), FileFormat::Txt);
        assert_eq!(FileFormat::from_path("/x/y/B.XLSX").unwrap(), FileFormat::Xlsx);
        assert!(matches!(
            FileFormat::from_path("a.pdf"),
            Err(ContactpackError::UnsupportedFormat { .. })
        ));
        assert!(FileFormat::from_path("noext").is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a.VcF")), ".vcf");
        assert_eq!(extension_of(Path::new("dir.d/file")), "");
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("list.txt"), ("list", ".txt"));
        assert_eq!(split_file_name(".hidden"), (".hidden", ""));
        assert_eq!(split_file_name("a.b.c"), ("a.b", ".c"));
    }

    #[test]
    fn test_format_all() {
        assert_eq!(FileFormat::all().len(), 4);
    }
}

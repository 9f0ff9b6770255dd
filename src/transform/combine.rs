//! Merge and split.

use std::collections::HashMap;

use crate::codec::sheet::SheetTable;
use crate::codec::{text, vcard};

/// Concatenates the lines of every text in order. Line contents are kept as is.
pub fn merge_lines<S: AsRef<str>>(contents: &[S]) -> String {
    let lines: Vec<&str> = contents.iter().flat_map(|c| c.as_ref().lines()).collect();
    text::join_lines(&lines)
}

/// Concatenates the cards of every document in order.
pub fn merge_vcards<S: AsRef<str>>(contents: &[S]) -> String {
    let cards: Vec<String> = contents
        .iter()
        .flat_map(|c| vcard::split_cards(c.as_ref()))
        .collect();
    vcard::join_cards(&cards)
}

/// Identity of a column when tables are merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ColumnKey {
    /// The `n`th column carrying this title within its table
    Titled(String, usize),

    /// An untitled column, matched by position
    Blank(usize),
}

fn column_keys(header: &[String]) -> Vec<ColumnKey> {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(position, title)| {
            if title.trim().is_empty() {
                return ColumnKey::Blank(position);
            }
            let n = occurrences.entry(title.as_str()).or_default();
            let key = ColumnKey::Titled(title.clone(), *n);
            *n += 1;
            key
        })
        .collect()
}

/// Concatenates table rows in order.
///
/// Columns are matched by title, and a title repeated within one table gives
/// distinct columns (first `HP` with first `HP`, second with second).
/// Untitled columns are matched by position. The merged header lists every
/// column in first-seen order; missing cells are left blank, so no cell of
/// any input is lost.
pub fn merge_tables(tables: &[SheetTable]) -> SheetTable {
    let mut header: Vec<String> = Vec::new();
    let mut index: HashMap<ColumnKey, usize> = HashMap::new();
    let mut layouts: Vec<Vec<usize>> = Vec::with_capacity(tables.len());

    for table in tables {
        let columns = column_keys(&table.header)
            .into_iter()
            .zip(&table.header)
            .map(|(key, title)| {
                *index.entry(key).or_insert_with(|| {
                    header.push(title.clone());
                    header.len() - 1
                })
            })
            .collect();
        layouts.push(columns);
    }

    let mut merged = SheetTable::new(header);
    let width = merged.header.len();
    for (table, columns) in tables.iter().zip(&layouts) {
        for row in &table.rows {
            let mut out = vec![String::new(); width];
            for (cell, &col) in row.iter().zip(columns) {
                out[col].clone_from(cell);
            }
            merged.rows.push(out);
        }
    }
    merged
}

/// How a split divides its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Exactly this many output parts, sizes as even as possible
    FileCount(usize),

    /// At most this many items per part
    PerFile(usize),
}

/// Returns the size of every part, or `None` when the split is impossible
/// (a zero count, or more parts requested than there are items).
///
/// # Example
///
/// ```rust
/// use contactpack::transform::{partition_sizes, SplitMode};
///
/// assert_eq!(partition_sizes(10, SplitMode::FileCount(3)), Some(vec![4, 3, 3]));
/// assert_eq!(partition_sizes(10, SplitMode::PerFile(4)), Some(vec![4, 4, 2]));
/// assert_eq!(partition_sizes(2, SplitMode::FileCount(3)), None);
/// ```
pub fn partition_sizes(total: usize, mode: SplitMode) -> Option<Vec<usize>> {
    match mode {
        SplitMode::FileCount(0) | SplitMode::PerFile(0) => None,
        SplitMode::FileCount(parts) if parts > total => None,
        SplitMode::FileCount(parts) => {
            let base = total / parts;
            let extra = total % parts;
            Some((0..parts).map(|i| base + usize::from(i < extra)).collect())
        }
        SplitMode::PerFile(size) => {
            let parts = total.div_ceil(size);
            Some((0..parts).map(|i| size.min(total - i * size)).collect())
        }
    }
}

/// Splits `items` into consecutive parts. Returns `None` when
/// [`partition_sizes`] does.
pub fn split_items<T: Clone>(items: &[T], mode: SplitMode) -> Option<Vec<Vec<T>>> {
    let sizes = partition_sizes(items.len(), mode)?;
    let mut parts = Vec::with_capacity(sizes.len());
    let mut start = 0;
    for size in sizes {
        parts.push(items[start..start + size].to_vec());
        start += size;
    }
    Some(parts)
}

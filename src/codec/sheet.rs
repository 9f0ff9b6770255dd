//! Spreadsheet codec (`.xlsx` / `.xls`).
//!
//! Reading goes through `calamine`, which detects the workbook flavour from the
//! bytes; writing always produces `.xlsx` through `rust_xlsxwriter`.
//!
//! Two views of a workbook are used:
//!
//! - **Number scan**: every cell of every column of every sheet, column by
//!   column, is coerced to text and normalized.
//! - **Table**: the first sheet as a header row plus data rows, used by merge
//!   and split which keep the sheet's own columns.

/// First-sheet contents as text: a header row and data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    /// Column titles from the first row.
    pub header: Vec<String>,

    /// Data rows, in sheet order.
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Creates a table with the given header and no rows.
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a table with the same header and a subset of rows.
    #[must_use]
    pub fn with_rows(&self, rows: Vec<Vec<String>>) -> Self {
        Self {
            header: self.header.clone(),
            rows,
        }
    }
}

/// Column title of the single-column number sheet.
pub const NUMBER_COLUMN: &str = "Nomor";

#[cfg(feature = "xlsx")]
pub use imp::{read_numbers, read_table, scan_numbers, write_numbers, write_table};

#[cfg(feature = "xlsx")]
mod imp {
    use std::io::Cursor;

    use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
    use rust_xlsxwriter::Workbook;

    use super::{NUMBER_COLUMN, SheetTable};
    use crate::error::Result;
    use crate::number::{self, PhoneNumber};

    fn open(bytes: &[u8]) -> Result<Sheets<Cursor<Vec<u8>>>> {
        Ok(open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?)
    }

    /// Renders a cell as the text a user would see. Whole floats lose their
    /// `.0` so numeric phone cells come out as plain digit strings.
    fn cell_text(cell: &Data) -> Option<String> {
        let text = match cell {
            Data::Empty => return None,
            Data::String(s) => s.trim().to_string(),
            Data::Int(i) => i.to_string(),
            #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
            Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            other => other.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    fn column_major(range: &Range<Data>) -> impl Iterator<Item = String> + '_ {
        let (height, width) = range.get_size();
        (0..width).flat_map(move |col| {
            (0..height).filter_map(move |row| range.get((row, col)).and_then(cell_text))
        })
    }

    /// Normalizes every cell of every sheet, column by column. Duplicates are kept.
    pub fn scan_numbers(bytes: &[u8]) -> Result<Vec<PhoneNumber>> {
        let mut workbook = open(bytes)?;
        let mut numbers = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name)?;
            numbers.extend(number::extract_valid(column_major(&range)));
        }
        Ok(numbers)
    }

    /// Like [`scan_numbers`], deduplicated in first-seen order.
    pub fn read_numbers(bytes: &[u8]) -> Result<Vec<PhoneNumber>> {
        Ok(number::unique(scan_numbers(bytes)?))
    }

    /// Reads the first sheet as a header row plus data rows.
    ///
    /// Short rows are padded to the header width.
    pub fn read_table(bytes: &[u8]) -> Result<SheetTable> {
        let mut workbook = open(bytes)?;
        let Some(first) = workbook.sheet_names().into_iter().next() else {
            return Ok(SheetTable::default());
        };
        let range = workbook.worksheet_range(&first)?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(|c| cell_text(c).unwrap_or_default()).collect::<Vec<_>>());
        let header = rows.next().unwrap_or_default();
        let width = header.len();
        let rows = rows
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        Ok(SheetTable { header, rows })
    }

    /// Writes a single-column sheet titled "Nomor".
    pub fn write_numbers(numbers: &[PhoneNumber]) -> Result<Vec<u8>> {
        let table = SheetTable {
            header: vec![NUMBER_COLUMN.to_string()],
            rows: numbers.iter().map(|n| vec![n.to_string()]).collect(),
        };
        write_table(&table)
    }

    /// Writes a table to the first sheet of a new workbook. Every cell is a string.
    pub fn write_table(table: &SheetTable) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, title) in table.header.iter().enumerate() {
            sheet.write_string(0, col as u16, title)?;
        }
        for (r, row) in table.rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32 + 1, col as u16, value)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

}

//! # unsheet
//!
//! Excel workbook extraction into typed in-memory tables.
//!
//! This library opens an `.xlsx` workbook, enumerates its sheet names, and
//! loads each sheet into a tabular structure keyed by sheet name: one
//! linear pipeline per call, no caching, no partial results.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unsheet::{load, sheet_names};
//!
//! // Every sheet at once, keyed by name in declaration order
//! let book = load("data.xlsx")?;
//! for (name, sheet) in book.iter() {
//!     println!("{}: {} columns, {} rows", name, sheet.column_count(), sheet.row_count());
//! }
//!
//! // Just the names
//! let names = sheet_names("data.xlsx")?;
//! println!("{:?}", names);
//! # Ok::<(), unsheet::Error>(())
//! ```
//!
//! ## Workbook API
//!
//! ```no_run
//! use unsheet::{CellValue, Workbook};
//!
//! let workbook = Workbook::open("data.xlsx")?;
//! let sheet = workbook.load_sheet("Sheet1")?;
//!
//! if let Some(CellValue::Number(n)) = sheet.get(0, 0) {
//!     println!("first cell: {}", n);
//! }
//! # Ok::<(), unsheet::Error>(())
//! ```
//!
//! Cell values come out as a tagged scalar ([`CellValue`]): text, number,
//! boolean, date/time (from date-formatted serial numbers), or empty. The
//! first row of each sheet is taken as its header per the default parsing
//! convention.

pub mod container;
pub mod detect;
pub mod error;
pub mod model;
pub mod xlsx;

// Re-exports
pub use container::{PackageContainer, Relationship, Relationships};
pub use detect::{is_zip_file, verify_workbook_bytes, verify_workbook_path};
pub use error::{Error, Result};
pub use model::{Book, CellValue, Metadata, Sheet};
pub use xlsx::Workbook;

use std::path::Path;

/// Open a workbook file.
///
/// # Example
///
/// ```no_run
/// let workbook = unsheet::open("data.xlsx")?;
/// println!("{} sheets", workbook.sheet_count());
/// # Ok::<(), unsheet::Error>(())
/// ```
pub fn open(path: impl AsRef<Path>) -> Result<Workbook> {
    Workbook::open(path)
}

/// Load every sheet of a workbook file into a [`Book`].
///
/// Equivalent to [`open`] followed by [`Workbook::load_all`].
///
/// # Example
///
/// ```no_run
/// let book = unsheet::load("data.xlsx")?;
/// println!("loaded {} sheets", book.len());
/// # Ok::<(), unsheet::Error>(())
/// ```
pub fn load(path: impl AsRef<Path>) -> Result<Book> {
    Workbook::open(path)?.load_all()
}

/// Load every sheet of a workbook held in memory.
pub fn load_bytes(data: Vec<u8>) -> Result<Book> {
    Workbook::from_bytes(data)?.load_all()
}

/// List the sheet names of a workbook file, in declaration order.
///
/// # Example
///
/// ```no_run
/// let names = unsheet::sheet_names("data.xlsx")?;
/// for name in names {
///     println!("{}", name);
/// }
/// # Ok::<(), unsheet::Error>(())
/// ```
pub fn sheet_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let workbook = Workbook::open(path)?;
    Ok(workbook
        .sheet_names()
        .into_iter()
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let result = open("no-such-file.xlsx");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_load_rejects_garbage_bytes() {
        let result = load_bytes(b"this is not a spreadsheet".to_vec());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}

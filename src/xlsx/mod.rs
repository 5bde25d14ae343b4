//! XLSX workbook reader.
//!
//! This module loads Microsoft Excel workbooks in the Office Open XML
//! (.xlsx) format into the typed tabular model.
//!
//! # Example
//!
//! ```no_run
//! use unsheet::xlsx::Workbook;
//!
//! let workbook = Workbook::open("data.xlsx")?;
//! for name in workbook.sheet_names() {
//!     println!("Sheet: {}", name);
//! }
//! let book = workbook.load_all()?;
//! # Ok::<(), unsheet::Error>(())
//! ```

mod shared_strings;
mod sheet;
mod styles;
mod workbook;

pub use workbook::Workbook;

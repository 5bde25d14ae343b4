//! Worksheet XML parsing into typed sheet tables.

use crate::error::{Error, Result};
use crate::model::{CellValue, Sheet};

use super::shared_strings::SharedStrings;
use super::styles::NumberFormats;

/// Workbook-level context a worksheet needs to resolve its cells.
pub(crate) struct SheetContext<'a> {
    pub shared_strings: &'a SharedStrings,
    pub formats: &'a NumberFormats,
    pub date1904: bool,
}

/// A cell being assembled while its `<c>` element is open.
struct PendingCell {
    col: usize,
    cell_type: Option<String>,
    style: usize,
    raw: String,
}

/// Parse one worksheet part into a [`Sheet`].
///
/// Cell references (`r="B3"`) drive placement, so horizontal gaps and
/// skipped rows come out as [`CellValue::Empty`]. The first grid row
/// becomes the column labels.
pub(crate) fn parse_worksheet(name: &str, xml: &str, ctx: &SheetContext<'_>) -> Result<Sheet> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut grid: Vec<Vec<CellValue>> = Vec::new();
    let mut current_row: Option<Vec<CellValue>> = None;
    let mut pending: Option<PendingCell> = None;
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(ref e)) => match e.name().as_ref() {
                b"row" => {
                    fill_row_gap(&mut grid, row_number(e));
                    current_row = Some(Vec::new());
                }
                b"c" if current_row.is_some() => {
                    pending = Some(start_cell(e, current_row.as_ref().map_or(0, Vec::len)));
                }
                b"v" | b"t" if pending.is_some() => in_value = true,
                _ => {}
            },
            Ok(quick_xml::events::Event::Empty(ref e)) => match e.name().as_ref() {
                b"row" => {
                    // Row declared but holds no cells
                    fill_row_gap(&mut grid, row_number(e));
                    grid.push(Vec::new());
                }
                b"c" if current_row.is_some() => {
                    let cell = start_cell(e, current_row.as_ref().map_or(0, Vec::len));
                    if let Some(row) = current_row.as_mut() {
                        place(row, cell.col, CellValue::Empty);
                    }
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Text(ref e)) => {
                if in_value {
                    if let Some(cell) = pending.as_mut() {
                        let text = e.unescape().unwrap_or_default();
                        cell.raw.push_str(&text);
                    }
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => match e.name().as_ref() {
                b"row" => {
                    if let Some(row) = current_row.take() {
                        grid.push(row);
                    }
                }
                b"c" => {
                    if let Some(cell) = pending.take() {
                        let value = resolve_cell(&cell, ctx)?;
                        if let Some(row) = current_row.as_mut() {
                            place(row, cell.col, value);
                        }
                    }
                }
                b"v" | b"t" => in_value = false,
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(Sheet::from_grid(name, grid))
}

/// Read the 1-based row number from a `<row>` element, if declared.
fn row_number(e: &quick_xml::events::BytesStart<'_>) -> Option<usize> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r" {
            return String::from_utf8_lossy(&attr.value).parse().ok();
        }
    }
    None
}

/// Insert empty rows for any gap between the grid and a declared row number.
fn fill_row_gap(grid: &mut Vec<Vec<CellValue>>, row_number: Option<usize>) {
    if let Some(n) = row_number {
        while grid.len() + 1 < n {
            grid.push(Vec::new());
        }
    }
}

/// Start assembling a cell from its `<c>` attributes.
fn start_cell(e: &quick_xml::events::BytesStart<'_>, fallback_col: usize) -> PendingCell {
    let mut col = fallback_col;
    let mut cell_type = None;
    let mut style = 0usize;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                let reference = String::from_utf8_lossy(&attr.value);
                col = column_index(&reference);
            }
            b"t" => {
                cell_type = Some(String::from_utf8_lossy(&attr.value).to_string());
            }
            b"s" => {
                if let Ok(s) = String::from_utf8_lossy(&attr.value).parse() {
                    style = s;
                }
            }
            _ => {}
        }
    }

    PendingCell {
        col,
        cell_type,
        style,
        raw: String::new(),
    }
}

/// Place a value at a column index, padding any gap with empty cells.
fn place(row: &mut Vec<CellValue>, col: usize, value: CellValue) {
    if col < row.len() {
        row[col] = value;
    } else {
        while row.len() < col {
            row.push(CellValue::Empty);
        }
        row.push(value);
    }
}

/// Parse the column index from a cell reference ("A1" -> 0, "AA1" -> 26).
fn column_index(reference: &str) -> usize {
    let mut index = 0usize;
    for c in reference.chars() {
        if c.is_ascii_alphabetic() {
            index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
        } else {
            break;
        }
    }
    index.saturating_sub(1)
}

/// Resolve an assembled cell into a typed value.
fn resolve_cell(cell: &PendingCell, ctx: &SheetContext<'_>) -> Result<CellValue> {
    let raw = cell.raw.as_str();

    match cell.cell_type.as_deref() {
        Some("s") => {
            let index: usize = raw.trim().parse().map_err(|_| {
                Error::InvalidData(format!("bad shared string reference: {:?}", raw))
            })?;
            let text = ctx.shared_strings.get(index).ok_or_else(|| {
                Error::InvalidData(format!("shared string index {} out of range", index))
            })?;
            Ok(CellValue::Text(text.to_string()))
        }
        Some("b") => match raw.trim() {
            "1" | "true" => Ok(CellValue::Bool(true)),
            "0" | "false" => Ok(CellValue::Bool(false)),
            other => Err(Error::InvalidData(format!(
                "bad boolean cell value: {:?}",
                other
            ))),
        },
        // Error cells carry the literal code (#DIV/0!, #N/A, ...)
        Some("e") => Ok(CellValue::Text(raw.to_string())),
        Some("str") | Some("inlineStr") => Ok(CellValue::Text(raw.to_string())),
        // ISO 8601 date cells (strict producers)
        Some("d") => Ok(parse_iso_datetime(raw)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(raw.to_string()))),
        _ => {
            if raw.is_empty() {
                return Ok(CellValue::Empty);
            }
            let number: f64 = raw.trim().parse().map_err(|_| {
                Error::InvalidData(format!("bad numeric cell value: {:?}", raw))
            })?;
            if ctx.formats.is_date_style(cell.style) {
                if let Some(dt) = CellValue::from_serial_datetime(number, ctx.date1904) {
                    return Ok(CellValue::DateTime(dt));
                }
            }
            Ok(CellValue::Number(number))
        }
    }
}

/// Parse an ISO 8601 date or date-time string.
fn parse_iso_datetime(raw: &str) -> Option<chrono::NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = raw.parse::<chrono::NaiveDateTime>() {
        return Some(dt);
    }
    raw.parse::<chrono::NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

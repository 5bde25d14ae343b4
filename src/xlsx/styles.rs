//! Number format parsing for date detection.
//!
//! The file format stores dates as plain numbers; only the number format
//! attached to a cell's style says whether the value is a date. This
//! module parses xl/styles.xml far enough to answer that one question.

use std::collections::HashMap;

/// Number format information parsed from xl/styles.xml.
#[derive(Debug, Clone, Default)]
pub struct NumberFormats {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// Cell style formats: style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl NumberFormats {
    /// Parse number formats from xl/styles.xml content.
    ///
    /// A malformed styles part degrades to no format information rather
    /// than failing the load; cells then stay plain numbers.
    pub fn parse(xml: &str) -> Self {
        let mut formats = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e))
                | Ok(quick_xml::events::Event::Empty(ref e)) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"numFmt" if in_num_fmts => {
                        let mut id: Option<u32> = None;
                        let mut code = String::new();
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"numFmtId" => {
                                    id = String::from_utf8_lossy(&attr.value).parse().ok();
                                }
                                b"formatCode" => {
                                    code = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }
                        if let Some(id) = id {
                            formats.num_fmts.insert(id, code);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        let mut num_fmt_id = 0u32;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"numFmtId" {
                                if let Ok(id) = String::from_utf8_lossy(&attr.value).parse() {
                                    num_fmt_id = id;
                                }
                            }
                        }
                        formats.cell_xfs.push(num_fmt_id);
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::End(ref e)) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(_) => break,
                _ => {}
            }
            buf.clear();
        }

        formats
    }

    /// Check if the cell style at `style_index` carries a date format.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        match self.cell_xfs.get(style_index) {
            Some(&id) => self.is_date_format(id),
            None => false,
        }
    }

    /// Check if a numFmtId represents a date or time format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Built-in ids: 14-22 are dates, 45-47 are times
        if (14..=22).contains(&num_fmt_id) || (45..=47).contains(&num_fmt_id) {
            return true;
        }

        match self.num_fmts.get(&num_fmt_id) {
            Some(code) => is_date_format_code(code),
            None => false,
        }
    }
}

/// Check if a custom format code string is a date format: any `d` or `y`
/// token outside quoted literals and bracketed modifiers. Month tokens
/// never appear without one of those in a date format, and alone they are
/// ambiguous with minutes, so they are not counted.
fn is_date_format_code(code: &str) -> bool {
    let mut in_bracket = false;
    let mut in_quote = false;

    for c in code.chars() {
        match c {
            '[' if !in_quote => in_bracket = true,
            ']' if !in_quote => in_bracket = false,
            '"' => in_quote = !in_quote,
            _ if !in_bracket && !in_quote => {
                if matches!(c.to_ascii_lowercase(), 'd' | 'y') {
                    return true;
                }
            }
            _ => {}
        }
    }

    false
}

//! Workbook opening and sheet loading.

use crate::container::{PackageContainer, Relationships};
use crate::detect;
use crate::error::{Error, Result};
use crate::model::{Book, Metadata, Sheet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::shared_strings::SharedStrings;
use super::sheet::{parse_worksheet, SheetContext};
use super::styles::NumberFormats;

/// Sheet entry from xl/workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// An opened workbook.
///
/// Opening reads the whole file into memory (releasing the OS handle
/// immediately) and parses the workbook-level parts: the sheet list,
/// shared strings, number formats, and relationships. Sheet content is
/// parsed on demand by [`load_sheet`](Workbook::load_sheet) or
/// [`load_all`](Workbook::load_all).
pub struct Workbook {
    container: PackageContainer,
    shared_strings: SharedStrings,
    formats: NumberFormats,
    sheets: Vec<SheetInfo>,
    relationships: Relationships,
    date1904: bool,
    path: Option<PathBuf>,
}

impl Workbook {
    /// Open a workbook file.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] / [`Error::PermissionDenied`] when the path
    /// cannot be opened, [`Error::UnknownFormat`] when the file is not a
    /// ZIP container, and the parse-stage variants when the package is not
    /// a readable workbook.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unsheet::Workbook;
    ///
    /// let workbook = Workbook::open("data.xlsx")?;
    /// println!("{} sheets", workbook.sheet_count());
    /// # Ok::<(), unsheet::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::from_open(e, path))?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let mut workbook = Self::from_bytes(data)?;
        workbook.path = Some(path.to_path_buf());
        Ok(workbook)
    }

    /// Open a workbook from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect::verify_workbook_bytes(&data)?;
        let container = PackageContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Build a workbook from an already-opened container.
    fn from_container(container: PackageContainer) -> Result<Self> {
        let shared_strings = match container.read_xml("xl/sharedStrings.xml") {
            Ok(xml) => SharedStrings::parse(&xml)?,
            Err(_) => SharedStrings::default(),
        };

        let formats = match container.read_xml("xl/styles.xml") {
            Ok(xml) => NumberFormats::parse(&xml),
            Err(_) => NumberFormats::default(),
        };

        let relationships = container.read_relationships("xl/workbook.xml")?;

        let workbook_xml = container.read_xml("xl/workbook.xml")?;
        let (sheets, date1904) = parse_workbook_xml(&workbook_xml)?;

        Ok(Self {
            container,
            shared_strings,
            formats,
            sheets,
            relationships,
            date1904,
            path: None,
        })
    }

    /// Path the workbook was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sheet names exactly as declared in the workbook, in declaration
    /// order, without filtering or transformation.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of declared sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the workbook uses the legacy 1904 date system.
    pub fn is_date1904(&self) -> bool {
        self.date1904
    }

    /// Load a single sheet by name.
    ///
    /// # Errors
    ///
    /// [`Error::SheetNotFound`] for names the workbook does not declare;
    /// otherwise the parse-stage variants for unreadable sheet content.
    pub fn load_sheet(&self, name: &str) -> Result<Sheet> {
        let info = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;

        let target = self
            .relationships
            .get(&info.rel_id)
            .map(|rel| rel.target.clone())
            .ok_or_else(|| {
                Error::MissingComponent(format!("worksheet relationship {}", info.rel_id))
            })?;

        let sheet_path = PackageContainer::resolve_path("xl/workbook.xml", &target);
        let xml = self.container.read_xml(&sheet_path)?;

        let ctx = SheetContext {
            shared_strings: &self.shared_strings,
            formats: &self.formats,
            date1904: self.date1904,
        };
        parse_worksheet(name, &xml, &ctx)
    }

    /// Load every declared sheet, in declaration order.
    ///
    /// The load is all-or-nothing: the first sheet that fails to parse
    /// aborts the whole call and no partial book is returned. Conforming
    /// files cannot declare duplicate sheet names; if one does, the later
    /// sheet overwrites the earlier entry in the returned [`Book`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unsheet::Workbook;
    ///
    /// let workbook = Workbook::open("data.xlsx")?;
    /// let book = workbook.load_all()?;
    /// for (name, sheet) in book.iter() {
    ///     println!("{}: {} rows", name, sheet.row_count());
    /// }
    /// # Ok::<(), unsheet::Error>(())
    /// ```
    pub fn load_all(&self) -> Result<Book> {
        let mut book = Book::new();
        for info in &self.sheets {
            book.insert(self.load_sheet(&info.name)?);
        }
        Ok(book)
    }

    /// Workbook document properties from docProps/core.xml.
    ///
    /// A workbook without the properties part yields default (empty)
    /// metadata; only the sheet count is always filled in.
    pub fn metadata(&self) -> Metadata {
        let mut meta = parse_core_properties(&self.container);
        meta.sheet_count = Some(self.sheets.len() as u32);
        meta
    }
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("path", &self.path)
            .field("sheets", &self.sheet_names())
            .field("date1904", &self.date1904)
            .finish()
    }
}

/// Parse xl/workbook.xml: the declared sheet list (in order) and the
/// date-system flag.
fn parse_workbook_xml(xml: &str) -> Result<(Vec<SheetInfo>, bool)> {
    let mut sheets = Vec::new();
    let mut date1904 = false;

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(ref e))
            | Ok(quick_xml::events::Event::Start(ref e)) => match e.name().as_ref() {
                b"sheet" => {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"r:id" => {
                                rel_id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }

                    if name.is_empty() || rel_id.is_empty() {
                        return Err(Error::InvalidData(
                            "sheet declaration without name or relationship id".to_string(),
                        ));
                    }
                    sheets.push(SheetInfo { name, rel_id });
                }
                b"workbookPr" => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"date1904" {
                            let value = String::from_utf8_lossy(&attr.value).to_lowercase();
                            date1904 = value == "1" || value == "true";
                        }
                    }
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok((sheets, date1904))
}

/// Parse docProps/core.xml into workbook metadata. Missing or malformed
/// properties degrade to defaults.
fn parse_core_properties(container: &PackageContainer) -> Metadata {
    let mut meta = Metadata::default();

    let xml = match container.read_xml("docProps/core.xml") {
        Ok(xml) => xml,
        Err(_) => return meta,
    };

    let mut reader = quick_xml::Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut current_element: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                let name = e.name();
                current_element =
                    Some(String::from_utf8_lossy(name.local_name().as_ref()).to_string());
            }
            Ok(quick_xml::events::Event::Text(e)) => {
                if let Some(ref elem) = current_element {
                    let text = e.unescape().unwrap_or_default().to_string();
                    match elem.as_str() {
                        "title" => meta.title = Some(text),
                        "creator" => meta.author = Some(text),
                        "subject" => meta.subject = Some(text),
                        "description" => meta.description = Some(text),
                        "keywords" => {
                            meta.keywords = text
                                .split([',', ';'])
                                .map(|s| s.trim().to_string())
                                .filter(|s| !s.is_empty())
                                .collect();
                        }
                        "created" => meta.created = Some(text),
                        "modified" => meta.modified = Some(text),
                        "lastModifiedBy" => meta.last_modified_by = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(quick_xml::events::Event::End(_)) => {
                current_element = None;
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workbook_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Revenue" sheetId="1" r:id="rId1"/>
    <sheet name="Costs" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;

        let (sheets, date1904) = parse_workbook_xml(xml).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "Revenue");
        assert_eq!(sheets[0].rel_id, "rId1");
        assert_eq!(sheets[1].name, "Costs");
        assert!(!date1904);
    }

    #[test]
    fn test_parse_workbook_date1904() {
        let xml = r#"<workbook><workbookPr date1904="1"/><sheets/></workbook>"#;
        let (sheets, date1904) = parse_workbook_xml(xml).unwrap();
        assert!(sheets.is_empty());
        assert!(date1904);
    }

    #[test]
    fn test_sheet_without_rel_id_rejected() {
        let xml = r#"<workbook><sheets><sheet name="Orphan" sheetId="1"/></sheets></workbook>"#;
        let result = parse_workbook_xml(xml);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }
}

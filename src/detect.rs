//! Container format verification for spreadsheet packages.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the XLSX workbook part.
const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Verify that the file at `path` is a SpreadsheetML workbook container.
///
/// Reads the file, verifies it is a valid ZIP archive, and inspects
/// `[Content_Types].xml` to confirm the workbook content type.
///
/// # Example
///
/// ```no_run
/// use unsheet::detect::verify_workbook_path;
///
/// verify_workbook_path("data.xlsx")?;
/// # Ok::<(), unsheet::Error>(())
/// ```
pub fn verify_workbook_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::from_open(e, path))?;
    let reader = BufReader::new(file);
    verify_workbook_reader(reader)
}

/// Verify that a byte slice holds a SpreadsheetML workbook container.
pub fn verify_workbook_bytes(data: &[u8]) -> Result<()> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }

    let cursor = std::io::Cursor::new(data);
    verify_workbook_reader(cursor)
}

/// Verify that a reader yields a SpreadsheetML workbook container.
pub fn verify_workbook_reader<R: Read + Seek>(reader: R) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|_| Error::UnknownFormat)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => {
            return Err(Error::MissingComponent("[Content_Types].xml".to_string()));
        }
    };

    if content_types.contains(WORKBOOK_CONTENT_TYPE) {
        return Ok(());
    }

    // Fallback: some producers omit the Override entry; accept the package
    // if the xl/ folder structure is present.
    let has_xl = archive.file_names().any(|n| n.starts_with("xl/"));
    if has_xl {
        Ok(())
    } else {
        Err(Error::NotASpreadsheet(
            "no workbook content type or xl/ part".to_string(),
        ))
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        buffer
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B])); // Too short
    }

    #[test]
    fn test_verify_invalid_data() {
        let result = verify_workbook_bytes(&[0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_verify_by_content_type() {
        let content_types = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/xl/workbook.xml" ContentType="{}"/>
</Types>"#,
            WORKBOOK_CONTENT_TYPE
        );
        let data = zip_with(&[("[Content_Types].xml", content_types.as_str())]);
        assert!(verify_workbook_bytes(&data).is_ok());
    }

    #[test]
    fn test_verify_by_folder_fallback() {
        let data = zip_with(&[
            ("[Content_Types].xml", "<Types/>"),
            ("xl/workbook.xml", "<workbook/>"),
        ]);
        assert!(verify_workbook_bytes(&data).is_ok());
    }

    #[test]
    fn test_reject_non_spreadsheet_package() {
        let data = zip_with(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", "<document/>"),
        ]);
        let result = verify_workbook_bytes(&data);
        assert!(matches!(result, Err(Error::NotASpreadsheet(_))));
    }

    #[test]
    fn test_missing_content_types() {
        let data = zip_with(&[("xl/workbook.xml", "<workbook/>")]);
        let result = verify_workbook_bytes(&data);
        assert!(matches!(result, Err(Error::MissingComponent(_))));
    }
}

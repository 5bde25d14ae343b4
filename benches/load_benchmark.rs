//! Benchmarks for workbook loading performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks load synthetic workbooks at various row counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::{Cursor, Write};

/// Creates a synthetic single-sheet workbook with the given number of
/// data rows (inline strings and numbers, no shared strings table).
fn create_test_workbook(row_count: usize) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
    )
    .unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
    )
    .unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#,
    )
    .unwrap();

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="inlineStr"><is><t>id</t></is></c><c r="B1" t="inlineStr"><is><t>label</t></is></c><c r="C1" t="inlineStr"><is><t>value</t></is></c></row>"#,
    );

    for i in 0..row_count {
        content.push_str(&format!(
            r#"
    <row r="{row}"><c r="A{row}"><v>{i}</v></c><c r="B{row}" t="inlineStr"><is><t>item {i}</t></is></c><c r="C{row}"><v>{v}</v></c></row>"#,
            row = i + 2,
            i = i,
            v = i as f64 * 1.5,
        ));
    }

    content.push_str(
        r#"
  </sheetData>
</worksheet>"#,
    );

    zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark full workbook loading at various sizes.
fn bench_load_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_all");

    for row_count in [10, 100, 1000, 10000].iter() {
        let data = create_test_workbook(*row_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = unsheet::load_bytes(black_box(data.clone()));
            });
        });
    }

    group.finish();
}

/// Benchmark workbook opening alone (sheet list, shared strings, styles).
fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");

    for row_count in [100, 10000].iter() {
        let data = create_test_workbook(*row_count);

        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = unsheet::Workbook::from_bytes(black_box(data.clone()));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load_all, bench_open);
criterion_main!(benches);

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

const PRESENTATION_NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// A paragraph as `(level, [(text, bold)])`.
pub type ParagraphDef<'a> = (u32, &'a [(&'a str, bool)]);

pub fn paragraph_xml((level, runs): ParagraphDef) -> String {
    let mut xml = String::from("<a:p>");
    if level > 0 {
        xml.push_str(&format!(r#"<a:pPr lvl="{level}"/>"#));
    }
    for (text, bold) in runs {
        let b = if *bold { r#" b="1""# } else { "" };
        xml.push_str(&format!(r#"<a:r><a:rPr lang="en-US"{b}/><a:t>{text}</a:t></a:r>"#));
    }
    xml.push_str("</a:p>");
    xml
}

/// A slide with one text shape per entry of `shapes`.
pub fn slide_xml(shapes: &[&[ParagraphDef]]) -> String {
    let mut tree = String::new();
    for (i, paragraphs) in shapes.iter().enumerate() {
        let body: String = paragraphs.iter().map(|p| paragraph_xml(*p)).collect();
        tree.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Shape {i}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>"#,
            i + 2
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {PRESENTATION_NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{tree}</p:spTree></p:cSld></p:sld>"#
    )
}

/// Writes a `.pptx` package. `parts` maps slide part names (`slide1.xml`, ...) to slide XML;
/// `order` lists those part names in presentation order. Without `order` no presentation
/// part is written at all.
pub fn write_pptx(path: &Path, parts: &[(&str, String)], order: Option<&[&str]>) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();

    if let Some(order) = order {
        let mut ids = String::new();
        let mut rels = String::new();
        for (i, name) in order.iter().enumerate() {
            ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 10));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/{name}"/>"#,
                i + 10
            ));
        }

        zip.start_file("ppt/presentation.xml", options).unwrap();
        zip.write_all(format!(r#"<?xml version="1.0"?><p:presentation {PRESENTATION_NS}><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#).as_bytes())
            .unwrap();

        zip.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
        zip.write_all(format!(r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#).as_bytes())
            .unwrap();
    }

    for (name, xml) in parts {
        zip.start_file(format!("ppt/slides/{name}"), options).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
}

/// Text-showing operations that place `text` at `(x, y)` in 12pt `F1`.
pub fn text_at(x: i64, y: i64, text: &str) -> Vec<Operation> {
    bytes_at(x, y, text.as_bytes())
}

/// Like [`text_at`], for strings in the font's own encoding.
pub fn bytes_at(x: i64, y: i64, bytes: &[u8]) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::String(bytes.to_vec(), StringFormat::Literal)]),
        Operation::new("ET", vec![]),
    ]
}

/// A ruled grid of cells, one row every 20pt, columns 228pt apart. Every cell is stroked as
/// its own box.
pub fn grid_at(rows: &[&[&str]], top: i64) -> Vec<Operation> {
    let rows: Vec<Vec<&[u8]>> = rows.iter().map(|row| row.iter().map(|cell| cell.as_bytes()).collect()).collect();
    let rows: Vec<&[&[u8]]> = rows.iter().map(Vec::as_slice).collect();
    grid_bytes_at(&rows, top)
}

pub fn grid_bytes_at(rows: &[&[&[u8]]], top: i64) -> Vec<Operation> {
    let mut ops = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, bytes) in row.iter().enumerate() {
            let (x, y) = (72 + 228 * c as i64, top - 20 * r as i64);
            ops.push(Operation::new("re", vec![(x - 6).into(), (y - 6).into(), 228.into(), 20.into()]));
            ops.push(Operation::new("S", vec![]));
            ops.extend(bytes_at(x, y, bytes));
        }
    }
    ops
}

/// Writes a PDF with one page per entry of `pages`, all set in Courier as `F1`.
pub fn write_pdf(path: &Path, pages: Vec<Vec<Operation>>) {
    write_pdf_with_encoding(path, pages, None);
}

/// Like [`write_pdf`], with `encoding` as the `/Encoding` of the `F1` font.
pub fn write_pdf_with_encoding(path: &Path, pages: Vec<Vec<Operation>>, encoding: Option<&str>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut font = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    };
    if let Some(encoding) = encoding {
        font.set("Encoding", Object::Name(encoding.as_bytes().to_vec()));
    }
    let font_id = doc.add_object(font);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

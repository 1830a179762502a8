use crate::layout::{detect_tables, FontEncodings};
use crate::markdown_table::render_pipe_table;
use crate::{join_fragments, ConverterConfig, Result};
use lopdf::content::Content;
use lopdf::{Document, ObjectId};
use std::fs;
use std::path::Path;

/// Converts a `.pdf` file into Markdown and writes it to `output_path`.
///
/// Every page contributes its plain text, followed by one pipe table per detected table.
/// Table text stays in the plain text as well, so tabular content appears twice.
pub fn pdf_to_markdown(pdf_path: &Path, output_path: &Path, config: &ConverterConfig) -> Result<()> {
    let markdown = {
        let doc = Document::load(pdf_path)?;
        join_fragments(&page_fragments(&doc, config)?)
    };

    fs::write(output_path, markdown)?;
    Ok(())
}

fn page_fragments(doc: &Document, config: &ConverterConfig) -> Result<Vec<String>> {
    let mut fragments = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        fragments.push(doc.extract_text(&[page_number])?);

        if !config.detect_tables {
            continue;
        }

        let content = Content::decode(&doc.get_page_content(page_id)?)?;
        for table in detect_tables(&content.operations, &font_encodings(doc, page_id)) {
            if table.is_empty() {
                continue;
            }
            log::debug!("page {page_number}: table with {} row(s)", table.rows.len());
            fragments.push(format!("\n{}\n", render_pipe_table(&table)));
        }
    }

    Ok(fragments)
}

/// The encoding of every font on the page, keyed by resource name, as `extract_text` sees it.
fn font_encodings(doc: &Document, page_id: ObjectId) -> FontEncodings<'_> {
    doc.get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect()
}

use crate::{join_fragments, PptxContainer, Result};
use std::fs;
use std::path::Path;

/// Converts a `.pptx` deck into Markdown and writes it to `output_path`.
///
/// Each slide starts with `## Slide <n>`; its text-bearing shapes follow paragraph by
/// paragraph. The file is written once, after every slide has been converted.
pub fn pptx_to_markdown(pptx_path: &Path, output_path: &Path) -> Result<()> {
    let markdown = {
        let mut container = PptxContainer::open(pptx_path)?;
        log::debug!("{}: {} slide(s)", pptx_path.display(), container.slide_count);

        let mut fragments = Vec::new();
        for slide in container.iter_slides() {
            fragments.extend(slide?.fragments());
        }
        join_fragments(&fragments)
    };

    fs::write(output_path, markdown)?;
    Ok(())
}

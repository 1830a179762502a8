use super::{Result, Slide};
use crate::constants::{PRESENTATION_PART, PRESENTATION_RELS_PART, SLIDE_PART_PREFIX, SLIDE_REL_TYPE};
use crate::parse_rels;
use std::{
    collections::{HashMap, HashSet},
    io::Read,
    path::Path,
};

/// Holds the internal representation of a loaded PowerPoint (pptx) container.
///
/// `PptxContainer` owns the open zip archive and the slide part names in presentation order.
/// Slides are parsed on demand, one at a time. The archive (and with it the file handle) is
/// released when the container is dropped.
pub struct PptxContainer {
    archive: zip::ZipArchive<std::fs::File>,
    pub slide_paths: Vec<String>,
    pub slide_count: u32,
}

impl PptxContainer {
    /// Opens a PowerPoint pptx file and resolves the order of its slides.
    ///
    /// The order comes from `<p:sldIdLst>` in `ppt/presentation.xml`; slide parts it does not
    /// list are not part of the deck. Packages without a readable presentation part fall back
    /// to the numeric order of `ppt/slides/slideN.xml`.
    ///
    /// # Errors
    ///
    /// Errors are returned on file access problems or if the file is not a zip archive.
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let archive = zip::ZipArchive::new(file)?;

        let mut container = Self { archive, slide_paths: Vec::new(), slide_count: 0 };

        let slide_paths = match container.slide_paths_from_presentation() {
            Ok(paths) => paths,
            Err(e) => {
                log::debug!("falling back to slide part names for {}: {e}", path.display());
                container.slide_paths_from_part_names()
            }
        };

        container.slide_count = slide_paths.len() as u32;
        container.slide_paths = slide_paths;
        Ok(container)
    }

    pub fn iter_slides(&mut self) -> SlideIterator<'_> {
        SlideIterator::new(self)
    }

    /// Loads the slide at the given zero-based position in presentation order.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Slide))` - The parsed slide if found and successfully processed.
    /// * `Ok(None)` - If the index is out of bounds.
    /// * `Err(_)` - If there was an error loading or parsing the slide.
    pub fn load_slide(&mut self, index: usize) -> Result<Option<Slide>> {
        let Some(slide_path) = self.slide_paths.get(index).cloned() else {
            return Ok(None);
        };

        let slide_data = self.read_file_from_archive(&slide_path)?;
        let slide = Slide::parse(&slide_data, index as u32 + 1)?;
        Ok(Some(slide))
    }

    /// Reads a file from the PPTX archive by its internal path.
    ///
    /// # Errors
    ///
    /// Fails if the part could not be found or read.
    pub fn read_file_from_archive(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = self.archive.by_name(path)?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Resolves `<p:sldId r:id="..">` entries through the presentation relationships.
    fn slide_paths_from_presentation(&mut self) -> Result<Vec<String>> {
        let presentation = self.read_file_from_archive(PRESENTATION_PART)?;
        let rels = self.read_file_from_archive(PRESENTATION_RELS_PART)?;

        let targets: HashMap<String, String> = parse_rels::parse_relationships(&rels)?
            .into_iter()
            .filter(|rel| rel.rel_type == SLIDE_REL_TYPE)
            .map(|rel| (rel.id, parse_rels::resolve_target(PRESENTATION_PART, &rel.target)))
            .collect();

        let existing: HashSet<&str> = self.archive.file_names().collect();

        let mut paths = Vec::new();
        for id in parse_rels::parse_slide_id_list(&presentation)? {
            match targets.get(&id) {
                Some(target) if existing.contains(target.as_str()) => paths.push(target.clone()),
                Some(target) => log::warn!("slide {id} points to missing part {target}"),
                None => log::warn!("slide {id} has no slide relationship"),
            }
        }

        Ok(paths)
    }

    fn slide_paths_from_part_names(&self) -> Vec<String> {
        let mut slide_paths: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| name.starts_with(SLIDE_PART_PREFIX) && name.ends_with(".xml"))
            .filter(|name| Slide::extract_slide_number(name).is_some())
            .map(str::to_string)
            .collect();

        slide_paths.sort_by_key(|name| Slide::extract_slide_number(name).unwrap_or(u32::MAX));
        slide_paths
    }
}

/// An iterator for streaming slides from a PPTX file.
///
/// Slides are loaded and parsed one by one, in presentation order.
pub struct SlideIterator<'a> {
    container: &'a mut PptxContainer,
    current_index: usize,
}

impl<'a> SlideIterator<'a> {
    fn new(container: &'a mut PptxContainer) -> Self {
        Self { container, current_index: 0 }
    }
}

impl Iterator for SlideIterator<'_> {
    type Item = Result<Slide>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current_index;
        self.current_index += 1;
        self.container.load_slide(index).transpose()
    }
}

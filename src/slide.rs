use crate::parse_xml;
use crate::types::{Paragraph, SlideElement};
use crate::Result;

#[derive(Debug)]
pub struct Slide {
    /// 1-based position in presentation order.
    pub slide_number: u32,
    pub elements: Vec<SlideElement>,
}

impl Slide {
    pub fn parse(xml: &[u8], slide_number: u32) -> Result<Slide> {
        let elements = parse_xml::parse_slide_xml(xml)?;
        Ok(Slide { slide_number, elements })
    }

    /// Extracts the numeric suffix of a slide part name, `ppt/slides/slide12.xml` → `12`.
    pub fn extract_slide_number(path: &str) -> Option<u32> {
        path
            .split('/')
            .last()
            .and_then(|filename| {
                filename
                    .strip_prefix("slide")
                    .and_then(|s| s.strip_suffix(".xml"))
            })
            .and_then(|num_str| num_str.parse::<u32>().ok())
    }

    /// The Markdown fragments of this slide: the `## Slide <n>` heading followed by one
    /// fragment per emitted paragraph.
    pub fn fragments(&self) -> Vec<String> {
        let mut fragments = vec![format!("## Slide {}", self.slide_number)];

        for element in &self.elements {
            if let SlideElement::Text(frame) = element {
                fragments.extend(frame.paragraphs.iter().filter_map(paragraph_to_md));
            }
        }

        fragments
    }
}

/// Bulleted paragraphs are indented two spaces per level beyond the first and are kept even
/// when empty; level-0 paragraphs become a `###` heading when any run is bold and are
/// dropped when they have no text.
fn paragraph_to_md(paragraph: &Paragraph) -> Option<String> {
    let text = paragraph.text.trim();

    if paragraph.level > 0 {
        let indentation = "  ".repeat(paragraph.level as usize - 1);
        return Some(format!("{indentation}* {text}"));
    }

    if text.is_empty() {
        None
    } else if paragraph.is_bold() {
        Some(format!("### {text}"))
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(Slide::extract_slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(Slide::extract_slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(Slide::extract_slide_number("ppt/slides/slideA.xml"), None);
    }

    #[test]
    fn test_empty_bullet_is_kept() {
        let paragraph = Paragraph { level: 3, text: "   ".into(), runs: vec![] };
        assert_eq!(paragraph_to_md(&paragraph).as_deref(), Some("    * "));
    }
}

use crate::constants::{P_NAMESPACE, RELS_NAMESPACE};
use crate::types::Relationship;
use crate::Result;
use roxmltree::Document;

/// Parses relationship (`.rels`) XML data from a PPTX part.
///
/// Relationship parts map resource IDs (`rId1`, ...) to a type URI and a target part.
/// Every `<Relationship>` carrying all three attributes is returned in document order.
///
/// # Errors
///
/// An error is returned if:
/// - The XML data is not valid UTF-8.
/// - Malformed or invalid XML structure is detected.
pub fn parse_relationships(xml_data: &[u8]) -> Result<Vec<Relationship>> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let root = doc.root_element();

    let mut relationships = Vec::new();
    for rel in root.children().filter(|n| n.is_element() && n.tag_name().name() == "Relationship") {
        let (Some(id), Some(rel_type), Some(target)) =
            (rel.attribute("Id"), rel.attribute("Type"), rel.attribute("Target"))
        else {
            continue;
        };
        relationships.push(Relationship {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
    }

    Ok(relationships)
}

/// Reads the ordered slide relationship IDs from `<p:sldIdLst>` in `ppt/presentation.xml`.
///
/// The order of this list is the order slides are shown in, which is not necessarily the
/// order of the slide part names inside the archive.
pub fn parse_slide_id_list(xml_data: &[u8]) -> Result<Vec<String>> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;

    let ids = doc
        .descendants()
        .filter(|n| {
            n.is_element()
                && n.tag_name().name() == "sldId"
                && n.tag_name().namespace() == Some(P_NAMESPACE)
        })
        .filter_map(|n| n.attribute((RELS_NAMESPACE, "id")).or_else(|| n.attribute("r:id")))
        .map(str::to_string)
        .collect();

    Ok(ids)
}

/// Resolves a relationship target against the part that owns the relationship.
///
/// `resolve_target("ppt/presentation.xml", "slides/slide1.xml")` yields `ppt/slides/slide1.xml`.
/// Absolute targets (`/ppt/...`) are taken from the package root.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

use crate::constants::{A_NAMESPACE, P_NAMESPACE};
use crate::types::{Paragraph, SlideElement, TextFrame};
use crate::{Error, Formatting, Result, Run};
use roxmltree::{Document, Node};

/// Line breaks (`<a:br>`) inside a paragraph are kept as a vertical tab.
const LINE_BREAK: char = '\u{b}';

/// Parses raw XML slide data from a PowerPoint (pptx) file and extracts the top-level shapes.
///
/// Every direct child of `<p:spTree>` in the presentation namespace yields one element, in
/// document order. Shapes (`<p:sp>`) that carry a text body become [`SlideElement::Text`];
/// everything else (pictures, graphic frames, group shapes, connectors, text-less shapes)
/// becomes [`SlideElement::Unknown`].
///
/// # Errors
///
/// Parsing fails if:
/// - The provided XML data isn't valid UTF-8.
/// - The XML structure is malformed or missing essential schema elements (`<p:cSld>` or `<p:spTree>` tags).
pub fn parse_slide_xml(xml_data: &[u8]) -> Result<Vec<SlideElement>> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let root = doc.root_element();

    let c_sld = root
        .children()
        .find(|n| is_element(n, P_NAMESPACE, "cSld"))
        .ok_or(Error::Pptx("no <p:cSld> element in slide"))?;

    let sp_tree = c_sld
        .children()
        .find(|n| is_element(n, P_NAMESPACE, "spTree"))
        .ok_or(Error::Pptx("no <p:spTree> element in slide"))?;

    let mut elements = Vec::new();
    for child_node in sp_tree.children().filter(|n| n.is_element()) {
        if child_node.tag_name().namespace() != Some(P_NAMESPACE) {
            continue;
        }
        match child_node.tag_name().name() {
            "sp" => elements.push(parse_sp(&child_node)),
            // group and slide properties are not shapes
            "nvGrpSpPr" | "grpSpPr" | "extLst" => {}
            _ => elements.push(SlideElement::Unknown),
        }
    }

    Ok(elements)
}

/// Checks a shape node (`<p:sp>`) for a text body (`<p:txBody>`).
fn parse_sp(sp_node: &Node) -> SlideElement {
    match sp_node.children().find(|n| is_element(n, P_NAMESPACE, "txBody")) {
        Some(tx_body_node) => SlideElement::Text(parse_text_frame(&tx_body_node)),
        None => SlideElement::Unknown,
    }
}

/// Parses the text body node (`<p:txBody>`) for all paragraph nodes (`<a:p>`).
fn parse_text_frame(tx_body_node: &Node) -> TextFrame {
    let paragraphs = tx_body_node
        .children()
        .filter(|n| is_element(n, A_NAMESPACE, "p"))
        .map(|p_node| parse_paragraph(&p_node))
        .collect();

    TextFrame { paragraphs }
}

/// Parses a single paragraph node (`<a:p>`) into its level, its full text and its runs.
///
/// Only `<a:r>` elements count as runs. Fields (`<a:fld>`) and breaks (`<a:br>`)
/// contribute to the text but carry no run formatting.
fn parse_paragraph(p_node: &Node) -> Paragraph {
    let level = p_node
        .children()
        .find(|n| is_element(n, A_NAMESPACE, "pPr"))
        .and_then(|p_pr| p_pr.attribute("lvl"))
        .and_then(|lvl| lvl.parse::<u32>().ok())
        .unwrap_or(0);

    let mut text = String::new();
    let mut runs = Vec::new();

    for child in p_node.children().filter(|n| n.is_element() && n.tag_name().namespace() == Some(A_NAMESPACE)) {
        match child.tag_name().name() {
            "r" => {
                let run = parse_run(&child);
                text.push_str(&run.text);
                runs.push(run);
            }
            "fld" => text.push_str(&text_of(&child)),
            "br" => text.push(LINE_BREAK),
            _ => {}
        }
    }

    Paragraph { level, text, runs }
}

/// Parses a single run node (`<a:r>`): the text of its `<a:t>` node and the explicit
/// _bold_ attribute of `<a:rPr>`
fn parse_run(r_node: &Node) -> Run {
    let bold = r_node
        .children()
        .find(|n| is_element(n, A_NAMESPACE, "rPr"))
        .and_then(|r_pr_node| r_pr_node.attribute("b"))
        .is_some_and(parse_bool);
    let formatting = Formatting { bold };

    Run { text: text_of(r_node), formatting }
}

fn text_of(node: &Node) -> String {
    node.children()
        .find(|n| is_element(n, A_NAMESPACE, "t"))
        .and_then(|t| t.text())
        .unwrap_or_default()
        .to_string()
}

fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn is_element(node: &Node, namespace: &str, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(namespace)
}

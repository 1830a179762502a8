use std::fs;
use std::path::PathBuf;
use office_to_md::{Formatting, Paragraph, Run, Slide, SlideElement, TextFrame};

fn load_test_data(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("test_data");
    path.push(filename);
    fs::read_to_string(path).expect("Unable to read test data file")
}

fn normalize_test_string(input: &str) -> String {
    input
        .trim_start_matches('\u{feff}') // remove BOM
        .replace("\r\n", "\n") // normalize line breaks
        .trim() // trim leading and trailing whitespace
        .to_string()
}

fn run(text: &str, formatting: Formatting) -> Run {
    Run { text: text.into(), formatting }
}

fn plain(text: &str) -> Run {
    run(text, Formatting::default())
}

fn bold(text: &str) -> Run {
    run(text, Formatting { bold: true })
}

fn paragraph(level: u32, runs: Vec<Run>) -> Paragraph {
    let text = runs.iter().map(|run| run.text.as_str()).collect();
    Paragraph { level, text, runs }
}

fn to_markdown(slide: &Slide) -> String {
    slide.fragments().join("\n\n")
}

#[test]
fn test_markdown_bullet_conversion() {
    let slide = Slide {
        slide_number: 3,
        elements: vec![
            SlideElement::Text(TextFrame {
                paragraphs: vec![
                    paragraph(0, vec![bold("Agenda")]),
                    paragraph(0, vec![plain("  Welcome everyone ")]),
                ],
            }),
            SlideElement::Unknown,
            SlideElement::Text(TextFrame {
                paragraphs: vec![
                    paragraph(1, vec![plain("Budget")]),
                    paragraph(2, vec![plain("Q1 "), plain("numbers")]),
                    paragraph(0, vec![plain("   ")]),
                    paragraph(3, vec![plain("Detail")]),
                ],
            }),
        ],
    };

    let md_result = to_markdown(&slide);
    let expected_md = load_test_data("bullets_test.md");

    assert_eq!(
        normalize_test_string(&md_result),
        normalize_test_string(&expected_md)
    );
}

#[test]
fn test_formatting_conversion() {
    let slide = Slide {
        slide_number: 1,
        elements: vec![SlideElement::Text(TextFrame {
            paragraphs: vec![
                paragraph(0, vec![plain("Mixed "), bold("title")]),
                paragraph(0, vec![plain("cursive")]),
                paragraph(0, vec![plain("underlined")]),
                paragraph(0, vec![bold("bold and cursive")]),
            ],
        })],
    };

    let md_result = to_markdown(&slide);
    let expected_md = load_test_data("formatting_test.md");

    assert_eq!(
        normalize_test_string(&md_result),
        normalize_test_string(&expected_md)
    );
}

#[test]
fn test_slide_without_text_only_has_heading() {
    let slide = Slide {
        slide_number: 1,
        elements: vec![SlideElement::Unknown, SlideElement::Text(TextFrame::default())],
    };

    assert_eq!(slide.fragments(), vec!["## Slide 1".to_string()]);
}

#[test]
fn test_level_two_bullet_is_indented_two_spaces() {
    let slide = Slide {
        slide_number: 1,
        elements: vec![SlideElement::Text(TextFrame {
            paragraphs: vec![paragraph(2, vec![bold("deep")])],
        })],
    };

    // bold does not turn bullets into headings
    assert_eq!(slide.fragments()[1], "  * deep");
}

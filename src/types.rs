#[derive(Debug)]
pub enum SlideElement {
    Text(TextFrame),
    Unknown,
}

/// The text body (`<p:txBody>`) of a shape.
#[derive(Debug, Default)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Default)]
pub struct Paragraph {
    /// Indentation level from `<a:pPr lvl="..">`, zero when absent.
    pub level: u32,
    /// Full paragraph text: runs, fields and line breaks (as `\u{b}`) in document order.
    pub text: String,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn is_bold(&self) -> bool {
        self.runs.iter().any(|run| run.formatting.bold)
    }
}

/// Run properties from `<a:rPr>`. Only explicit bold is read; inherited styles are not resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Formatting {
    pub bold: bool,
}

#[derive(Debug, Clone)]
pub struct Run {
    pub text: String,
    pub formatting: Formatting,
}

/// A relationship entry from a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// A detected table: the first row is the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// A table without data rows renders to nothing.
    pub fn is_empty(&self) -> bool {
        self.rows.len() < 2
    }
}

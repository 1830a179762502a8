//! Positional layout of a PDF page and table detection on top of it.
//!
//! The page content stream is replayed just far enough to know where each text-showing
//! operator puts its string and where straight ruling lines are painted. Glyph widths are
//! not read from the font programs; every glyph is assumed to be half an em wide, which is
//! enough to tell word gaps from column gaps.

use crate::types::Table;
use lopdf::content::Operation;
use lopdf::{Document, Object};
use std::collections::BTreeMap;

/// Font resource name (`F1`, ...) to encoding name, as lopdf reads it from the page fonts.
pub type FontEncodings<'a> = BTreeMap<Vec<u8>, &'a str>;

/// Assumed glyph advance, in text space units per unit of font size.
const GLYPH_WIDTH: f32 = 0.5;
/// Chunks closer than this (in multiples of the font size) belong to the same cell.
const CELL_GAP: f32 = 1.5;
/// Gaps wider than this (in multiples of the font size) inside a cell become a space.
const WORD_GAP: f32 = 0.15;
/// Baselines closer than this (in multiples of the font size) form one line.
const LINE_TOLERANCE: f32 = 0.5;
/// Left cell edges within this distance (in multiples of the font size) count as aligned.
const COLUMN_TOLERANCE: f32 = 2.0;
/// Maximum drift, in points, of a segment that still counts as horizontal or vertical.
const RULE_SLOPE: f32 = 1.0;

/// A string placed on the page by one text-showing operator (or one segment of a `TJ` array).
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub text: String,
}

/// A painted, axis-aligned line segment in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Horizontal { y: f32, x0: f32, x1: f32 },
    Vertical { x: f32, y0: f32, y1: f32 },
}

impl Rule {
    /// The rule drawn from `a` to `b`, or `None` for diagonal and degenerate segments.
    fn between((ax, ay): (f32, f32), (bx, by): (f32, f32)) -> Option<Rule> {
        let (dx, dy) = ((ax - bx).abs(), (ay - by).abs());
        if dy <= RULE_SLOPE && dx > RULE_SLOPE {
            Some(Rule::Horizontal { y: (ay + by) / 2.0, x0: ax.min(bx), x1: ax.max(bx) })
        } else if dx <= RULE_SLOPE && dy > RULE_SLOPE {
            Some(Rule::Vertical { x: (ax + bx) / 2.0, y0: ay.min(by), y1: ay.max(by) })
        } else {
            None
        }
    }
}

/// Everything table detection needs to know about a page.
#[derive(Debug, Default)]
pub struct PageLayout {
    pub chunks: Vec<TextChunk>,
    pub rules: Vec<Rule>,
}

/// Affine transform `[a b c d e f]` as used by `cm` and `Tm`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`, i.e. apply `self` first.
    fn then(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn transform(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    fn horizontal_scale(&self) -> f32 {
        (self.0[0] * self.0[0] + self.0[1] * self.0[1]).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.0[2] * self.0[2] + self.0[3] * self.0[3]).sqrt()
    }
}

#[derive(Debug, Clone, Copy)]
struct TextState {
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
        }
    }
}

/// Replays a content stream and collects positioned text and painted rules.
struct LayoutWalker<'a> {
    encodings: &'a FontEncodings<'a>,
    encoding: Option<&'a str>,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    state: TextState,
    path: Vec<Rule>,
    current_point: Option<(f32, f32)>,
    subpath_start: Option<(f32, f32)>,
    layout: PageLayout,
}

impl<'a> LayoutWalker<'a> {
    fn new(encodings: &'a FontEncodings<'a>) -> Self {
        Self {
            encodings,
            encoding: None,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            state: TextState::default(),
            path: Vec::new(),
            current_point: None,
            subpath_start: None,
            layout: PageLayout::default(),
        }
    }

    fn apply(&mut self, operation: &Operation) {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => self.ctm = self.ctm_stack.pop().unwrap_or(Matrix::IDENTITY),
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    self.ctm = m.then(&self.ctm);
                }
            }

            "m" => {
                if let Some(p) = self.point_at(operands, 0) {
                    self.current_point = Some(p);
                    self.subpath_start = Some(p);
                }
            }
            "l" => {
                if let Some(p) = self.point_at(operands, 0) {
                    self.line_to(p);
                }
            }
            // curves only move the current point
            "c" => self.current_point = self.point_at(operands, 4),
            "v" | "y" => self.current_point = self.point_at(operands, 2),
            "h" => self.close_path(),
            "re" => self.rectangle(operands),
            "S" | "f" | "F" | "f*" | "B" | "B*" => self.paint(),
            "s" | "b" | "b*" => {
                self.close_path();
                self.paint();
            }
            "n" => self.discard_path(),

            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "Tf" => {
                self.encoding = operands
                    .first()
                    .and_then(|font| font.as_name().ok())
                    .and_then(|name| self.encodings.get(name).copied());
                if let Some(size) = operands.get(1).and_then(number) {
                    self.state.font_size = size;
                }
            }
            "Tc" => self.state.char_spacing = first_number(operands).unwrap_or(0.0),
            "Tw" => self.state.word_spacing = first_number(operands).unwrap_or(0.0),
            "Tz" => self.state.horizontal_scaling = first_number(operands).unwrap_or(100.0) / 100.0,
            "TL" => self.state.leading = first_number(operands).unwrap_or(0.0),
            "Td" => {
                if let (Some(tx), Some(ty)) = (operands.first().and_then(number), operands.get(1).and_then(number)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (operands.first().and_then(number), operands.get(1).and_then(number)) {
                    self.state.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (operands.first().and_then(number), operands.get(1).and_then(number)) {
                    self.state.word_spacing = aw;
                    self.state.char_spacing = ac;
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjustment) = number(other) {
                                    let tx = -adjustment / 1000.0 * self.state.font_size * self.state.horizontal_scaling;
                                    self.advance(tx);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// The user-space point at `operands[index..index + 2]`, in device space.
    fn point_at(&self, operands: &[Object], index: usize) -> Option<(f32, f32)> {
        let x = operands.get(index).and_then(number)?;
        let y = operands.get(index + 1).and_then(number)?;
        Some(self.ctm.transform(x, y))
    }

    fn line_to(&mut self, to: (f32, f32)) {
        if let Some(rule) = self.current_point.and_then(|from| Rule::between(from, to)) {
            self.path.push(rule);
        }
        self.current_point = Some(to);
    }

    fn close_path(&mut self) {
        if let Some(start) = self.subpath_start {
            self.line_to(start);
        }
    }

    fn rectangle(&mut self, operands: &[Object]) {
        let values: Option<Vec<f32>> = operands.iter().take(4).map(number).collect();
        let Some(&[x, y, w, h]) = values.as_deref() else {
            return;
        };

        let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)].map(|(px, py)| self.ctm.transform(px, py));
        self.current_point = Some(corners[0]);
        self.subpath_start = Some(corners[0]);
        for corner in &corners[1..] {
            self.line_to(*corner);
        }
        self.close_path();
    }

    fn paint(&mut self) {
        self.layout.rules.append(&mut self.path);
        self.current_point = None;
        self.subpath_start = None;
    }

    fn discard_path(&mut self) {
        self.path.clear();
        self.current_point = None;
        self.subpath_start = None;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.state.leading);
    }

    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).then(&self.text_matrix);
    }

    fn show(&mut self, bytes: &[u8]) {
        let text = Document::decode_text(self.encoding, bytes);
        let glyphs = text.chars().count() as f32;
        let spaces = text.chars().filter(|c| *c == ' ').count() as f32;
        let state = self.state;

        let advance = (glyphs * (GLYPH_WIDTH * state.font_size + state.char_spacing)
            + spaces * state.word_spacing)
            * state.horizontal_scaling;

        let device = self.text_matrix.then(&self.ctm);
        let [.., x, y] = device.0;

        self.layout.chunks.push(TextChunk {
            x,
            y,
            width: advance * device.horizontal_scale(),
            font_size: state.font_size * device.vertical_scale(),
            text,
        });

        self.advance(advance);
    }
}

/// Places every text-showing operator and every painted straight segment of a content
/// stream on the page.
///
/// Strings are decoded with the encoding of the font selected by the last `Tf`, looked up
/// in `encodings`, the same way lopdf decodes the page text.
pub fn page_layout(operations: &[Operation], encodings: &FontEncodings) -> PageLayout {
    let mut walker = LayoutWalker::new(encodings);
    for operation in operations {
        walker.apply(operation);
    }
    walker.layout
}

/// A run of chunks on one line that are close enough to read as one value.
#[derive(Debug, Clone)]
struct Cell {
    x: f32,
    text: String,
}

#[derive(Debug, Clone)]
struct Line {
    y: f32,
    font_size: f32,
    cells: Vec<Cell>,
}

/// Groups chunks into lines (top to bottom) and each line into cells (left to right).
fn lines(mut chunks: Vec<TextChunk>) -> Vec<Line> {
    chunks.retain(|chunk| !chunk.text.trim().is_empty());
    chunks.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut grouped: Vec<Vec<TextChunk>> = Vec::new();
    for chunk in chunks {
        let same_line = grouped.last().is_some_and(|line| {
            let anchor = &line[0];
            let tolerance = LINE_TOLERANCE * anchor.font_size.max(chunk.font_size).max(1.0);
            (anchor.y - chunk.y).abs() <= tolerance
        });
        match grouped.last_mut() {
            Some(line) if same_line => line.push(chunk),
            _ => grouped.push(vec![chunk]),
        }
    }

    grouped
        .into_iter()
        .map(|mut line| {
            let y = line[0].y;
            line.sort_by(|a, b| a.x.total_cmp(&b.x));
            split_cells(y, &line)
        })
        .collect()
}

fn split_cells(y: f32, chunks: &[TextChunk]) -> Line {
    let font_size = chunks.iter().map(|c| c.font_size).fold(1.0_f32, f32::max);
    let mut cells: Vec<Cell> = Vec::new();
    let mut previous_end = f32::NEG_INFINITY;

    for chunk in chunks {
        let gap = chunk.x - previous_end;
        match cells.last_mut() {
            Some(cell) if gap < CELL_GAP * font_size => {
                let needs_space = gap > WORD_GAP * font_size
                    && !cell.text.ends_with(char::is_whitespace)
                    && !chunk.text.starts_with(char::is_whitespace);
                if needs_space {
                    cell.text.push(' ');
                }
                cell.text.push_str(&chunk.text);
            }
            _ => cells.push(Cell { x: chunk.x, text: chunk.text.clone() }),
        }
        previous_end = previous_end.max(chunk.x + chunk.width);
    }

    for cell in &mut cells {
        cell.text = cell.text.trim().to_string();
    }

    Line { y, font_size, cells }
}

fn aligned(first: &Line, candidate: &Line) -> bool {
    if first.cells.len() != candidate.cells.len() {
        return false;
    }
    let tolerance = COLUMN_TOLERANCE * first.font_size.max(candidate.font_size);
    first
        .cells
        .iter()
        .zip(&candidate.cells)
        .all(|(a, b)| (a.x - b.x).abs() <= tolerance)
}

/// Every pair of neighbouring lines has a horizontal rule between their baselines that
/// spans each cell start of the lower line.
fn rows_separated(region: &[Line], rules: &[Rule]) -> bool {
    region.windows(2).all(|pair| {
        let (upper, lower) = (&pair[0], &pair[1]);
        lower.cells.iter().all(|cell| {
            rules.iter().any(|rule| match *rule {
                Rule::Horizontal { y, x0, x1 } => {
                    lower.y < y && y < upper.y && x0 - RULE_SLOPE <= cell.x && cell.x <= x1 + RULE_SLOPE
                }
                Rule::Vertical { .. } => false,
            })
        })
    })
}

/// Every pair of neighbouring columns has a vertical rule between them on every line.
fn columns_separated(region: &[Line], rules: &[Rule]) -> bool {
    let Some(first) = region.first() else {
        return false;
    };

    (1..first.cells.len()).all(|col| {
        let left = region.iter().map(|line| line.cells[col - 1].x).fold(f32::NEG_INFINITY, f32::max);
        let right = region.iter().map(|line| line.cells[col].x).fold(f32::INFINITY, f32::min);
        region.iter().all(|line| {
            rules.iter().any(|rule| match *rule {
                Rule::Vertical { x, y0, y1 } => left < x && x < right && y0 <= line.y && line.y <= y1,
                Rule::Horizontal { .. } => false,
            })
        })
    })
}

/// Detects ruled tables on a page.
///
/// A candidate region is a maximal run of at least two consecutive lines that have the same
/// number of cells (two or more) with aligned left edges. It becomes a [`Table`] only when
/// painted rules separate all of its rows or all of its columns, so aligned prose columns
/// are left alone. The first line of a table is its header row.
pub fn detect_tables(operations: &[Operation], encodings: &FontEncodings) -> Vec<Table> {
    let PageLayout { chunks, rules } = page_layout(operations, encodings);
    let mut tables = Vec::new();
    let mut region: Vec<Line> = Vec::new();

    let mut flush = |region: &mut Vec<Line>| {
        if region.len() >= 2 {
            if rows_separated(region, &rules) || columns_separated(region, &rules) {
                let rows = region
                    .iter()
                    .map(|line| line.cells.iter().map(|cell| cell.text.clone()).collect())
                    .collect();
                tables.push(Table { rows });
            } else {
                log::debug!("ignoring {} aligned line(s) without ruling", region.len());
            }
        }
        region.clear();
    };

    for line in lines(chunks) {
        if line.cells.len() < 2 {
            flush(&mut region);
            continue;
        }
        let continues = region.first().is_some_and(|first| aligned(first, &line));
        if !continues {
            flush(&mut region);
        }
        region.push(line);
    }
    flush(&mut region);

    log::debug!("detected {} table(s)", tables.len());
    tables
}

fn number(object: &Object) -> Option<f32> {
    object.as_float().ok()
}

fn first_number(operands: &[Object]) -> Option<f32> {
    operands.first().and_then(number)
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    if operands.len() != 6 {
        return None;
    }
    let mut values = [0.0; 6];
    for (value, operand) in values.iter_mut().zip(operands) {
        *value = number(operand)?;
    }
    Some(Matrix(values))
}

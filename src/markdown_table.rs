use crate::types::Table;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Renders a table as a pipe-delimited Markdown table.
///
/// The first row supplies the column names and a leading `0, 1, 2, ...` index column is
/// added, mirroring how a data frame is tabulated. Numeric columns are right-aligned, the
/// rest left-aligned, and the separator row marks the alignment with a colon. A table
/// without data rows renders to an empty string.
#[must_use = "returns the markdown representation of the table"]
pub fn render_pipe_table(table: &Table) -> String {
    if table.is_empty() {
        return String::new();
    }

    let num_cols = table.rows.iter().map(Vec::len).max().unwrap_or(0);
    let headers = header_names(&table.rows[0], num_cols);

    let mut columns: Vec<(String, Vec<String>)> = vec![(
        String::new(),
        (0..table.rows.len() - 1).map(|i| i.to_string()).collect(),
    )];
    for (col_idx, header) in headers.into_iter().enumerate() {
        let cells = table.rows[1..]
            .iter()
            .map(|row| row.get(col_idx).cloned().unwrap_or_default())
            .collect();
        columns.push((header, cells));
    }

    let layout: Vec<(Align, usize)> = columns
        .iter()
        .map(|(header, cells)| {
            let align = if is_numeric_column(cells) { Align::Right } else { Align::Left };
            let widest_cell = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
            (align, widest_cell.max(header.chars().count() + 2))
        })
        .collect();

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(render_row(columns.iter().map(|(header, _)| header.as_str()), &layout));
    lines.push(separator(&layout));
    for row_idx in 0..table.rows.len() - 1 {
        lines.push(render_row(columns.iter().map(|(_, cells)| cells[row_idx].as_str()), &layout));
    }

    lines.join("\n")
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, layout: &[(Align, usize)]) -> String {
    let mut line = String::from("|");
    for (text, &(align, width)) in cells.zip(layout) {
        let padded = match align {
            Align::Left => format!(" {text:<width$} |"),
            Align::Right => format!(" {text:>width$} |"),
        };
        line.push_str(&padded);
    }
    line
}

fn separator(layout: &[(Align, usize)]) -> String {
    let mut line = String::from("|");
    for &(align, width) in layout {
        let dashes = "-".repeat(width + 1);
        match align {
            Align::Left => line.push_str(&format!(":{dashes}|")),
            Align::Right => line.push_str(&format!("{dashes}:|")),
        }
    }
    line
}

/// Empty names become `Col<i>`; repeated names get a `-<n>` suffix.
fn header_names(first_row: &[String], num_cols: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    (0..num_cols)
        .map(|i| {
            let raw = first_row.get(i).map(|s| s.trim()).unwrap_or_default();
            let name = if raw.is_empty() { format!("Col{i}") } else { raw.to_string() };
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 { name } else { format!("{name}-{}", *count - 1) }
        })
        .collect()
}

/// Blank cells do not count against a numeric column, but at least one value must be a number.
fn is_numeric_column(cells: &[String]) -> bool {
    let mut values = cells.iter().map(|cell| cell.trim()).filter(|cell| !cell.is_empty()).peekable();
    values.peek().is_some() && values.all(|value| value.parse::<f64>().is_ok())
}

//! Output formatting for connection pages.
//!
//! Renders a schema plus page as JSON, an ASCII table, or a Markdown table.

use crate::models::{Page, Schema};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// ASCII table format
    Table,
    /// Markdown table format
    Markdown,
}

/// JSON document for one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageOutput {
    pub columns: Vec<crate::models::ColumnDefinition>,
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    pub row_count: usize,
    pub has_next_page: bool,
    pub execution_time_ms: u64,
}

impl PageOutput {
    pub fn new(schema: &Schema, page: &Page, execution_time_ms: u64) -> Self {
        let rows = page
            .rows
            .iter()
            .map(|row| {
                schema
                    .columns()
                    .iter()
                    .zip(row.cells())
                    .map(|(col, cell)| (col.name.clone(), cell.to_json()))
                    .collect()
            })
            .collect();

        Self {
            columns: schema.columns().to_vec(),
            rows,
            row_count: page.row_count(),
            has_next_page: page.has_next_page,
            execution_time_ms,
        }
    }
}

/// Render a page in the requested format.
pub fn render(
    format: OutputFormat,
    schema: &Schema,
    page: &Page,
    execution_time_ms: u64,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&PageOutput::new(schema, page, execution_time_ms))
        }
        OutputFormat::Table => Ok(format_as_table(schema, page, execution_time_ms)),
        OutputFormat::Markdown => Ok(format_as_markdown(schema, page)),
    }
}

pub fn format_as_table(schema: &Schema, page: &Page, execution_time_ms: u64) -> String {
    if schema.is_empty() {
        return "Empty set".to_string();
    }

    let rendered: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| row.cells().iter().map(|c| c.display()).collect())
        .collect();

    let mut widths: Vec<usize> = schema.columns().iter().map(|c| c.name.width()).collect();
    for row in &rendered {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.width());
        }
    }

    let mut output = String::new();
    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    output.push_str(&separator);
    let header: String = schema
        .columns()
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("| {} ", pad_center(&col.name, *w)))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);
    output.push_str(&separator);

    for row in &rendered {
        let row_str: String = schema
            .columns()
            .iter()
            .zip(row)
            .zip(&widths)
            .map(|((col, value), w)| {
                let pad = " ".repeat(w - value.width());
                if col.column_type.is_numeric() {
                    format!("| {pad}{value} ")
                } else {
                    format!("| {value}{pad} ")
                }
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&separator);

    let row_count = page.row_count();
    let row_text = if row_count == 1 { "row" } else { "rows" };
    output.push_str(&format!(
        "{} {} in set ({:.2} sec)\n",
        row_count,
        row_text,
        execution_time_ms as f64 / 1000.0
    ));

    output
}

pub fn format_as_markdown(schema: &Schema, page: &Page) -> String {
    if schema.is_empty() {
        return "*Empty set*".to_string();
    }

    let mut output = String::new();

    let header: String = schema
        .columns()
        .iter()
        .map(|c| format!("| {} ", c.name))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);

    let sep: String = schema.columns().iter().map(|_| "|---").collect::<String>() + "|\n";
    output.push_str(&sep);

    for row in &page.rows {
        let row_str: String = row
            .cells()
            .iter()
            .map(|cell| format!("| {} ", markdown_cell(&cell.display())))
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&format!("\n*{} rows*", page.row_count()));

    output
}

/// Escape a cell so it stays on one Markdown table row.
fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

/// Center text by display width (format! pads by char count).
fn pad_center(text: &str, width: usize) -> String {
    let total = width.saturating_sub(text.width());
    let left = total / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(total - left))
}

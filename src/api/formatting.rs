//! Separation matrix output formatting
//!
//! Text, JSON and CSV renderings of a [`SeparationMatrix`] and of a
//! [`PositionTable`]. Missing cells render as `-` in text, `null` in JSON and
//! an empty field in CSV.

use crate::algorithms::separation::{PositionTable, SeparationMatrix};
use crate::api::types::OutputFormat;
use serde::Serialize;

/// Serializable view of a matrix with the unit spelled out
#[derive(Debug, Clone, Serialize)]
pub struct FormattedMatrix<'a> {
    pub measure: String,
    pub unit: &'static str,
    pub rows: Vec<&'a str>,
    pub columns: Vec<&'a str>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl<'a> FormattedMatrix<'a> {
    pub fn new(matrix: &'a SeparationMatrix, precision: u8) -> Self {
        let (rows, _) = matrix.shape();
        let factor = 10f64.powi(precision as i32);
        Self {
            measure: matrix.measure().to_string(),
            unit: "m",
            rows: matrix.rows().iter().map(|id| id.as_str()).collect(),
            columns: matrix.columns().iter().map(|id| id.as_str()).collect(),
            values: (0..rows)
                .map(|r| {
                    matrix
                        .row_values(r)
                        .unwrap_or(&[])
                        .iter()
                        .map(|v| v.map(|d| (d * factor).round() / factor))
                        .collect()
                })
                .collect(),
        }
    }
}

/// Renders matrices in the configured format
#[derive(Debug, Clone)]
pub struct MatrixFormatter {
    pub format: OutputFormat,
    /// Decimal places kept for distances
    pub precision: u8,
}

impl Default for MatrixFormatter {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            precision: 1,
        }
    }
}

impl MatrixFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn format(&self, matrix: &SeparationMatrix) -> Result<String, serde_json::Error> {
        let formatted = FormattedMatrix::new(matrix, self.precision);
        match self.format {
            OutputFormat::Text => Ok(TextFormatter::new().format_text(&formatted, self.precision)),
            OutputFormat::Json => JsonFormatter::new().format_json(&formatted),
            OutputFormat::PrettyJson => JsonFormatter::pretty().format_json(&formatted),
            OutputFormat::Csv => Ok(CsvFormatter::new().format_csv(&formatted)),
        }
    }

    /// One line per aircraft, sorted by id
    pub fn format_positions(&self, table: &PositionTable) -> String {
        let mut output = String::new();
        for (id, position) in table.entries() {
            match position {
                Some(pos) => output.push_str(&format!(
                    "{:<10} lat={:>10.5}  lon={:>11.5}  alt={:>9.1} m\n",
                    id.as_str(),
                    pos.latitude,
                    pos.longitude,
                    pos.altitude
                )),
                None => output.push_str(&format!("{:<10} unknown\n", id.as_str())),
            }
        }
        output
    }
}

/// Aligned plain-text table
#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_text(&self, matrix: &FormattedMatrix<'_>, precision: u8) -> String {
        let precision = precision as usize;
        let cells: Vec<Vec<String>> = matrix
            .values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| match v {
                        Some(d) => format!("{:.*}", precision, d),
                        None => "-".to_string(),
                    })
                    .collect()
            })
            .collect();

        let label_width = matrix.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let widths: Vec<usize> = matrix
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(c))
                    .map(String::len)
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut output = format!("{} separation ({})\n", matrix.measure, matrix.unit);
        output.push_str(&" ".repeat(label_width));
        for (name, width) in matrix.columns.iter().zip(&widths) {
            output.push_str(&format!("  {:>width$}", name, width = width));
        }
        output.push('\n');

        for (label, row) in matrix.rows.iter().zip(&cells) {
            output.push_str(&format!("{:<width$}", label, width = label_width));
            for (cell, width) in row.iter().zip(&widths) {
                output.push_str(&format!("  {:>width$}", cell, width = width));
            }
            output.push('\n');
        }
        output
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, matrix: &FormattedMatrix<'_>) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(matrix)
        } else {
            serde_json::to_string(matrix)
        }
    }
}

/// CSV with a header row of column ids and the row id in the first field
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self, matrix: &FormattedMatrix<'_>) -> String {
        let mut header = String::from("aircraft_id");
        for column in &matrix.columns {
            header.push(',');
            header.push_str(column);
        }
        header
    }

    pub fn format_csv(&self, matrix: &FormattedMatrix<'_>) -> String {
        let mut lines = Vec::with_capacity(matrix.rows.len() + 1);
        if self.include_header {
            lines.push(self.header(matrix));
        }
        for (label, row) in matrix.rows.iter().zip(&matrix.values) {
            let mut line = label.to_string();
            for value in row {
                line.push(',');
                if let Some(d) = value {
                    line.push_str(&d.to_string());
                }
            }
            lines.push(line);
        }
        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}

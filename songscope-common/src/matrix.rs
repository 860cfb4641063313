//! Correlation matrix loading
//!
//! Turns a header-first, comma-delimited correlation table into the ordered
//! label list, the [`LabelIndex`], and the flattened grid of
//! [`CorrelationCell`]s the heatmap renders.
//!
//! ```text
//! ,energy,tempo
//! energy,1,0.3
//! tempo,0.3,1
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::label::{DisplayLabel, LabelIndex};
use crate::{Error, Result};

/// One heatmap grid entry
///
/// `correlation` is `None` for empty entries, serialized as `null` so the
/// renderer can tell it apart from a zero correlation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationCell {
    pub row_label: DisplayLabel,
    pub col_label: DisplayLabel,
    pub correlation: Option<f64>,
}

/// A loaded correlation matrix
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub index: LabelIndex,
    pub cells: Vec<CorrelationCell>,
}

impl CorrelationMatrix {
    /// Display labels in header order (shared sort order of both heatmap axes)
    pub fn labels(&self) -> &[DisplayLabel] {
        self.index.labels()
    }
}

/// Split raw matrix text into rows of cells
///
/// Surrounding whitespace is trimmed from the whole text, lines may end in
/// `\n` or `\r\n`, and cells are split on every comma (the matrix format has
/// no quoting).
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.trim()
        .lines()
        .map(|line| line.split(',').map(|cell| cell.to_string()).collect())
        .collect()
}

/// Parse matrix text, see [`split_rows`] and [`load_matrix`]
pub fn parse_matrix(text: &str) -> Result<CorrelationMatrix> {
    load_matrix(&split_rows(text))
}

/// Build a [`CorrelationMatrix`] from pre-split rows
///
/// The first header cell is ignored; the remaining header cells define the
/// column order. Every data row must have exactly as many cells as the header.
pub fn load_matrix<R: AsRef<[String]>>(rows: &[R]) -> Result<CorrelationMatrix> {
    if rows.len() < 2 {
        return Err(Error::MalformedMatrix(format!(
            "expected a header and at least one row, found {} row(s)",
            rows.len()
        )));
    }

    let header = rows[0].as_ref();
    if header.len() < 2 {
        return Err(Error::MalformedMatrix(
            "header has no field columns".to_string(),
        ));
    }

    let index = LabelIndex::from_field_ids(header[1..].iter().map(|f| f.trim().to_string()))?;
    let width = header.len();
    let data_rows = &rows[1..];

    if data_rows.len() != index.len() {
        warn!(
            "Correlation matrix has {} rows for {} columns; grid will not be square",
            data_rows.len(),
            index.len()
        );
    }

    let mut cells = Vec::with_capacity(data_rows.len() * index.len());
    for (row_number, row) in data_rows.iter().enumerate() {
        let row = row.as_ref();
        // +2: one for the header, one for 1-based numbering
        let line = row_number + 2;

        if row.len() != width {
            return Err(Error::MalformedMatrix(format!(
                "row {} has {} cells, header has {}",
                line,
                row.len(),
                width
            )));
        }

        let row_field = row[0].trim();
        let row_label = match index.label_for(row_field) {
            Some(label) => label.to_string(),
            None => {
                return Err(Error::MalformedMatrix(format!(
                    "row {} names field '{}' which is not a header column",
                    line, row_field
                )))
            }
        };
        for (col, raw) in row[1..].iter().enumerate() {
            cells.push(CorrelationCell {
                row_label: row_label.clone(),
                col_label: index.labels()[col].clone(),
                correlation: parse_cell(raw, line, col + 2)?,
            });
        }
    }

    debug!(
        "Loaded correlation matrix: {} labels, {} cells",
        index.len(),
        cells.len()
    );

    Ok(CorrelationMatrix { index, cells })
}

fn parse_cell(raw: &str, line: usize, column: usize) -> Result<Option<f64>> {
    let token = raw.trim();
    if token.is_empty() {
        return Ok(None);
    }

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(Error::MalformedMatrix(format!(
            "row {} column {}: '{}' is not a number",
            line, column, token
        ))),
    }
}

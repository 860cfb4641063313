//! Song records loaded from tabular data files
//!
//! Columns are dynamically typed the same way for every file: cells that look
//! like decimal numbers become numbers, `true`/`false` become booleans, empty
//! cells become null, and everything else stays a string.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Serialize;

use crate::Result;

/// Column holding the track title
pub const TRACK_NAME: &str = "track_name";
/// Column holding the artist list (`;`-separated in the source data)
pub const ARTISTS: &str = "artists";
/// Column holding the genre label
pub const TRACK_GENRE: &str = "track_genre";

/// A dynamically typed cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl FieldValue {
    /// Infer the type of a raw cell
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Null;
        }
        match trimmed {
            "true" | "True" | "TRUE" => return FieldValue::Bool(true),
            "false" | "False" | "FALSE" => return FieldValue::Bool(false),
            _ => {}
        }
        if looks_numeric(trimmed) {
            if let Ok(value) = trimmed.parse::<f64>() {
                if value.is_finite() {
                    return FieldValue::Number(value);
                }
            }
        }
        FieldValue::Text(raw.to_string())
    }

    /// The value as a finite number, if it is one
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

// Rust's float parser also accepts "inf", "NaN" and "infinity"; those stay text.
fn looks_numeric(s: &str) -> bool {
    let digits = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
}

/// One row of a song data file, keyed by column name
///
/// Serializes as a flat JSON object so it can be embedded directly as chart
/// data values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SongRecord {
    values: BTreeMap<String, FieldValue>,
}

impl SongRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with(mut self, column: impl Into<String>, value: FieldValue) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: FieldValue) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    /// Finite numeric value of a column; `None` for missing, null, text or non-finite
    pub fn finite(&self, column: &str) -> Option<f64> {
        self.values.get(column).and_then(FieldValue::as_finite)
    }

    pub fn track_name(&self) -> Option<&str> {
        self.text(TRACK_NAME)
    }

    pub fn artists(&self) -> Option<&str> {
        self.text(ARTISTS)
    }

    pub fn genre(&self) -> Option<&str> {
        self.text(TRACK_GENRE)
    }

    fn text(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(FieldValue::as_str)
    }
}

/// Read header-first CSV into song records
///
/// Blank lines are skipped. Rows shorter than the header simply lack the
/// trailing columns.
pub fn read_songs<R: Read>(reader: R) -> Result<Vec<SongRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let mut record = SongRecord::new();
        for (column, raw) in headers.iter().zip(row.iter()) {
            record.set(column, FieldValue::infer(raw));
        }
        records.push(record);
    }

    Ok(records)
}

/// Parse song records from CSV text, see [`read_songs`]
pub fn parse_songs(text: &str) -> Result<Vec<SongRecord>> {
    read_songs(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_numbers() {
        assert_eq!(FieldValue::infer("0.5"), FieldValue::Number(0.5));
        assert_eq!(FieldValue::infer("-12"), FieldValue::Number(-12.0));
        assert_eq!(FieldValue::infer(".25"), FieldValue::Number(0.25));
        assert_eq!(FieldValue::infer("1e3"), FieldValue::Number(1000.0));
    }

    #[test]
    fn test_infer_non_numbers() {
        assert_eq!(FieldValue::infer(""), FieldValue::Null);
        assert_eq!(FieldValue::infer("  "), FieldValue::Null);
        assert_eq!(FieldValue::infer("True"), FieldValue::Bool(true));
        assert_eq!(FieldValue::infer("false"), FieldValue::Bool(false));
        assert_eq!(FieldValue::infer("inf"), FieldValue::Text("inf".to_string()));
        assert_eq!(FieldValue::infer("NaN"), FieldValue::Text("NaN".to_string()));
        assert_eq!(FieldValue::infer("k-pop"), FieldValue::Text("k-pop".to_string()));
        assert_eq!(FieldValue::infer("1-2"), FieldValue::Text("1-2".to_string()));
    }

    #[test]
    fn test_finite_accessor() {
        let record = SongRecord::new()
            .with("energy", FieldValue::Number(0.7))
            .with("tempo", FieldValue::Null)
            .with("mode", FieldValue::Text("major".to_string()));

        assert_eq!(record.finite("energy"), Some(0.7));
        assert_eq!(record.finite("tempo"), None);
        assert_eq!(record.finite("mode"), None);
        assert_eq!(record.finite("missing"), None);
    }

    #[test]
    fn test_read_songs_with_quoted_fields() {
        let text = "\
track_name,artists,track_genre,energy,tempo
\"Hello, World\",Ann;Bob,pop,0.8,120.5
Quiet,Cara,ambient,0.1,

";
        let songs = parse_songs(text).unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].track_name(), Some("Hello, World"));
        assert_eq!(songs[0].artists(), Some("Ann;Bob"));
        assert_eq!(songs[0].genre(), Some("pop"));
        assert_eq!(songs[0].finite("tempo"), Some(120.5));
        assert_eq!(songs[1].get("tempo"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_short_row_lacks_trailing_columns() {
        let songs = parse_songs("track_name,energy,tempo\nShort,0.4\n").unwrap();
        assert_eq!(songs[0].finite("energy"), Some(0.4));
        assert!(songs[0].get("tempo").is_none());
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = SongRecord::new()
            .with(TRACK_NAME, FieldValue::Text("Song".to_string()))
            .with("energy", FieldValue::Number(0.5))
            .with("explicit", FieldValue::Bool(true))
            .with("tempo", FieldValue::Null);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["track_name"], "Song");
        assert_eq!(json["energy"], 0.5);
        assert_eq!(json["explicit"], true);
        assert!(json["tempo"].is_null());
    }
}

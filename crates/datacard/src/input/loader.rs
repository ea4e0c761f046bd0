//! Dataset loader for JSON, JSON Lines and delimited files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{DataCardError, Result};
use super::dataset::{Dataset, Record};
use super::source::SourceMetadata;
use super::value::Value;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Loader configuration.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Delimiter for delimited files (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum records to read (None = all).
    pub max_records: Option<usize>,
}

/// Supported input layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Json,
    JsonLines,
    Delimited,
}

impl InputFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(InputFormat::Json),
            "jsonl" | "ndjson" => Ok(InputFormat::JsonLines),
            "csv" | "tsv" | "txt" | "psv" => Ok(InputFormat::Delimited),
            other => Err(DataCardError::UnsupportedFormat(format!(
                "'{}' (expected json, jsonl, ndjson, csv, tsv)",
                other
            ))),
        }
    }
}

/// Loads record batches from files.
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a new loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file and return the dataset and metadata.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let format = InputFormat::from_path(path)?;

        let mut file = File::open(path).map_err(|e| DataCardError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| DataCardError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (dataset, format_name) = match format {
            InputFormat::Json => (self.parse_json(&contents)?, "json".to_string()),
            InputFormat::JsonLines => (self.parse_json_lines(&contents)?, "jsonl".to_string()),
            InputFormat::Delimited => {
                let delimiter = match self.config.delimiter {
                    Some(d) => d,
                    None => detect_delimiter(&contents)?,
                };
                let name = match delimiter {
                    b'\t' => "tsv",
                    b',' => "csv",
                    b';' => "csv-semicolon",
                    b'|' => "psv",
                    _ => "delimited",
                };
                (self.parse_delimited(&contents, delimiter)?, name.to_string())
            }
        };

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format_name,
            dataset.len(),
            dataset.field_names().len(),
        );

        Ok((dataset, metadata))
    }

    /// Parse a JSON array of records, or an object carrying a `data` array.
    pub fn parse_json(&self, bytes: &[u8]) -> Result<Dataset> {
        let root: serde_json::Value = serde_json::from_slice(bytes)?;
        let items = match root {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => match map.remove("data") {
                Some(serde_json::Value::Array(items)) => items,
                _ => {
                    return Err(DataCardError::UnsupportedFormat(
                        "JSON object without a 'data' array".to_string(),
                    ));
                }
            },
            _ => {
                return Err(DataCardError::UnsupportedFormat(
                    "JSON root must be an array of records".to_string(),
                ));
            }
        };

        Dataset::from_json_records(self.truncate(items))
    }

    /// Parse one JSON record per line. Blank lines are skipped.
    pub fn parse_json_lines(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut items = Vec::new();
        for line in BufReader::new(bytes).lines() {
            let line = line.map_err(|e| DataCardError::Io {
                path: "<jsonl>".into(),
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            items.push(serde_json::from_str(&line)?);
            if self.config.max_records.is_some_and(|max| items.len() >= max) {
                break;
            }
        }
        Dataset::from_json_records(items)
    }

    /// Parse delimited text with a header row.
    pub fn parse_delimited(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DataCardError::EmptyData("No columns found".to_string()));
        }

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_records.is_some_and(|max| row_idx >= max) {
                break;
            }

            let row = result?;
            let record: Record = headers
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), cell_value(row.get(i).unwrap_or(""))))
                .collect();
            records.push(record);
        }

        Ok(Dataset::new(records))
    }

    fn truncate(&self, mut items: Vec<serde_json::Value>) -> Vec<serde_json::Value> {
        if let Some(max) = self.config.max_records {
            items.truncate(max);
        }
        items
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a cell represents a missing/null value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

/// Interpret a delimited cell.
fn cell_value(cell: &str) -> Value {
    if is_null_value(cell) {
        return Value::Missing;
    }
    match cell.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Text(cell.to_string()),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(DataCardError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Tab gets a slight bonus as it rarely appears inside values
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

//! Historical bar loading from CSV files.
//!
//! Expected format: a header row naming at least `Date,Open,High,Low,Close,Volume`
//! (any order, case-insensitive, extra columns ignored), then one bar per record.
//! Quoted fields may contain commas; numbers may use `,` as a thousands separator.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::domain::{Bar, PriceSeries};
use crate::error::{GymError, Result};

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// One CSV record, keyed on the lowercased header names
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: String,
}

impl CsvRow {
    fn into_bar(self, line: usize) -> Result<Bar> {
        let date = parse_date(&self.date).ok_or_else(|| GymError::Csv {
            line,
            reason: format!("invalid date '{}'", self.date),
        })?;

        Ok(Bar {
            date,
            open: parse_number(&self.open, "Open", line)?,
            high: parse_number(&self.high, "High", line)?,
            low: parse_number(&self.low, "Low", line)?,
            close: parse_number(&self.close, "Close", line)?,
            volume: parse_number(&self.volume, "Volume", line)?,
        })
    }
}

/// Lowercase the header row and check every required column is present
///
/// Returns the normalized headers and the minimum record width that covers
/// all required columns.
fn normalize_headers(raw: &StringRecord) -> Result<(StringRecord, usize)> {
    let mut headers = StringRecord::new();
    for field in raw.iter() {
        headers.push_field(&field.to_ascii_lowercase());
    }

    let mut width = 0;
    for name in REQUIRED_COLUMNS {
        let idx = headers.iter().position(|h| h == name).ok_or_else(|| GymError::Csv {
            line: 1,
            reason: format!("missing required column '{}'", name),
        })?;
        width = width.max(idx + 1);
    }

    Ok((headers, width))
}

fn csv_error(err: &csv::Error, fallback_line: usize) -> GymError {
    GymError::Csv {
        line: err
            .position()
            .map_or(fallback_line, |pos| pos.line() as usize),
        reason: err.to_string(),
    }
}

/// Parse a bar date from `YYYY-MM-DD`, RFC 3339, or a plain datetime
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

fn parse_number(raw: &str, column: &str, line: usize) -> Result<f64> {
    raw.replace(',', "")
        .parse::<f64>()
        .map_err(|_| GymError::Csv {
            line,
            reason: format!("invalid {} value '{}'", column, raw),
        })
}

/// Parse bars from any reader, sorted ascending by date
pub fn parse_bars<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let raw_headers = reader.headers().map_err(|e| csv_error(&e, 1))?.clone();
    if raw_headers.is_empty() {
        return Err(GymError::Csv {
            line: 1,
            reason: "file is empty".to_string(),
        });
    }
    let (headers, width) = normalize_headers(&raw_headers)?;

    let mut bars = Vec::new();
    let mut record = StringRecord::new();

    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| csv_error(&e, 0))?;
        if !more {
            break;
        }

        let line = record.position().map_or(0, |pos| pos.line() as usize);
        if record.len() < width {
            warn!("Skipping malformed line {}: insufficient columns", line);
            continue;
        }

        let row: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| GymError::Csv {
                line,
                reason: e.to_string(),
            })?;
        bars.push(row.into_bar(line)?);
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// Load bars from a CSV file, sorted ascending by date
pub fn load_bars_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let bars = parse_bars(file)?;

    info!("Loaded {} bars from {}", bars.len(), path.display());
    Ok(bars)
}

/// Load and validate a price series from a CSV file
pub fn load_price_series<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
    PriceSeries::new(load_bars_from_csv(path)?)
}

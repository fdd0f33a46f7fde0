//! Bar series loaded from OHLCV CSV files.

use crate::domain::bar::Bar;
use crate::domain::error::SigtraderError;
use crate::domain::num::Num;
use crate::domain::series::Series;
use crate::ports::data_port::SeriesSource;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::path::Path;
use tracing::debug;

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Loads a series from a headered CSV file with timestamp, open, high,
/// low, close and volume columns, in any column order. The series is
/// named after the file stem.
#[derive(Debug, Default)]
pub struct CsvSeriesSource;

impl CsvSeriesSource {
    pub fn new() -> CsvSeriesSource {
        CsvSeriesSource
    }
}

impl SeriesSource for CsvSeriesSource {
    fn load_series(&self, path: &Path) -> Result<Series, SigtraderError> {
        let mut reader = csv::Reader::from_path(path)?;
        let columns = locate_columns(reader.headers()?)?;

        let mut bars = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            bars.push(parse_bar(&record, &columns, line + 2)?);
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(series = %name, bars = bars.len(), "loaded csv series");
        Series::new(name, bars)
    }
}

/// Index of each required column in the header row, matched
/// case-insensitively. "date" is accepted for the timestamp column.
fn locate_columns(headers: &StringRecord) -> Result<[usize; 6], SigtraderError> {
    let mut columns = [usize::MAX; 6];
    for (position, header) in headers.iter().enumerate() {
        let header = header.trim().to_ascii_lowercase();
        let header = if header == "date" {
            "timestamp"
        } else {
            header.as_str()
        };
        if let Some(slot) = COLUMNS.iter().position(|c| *c == header) {
            columns[slot] = position;
        }
    }
    if let Some(missing) = columns.iter().position(|c| *c == usize::MAX) {
        return Err(SigtraderError::DataFormat {
            reason: format!("missing column '{}'", COLUMNS[missing]),
        });
    }
    Ok(columns)
}

fn parse_bar(
    record: &StringRecord,
    columns: &[usize; 6],
    line: usize,
) -> Result<Bar, SigtraderError> {
    let field = |slot: usize| -> Result<&str, SigtraderError> {
        record
            .get(columns[slot])
            .map(str::trim)
            .ok_or_else(|| SigtraderError::DataFormat {
                reason: format!("line {line}: missing field '{}'", COLUMNS[slot]),
            })
    };
    let price = |slot: usize| -> Result<Num, SigtraderError> {
        let raw = field(slot)?;
        raw.parse().map_err(|_| SigtraderError::DataFormat {
            reason: format!("line {line}: bad {} value '{raw}'", COLUMNS[slot]),
        })
    };

    Ok(Bar {
        timestamp: parse_timestamp(field(0)?, line)?,
        open: price(1)?,
        high: price(2)?,
        low: price(3)?,
        close: price(4)?,
        volume: price(5)?,
    })
}

/// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` taken as midnight.
fn parse_timestamp(raw: &str, line: usize) -> Result<NaiveDateTime, SigtraderError> {
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(timestamp);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|_| SigtraderError::DataFormat {
            reason: format!("line {line}: bad timestamp '{raw}'"),
        })
}

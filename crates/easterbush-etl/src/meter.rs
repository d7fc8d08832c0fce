//! AMR meter export parsing.
//!
//! The campus meters export one CSV row per day: a handful of meter
//! metadata columns, a date column labelled `(Data is in GMT Format)`,
//! and 48 half-hour columns labelled `HH:MM` holding kWh for that
//! half-hour. Column labels sometimes carry stray spaces, and cells can
//! be blank where the meter dropped an interval.

use std::path::Path;

use chrono::Duration;
use regex::Regex;

use easterbush_core::series::Series;

use crate::dates::try_parse_timestamp;
use crate::error::{EtlError, EtlResult};

/// Header label of the date column in AMR exports.
pub const DATE_COLUMN: &str = "(Data is in GMT Format)";

/// Parse an AMR meter export into a half-hourly demand series.
///
/// # Errors
/// Returns an error when the date column is missing, a date or value
/// cell cannot be parsed, or two rows cover the same day.
pub fn parse_meter_csv(path: &Path) -> EtlResult<Series> {
    let text = std::fs::read_to_string(path)?;
    parse_meter_text(&text, path)
}

fn parse_meter_text(text: &str, path: &Path) -> EtlResult<Series> {
    let path_str = path.display().to_string();
    let parse_err = |message: String| EtlError::Parse {
        path: path_str.clone(),
        message,
    };

    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| parse_err("empty meter file".into()))?;

    // Some exports pad header cells with spaces.
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();

    let date_col = columns
        .iter()
        .position(|c| c == DATE_COLUMN)
        .ok_or_else(|| EtlError::MissingColumn {
            path: path_str.clone(),
            column: DATE_COLUMN.to_string(),
        })?;

    let time_re = Regex::new(r"^\d{1,2}:\d{2}$")
        .map_err(|e| EtlError::InvalidData(format!("time column pattern: {e}")))?;

    // Columns labelled as times become half-hour offsets from the row's
    // date. "24:00" lands on the next day's midnight.
    let mut time_cols: Vec<(usize, i64)> = Vec::new();
    for (i, column) in columns.iter().enumerate() {
        if i == date_col || !time_re.is_match(column) {
            continue;
        }
        let (h, m) = column
            .split_once(':')
            .ok_or_else(|| parse_err(format!("bad time column {column}")))?;
        let hours: i64 = h
            .parse()
            .map_err(|e| parse_err(format!("bad time column {column}: {e}")))?;
        let minutes: i64 = m
            .parse()
            .map_err(|e| parse_err(format!("bad time column {column}: {e}")))?;
        time_cols.push((i, hours * 60 + minutes));
    }

    if time_cols.is_empty() {
        return Err(parse_err("no half-hour columns in header".into()));
    }

    let mut index = Vec::new();
    let mut values = Vec::new();

    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line_no + 2;
        let fields: Vec<&str> = line.split(',').collect();

        let date_cell = fields
            .get(date_col)
            .ok_or_else(|| parse_err(format!("row {row} has no date column")))?;
        let day = try_parse_timestamp(date_cell)
            .ok_or_else(|| parse_err(format!("unrecognised date {date_cell:?} on row {row}")))?;

        for &(col, offset_minutes) in &time_cols {
            let Some(cell) = fields.get(col) else {
                continue;
            };
            let cell = cell.trim();
            if cell.is_empty() {
                // Dropped interval; the series stays sparse and alignment
                // reports the gap if a scenario needs it.
                continue;
            }
            let value: f64 = cell
                .parse()
                .map_err(|e| parse_err(format!("bad value {cell:?} on row {row}: {e}")))?;
            index.push(day + Duration::minutes(offset_minutes));
            values.push(value);
        }
    }

    Series::new(index, values).map_err(Into::into)
}

//! Wholesale price parsing and derivation.
//!
//! Electricity prices come from an Agile tariff export (`agileout.csv`):
//! headerless rows whose first field is a timestamp and whose fifth field
//! is the unit price in p/kWh. The export covers a different year than
//! the metered data, so the index is shifted back 52 weeks before use.
//! Gas is not metered half-hourly; its price is derived as a quarter of
//! the mean electricity price, held constant over the window.

use std::path::Path;

use chrono::Duration;

use easterbush_core::series::{Series, Snapshots};

use crate::dates::try_parse_timestamp;
use crate::error::{EtlError, EtlResult};

/// Field position of the unit price in the Agile export.
const PRICE_FIELD: usize = 4;

/// Parse an Agile tariff export into a price series.
///
/// # Errors
/// Returns an error for rows with too few fields or unparseable
/// timestamps or prices.
pub fn parse_agile_csv(path: &Path) -> EtlResult<Series> {
    let text = std::fs::read_to_string(path)?;
    parse_agile_text(&text, path)
}

fn parse_agile_text(text: &str, path: &Path) -> EtlResult<Series> {
    let path_str = path.display().to_string();
    let parse_err = |message: String| EtlError::Parse {
        path: path_str.clone(),
        message,
    };

    let mut index = Vec::new();
    let mut values = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line_no + 1;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() <= PRICE_FIELD {
            return Err(parse_err(format!(
                "row {row} has {} fields, expected at least {}",
                fields.len(),
                PRICE_FIELD + 1
            )));
        }

        let timestamp = try_parse_timestamp(fields[0])
            .ok_or_else(|| parse_err(format!("unrecognised timestamp {:?} on row {row}", fields[0])))?;
        let price: f64 = fields[PRICE_FIELD]
            .trim()
            .parse()
            .map_err(|e| parse_err(format!("bad price {:?} on row {row}: {e}", fields[PRICE_FIELD])))?;

        index.push(timestamp);
        values.push(price);
    }

    Series::new(index, values).map_err(Into::into)
}

/// Shift a tariff series back 52 weeks so the price year lines up with
/// the metered year.
#[must_use]
pub fn shift_tariff_year(series: Series) -> Series {
    series.shift(Duration::weeks(-52))
}

/// Gas price: a quarter of the mean electricity price, constant over the
/// window.
///
/// # Errors
/// Returns an error if the electricity price series is empty.
pub fn derive_gas_price(elec_price: &Series, snapshots: &Snapshots) -> EtlResult<Series> {
    let mean = elec_price.mean()?;
    Ok(Series::constant(snapshots, mean / 4.0))
}

/// Write a price series in the Agile export layout, so fetched rates can
/// be re-read by [`parse_agile_csv`].
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_agile_csv(series: &Series, path: &Path) -> EtlResult<()> {
    let mut out = String::new();
    for (t, v) in series.iter() {
        out.push_str(&format!("{},,,,{v}\n", t.format("%Y-%m-%d %H:%M:%S")));
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
2020-01-01 00:00:00,a,b,c,10.5
2020-01-01 00:30:00,a,b,c,12.0
2020-01-01 01:00:00,a,b,c,8.5
";

    fn write_sample(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_reads_fifth_field() {
        let file = write_sample(SAMPLE);
        let series = parse_agile_csv(file.path()).unwrap();
        assert_eq!(series.len(), 3);
        assert!((series.values()[1] - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_row_rejected() {
        let file = write_sample("2020-01-01 00:00:00,only,three\n");
        let result = parse_agile_csv(file.path());
        assert!(matches!(result, Err(EtlError::Parse { .. })));
    }

    #[test]
    fn test_year_shift() {
        let file = write_sample(SAMPLE);
        let series = shift_tariff_year(parse_agile_csv(file.path()).unwrap());
        // 52 weeks before 2020-01-01 is 2019-01-02.
        let expected = Utc.with_ymd_and_hms(2019, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(series.index()[0], expected);
    }

    #[test]
    fn test_gas_price_is_quarter_of_mean() {
        let file = write_sample(SAMPLE);
        let elec = parse_agile_csv(file.path()).unwrap();

        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let snaps = Snapshots::half_hourly(start, start).unwrap();
        let gas = derive_gas_price(&elec, &snaps).unwrap();

        let expected = (10.5 + 12.0 + 8.5) / 3.0 / 4.0;
        assert!((gas.values()[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_agile_round_trip() {
        let file = write_sample(SAMPLE);
        let series = parse_agile_csv(file.path()).unwrap();

        let out = NamedTempFile::new().unwrap();
        write_agile_csv(&series, out.path()).unwrap();
        let reread = parse_agile_csv(out.path()).unwrap();
        assert_eq!(series, reread);
    }
}

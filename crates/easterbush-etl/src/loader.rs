//! Assembling aligned site data from the raw exports.

use easterbush_core::model::SiteData;
use easterbush_core::series::{Series, Snapshots};

use crate::config::Config;
use crate::error::EtlResult;
use crate::meter::parse_meter_csv;
use crate::tariff::{derive_gas_price, parse_agile_csv, shift_tariff_year};

/// Load, resample, and align everything a scenario needs.
///
/// Demand series are sum-resampled (they carry energy), the price series
/// is mean-resampled (it carries a rate) after the 52-week year shift.
/// With `static_elec_price`, the electricity price is flattened to its
/// window mean, which some scenarios use to isolate plant behavior from
/// tariff volatility.
///
/// # Errors
/// Propagates parse failures and alignment gaps.
pub fn load_site_data(
    config: &Config,
    snapshots: &Snapshots,
    static_elec_price: bool,
) -> EtlResult<SiteData> {
    let step = snapshots.step();

    log::info!(
        "Loading site data for {} snapshots from {}",
        snapshots.len(),
        config.data_dir.display()
    );

    let heat_demand = parse_meter_csv(&config.heat_demand_path())?
        .resample_sum(step)?
        .align_to("heat_demand", snapshots)?;

    let elec_demand = parse_meter_csv(&config.elec_demand_path())?
        .resample_sum(step)?
        .align_to("elec_demand", snapshots)?;

    let mut elec_price = shift_tariff_year(parse_agile_csv(&config.elec_price_path())?)
        .resample_mean(step)?
        .align_to("elec_price", snapshots)?;

    if static_elec_price {
        let mean = elec_price.mean()?;
        elec_price = Series::constant(snapshots, mean);
    }

    let gas_price = derive_gas_price(&elec_price, snapshots)?;

    Ok(SiteData {
        heat_demand,
        elec_demand,
        elec_price,
        gas_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::path::PathBuf;

    fn write_fixtures(dir: &std::path::Path) {
        // Two days of four half-hours each, enough for a short window.
        let meter = "\
MPAN,(Data is in GMT Format),00:30,01:00,01:30,02:00
x,01/01/2019,1.0,2.0,3.0,4.0
x,02/01/2019,5.0,6.0,7.0,8.0
";
        std::fs::write(dir.join("heat.csv"), meter).unwrap();
        std::fs::write(dir.join("elec.csv"), meter).unwrap();

        // Prices dated one tariff-year later, shifted back on load.
        let mut agile = String::new();
        let price_start = Utc.with_ymd_and_hms(2019, 12, 31, 0, 30, 0).unwrap();
        for i in 0..8 {
            let t = price_start + Duration::minutes(30 * i);
            agile.push_str(&format!("{},,,,{}\n", t.format("%Y-%m-%d %H:%M:%S"), 10 + i));
        }
        std::fs::write(dir.join("agileout.csv"), agile).unwrap();
    }

    fn config_for(dir: &std::path::Path) -> Config {
        Config {
            data_dir: dir.to_path_buf(),
            heat_demand_path: Some(dir.join("heat.csv")),
            elec_demand_path: Some(dir.join("elec.csv")),
            elec_price_path: Some(dir.join("agileout.csv")),
            database_path: PathBuf::from(":memory:"),
            ..Config::default()
        }
    }

    #[test]
    fn test_load_site_data_aligns_everything() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());

        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 1, 1, 2, 0, 0).unwrap();
        let snapshots = Snapshots::half_hourly(start, end).unwrap();

        let data = load_site_data(&config_for(dir.path()), &snapshots, false).unwrap();
        data.validate(&snapshots).unwrap();
        assert!((data.heat_demand.values()[0] - 1.0).abs() < 1e-12);
        // Gas is a quarter of the mean electricity price.
        let expected_gas = data.elec_price.mean().unwrap() / 4.0;
        assert!((data.gas_price.values()[0] - expected_gas).abs() < 1e-12);
    }

    #[test]
    fn test_static_elec_price_flattens() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());

        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 1, 1, 2, 0, 0).unwrap();
        let snapshots = Snapshots::half_hourly(start, end).unwrap();

        let data = load_site_data(&config_for(dir.path()), &snapshots, true).unwrap();
        let first = data.elec_price.values()[0];
        assert!(data
            .elec_price
            .values()
            .iter()
            .all(|v| (v - first).abs() < 1e-12));
    }

    #[test]
    fn test_window_outside_data_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());

        let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap();
        let snapshots = Snapshots::half_hourly(start, end).unwrap();

        let result = load_site_data(&config_for(dir.path()), &snapshots, false);
        assert!(result.is_err());
    }
}

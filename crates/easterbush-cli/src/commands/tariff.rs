use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use std::path::PathBuf;

use easterbush_etl::tariff::write_agile_csv;
use easterbush_etl::{Config, OctopusClient};

/// Fetch Agile unit rates and store them in the agileout layout.
pub async fn run_tariff_fetch(
    config: &Config,
    from: NaiveDate,
    to: NaiveDate,
    out: Option<PathBuf>,
) -> Result<()> {
    let from_ts = from
        .and_hms_opt(0, 0, 0)
        .context("bad from date")?
        .and_utc();
    // Half-open on the API side: include the whole last day.
    let to_ts = to
        .and_hms_opt(0, 0, 0)
        .context("bad to date")?
        .and_utc()
        + Duration::days(1);

    let client = OctopusClient::new()?;
    log::info!(
        "Fetching {} rates for {} from {from} to {to}",
        config.octopus_product,
        config.octopus_tariff
    );

    let series = client
        .fetch_unit_rates(&config.octopus_product, &config.octopus_tariff, from_ts, to_ts)
        .await?;

    let out = out.unwrap_or_else(|| config.elec_price_path());
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_agile_csv(&series, &out)?;

    println!("✓ Fetched {} unit rates to {}", series.len(), out.display());
    Ok(())
}

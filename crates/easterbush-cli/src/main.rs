use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use easterbush_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "easterbush", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/easterbush/easterbush.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Scan and ingest the data directory through the pipeline
    Prepare {
        /// Data directory (default: configured data_dir)
        data_dir: Option<PathBuf>,
    },
    /// Register input data files without ingesting them
    Scan {
        /// Data directory (default: configured data_dir)
        data_dir: Option<PathBuf>,
    },
    /// Run a dispatch scenario over a time window
    ///
    /// Loads the metered campus demand and the wholesale tariff for the
    /// window, assembles the scenario's plant, and dispatches it one
    /// snapshot at a time:
    ///
    /// - Scenario 1: CHP + boiler + market; the tank store is installed
    ///   but cannot charge, and the tariff is flattened to its mean
    /// - Scenario 2: adds the heat pump working the tank store
    /// - Scenario 3: adds the seasonal thermal store
    ///
    /// Heat demand is served in merit order (stores, CHP, boiler, heat
    /// pump by cost); the CHP honours its backpressure and ramp rules
    /// and never exports electricity. Demand that no plant can cover is
    /// recorded as unserved energy, not an error.
    ///
    /// Output:
    /// - The dispatch summary (per-component energy and cost, peaks,
    ///   store cycles, emissions, grand total)
    /// - A run id; the run and its component totals are stored in the
    ///   database for `easterbush report` and `easterbush status`
    Simulate {
        /// Scenario number (1, 2, or 3)
        #[arg(long)]
        scenario: u8,
        /// First day of the window (e.g. 2019-01-01)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the window, inclusive
        #[arg(long)]
        end: NaiveDate,
        /// TOML file overriding the campus plant parameters
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Show the stored report for a run
    Report {
        /// Run id (default: the most recent run)
        run_id: Option<String>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show dataset and run status
    Status,
    /// Describe a scenario's network topology
    Topology {
        /// Scenario number (1, 2, or 3)
        #[arg(long, default_value_t = 2)]
        scenario: u8,
        /// Emit Graphviz DOT instead of text
        #[arg(long)]
        dot: bool,
    },
    /// Fetch wholesale tariff data
    #[command(subcommand)]
    Tariff(TariffCommands),
    /// Show or edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, clap::Subcommand)]
enum TariffCommands {
    /// Fetch Agile half-hourly unit rates and write them as agileout.csv
    Fetch {
        /// First day to fetch (e.g. 2020-01-01)
        #[arg(long)]
        from: NaiveDate,
        /// Last day to fetch, inclusive
        #[arg(long)]
        to: NaiveDate,
        /// Output file (default: the configured elec_price_path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommands {
    /// Show the current effective configuration
    Show,
    /// Get a config value (or dump the config file)
    Get { key: Option<String> },
    /// Set a config value
    Set { key: String, value: String },
    /// Show the config file path
    Path,
    /// Show an example configuration
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.db {
        Some(db) => Config::load_with_db_path(db)?,
        None => Config::load()?,
    };

    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match cli.command {
        Commands::Prepare { data_dir } => {
            commands::run_prepare(&config, data_dir).await?;
        }
        Commands::Scan { data_dir } => {
            commands::run_scan(&config, data_dir)?;
        }
        Commands::Simulate {
            scenario,
            start,
            end,
            params,
        } => {
            commands::run_simulate(&config, scenario, start, end, params)?;
        }
        Commands::Report { run_id, json } => {
            commands::show_report(&config, run_id, json)?;
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
        Commands::Topology { scenario, dot } => {
            commands::show_topology(scenario, dot)?;
        }
        Commands::Tariff(TariffCommands::Fetch { from, to, out }) => {
            commands::run_tariff_fetch(&config, from, to, out).await?;
        }
        Commands::Config(command) => match command {
            ConfigCommands::Show => commands::config::show_config()?,
            ConfigCommands::Get { key } => commands::config::get_config(key)?,
            ConfigCommands::Set { key, value } => commands::config::set_config(key, value)?,
            ConfigCommands::Path => commands::config::show_path()?,
            ConfigCommands::Example => commands::config::show_example()?,
            ConfigCommands::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}

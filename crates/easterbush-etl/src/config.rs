use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for easterbush.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (EBE_* prefix)
/// 3. Config file (~/.config/easterbush/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the campus data exports.
    ///
    /// Can be set via:
    /// - ENV: EBE_DATA_DIR
    /// - Config: data_dir = "/path/to/data"
    /// - Default: ~/.local/share/easterbush/data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: EBE_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/easterbush/easterbush.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Heat meter export; defaults to the campus heat meter file under
    /// the data directory.
    pub heat_demand_path: Option<PathBuf>,

    /// Electricity meter export; defaults to the campus electricity
    /// meter file under the data directory.
    pub elec_demand_path: Option<PathBuf>,

    /// Agile price export; defaults to agileout.csv under the data
    /// directory.
    pub elec_price_path: Option<PathBuf>,

    /// Octopus product code for tariff fetches.
    #[serde(default = "default_octopus_product")]
    pub octopus_product: String,

    /// Octopus tariff code for tariff fetches.
    #[serde(default = "default_octopus_tariff")]
    pub octopus_tariff: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging settings surfaced by the `config` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    level: Option<String>,
    coloured: Option<bool>,
}

impl LoggingConfig {
    #[must_use]
    pub fn level(&self) -> String {
        self.level.clone().unwrap_or_else(|| "info".to_string())
    }

    #[must_use]
    pub fn coloured(&self) -> bool {
        self.coloured.unwrap_or(true)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_path: default_db_path(),
            heat_demand_path: None,
            elec_demand_path: None,
            elec_price_path: None,
            octopus_product: default_octopus_product(),
            octopus_tariff: default_octopus_tariff(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/easterbush/config.toml
    /// Reads environment variables with EBE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("ebe");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }

    /// Resolved path of the heat meter export.
    #[must_use]
    pub fn heat_demand_path(&self) -> PathBuf {
        self.heat_demand_path.clone().unwrap_or_else(|| {
            self.data_dir
                .join("UoE_energy_data")
                .join("AMR_Data_for_meter_0795NH001S_Easter Bush Heat.csv")
        })
    }

    /// Resolved path of the electricity meter export.
    #[must_use]
    pub fn elec_demand_path(&self) -> PathBuf {
        self.elec_demand_path.clone().unwrap_or_else(|| {
            self.data_dir
                .join("UoE_energy_data")
                .join("AMR_Data_for_meter_0795NE003V_Easter Bush Elec.csv")
        })
    }

    /// Resolved path of the Agile price export.
    #[must_use]
    pub fn elec_price_path(&self) -> PathBuf {
        self.elec_price_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("agileout.csv"))
    }
}

/// Get the default data directory.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("easterbush")
        .join("data")
}

/// Get the default database path.
///
/// Returns: ~/.local/share/easterbush/easterbush.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("easterbush")
        .join("easterbush.db")
}

fn default_octopus_product() -> String {
    "AGILE-18-02-21".to_string()
}

fn default_octopus_tariff() -> String {
    "E-1R-AGILE-18-02-21-N".to_string()
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/easterbush/config.toml
/// - macOS: ~/Library/Application Support/easterbush/config.toml
/// - Windows: %APPDATA%\easterbush\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("easterbush")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Easterbush Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (EBE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Directory holding the campus data exports (AMR meter CSVs, agileout.csv)
#
# Can also be set via:
# - Environment: EBE_DATA_DIR=/path/to/data
#data_dir = "/path/to/data"

# Path to the SQLite database
#
# Stores the dataset registry and simulation-run history
#
# Can also be set via:
# - CLI: easterbush --db /custom/path.db status
# - Environment: EBE_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/easterbush.db"

# Octopus Agile product and tariff codes, used by `easterbush tariff fetch`
#octopus_product = "AGILE-18-02-21"
#octopus_tariff = "E-1R-AGILE-18-02-21-N"

# Explicit input file overrides (defaults live under data_dir)
#heat_demand_path = "/path/to/heat.csv"
#elec_demand_path = "/path/to/elec.csv"
#elec_price_path = "/path/to/agileout.csv"

#[logging]
#level = "info"
#coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

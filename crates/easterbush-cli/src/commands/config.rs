use anyhow::{Context, Result};
use easterbush_etl::{config, Config};

/// Keys the `config set` command accepts.
const SETTABLE_KEYS: &[&str] = &[
    "data_dir",
    "database_path",
    "octopus_product",
    "octopus_tariff",
];

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  data_dir: {}", config.data_dir.display());
    println!("  database_path: {}", config.database_path.display());
    println!("  heat_demand_path: {}", config.heat_demand_path().display());
    println!("  elec_demand_path: {}", config.elec_demand_path().display());
    println!("  elec_price_path: {}", config.elec_price_path().display());
    println!("  octopus_product: {}", config.octopus_product);
    println!("  octopus_tariff: {}", config.octopus_tariff);
    println!("  logging.level: {}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());

    println!("\nPriority: CLI args > ENV vars (EBE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;

        match key.as_str() {
            "data_dir" => println!("{}", config.data_dir.display()),
            "database_path" => println!("{}", config.database_path.display()),
            "octopus_product" => println!("{}", config.octopus_product),
            "octopus_tariff" => println!("{}", config.octopus_tariff),
            _ => {
                anyhow::bail!(
                    "Unknown config key: {}\n\nValid keys: {}",
                    key,
                    SETTABLE_KEYS.join(", ")
                );
            }
        }
    } else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'easterbush config init' to create it.");
        }
    }

    Ok(())
}

/// Replace (or append) a top-level `key = "value"` line.
fn set_key(contents: &str, key: &str, value: &str) -> String {
    let mut new_lines = Vec::new();
    let mut found = false;

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(key) && !trimmed.starts_with('#') {
            new_lines.push(format!("{key} = \"{value}\""));
            found = true;
        } else {
            new_lines.push(line.to_string());
        }
    }

    if !found {
        new_lines.push(format!("\n{key} = \"{value}\""));
    }

    new_lines.join("\n")
}

/// Set a config value.
pub fn set_config(key: String, value: String) -> Result<()> {
    if !SETTABLE_KEYS.contains(&key.as_str()) {
        anyhow::bail!(
            "Unknown config key: {}\n\nValid keys: {}",
            key,
            SETTABLE_KEYS.join(", ")
        );
    }

    let config_path = config::config_file_path();

    // Ensure config file exists
    config::ensure_config_file()?;

    let contents =
        std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let contents = set_key(&contents, &key, &value);

    std::fs::write(&config_path, contents).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure easterbush.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_key_replaces_existing() {
        let contents = "# comment\ndata_dir = \"/old\"\nother = 1";
        let updated = set_key(contents, "data_dir", "/new");
        assert!(updated.contains("data_dir = \"/new\""));
        assert!(!updated.contains("/old"));
        assert!(updated.contains("other = 1"));
    }

    #[test]
    fn test_set_key_appends_missing() {
        let contents = "# comment only";
        let updated = set_key(contents, "octopus_product", "AGILE-X");
        assert!(updated.contains("octopus_product = \"AGILE-X\""));
    }

    #[test]
    fn test_set_key_ignores_commented_lines() {
        let contents = "#data_dir = \"/commented\"";
        let updated = set_key(contents, "data_dir", "/new");
        assert!(updated.contains("#data_dir = \"/commented\""));
        assert!(updated.contains("data_dir = \"/new\""));
    }
}

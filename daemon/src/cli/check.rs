//! Validate the config file without starting the watcher.

use std::path::Path;

use crate::config::Config;
use crate::error::Error;

/// Load and validate the config, then print what the daemon would do.
pub fn run(conf_path: &Path) -> Result<(), Error> {
    let config = Config::load(conf_path)?;
    let zone = config.zone()?;

    println!("minewatchd config: {}", conf_path.display());
    println!("  Log file: {}", config.log_file.display());
    if !config.log_file.exists() {
        println!("    (does not exist yet, the daemon will fail to start)");
    }
    println!("  Time zone: {}", zone);
    println!("  Watch mode: {:?}", config.watch_mode);
    println!("  Notify URL: {}", display_or_none(&config.notify_url));
    println!("  Recipients: {}", display_list(&config.emails));
    println!("  Muted users: {}", display_list(&config.muted_users));
    println!("  Notify timeout: {}s", config.notify_timeout_secs);

    Ok(())
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

fn display_list(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

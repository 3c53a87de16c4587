//! Run a single log line through the parser and classifier.

use std::path::Path;

use crate::config::{self, Config};
use crate::error::Error;
use crate::scanner::FreshnessGate;
use crate::watcher::{classify, parse_line, LineEvent};

/// Print how the daemon would treat `line`. Never sends a notice.
///
/// `time_zone` overrides the config; with it, no config file is needed.
pub fn run(conf_path: &Path, line: &str, time_zone: Option<&str>) -> Result<(), Error> {
    let zone = match time_zone {
        Some(name) => config::resolve_zone(name)?,
        None => Config::load(conf_path)?.zone()?,
    };

    let record = match parse_line(line, zone) {
        Ok(record) => record,
        Err(e) => {
            println!("Unparsed: {}", e);
            return Ok(());
        }
    };

    println!("Timestamp: {}", record.timestamp);
    println!("Body: {}", record.body);

    let event = classify(&record.body);
    match event {
        LineEvent::Login(user) => println!("Event: {} joined", user),
        LineEvent::Logout(user) => println!("Event: {} left", user),
        LineEvent::Chat => println!("Event: chat message"),
        LineEvent::Other => println!("Event: none"),
    }

    if matches!(event, LineEvent::Login(_) | LineEvent::Logout(_)) {
        let fresh = FreshnessGate::new().is_fresh(&record.timestamp);
        println!("Fresh: {}", if fresh { "yes" } else { "no" });
    }

    Ok(())
}

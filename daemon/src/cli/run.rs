//! Follow the server log and send notices.

use std::path::Path;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::notice::{http, Dispatcher, HttpChannel};
use crate::scanner::{LogScanner, MuteSet};
use crate::watcher::TailLoop;

/// Run the daemon. Only returns on a fatal error.
pub fn run(conf_path: &Path) -> Result<(), Error> {
    let config = Config::load(conf_path)?;
    let zone = config.zone()?;

    let dispatcher = build_dispatcher(&config)?;
    let mutes = MuteSet::new(config.muted_users.iter().cloned());
    if !mutes.is_empty() {
        info!(muted = mutes.len(), "Muting users");
    }
    let mut scanner = LogScanner::new(zone, dispatcher, mutes);

    let mut tail = TailLoop::open(&config.log_file, config.watch_mode, config.poll_interval())?;
    info!(zone = %zone, "minewatchd started");

    tail.run(&mut scanner)
}

/// One HTTP channel per configured address, in config order.
pub fn build_dispatcher(config: &Config) -> Result<Dispatcher, Error> {
    let client = http::build_client(config.notify_timeout())?;

    let mut dispatcher = Dispatcher::new();
    for email in &config.emails {
        dispatcher.push(Box::new(HttpChannel::new(
            email.as_str(),
            config.notify_url.as_str(),
            client.clone(),
        )));
    }

    if dispatcher.is_empty() {
        warn!("No recipients configured, player events will only be logged");
    } else {
        info!(channels = dispatcher.len(), url = %config.notify_url, "Notice channels ready");
    }
    Ok(dispatcher)
}

//! File watcher for the server log.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{Config, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::Error;

/// Blocks until the watched file has been written to.
pub trait ChangeWatcher {
    /// Return once a modify event is observed. Any other event is discarded.
    fn wait(&mut self) -> Result<(), Error>;
}

/// How file changes are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchMode {
    /// OS notification (inotify, kqueue, ...).
    #[default]
    Native,
    /// Periodic size/mtime comparison, for filesystems without notifications.
    Poll,
}

/// Watches a single log file for modifications.
pub struct FileWatcher {
    // Dropping the watcher ends the subscription.
    _watcher: Box<dyn Watcher>,
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
    path: PathBuf,
}

impl FileWatcher {
    /// Subscribe to changes of `path`.
    pub fn open(path: &Path, mode: WatchMode, poll_interval: Duration) -> Result<Self, Error> {
        let (tx, rx) = mpsc::channel();

        let handler = move |res: notify::Result<notify::Event>| {
            // Receiver gone means the tail loop is shutting down.
            let _ = tx.send(res);
        };

        let mut watcher: Box<dyn Watcher> = match mode {
            WatchMode::Native => Box::new(RecommendedWatcher::new(handler, Config::default())?),
            WatchMode::Poll => Box::new(PollWatcher::new(
                handler,
                Config::default().with_poll_interval(poll_interval),
            )?),
        };

        watcher.watch(path, RecursiveMode::NonRecursive)?;
        info!(path = %path.display(), ?mode, "Watching for log changes");

        Ok(Self {
            _watcher: watcher,
            rx,
            path: path.to_path_buf(),
        })
    }
}

impl ChangeWatcher for FileWatcher {
    fn wait(&mut self) -> Result<(), Error> {
        loop {
            let event = self.rx.recv().map_err(|_| Error::WatchClosed)??;

            if is_modify(&event.kind) {
                debug!(path = %self.path.display(), kind = ?event.kind, "File modified");
                return Ok(());
            }
            trace!(kind = ?event.kind, "Ignoring watch event");
        }
    }
}

fn is_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_))
}

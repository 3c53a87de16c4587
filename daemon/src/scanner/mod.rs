//! Per-line pipeline: parse, classify, gate, dispatch.

pub mod gate;

pub use gate::{FreshnessGate, MuteSet};

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{info, trace, warn};

use crate::notice::{DispatchReport, Dispatcher};
use crate::watcher::{classify, parse_line, LineEvent, LineHandler};

/// Result of scanning one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Unparsed,
    /// Chat or a line that is not a join/leave.
    Ignored,
    Stale,
    Muted,
    Dispatched(DispatchReport),
}

/// Turns log lines into join/leave notices.
pub struct LogScanner {
    zone: Tz,
    gate: FreshnessGate,
    mutes: MuteSet,
    dispatcher: Dispatcher,
}

impl LogScanner {
    pub fn new(zone: Tz, dispatcher: Dispatcher, mutes: MuteSet) -> Self {
        Self {
            zone,
            gate: FreshnessGate::new(),
            mutes,
            dispatcher,
        }
    }

    #[cfg(test)]
    pub fn with_gate(mut self, gate: FreshnessGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn scan(&self, line: &str) -> ScanOutcome {
        let record = match parse_line(line, self.zone) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping unparsable log line");
                return ScanOutcome::Unparsed;
            }
        };

        let (user, status) = match classify(&record.body) {
            LineEvent::Login(user) => (user, "online"),
            LineEvent::Logout(user) => (user, "offline"),
            LineEvent::Chat | LineEvent::Other => return ScanOutcome::Ignored,
        };

        if !self.gate.is_fresh(&record.timestamp) {
            trace!(user, %record.timestamp, "Stale event");
            return ScanOutcome::Stale;
        }
        if self.mutes.is_muted(user) {
            trace!(user, "Muted user");
            return ScanOutcome::Muted;
        }

        info!(user, status, "Player event");
        let message = notice_message(&record.timestamp, user, status);
        ScanOutcome::Dispatched(self.dispatcher.dispatch(&message))
    }
}

impl LineHandler for LogScanner {
    fn handle(&mut self, line: &str) {
        if let ScanOutcome::Dispatched(report) = self.scan(line) {
            if report.failed > 0 {
                warn!(
                    delivered = report.delivered,
                    failed = report.failed,
                    "Notice not delivered to every channel"
                );
            }
        }
    }
}

/// `"<time>\n<user> <status>\n"`.
pub fn notice_message(timestamp: &DateTime<Tz>, user: &str, status: &str) -> String {
    format!(
        "{}\n{} {}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S %z %Z"),
        user,
        status
    )
}

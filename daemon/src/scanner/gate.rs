//! Admission checks applied to player events before a notice goes out.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Maximum event age, in seconds, that still gets announced.
pub const FRESHNESS_WINDOW_SECS: i64 = 10;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Drops events older than the freshness window.
///
/// Tailing starts at the top of the file, so without this every old join in
/// `latest.log` would be announced again on each restart.
pub struct FreshnessGate {
    clock: Box<dyn Clock>,
    window: TimeDelta,
}

impl FreshnessGate {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            window: TimeDelta::seconds(FRESHNESS_WINDOW_SECS),
        }
    }

    /// `now - event_time <= window`, with `now` taken in the event's zone.
    /// Events stamped in the future are fresh.
    pub fn is_fresh<Tz: TimeZone>(&self, event_time: &DateTime<Tz>) -> bool {
        let now = self.clock.now().with_timezone(&event_time.timezone());
        now.signed_duration_since(event_time.clone()) <= self.window
    }
}

impl Default for FreshnessGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Usernames whose events are never announced.
#[derive(Debug, Clone, Default)]
pub struct MuteSet {
    users: HashSet<String>,
}

impl MuteSet {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_muted(&self, user: &str) -> bool {
        self.users.contains(user)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Always reports the same instant.
    pub struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }
}

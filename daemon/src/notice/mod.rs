//! Notice delivery.
//!
//! A [`Dispatcher`] fans one message out to every registered [`Channel`] in
//! order. A failing channel is logged and skipped; nothing is retried.

pub mod http;

pub use http::HttpChannel;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Wire payload handed to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notice {
    pub recipient: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("non-200 response: {0}")]
    Status(reqwest::StatusCode),
}

/// Something that can deliver a notice message.
pub trait Channel {
    /// Label used in logs.
    fn name(&self) -> &str;

    fn deliver(&self, message: &str) -> Result<(), DeliveryError>;
}

/// Outcome of one [`Dispatcher::dispatch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Ordered list of channels.
#[derive(Default)]
pub struct Dispatcher {
    channels: Vec<Box<dyn Channel>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, channel: Box<dyn Channel>) {
        self.channels.push(channel);
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Deliver `message` to every channel, sequentially.
    pub fn dispatch(&self, message: &str) -> DispatchReport {
        let mut report = DispatchReport::default();

        for channel in &self.channels {
            match channel.deliver(message) {
                Ok(()) => {
                    debug!(channel = channel.name(), "Notice delivered");
                    report.delivered += 1;
                }
                Err(e) => {
                    error!(channel = channel.name(), error = %e, "Notice delivery failed");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

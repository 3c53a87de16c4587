//! HTTP notice channel: POSTs a JSON [`Notice`] to a fixed endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

use super::{Channel, DeliveryError, Notice};
use crate::Error;

/// Build the client shared by every HTTP channel.
///
/// `timeout` bounds a whole request; exceeding it fails the delivery.
pub fn build_client(timeout: Duration) -> Result<Client, Error> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Delivers notices for one recipient.
pub struct HttpChannel {
    recipient: String,
    url: String,
    client: Client,
}

impl HttpChannel {
    pub fn new(recipient: impl Into<String>, url: impl Into<String>, client: Client) -> Self {
        Self {
            recipient: recipient.into(),
            url: url.into(),
            client,
        }
    }
}

impl Channel for HttpChannel {
    fn name(&self) -> &str {
        &self.recipient
    }

    fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        let notice = Notice {
            recipient: self.recipient.clone(),
            message: message.to_string(),
        };

        let response = self.client.post(&self.url).json(&notice).send()?;

        // Only 200 counts, not any 2xx.
        let status = response.status();
        if status != StatusCode::OK {
            return Err(DeliveryError::Status(status));
        }

        debug!(recipient = %self.recipient, url = %self.url, "Posted notice");
        Ok(())
    }
}

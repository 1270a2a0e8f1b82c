// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::future::Future;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::modules::contact::Channel;
use crate::modules::error::{code::ErrorCode, ReachBookResult};
use crate::modules::http::HttpClient;
use crate::raise_error;

/// The external message gateway for one channel: one remote call per
/// recipient, returning the provider's message identifier.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    fn channel(&self) -> Channel;
    async fn send(&self, address: &str, body: &str) -> ReachBookResult<String>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    message_id: String,
}

fn parse_message_id(value: serde_json::Value) -> ReachBookResult<String> {
    serde_json::from_value::<SendResponse>(value)
        .map(|response| response.message_id)
        .map_err(|e| {
            raise_error!(
                format!("Gateway response missing message_id: {:#?}", e),
                ErrorCode::GatewaySendFailed
            )
        })
}

/// Text-message gateway used for the WhatsApp and SMS channels.
pub struct HttpTextGateway {
    channel: Channel,
    client: HttpClient,
    url: String,
}

impl HttpTextGateway {
    pub fn new(channel: Channel, url: &str) -> ReachBookResult<Self> {
        Ok(Self {
            channel,
            client: HttpClient::new()?,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl MessageGateway for HttpTextGateway {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, address: &str, body: &str) -> ReachBookResult<String> {
        let payload = serde_json::json!({
            "to": address,
            "message": body,
        });
        let value = self
            .client
            .post_json(&self.url, &payload)
            .await
            .map_err(|e| {
                raise_error!(
                    format!("{} gateway rejected the send: {}", self.channel, e),
                    ErrorCode::GatewaySendFailed
                )
            })?;
        parse_message_id(value)
    }
}

/// Email gateway with an explicit, ordered endpoint fallback: each send walks
/// the configured endpoints first to last and stops at the first success.
pub struct HttpEmailGateway {
    client: HttpClient,
    endpoints: Vec<String>,
}

impl HttpEmailGateway {
    pub fn new(endpoints: Vec<String>) -> ReachBookResult<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            endpoints,
        })
    }
}

#[async_trait]
impl MessageGateway for HttpEmailGateway {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, address: &str, body: &str) -> ReachBookResult<String> {
        let payload = serde_json::json!({
            "to": address,
            "body": body,
        });
        try_endpoints(&self.endpoints, |endpoint| {
            let payload = payload.clone();
            async move {
                let value = self.client.post_json(endpoint, &payload).await?;
                parse_message_id(value)
            }
        })
        .await
    }
}

/// Walk an ordered endpoint list until one attempt succeeds, logging every
/// attempt with its outcome. Returns the last error when all fail.
pub(crate) async fn try_endpoints<'e, F, Fut>(
    endpoints: &'e [String],
    mut attempt: F,
) -> ReachBookResult<String>
where
    F: FnMut(&'e str) -> Fut,
    Fut: Future<Output = ReachBookResult<String>>,
{
    let mut last_error = None;
    for (index, endpoint) in endpoints.iter().enumerate() {
        match attempt(endpoint).await {
            Ok(message_id) => {
                debug!("Send endpoint #{} ({}) accepted the message", index, endpoint);
                return Ok(message_id);
            }
            Err(error) => {
                warn!("Send endpoint #{} ({}) failed: {}", index, endpoint, error);
                last_error = Some(error);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        raise_error!(
            "No send endpoints configured".into(),
            ErrorCode::MissingConfiguration
        )
    }))
}

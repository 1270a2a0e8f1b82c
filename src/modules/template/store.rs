// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use async_trait::async_trait;

use crate::modules::contact::Channel;
use crate::modules::error::{code::ErrorCode, ReachBookResult};
use crate::modules::http::HttpClient;
use crate::modules::template::Template;
use crate::raise_error;

/// The external template store. Read-only to the dispatcher.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn template(&self, template_id: u64) -> ReachBookResult<Option<Template>>;
    async fn list_templates(&self, channel: Channel) -> ReachBookResult<Vec<Template>>;
}

pub struct RestTemplateStore {
    client: HttpClient,
    base_url: String,
}

impl RestTemplateStore {
    pub fn new(base_url: &str) -> ReachBookResult<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TemplateStore for RestTemplateStore {
    async fn template(&self, template_id: u64) -> ReachBookResult<Option<Template>> {
        let url = format!("{}/templates/{}", self.base_url, template_id);
        let value = self.client.get_optional_json(&url).await?;
        value
            .map(|value| {
                serde_json::from_value::<Template>(value).map_err(|e| {
                    raise_error!(
                        format!("Failed to deserialize template {}: {:#?}", template_id, e),
                        ErrorCode::InternalError
                    )
                })
            })
            .transpose()
    }

    async fn list_templates(&self, channel: Channel) -> ReachBookResult<Vec<Template>> {
        let url = format!("{}/templates?channel={}", self.base_url, channel);
        let value = self.client.get_json(&url).await?;
        serde_json::from_value::<Vec<Template>>(value).map_err(|e| {
            raise_error!(
                format!("Failed to deserialize template list: {:#?}", e),
                ErrorCode::InternalError
            )
        })
    }
}

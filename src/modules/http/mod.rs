// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::ReachBookResult;
use crate::{raise_error, reachbook_version};
use std::time::Duration;

pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> ReachBookResult<HttpClient> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(format!("ReachBook/{}", reachbook_version!()))
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                raise_error!(
                    format!("Failed to build HTTP client: {:#?}", e),
                    ErrorCode::InternalError
                )
            })?;
        Ok(Self { client })
    }

    /// GET a JSON document; a non-2xx response is an error.
    pub async fn get_json(&self, url: &str) -> ReachBookResult<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::NetworkError))?;
        Self::json_body(response).await
    }

    /// GET a JSON document, mapping a 404 to `None`.
    pub async fn get_optional_json(&self, url: &str) -> ReachBookResult<Option<serde_json::Value>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::NetworkError))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::json_body(response).await.map(Some)
    }

    /// POST a JSON payload and return the JSON response body.
    pub async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> ReachBookResult<serde_json::Value> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::NetworkError))?;
        Self::json_body(response).await
    }

    /// POST without caring about the response body beyond the status.
    pub async fn post_empty(&self, url: &str) -> ReachBookResult<()> {
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::NetworkError))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(raise_error!(
                format!("Request failed with status {}: {}", status, body),
                ErrorCode::HttpResponseError
            ));
        }
        Ok(())
    }

    async fn json_body(response: reqwest::Response) -> ReachBookResult<serde_json::Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(raise_error!(
                format!("Request failed with status {}: {}", status, body),
                ErrorCode::HttpResponseError
            ));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::HttpResponseError))
    }
}

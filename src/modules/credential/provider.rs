// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use async_trait::async_trait;
use oauth2::{basic::BasicClient, AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope};
use serde::{Deserialize, Serialize};

use crate::modules::error::{code::ErrorCode, ReachBookResult};
use crate::modules::http::HttpClient;
use crate::modules::settings::cli::SETTINGS;
use crate::raise_error;

/// Raw status as the provider bridge reports it; the cache derives the
/// refresh flag and check timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub authenticated: bool,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RefreshResponse {
    success: bool,
}

/// The external OAuth provider for one channel.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Consent-screen URL for (re-)connecting the provider account.
    fn authorize_url(&self) -> ReachBookResult<String>;
    async fn status(&self) -> ReachBookResult<ProviderStatus>;
    async fn refresh(&self) -> ReachBookResult<bool>;
    async fn revoke(&self) -> ReachBookResult<()>;
}

pub struct HttpOAuthProvider {
    client: HttpClient,
    base_url: String,
}

impl HttpOAuthProvider {
    pub fn new(base_url: &str) -> ReachBookResult<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl OAuthProvider for HttpOAuthProvider {
    fn authorize_url(&self) -> ReachBookResult<String> {
        let auth_url = AuthUrl::new(SETTINGS.reachbook_oauth_auth_url.clone())
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InvalidParameter))?;
        let redirect_uri = RedirectUrl::new(SETTINGS.reachbook_oauth_redirect_uri.clone())
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InvalidParameter))?;

        let client = BasicClient::new(ClientId::new(SETTINGS.reachbook_oauth_client_id.clone()))
            .set_auth_uri(auth_url)
            .set_redirect_uri(redirect_uri);

        let (authorize_url, _csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(
                SETTINGS
                    .reachbook_oauth_scopes
                    .iter()
                    .cloned()
                    .map(Scope::new),
            )
            .url();
        Ok(authorize_url.to_string())
    }

    async fn status(&self) -> ReachBookResult<ProviderStatus> {
        let url = format!("{}/status", self.base_url);
        let value = self.client.get_json(&url).await?;
        serde_json::from_value::<ProviderStatus>(value).map_err(|e| {
            raise_error!(
                format!("Failed to deserialize provider status: {:#?}", e),
                ErrorCode::HttpResponseError
            )
        })
    }

    async fn refresh(&self) -> ReachBookResult<bool> {
        let url = format!("{}/refresh", self.base_url);
        let value = self.client.post_json(&url, &serde_json::json!({})).await?;
        let response = serde_json::from_value::<RefreshResponse>(value).map_err(|e| {
            raise_error!(
                format!("Failed to deserialize refresh response: {:#?}", e),
                ErrorCode::HttpResponseError
            )
        })?;
        Ok(response.success)
    }

    async fn revoke(&self) -> ReachBookResult<()> {
        let url = format!("{}/revoke", self.base_url);
        self.client.post_empty(&url).await
    }
}

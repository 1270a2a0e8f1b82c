// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use tracing::info;

use crate::modules::bulk::controller::BulkController;
use crate::modules::contact::store::{ContactStore, RestContactStore};
use crate::modules::contact::Channel;
use crate::modules::credential::cache::CredentialCache;
use crate::modules::credential::provider::{HttpOAuthProvider, OAuthProvider};
use crate::modules::dispatch::gateway::{HttpEmailGateway, HttpTextGateway, MessageGateway};
use crate::modules::error::{code::ErrorCode, ReachBookResult};
use crate::modules::settings::cli::SETTINGS;
use crate::modules::template::store::{RestTemplateStore, TemplateStore};
use crate::raise_error;

pub trait Initialize {
    async fn initialize() -> ReachBookResult<()>;
}

pub trait ReachBookTask {
    fn start();
}

pub static REACHBOOK_CONTEXT: LazyLock<AppContext> = LazyLock::new(AppContext::build);

const CHANNELS: [Channel; 3] = [Channel::Email, Channel::WhatsApp, Channel::Sms];

/// Process-wide wiring of stores, gateways and credential caches, built once
/// from settings. Everything downstream receives its dependencies from here,
/// so tests can assemble the same components around mocks.
pub struct AppContext {
    controller: BulkController,
    credentials: HashMap<Channel, Arc<CredentialCache>>,
}

impl AppContext {
    fn build() -> Self {
        let contact_store: Arc<dyn ContactStore> = Arc::new(
            RestContactStore::new(&SETTINGS.reachbook_contact_store_url)
                .expect("Failed to build the contact store client"),
        );
        let template_store: Arc<dyn TemplateStore> = Arc::new(
            RestTemplateStore::new(&SETTINGS.reachbook_template_store_url)
                .expect("Failed to build the template store client"),
        );

        let mut gateways: HashMap<Channel, Arc<dyn MessageGateway>> = HashMap::new();
        gateways.insert(
            Channel::WhatsApp,
            Arc::new(
                HttpTextGateway::new(Channel::WhatsApp, &SETTINGS.reachbook_whatsapp_gateway_url)
                    .expect("Failed to build the WhatsApp gateway client"),
            ),
        );
        gateways.insert(
            Channel::Sms,
            Arc::new(
                HttpTextGateway::new(Channel::Sms, &SETTINGS.reachbook_sms_gateway_url)
                    .expect("Failed to build the SMS gateway client"),
            ),
        );
        gateways.insert(
            Channel::Email,
            Arc::new(
                HttpEmailGateway::new(SETTINGS.reachbook_email_endpoints.clone())
                    .expect("Failed to build the email gateway client"),
            ),
        );

        // One provider bridge per channel, namespaced under the shared base.
        let mut credentials: HashMap<Channel, Arc<CredentialCache>> = HashMap::new();
        for channel in CHANNELS {
            let provider: Arc<dyn OAuthProvider> = Arc::new(
                HttpOAuthProvider::new(&format!(
                    "{}/{}",
                    SETTINGS.reachbook_oauth_base_url.trim_end_matches('/'),
                    channel
                ))
                .expect("Failed to build the OAuth provider client"),
            );
            credentials.insert(
                channel,
                Arc::new(CredentialCache::new(
                    channel,
                    provider,
                    Duration::from_secs(SETTINGS.reachbook_credential_cache_secs),
                    Duration::from_secs(SETTINGS.reachbook_refresh_lookahead_secs),
                )),
            );
        }

        let controller = BulkController::new(
            contact_store,
            template_store,
            gateways,
            credentials.clone(),
            Duration::from_millis(SETTINGS.reachbook_send_interval_ms),
        );

        Self {
            controller,
            credentials,
        }
    }

    pub fn controller(&self) -> &BulkController {
        &self.controller
    }

    pub fn credential_caches(&self) -> Vec<Arc<CredentialCache>> {
        self.credentials.values().cloned().collect()
    }

    pub fn credential(&self, channel: Channel) -> ReachBookResult<Arc<CredentialCache>> {
        self.credentials.get(&channel).cloned().ok_or_else(|| {
            raise_error!(
                format!("No credential cache configured for channel {}", channel),
                ErrorCode::MissingConfiguration
            )
        })
    }
}

impl Initialize for AppContext {
    async fn initialize() -> ReachBookResult<()> {
        let context = &*REACHBOOK_CONTEXT;
        info!(
            "Application context ready with {} credential channels",
            context.credentials.len()
        );
        Ok(())
    }
}

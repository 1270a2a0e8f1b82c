// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::modules::contact::Channel;
use crate::modules::credential::provider::OAuthProvider;
use crate::modules::credential::{AuthState, CredentialStatus};
use crate::modules::error::ReachBookResult;
use crate::utc_now;

#[derive(Default)]
struct CacheInner {
    state: Option<AuthState>,
    status: Option<CredentialStatus>,
    checked_at: Option<Instant>,
}

/// Process-wide credential cache for one channel.
///
/// All bulk operations against the channel share this one entry. Provider
/// calls run without holding the lock, so two operations may both trigger a
/// refresh; the last writer wins.
pub struct CredentialCache {
    channel: Channel,
    provider: Arc<dyn OAuthProvider>,
    validity: Duration,
    lookahead: Duration,
    inner: RwLock<CacheInner>,
}

impl CredentialCache {
    pub fn new(
        channel: Channel,
        provider: Arc<dyn OAuthProvider>,
        validity: Duration,
        lookahead: Duration,
    ) -> Self {
        Self {
            channel,
            provider,
            validity,
            lookahead,
            inner: RwLock::new(CacheInner::default()),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn provider(&self) -> &Arc<dyn OAuthProvider> {
        &self.provider
    }

    pub async fn state(&self) -> AuthState {
        let inner = self.inner.read().await;
        inner.state.unwrap_or(AuthState::Unchecked)
    }

    /// Return the credential status, honoring the cache-validity window.
    ///
    /// Within the window and not forced, the cached value is returned
    /// unchanged with no provider call. A provider failure falls back to the
    /// stale cached value when one exists; the error only surfaces when there
    /// is no prior cache.
    pub async fn check_status(&self, force_refresh: bool) -> ReachBookResult<CredentialStatus> {
        if !force_refresh {
            let inner = self.inner.read().await;
            if let (Some(status), Some(checked_at)) = (&inner.status, inner.checked_at) {
                if checked_at.elapsed() < self.validity {
                    debug!(channel = %self.channel, "Credential status served from cache");
                    return Ok(status.clone());
                }
            }
        }

        {
            let mut inner = self.inner.write().await;
            inner.state = Some(AuthState::Checking);
        }

        match self.provider.status().await {
            Ok(remote) => {
                let status = CredentialStatus {
                    authenticated: remote.authenticated,
                    account: remote.account,
                    expires_at: remote.expires_at,
                    needs_refresh: self.expiry_within_lookahead(remote.expires_at),
                    last_checked_at: utc_now!(),
                };
                let mut inner = self.inner.write().await;
                inner.state = Some(if status.authenticated {
                    AuthState::Authenticated
                } else {
                    AuthState::Unauthenticated
                });
                inner.status = Some(status.clone());
                inner.checked_at = Some(Instant::now());
                Ok(status)
            }
            Err(error) => {
                let mut inner = self.inner.write().await;
                match &inner.status {
                    Some(stale) => {
                        // stale-but-available: keep serving the previous value
                        warn!(
                            channel = %self.channel,
                            "Credential status check failed, serving stale cache: {error}"
                        );
                        let stale = stale.clone();
                        inner.state = Some(if stale.authenticated {
                            AuthState::Authenticated
                        } else {
                            AuthState::Unauthenticated
                        });
                        Ok(stale)
                    }
                    None => {
                        inner.state = Some(AuthState::Error);
                        Err(error)
                    }
                }
            }
        }
    }

    /// Whether the cached expiry falls within the refresh lookahead of now.
    /// Independent of the last-check timestamp.
    pub async fn needs_refresh(&self) -> bool {
        let inner = self.inner.read().await;
        inner
            .status
            .as_ref()
            .map(|status| self.expiry_within_lookahead(status.expires_at))
            .unwrap_or(false)
    }

    /// Ask the provider to refresh; on success the cache is invalidated so
    /// the next `check_status` hits the network. Failure leaves the stale
    /// cache in place.
    pub async fn refresh(&self) -> bool {
        match self.provider.refresh().await {
            Ok(true) => {
                let mut inner = self.inner.write().await;
                inner.checked_at = None;
                debug!(channel = %self.channel, "Credential refreshed, cache invalidated");
                true
            }
            Ok(false) => {
                warn!(channel = %self.channel, "Provider declined the credential refresh");
                false
            }
            Err(error) => {
                warn!(channel = %self.channel, "Credential refresh failed: {error}");
                false
            }
        }
    }

    /// Drop everything, back to unchecked. Used on explicit sign-out.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        *inner = CacheInner::default();
    }

    fn expiry_within_lookahead(&self, expires_at: Option<i64>) -> bool {
        match expires_at {
            Some(expires_at) => expires_at - utc_now!() <= self.lookahead.as_millis() as i64,
            None => false,
        }
    }
}

// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::modules::contact::Channel;
use crate::modules::credential::cache::CredentialCache;
use crate::modules::credential::provider::{OAuthProvider, ProviderStatus};
use crate::modules::credential::AuthState;
use crate::modules::error::{code::ErrorCode, ReachBookResult};
use crate::{raise_error, utc_now};

struct MockProvider {
    status_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    status: Mutex<ProviderStatus>,
    fail_status: AtomicBool,
    refresh_success: AtomicBool,
}

impl MockProvider {
    fn authenticated(expires_in_ms: i64) -> Arc<Self> {
        Arc::new(Self {
            status_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            status: Mutex::new(ProviderStatus {
                authenticated: true,
                account: Some("user@example.com".into()),
                expires_at: Some(utc_now!() + expires_in_ms),
            }),
            fail_status: AtomicBool::new(false),
            refresh_success: AtomicBool::new(true),
        })
    }

    fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthProvider for MockProvider {
    fn authorize_url(&self) -> ReachBookResult<String> {
        Ok("https://provider.example/consent".into())
    }

    async fn status(&self) -> ReachBookResult<ProviderStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(raise_error!(
                "provider unreachable".into(),
                ErrorCode::NetworkError
            ));
        }
        Ok(self.status.lock().unwrap().clone())
    }

    async fn refresh(&self) -> ReachBookResult<bool> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.refresh_success.load(Ordering::SeqCst))
    }

    async fn revoke(&self) -> ReachBookResult<()> {
        Ok(())
    }
}

fn cache_with(provider: Arc<MockProvider>) -> CredentialCache {
    CredentialCache::new(
        Channel::Email,
        provider,
        Duration::from_secs(30),
        Duration::from_secs(300),
    )
}

#[tokio::test]
async fn second_check_within_window_hits_cache() {
    let provider = MockProvider::authenticated(3_600_000);
    let cache = cache_with(provider.clone());

    let first = cache.check_status(false).await.unwrap();
    let second = cache.check_status(false).await.unwrap();

    assert_eq!(provider.status_calls(), 1);
    assert_eq!(first, second);
    assert_eq!(cache.state().await, AuthState::Authenticated);
}

#[tokio::test]
async fn forced_check_bypasses_window() {
    let provider = MockProvider::authenticated(3_600_000);
    let cache = cache_with(provider.clone());

    cache.check_status(false).await.unwrap();
    cache.check_status(true).await.unwrap();

    assert_eq!(provider.status_calls(), 2);
}

#[tokio::test]
async fn provider_failure_serves_stale_cache() {
    let provider = MockProvider::authenticated(3_600_000);
    let cache = cache_with(provider.clone());

    let first = cache.check_status(true).await.unwrap();
    provider.fail_status.store(true, Ordering::SeqCst);
    let second = cache.check_status(true).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.status_calls(), 2);
}

#[tokio::test]
async fn provider_failure_without_cache_surfaces_error() {
    let provider = MockProvider::authenticated(3_600_000);
    provider.fail_status.store(true, Ordering::SeqCst);
    let cache = cache_with(provider.clone());

    let result = cache.check_status(true).await;
    assert!(result.is_err());
    assert_eq!(cache.state().await, AuthState::Error);
}

#[tokio::test]
async fn needs_refresh_tracks_expiry_lookahead() {
    // Expiry one minute away, lookahead five minutes: refresh wanted.
    let near_expiry = MockProvider::authenticated(60_000);
    let cache = cache_with(near_expiry);
    cache.check_status(true).await.unwrap();
    assert!(cache.needs_refresh().await);

    // Expiry one hour away: no refresh wanted.
    let far_expiry = MockProvider::authenticated(3_600_000);
    let cache = cache_with(far_expiry);
    cache.check_status(true).await.unwrap();
    assert!(!cache.needs_refresh().await);

    // Nothing cached yet: no refresh wanted.
    let unchecked = cache_with(MockProvider::authenticated(60_000));
    assert!(!unchecked.needs_refresh().await);
}

#[tokio::test]
async fn successful_refresh_invalidates_cache() {
    let provider = MockProvider::authenticated(3_600_000);
    let cache = cache_with(provider.clone());

    cache.check_status(false).await.unwrap();
    assert!(cache.refresh().await);
    cache.check_status(false).await.unwrap();

    // The post-refresh check must hit the network despite the validity window.
    assert_eq!(provider.status_calls(), 2);
}

#[tokio::test]
async fn failed_refresh_leaves_cache_in_place() {
    let provider = MockProvider::authenticated(3_600_000);
    let cache = cache_with(provider.clone());

    cache.check_status(false).await.unwrap();
    provider.refresh_success.store(false, Ordering::SeqCst);
    assert!(!cache.refresh().await);
    cache.check_status(false).await.unwrap();

    assert_eq!(provider.status_calls(), 1);
}

#[tokio::test]
async fn clear_resets_to_unchecked() {
    let provider = MockProvider::authenticated(60_000);
    let cache = cache_with(provider.clone());

    cache.check_status(false).await.unwrap();
    cache.clear().await;

    assert_eq!(cache.state().await, AuthState::Unchecked);
    assert!(!cache.needs_refresh().await);

    // Next check goes back to the provider.
    cache.check_status(false).await.unwrap();
    assert_eq!(provider.status_calls(), 2);
}

// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

pub mod cache;
pub mod provider;
pub mod task;

#[cfg(test)]
mod tests;

/// Lifecycle state of a channel's provider credential.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
#[oai(rename_all = "lowercase")]
pub enum AuthState {
    Unchecked,
    Checking,
    Authenticated,
    Unauthenticated,
    Error,
}

/// Cached authentication status for one provider channel.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct CredentialStatus {
    pub authenticated: bool,
    /// Email or account identifier reported by the provider.
    pub account: Option<String>,
    /// Credential expiry, in milliseconds since the Unix epoch.
    pub expires_at: Option<i64>,
    /// Whether the expiry falls within the refresh lookahead window.
    pub needs_refresh: bool,
    /// When this status was fetched, in milliseconds since the Unix epoch.
    pub last_checked_at: i64,
}

// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::modules::error::ApiError;

/// Dispatch-scoped counters. `total` is fixed when the dispatch starts;
/// `sent + failed + pending == total` holds at every progress callback.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct DispatchProgress {
    pub sent: u64,
    pub failed: u64,
    pub pending: u64,
    pub total: u64,
}

impl DispatchProgress {
    pub fn new(total: u64) -> Self {
        Self {
            sent: 0,
            failed: 0,
            pending: total,
            total,
        }
    }

    pub fn record_sent(&mut self) {
        debug_assert!(self.pending > 0);
        self.sent += 1;
        self.pending -= 1;
    }

    pub fn record_failed(&mut self) {
        debug_assert!(self.pending > 0);
        self.failed += 1;
        self.pending -= 1;
    }
}

impl Default for DispatchProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
#[oai(rename_all = "lowercase")]
pub enum RecipientStatus {
    Sent,
    Failed,
}

/// Outcome of one recipient within a dispatch.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct RecipientResult {
    pub contact_id: u64,
    pub name: String,
    /// The normalized address the send targeted, absent when the contact had
    /// no usable address for the channel.
    pub address: Option<String>,
    pub status: RecipientStatus,
    pub provider_message_id: Option<String>,
    /// Failure detail with its error code, absent for sent recipients.
    pub error: Option<ApiError>,
}

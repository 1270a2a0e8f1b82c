// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::modules::contact::Channel;
use crate::modules::dispatch::progress::{DispatchProgress, RecipientResult};
use crate::modules::error::ApiError;

pub mod controller;
pub mod operation;
pub mod registry;


/// Lifecycle phase of a bulk send operation. Once a terminal phase is
/// reached the operation never changes again.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum BulkPhase {
    Idle,
    CredentialCheck,
    BlockedNeedsAuth,
    Resolving,
    Rendering,
    Dispatching,
    Completed,
    Aborted,
}

impl BulkPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BulkPhase::BlockedNeedsAuth | BulkPhase::Completed | BulkPhase::Aborted
        )
    }
}

/// Final classification of a finished bulk send.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum BulkOutcomeStatus {
    FullSuccess,
    PartialSuccess,
    FullFailure,
    NoRecipients,
    NeedsAuth,
    Cancelled,
    Error,
}

/// Terminal result of a bulk operation, available once the phase is terminal.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct BulkOutcome {
    pub status: BulkOutcomeStatus,
    pub progress: DispatchProgress,
    pub results: Vec<RecipientResult>,
    /// The blocking or aborting error with its code, absent for outcomes
    /// reached through a completed dispatch.
    pub error: Option<ApiError>,
}

impl BulkOutcome {
    pub fn empty(status: BulkOutcomeStatus, error: Option<ApiError>) -> Self {
        Self {
            status,
            progress: DispatchProgress::default(),
            results: Vec::new(),
            error,
        }
    }
}

/// Request payload for starting a bulk send.
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct BulkSendRequest {
    pub channel: Channel,
    /// Tags whose members join the recipient set.
    #[serde(default)]
    #[oai(default)]
    pub tag_ids: Vec<u64>,
    /// Individually selected contacts, merged after the tags.
    #[serde(default)]
    #[oai(default)]
    pub contact_ids: Vec<u64>,
    pub template_id: u64,
    /// Campaign-level placeholder values; per-contact fields override them.
    #[serde(default)]
    #[oai(default)]
    pub fields: HashMap<String, String>,
}

/// Point-in-time view of a running or finished operation.
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct BulkStatus {
    pub id: u64,
    pub channel: Channel,
    pub phase: BulkPhase,
    pub progress: DispatchProgress,
    pub created_at: i64,
}

// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::RwLock;

use tokio::sync::watch;
use tracing::info;

use crate::modules::bulk::{BulkOutcome, BulkPhase, BulkStatus};
use crate::modules::contact::Channel;
use crate::modules::dispatch::progress::DispatchProgress;
use crate::modules::dispatch::run::CancelToken;
use crate::{id, utc_now};

/// One in-flight (or finished) bulk send.
///
/// Phase and progress are published through watch channels so REST readers
/// always see the latest value without touching the dispatch path. The
/// outcome is written before the terminal phase, so any reader observing a
/// terminal phase will find the outcome present.
pub struct BulkOperation {
    id: u64,
    channel: Channel,
    created_at: i64,
    phase_tx: watch::Sender<BulkPhase>,
    progress_tx: watch::Sender<DispatchProgress>,
    cancel: CancelToken,
    outcome: RwLock<Option<BulkOutcome>>,
}

impl BulkOperation {
    pub fn new(channel: Channel) -> Self {
        let (phase_tx, _) = watch::channel(BulkPhase::Idle);
        let (progress_tx, _) = watch::channel(DispatchProgress::default());
        Self {
            id: id!(64),
            channel,
            created_at: utc_now!(),
            phase_tx,
            progress_tx,
            cancel: CancelToken::new(),
            outcome: RwLock::new(None),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn phase(&self) -> BulkPhase {
        *self.phase_tx.borrow()
    }

    pub fn set_phase(&self, phase: BulkPhase) {
        info!(operation = self.id, channel = %self.channel, "Bulk phase -> {:?}", phase);
        self.phase_tx.send_replace(phase);
    }

    pub fn progress(&self) -> DispatchProgress {
        self.progress_tx.borrow().clone()
    }

    pub fn publish_progress(&self, progress: DispatchProgress) {
        self.progress_tx.send_replace(progress);
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Request cooperative cancellation. Takes effect before the next send;
    /// a no-op once the operation is terminal.
    pub fn request_cancel(&self) -> bool {
        if self.phase().is_terminal() {
            return false;
        }
        self.cancel.cancel();
        true
    }

    pub fn outcome(&self) -> Option<BulkOutcome> {
        self.outcome.read().unwrap().clone()
    }

    /// Record the outcome, then flip to the terminal phase.
    pub fn finish(&self, phase: BulkPhase, outcome: BulkOutcome) {
        debug_assert!(phase.is_terminal());
        *self.outcome.write().unwrap() = Some(outcome);
        self.set_phase(phase);
    }

    pub fn status(&self) -> BulkStatus {
        BulkStatus {
            id: self.id,
            channel: self.channel,
            phase: self.phase(),
            progress: self.progress(),
            created_at: self.created_at,
        }
    }

    #[cfg(test)]
    pub async fn wait_terminal(&self) -> BulkPhase {
        let mut rx = self.phase_tx.subscribe();
        let phase = rx.wait_for(|phase| phase.is_terminal()).await.unwrap();
        *phase
    }
}

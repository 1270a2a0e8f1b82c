// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::modules::contact::Contact;
use crate::modules::dispatch::gateway::MessageGateway;
use crate::modules::dispatch::progress::{DispatchProgress, RecipientResult, RecipientStatus};
use crate::modules::error::{code::ErrorCode, ApiError};
use crate::raise_error;

/// One prepared send: a resolved recipient and its rendered body.
pub struct DispatchJob {
    pub contact: Contact,
    pub body: String,
}

/// Cooperative cancellation flag, checked before every send.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct DispatchReport {
    pub progress: DispatchProgress,
    pub results: Vec<RecipientResult>,
    pub cancelled: bool,
}

/// Sequential, paced per-recipient send loop.
pub struct DispatchLoop<'a> {
    gateway: &'a dyn MessageGateway,
    send_interval: Duration,
    cancel: CancelToken,
}

impl<'a> DispatchLoop<'a> {
    pub fn new(
        gateway: &'a dyn MessageGateway,
        send_interval: Duration,
        cancel: CancelToken,
    ) -> Self {
        Self {
            gateway,
            send_interval,
            cancel,
        }
    }

    /// Run the full job list to completion: one gateway call per recipient,
    /// never aborting on a send failure. The progress callback fires
    /// synchronously after every recipient. A recipient with no usable
    /// address for the channel counts as failed, so the counters always add
    /// up to the fixed total. Cancellation stops before the next send and
    /// leaves the remaining recipients pending.
    pub async fn run<F>(&self, jobs: Vec<DispatchJob>, mut on_progress: F) -> DispatchReport
    where
        F: FnMut(&DispatchProgress),
    {
        let channel = self.gateway.channel();
        let total = jobs.len();
        let mut progress = DispatchProgress::new(total as u64);
        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        for (index, job) in jobs.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                warn!(
                    "Dispatch cancelled with {} of {} recipients pending",
                    progress.pending, progress.total
                );
                break;
            }

            match job.contact.channel_address(channel) {
                None => {
                    let error = raise_error!(
                        format!("no usable {} address", channel),
                        ErrorCode::MissingRecipientAddress
                    );
                    progress.record_failed();
                    results.push(RecipientResult {
                        contact_id: job.contact.id,
                        name: job.contact.name.clone(),
                        address: None,
                        status: RecipientStatus::Failed,
                        provider_message_id: None,
                        error: Some(ApiError::from(&error)),
                    });
                }
                Some(address) => match self.gateway.send(&address, &job.body).await {
                    Ok(message_id) => {
                        debug!(
                            "Sent to contact {} via {} (provider id {})",
                            job.contact.id, channel, message_id
                        );
                        progress.record_sent();
                        results.push(RecipientResult {
                            contact_id: job.contact.id,
                            name: job.contact.name.clone(),
                            address: Some(address),
                            status: RecipientStatus::Sent,
                            provider_message_id: Some(message_id),
                            error: None,
                        });
                    }
                    Err(error) => {
                        warn!("Send to contact {} failed: {}", job.contact.id, error);
                        progress.record_failed();
                        results.push(RecipientResult {
                            contact_id: job.contact.id,
                            name: job.contact.name.clone(),
                            address: Some(address),
                            status: RecipientStatus::Failed,
                            provider_message_id: None,
                            error: Some(ApiError::from(&error)),
                        });
                    }
                },
            }

            on_progress(&progress);

            // provider rate-limit pacing between consecutive sends
            if index + 1 < total && !self.send_interval.is_zero() {
                tokio::time::sleep(self.send_interval).await;
            }
        }

        DispatchReport {
            progress,
            results,
            cancelled,
        }
    }
}

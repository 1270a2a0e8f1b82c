// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::modules::context::{ReachBookTask, REACHBOOK_CONTEXT};
use crate::modules::scheduler::periodic::PeriodicTask;
use crate::modules::settings::cli::SETTINGS;

/// Advisory background re-check of every channel credential. The bulk
/// controller still forces a fresh check before gating a dispatch.
pub struct CredentialRecheckTask;

impl ReachBookTask for CredentialRecheckTask {
    fn start() {
        let periodic_task = PeriodicTask::new("credential-recheck-task");

        let task = move |_: Option<u64>| {
            Box::pin(async move {
                debug!("Starting credential re-check task");

                for cache in REACHBOOK_CONTEXT.credential_caches() {
                    match cache.check_status(false).await {
                        Ok(status) => {
                            if status.authenticated && cache.needs_refresh().await {
                                if cache.refresh().await {
                                    info!(
                                        channel = %cache.channel(),
                                        "Proactively refreshed credential nearing expiry"
                                    );
                                } else {
                                    error!(
                                        channel = %cache.channel(),
                                        "Proactive credential refresh failed"
                                    );
                                }
                            }
                        }
                        Err(e) => {
                            error!(channel = %cache.channel(), "Credential re-check failed: {e}");
                        }
                    }
                }

                debug!("Credential re-check task completed");
                Ok(())
            })
        };

        periodic_task.start(
            task,
            None,
            Duration::from_secs(SETTINGS.reachbook_credential_recheck_secs),
            false,
            false,
        );
    }
}

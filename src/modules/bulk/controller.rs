// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::modules::bulk::operation::BulkOperation;
use crate::modules::bulk::registry::OperationRegistry;
use crate::modules::bulk::{BulkOutcome, BulkOutcomeStatus, BulkPhase, BulkSendRequest};
use crate::modules::contact::store::ContactStore;
use crate::modules::contact::{Channel, Contact};
use crate::modules::credential::cache::CredentialCache;
use crate::modules::dispatch::gateway::MessageGateway;
use crate::modules::dispatch::progress::DispatchProgress;
use crate::modules::dispatch::resolver::RecipientResolver;
use crate::modules::dispatch::run::{DispatchJob, DispatchLoop};
use crate::modules::error::{code::ErrorCode, ApiError, ReachBookError, ReachBookResult};
use crate::modules::template::render::Renderer;
use crate::modules::template::store::TemplateStore;
use crate::raise_error;

/// Orchestrates bulk sends end to end: credential gate, recipient
/// resolution, rendering, then the paced dispatch loop. One spawned task per
/// operation; the registry is the only shared state.
pub struct BulkController {
    contact_store: Arc<dyn ContactStore>,
    template_store: Arc<dyn TemplateStore>,
    gateways: HashMap<Channel, Arc<dyn MessageGateway>>,
    credentials: HashMap<Channel, Arc<CredentialCache>>,
    registry: OperationRegistry,
    send_interval: Duration,
}

struct ExecuteDeps {
    contact_store: Arc<dyn ContactStore>,
    template_store: Arc<dyn TemplateStore>,
    gateway: Arc<dyn MessageGateway>,
    credential: Arc<CredentialCache>,
    send_interval: Duration,
}

impl BulkController {
    pub fn new(
        contact_store: Arc<dyn ContactStore>,
        template_store: Arc<dyn TemplateStore>,
        gateways: HashMap<Channel, Arc<dyn MessageGateway>>,
        credentials: HashMap<Channel, Arc<CredentialCache>>,
        send_interval: Duration,
    ) -> Self {
        Self {
            contact_store,
            template_store,
            gateways,
            credentials,
            registry: OperationRegistry::new(),
            send_interval,
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn contact_store(&self) -> &Arc<dyn ContactStore> {
        &self.contact_store
    }

    pub fn template_store(&self) -> &Arc<dyn TemplateStore> {
        &self.template_store
    }

    pub fn credential(&self, channel: Channel) -> ReachBookResult<Arc<CredentialCache>> {
        self.credentials.get(&channel).cloned().ok_or_else(|| {
            raise_error!(
                format!("No credential provider configured for channel {}", channel),
                ErrorCode::MissingConfiguration
            )
        })
    }

    /// Validate the request, register a new operation and hand it to a
    /// background task. Returns immediately with the queryable operation.
    pub fn start_bulk_send(
        &self,
        request: BulkSendRequest,
    ) -> ReachBookResult<Arc<BulkOperation>> {
        if request.tag_ids.is_empty() && request.contact_ids.is_empty() {
            return Err(raise_error!(
                "A bulk send needs at least one tag or contact".into(),
                ErrorCode::NoRecipients
            ));
        }
        let gateway = self
            .gateways
            .get(&request.channel)
            .cloned()
            .ok_or_else(|| {
                raise_error!(
                    format!("No gateway configured for channel {}", request.channel),
                    ErrorCode::MissingConfiguration
                )
            })?;
        let credential = self.credential(request.channel)?;

        let operation = Arc::new(BulkOperation::new(request.channel));
        self.registry.insert(operation.clone());
        info!(
            operation = operation.id(),
            channel = %request.channel,
            template = request.template_id,
            "Bulk send accepted"
        );

        let deps = ExecuteDeps {
            contact_store: self.contact_store.clone(),
            template_store: self.template_store.clone(),
            gateway,
            credential,
            send_interval: self.send_interval,
        };
        let task_operation = operation.clone();
        tokio::spawn(async move {
            execute(task_operation, deps, request).await;
        });

        Ok(operation)
    }
}

async fn execute(operation: Arc<BulkOperation>, deps: ExecuteDeps, request: BulkSendRequest) {
    let blocked = |error: ReachBookError| {
        warn!(
            operation = operation.id(),
            code = error.code() as u32,
            "Bulk send blocked: {}",
            error
        );
        operation.finish(
            BulkPhase::BlockedNeedsAuth,
            BulkOutcome::empty(BulkOutcomeStatus::NeedsAuth, Some(ApiError::from(&error))),
        );
    };
    let aborted = |error: ReachBookError| {
        warn!(
            operation = operation.id(),
            code = error.code() as u32,
            "Bulk send aborted: {}",
            error
        );
        operation.finish(
            BulkPhase::Aborted,
            BulkOutcome::empty(BulkOutcomeStatus::Error, Some(ApiError::from(&error))),
        );
    };

    // Credential gate. Always a forced check so the decision reflects the
    // provider, not a stale cache entry.
    operation.set_phase(BulkPhase::CredentialCheck);
    let mut status = match deps.credential.check_status(true).await {
        Ok(status) => status,
        Err(error) => {
            return blocked(raise_error!(
                format!("Credential status unavailable: {}", error),
                error.code()
            ));
        }
    };
    if status.authenticated && status.needs_refresh {
        // One proactive refresh before dispatch; a declined refresh blocks.
        if !deps.credential.refresh().await {
            return blocked(raise_error!(
                "Credential expires soon and refresh failed".into(),
                ErrorCode::CredentialRefreshFailed
            ));
        }
        status = match deps.credential.check_status(true).await {
            Ok(status) => status,
            Err(error) => {
                return blocked(raise_error!(
                    format!("Credential status unavailable: {}", error),
                    error.code()
                ));
            }
        };
        if status.needs_refresh {
            warn!(
                operation = operation.id(),
                "Credential still near expiry after refresh, dispatching anyway"
            );
        }
    }
    if !status.authenticated {
        return blocked(raise_error!(
            format!("Channel {} is not authenticated", operation.channel()),
            ErrorCode::NotAuthenticated
        ));
    }

    // Recipient resolution.
    operation.set_phase(BulkPhase::Resolving);
    let template = match deps.template_store.template(request.template_id).await {
        Ok(Some(template)) => template,
        Ok(None) => {
            return aborted(raise_error!(
                format!("Template {} not found", request.template_id),
                ErrorCode::ResourceNotFound
            ));
        }
        Err(error) => {
            return aborted(raise_error!(
                format!("Fetching template {} failed: {}", request.template_id, error),
                error.code()
            ));
        }
    };
    if !template.active {
        return aborted(raise_error!(
            format!("Template {} is inactive", template.id),
            ErrorCode::TemplateInactive
        ));
    }
    if template.channel != request.channel {
        return aborted(raise_error!(
            format!(
                "Template {} targets channel {}, not {}",
                template.id, template.channel, request.channel
            ),
            ErrorCode::InvalidParameter
        ));
    }

    let recipients = RecipientResolver::new(deps.contact_store.as_ref())
        .resolve(&request.tag_ids, &request.contact_ids)
        .await;
    if recipients.is_empty() {
        info!(operation = operation.id(), "Bulk send resolved zero recipients");
        operation.finish(
            BulkPhase::Aborted,
            BulkOutcome::empty(BulkOutcomeStatus::NoRecipients, None),
        );
        return;
    }

    // Render every body up front; the dispatch loop only sends.
    operation.set_phase(BulkPhase::Rendering);
    let channel = request.channel;
    let jobs: Vec<DispatchJob> = recipients
        .into_iter()
        .map(|contact| {
            let fields = merge_fields(&request.fields, &contact);
            let mut body = Renderer::render(&template, &fields);
            if channel == Channel::Email {
                body = Renderer::into_email_html(&body);
            }
            DispatchJob { contact, body }
        })
        .collect();

    // Paced dispatch, progress published per recipient.
    operation.set_phase(BulkPhase::Dispatching);
    operation.publish_progress(DispatchProgress::new(jobs.len() as u64));
    let dispatch = DispatchLoop::new(
        deps.gateway.as_ref(),
        deps.send_interval,
        operation.cancel_token(),
    );
    let report = {
        let operation = operation.clone();
        dispatch
            .run(jobs, |progress| {
                operation.publish_progress(progress.clone());
            })
            .await
    };

    if report.cancelled {
        operation.finish(
            BulkPhase::Aborted,
            BulkOutcome {
                status: BulkOutcomeStatus::Cancelled,
                progress: report.progress,
                results: report.results,
                error: None,
            },
        );
        return;
    }

    let status = if report.progress.failed == 0 {
        BulkOutcomeStatus::FullSuccess
    } else if report.progress.sent == 0 {
        BulkOutcomeStatus::FullFailure
    } else {
        BulkOutcomeStatus::PartialSuccess
    };
    info!(
        operation = operation.id(),
        sent = report.progress.sent,
        failed = report.progress.failed,
        "Bulk send completed"
    );
    operation.finish(
        BulkPhase::Completed,
        BulkOutcome {
            status,
            progress: report.progress,
            results: report.results,
            error: None,
        },
    );
}

/// Per-recipient placeholder values: campaign fields first, then the
/// contact's own name and addresses on top.
fn merge_fields(campaign: &HashMap<String, String>, contact: &Contact) -> HashMap<String, String> {
    let mut fields = campaign.clone();
    fields.insert("name".to_string(), contact.name.clone());
    if let Some(phone) = contact.channel_address(Channel::WhatsApp) {
        fields.insert("phone".to_string(), phone);
    }
    if let Some(email) = contact.channel_address(Channel::Email) {
        fields.insert("email".to_string(), email);
    }
    fields
}

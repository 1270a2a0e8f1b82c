// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::modules::contact::store::ContactStore;
use crate::modules::contact::{Address, Channel, Contact, Tag};
use crate::modules::dispatch::gateway::{try_endpoints, MessageGateway};
use crate::modules::dispatch::progress::RecipientStatus;
use crate::modules::dispatch::resolver::RecipientResolver;
use crate::modules::dispatch::run::{CancelToken, DispatchJob, DispatchLoop};
use crate::modules::error::{code::ErrorCode, ReachBookResult};
use crate::raise_error;

fn contact(id: u64, phone: &str) -> Contact {
    Contact {
        id,
        name: format!("Contact {}", id),
        addresses: vec![Address::Phone(phone.into())],
        source: None,
    }
}

struct MockContactStore {
    tags: HashMap<u64, Vec<Contact>>,
    contacts: HashMap<u64, Contact>,
    failing_tags: HashSet<u64>,
}

impl MockContactStore {
    fn new(tags: Vec<(u64, Vec<Contact>)>) -> Self {
        let contacts = tags
            .iter()
            .flat_map(|(_, contacts)| contacts.iter().cloned())
            .map(|contact| (contact.id, contact))
            .collect();
        Self {
            tags: tags.into_iter().collect(),
            contacts,
            failing_tags: HashSet::new(),
        }
    }
}

#[async_trait]
impl ContactStore for MockContactStore {
    async fn contacts_by_tag(&self, tag_id: u64) -> ReachBookResult<Vec<Contact>> {
        if self.failing_tags.contains(&tag_id) {
            return Err(raise_error!(
                format!("tag {} fetch failed", tag_id),
                ErrorCode::NetworkError
            ));
        }
        Ok(self.tags.get(&tag_id).cloned().unwrap_or_default())
    }

    async fn contact_by_id(&self, contact_id: u64) -> ReachBookResult<Option<Contact>> {
        Ok(self.contacts.get(&contact_id).cloned())
    }

    async fn list_tags(&self) -> ReachBookResult<Vec<Tag>> {
        Ok(self
            .tags
            .iter()
            .map(|(id, contacts)| Tag {
                id: *id,
                name: format!("tag-{}", id),
                contact_count: contacts.len() as u64,
            })
            .collect())
    }
}

struct MockGateway {
    channel: Channel,
    sends: Mutex<Vec<String>>,
    failing_addresses: HashSet<String>,
}

impl MockGateway {
    fn new(channel: Channel) -> Self {
        Self {
            channel,
            sends: Mutex::new(Vec::new()),
            failing_addresses: HashSet::new(),
        }
    }

    fn failing(channel: Channel, addresses: &[&str]) -> Self {
        Self {
            channel,
            sends: Mutex::new(Vec::new()),
            failing_addresses: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn sent_to(&self) -> Vec<String> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageGateway for MockGateway {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, address: &str, _body: &str) -> ReachBookResult<String> {
        if self.failing_addresses.contains(address) {
            return Err(raise_error!(
                format!("gateway rejected {}", address),
                ErrorCode::GatewaySendFailed
            ));
        }
        self.sends.lock().unwrap().push(address.to_string());
        Ok(format!("msg-{}", address))
    }
}

#[tokio::test]
async fn resolver_dedupes_across_tags_first_occurrence_wins() {
    // Two tags sharing contact 2: the resolved set is [1, 2, 3].
    let store = MockContactStore::new(vec![
        (
            10,
            vec![contact(1, "919000000001"), contact(2, "919000000002")],
        ),
        (
            20,
            vec![contact(2, "919000000002"), contact(3, "919000000003")],
        ),
    ]);

    let recipients = RecipientResolver::new(&store).resolve(&[10, 20], &[]).await;

    let ids: Vec<u64> = recipients.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn resolver_treats_failed_tag_as_empty() {
    let mut store = MockContactStore::new(vec![
        (10, vec![contact(1, "919000000001")]),
        (20, vec![contact(3, "919000000003")]),
    ]);
    store.failing_tags.insert(10);

    let recipients = RecipientResolver::new(&store).resolve(&[10, 20], &[]).await;

    let ids: Vec<u64> = recipients.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3]);
}

#[tokio::test]
async fn resolver_merges_explicit_contacts_after_tags() {
    let store = MockContactStore::new(vec![(
        10,
        vec![contact(1, "919000000001"), contact(2, "919000000002")],
    )]);

    // Contact 2 is both in the tag and explicitly selected; 99 is unknown.
    let recipients = RecipientResolver::new(&store)
        .resolve(&[10], &[2, 1, 99])
        .await;

    let ids: Vec<u64> = recipients.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn resolver_with_no_selection_returns_empty() {
    let store = MockContactStore::new(vec![]);
    let recipients = RecipientResolver::new(&store).resolve(&[], &[]).await;
    assert!(recipients.is_empty());
}

fn jobs_for(contacts: Vec<Contact>) -> Vec<DispatchJob> {
    contacts
        .into_iter()
        .map(|contact| DispatchJob {
            body: format!("Hi {}", contact.name),
            contact,
        })
        .collect()
}

#[tokio::test]
async fn loop_runs_full_list_and_counts_one_failure() {
    // Scenario: three recipients, the gateway fails for the second one.
    let gateway = MockGateway::failing(Channel::WhatsApp, &["9000000002"]);
    let jobs = jobs_for(vec![
        contact(1, "919000000001"),
        contact(2, "919000000002"),
        contact(3, "919000000003"),
    ]);

    let mut callbacks = Vec::new();
    let dispatch = DispatchLoop::new(&gateway, Duration::ZERO, CancelToken::new());
    let report = dispatch
        .run(jobs, |progress| callbacks.push(progress.clone()))
        .await;

    assert_eq!(report.progress.sent, 2);
    assert_eq!(report.progress.failed, 1);
    assert_eq!(report.progress.total, 3);
    assert_eq!(report.progress.pending, 0);
    assert!(!report.cancelled);
    assert_eq!(gateway.sent_to(), vec!["9000000001", "9000000003"]);

    // One synchronous callback per recipient, counters consistent and
    // monotonic throughout.
    assert_eq!(callbacks.len(), 3);
    let mut last_sent = 0;
    let mut last_failed = 0;
    for progress in &callbacks {
        assert_eq!(progress.sent + progress.failed + progress.pending, progress.total);
        assert!(progress.sent >= last_sent);
        assert!(progress.failed >= last_failed);
        last_sent = progress.sent;
        last_failed = progress.failed;
    }

    assert_eq!(report.results[1].status, RecipientStatus::Failed);
    let failure = report.results[1].error.as_ref().unwrap();
    assert_eq!(failure.code, ErrorCode::GatewaySendFailed as u32);
    assert!(failure.message.contains("rejected"));
    assert_eq!(
        report.results[0].provider_message_id.as_deref(),
        Some("msg-9000000001")
    );
}

#[tokio::test]
async fn recipient_without_address_counts_as_failed() {
    let gateway = MockGateway::new(Channel::WhatsApp);
    let no_phone = Contact {
        id: 7,
        name: "Mail Only".into(),
        addresses: vec![Address::Email("mailonly@example.com".into())],
        source: None,
    };
    let jobs = jobs_for(vec![no_phone, contact(8, "919000000008")]);

    let dispatch = DispatchLoop::new(&gateway, Duration::ZERO, CancelToken::new());
    let report = dispatch.run(jobs, |_| {}).await;

    assert_eq!(report.progress.sent, 1);
    assert_eq!(report.progress.failed, 1);
    assert_eq!(report.results[0].address, None);
    let failure = report.results[0].error.as_ref().unwrap();
    assert_eq!(failure.code, ErrorCode::MissingRecipientAddress as u32);
    assert!(failure.message.contains("no usable whatsapp address"));
    assert_eq!(gateway.sent_to(), vec!["9000000008"]);
}

#[tokio::test]
async fn cancellation_is_checked_before_each_send() {
    let gateway = MockGateway::new(Channel::WhatsApp);
    let jobs = jobs_for(vec![
        contact(1, "919000000001"),
        contact(2, "919000000002"),
        contact(3, "919000000003"),
    ]);

    let cancel = CancelToken::new();
    let dispatch = DispatchLoop::new(&gateway, Duration::ZERO, cancel.clone());
    let report = dispatch
        .run(jobs, |_| {
            // Cancel after the first recipient completes.
            cancel.cancel();
        })
        .await;

    assert!(report.cancelled);
    assert_eq!(report.progress.sent, 1);
    assert_eq!(report.progress.pending, 2);
    assert_eq!(report.results.len(), 1);
    assert_eq!(gateway.sent_to(), vec!["9000000001"]);
}

#[tokio::test]
async fn endpoint_fallback_stops_at_first_success() {
    let endpoints: Vec<String> = vec![
        "http://a.example/send".into(),
        "http://b.example/send".into(),
        "http://c.example/send".into(),
    ];
    let attempts = Mutex::new(Vec::new());

    let message_id = try_endpoints(&endpoints, |endpoint| {
        attempts.lock().unwrap().push(endpoint.to_string());
        async move {
            if endpoint.contains("b.example") {
                Ok("msg-1".to_string())
            } else {
                Err(raise_error!(
                    format!("{} unavailable", endpoint),
                    ErrorCode::HttpResponseError
                ))
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(message_id, "msg-1");
    // Tried in configured order, never reached the third endpoint.
    assert_eq!(
        attempts.lock().unwrap().clone(),
        vec!["http://a.example/send", "http://b.example/send"]
    );
}

#[tokio::test]
async fn endpoint_fallback_returns_last_error_when_all_fail() {
    let endpoints: Vec<String> = vec!["http://a.example/send".into(), "http://b.example/send".into()];

    let result = try_endpoints(&endpoints, |endpoint| async move {
        Err::<String, _>(raise_error!(
            format!("{} unavailable", endpoint),
            ErrorCode::HttpResponseError
        ))
    })
    .await;

    let error = result.unwrap_err();
    assert!(error.to_string().contains("b.example"));
}

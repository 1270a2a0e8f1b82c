// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use itertools::Itertools;
use tracing::warn;

use crate::modules::contact::store::ContactStore;
use crate::modules::contact::Contact;

/// Builds the dispatch-scoped recipient set from tag selections and explicit
/// contact picks.
pub struct RecipientResolver<'a> {
    store: &'a dyn ContactStore,
}

impl<'a> RecipientResolver<'a> {
    pub fn new(store: &'a dyn ContactStore) -> Self {
        Self { store }
    }

    /// One store call per tag; a failed tag fetch logs and contributes zero
    /// contacts without aborting the others. The concatenated result is
    /// deduplicated by contact id, first occurrence wins, insertion order
    /// preserved. An empty result is a valid outcome, not an error.
    pub async fn resolve(&self, tag_ids: &[u64], contact_ids: &[u64]) -> Vec<Contact> {
        let mut collected: Vec<Contact> = Vec::new();

        for &tag_id in tag_ids {
            match self.store.contacts_by_tag(tag_id).await {
                Ok(contacts) => collected.extend(contacts),
                Err(error) => {
                    warn!(
                        "Fetching contacts for tag {} failed, treating as empty: {}",
                        tag_id, error
                    );
                }
            }
        }

        for &contact_id in contact_ids {
            match self.store.contact_by_id(contact_id).await {
                Ok(Some(contact)) => collected.push(contact),
                Ok(None) => warn!("Selected contact {} not found, skipping", contact_id),
                Err(error) => {
                    warn!("Looking up contact {} failed, skipping: {}", contact_id, error);
                }
            }
        }

        collected
            .into_iter()
            .unique_by(|contact| contact.id)
            .collect()
    }
}

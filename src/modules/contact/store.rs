// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::modules::contact::{Address, Contact, Tag};
use crate::modules::error::{code::ErrorCode, ReachBookResult};
use crate::modules::http::HttpClient;
use crate::raise_error;

/// The external contact store. Owns contacts and tags; this process only reads.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn contacts_by_tag(&self, tag_id: u64) -> ReachBookResult<Vec<Contact>>;
    async fn contact_by_id(&self, contact_id: u64) -> ReachBookResult<Option<Contact>>;
    async fn list_tags(&self) -> ReachBookResult<Vec<Tag>>;
}

/// Wire shape of a contact as the store serves it: loose optional address
/// fields, converted into the tagged `Address` variants on ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl From<ContactRecord> for Contact {
    fn from(record: ContactRecord) -> Self {
        let mut addresses = Vec::new();
        if let Some(phone) = record.phone.filter(|p| !p.trim().is_empty()) {
            addresses.push(Address::Phone(phone));
        }
        if let Some(email) = record.email.filter(|e| !e.trim().is_empty()) {
            addresses.push(Address::Email(email));
        }
        Contact {
            id: record.id,
            name: record.name,
            addresses,
            source: record.source,
        }
    }
}

pub struct RestContactStore {
    client: HttpClient,
    base_url: String,
}

impl RestContactStore {
    pub fn new(base_url: &str) -> ReachBookResult<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ContactStore for RestContactStore {
    async fn contacts_by_tag(&self, tag_id: u64) -> ReachBookResult<Vec<Contact>> {
        let url = format!("{}/tags/{}/contacts", self.base_url, tag_id);
        let value = self.client.get_json(&url).await?;
        let records = serde_json::from_value::<Vec<ContactRecord>>(value).map_err(|e| {
            raise_error!(
                format!(
                    "Failed to deserialize contact store response for tag {}: {:#?}",
                    tag_id, e
                ),
                ErrorCode::InternalError
            )
        })?;
        Ok(records.into_iter().map(Contact::from).collect())
    }

    async fn contact_by_id(&self, contact_id: u64) -> ReachBookResult<Option<Contact>> {
        let url = format!("{}/contacts/{}", self.base_url, contact_id);
        let value = self.client.get_optional_json(&url).await?;
        value
            .map(|value| {
                serde_json::from_value::<ContactRecord>(value)
                    .map(Contact::from)
                    .map_err(|e| {
                        raise_error!(
                            format!(
                                "Failed to deserialize contact record {}: {:#?}",
                                contact_id, e
                            ),
                            ErrorCode::InternalError
                        )
                    })
            })
            .transpose()
    }

    async fn list_tags(&self) -> ReachBookResult<Vec<Tag>> {
        let url = format!("{}/tags", self.base_url);
        let value = self.client.get_json(&url).await?;
        serde_json::from_value::<Vec<Tag>>(value).map_err(|e| {
            raise_error!(
                format!("Failed to deserialize tag list: {:#?}", e),
                ErrorCode::InternalError
            )
        })
    }
}

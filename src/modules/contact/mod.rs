// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::validate_email;

pub mod store;

/// Outbound channel a message is dispatched through.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
#[oai(rename_all = "lowercase")]
pub enum Channel {
    Email,
    WhatsApp,
    Sms,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::WhatsApp => write!(f, "whatsapp"),
            Channel::Sms => write!(f, "sms"),
        }
    }
}

/// A single contact address, tagged by kind.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Address {
    Phone(String),
    Email(String),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub addresses: Vec<Address>,
    /// Source-system provenance, informational only.
    pub source: Option<String>,
}

impl Contact {
    /// The deliverable address for a channel, normalized for dispatch.
    ///
    /// Phone channels get the fixed single-country normalization; the email
    /// channel requires a syntactically valid address.
    pub fn channel_address(&self, channel: Channel) -> Option<String> {
        match channel {
            Channel::Email => self.addresses.iter().find_map(|address| match address {
                Address::Email(email) if validate_email!(email).is_ok() => Some(email.clone()),
                _ => None,
            }),
            Channel::WhatsApp | Channel::Sms => {
                self.addresses.iter().find_map(|address| match address {
                    Address::Phone(phone) => {
                        let normalized = normalize_phone(phone);
                        (!normalized.is_empty()).then_some(normalized)
                    }
                    _ => None,
                })
            }
        }
    }

    pub fn has_channel_address(&self, channel: Channel) -> bool {
        self.channel_address(channel).is_some()
    }
}

/// Strip a leading `+91`/`91` country-code prefix, then every non-digit.
///
/// Fixed single-country policy, not general E.164 handling.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("+91")
        .or_else(|| trimmed.strip_prefix("91"))
        .unwrap_or(trimmed);
    stripped.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A named grouping of contacts; membership is resolved lazily by the store.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub contact_count: u64,
}

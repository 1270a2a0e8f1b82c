// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::modules::contact::Channel;

pub mod render;
pub mod store;

#[cfg(test)]
mod tests;

/// A stored message body with `{{field}}` placeholders, owned by the external
/// template store and read-only here.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct Template {
    pub id: u64,
    pub name: String,
    pub body: String,
    pub channel: Channel,
    pub active: bool,
}

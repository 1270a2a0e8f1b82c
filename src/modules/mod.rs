// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod bulk;
pub mod common;
pub mod contact;
pub mod context;
pub mod credential;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod logger;
pub mod rest;
pub mod scheduler;
pub mod settings;
pub mod tasks;
pub mod template;
pub mod utils;

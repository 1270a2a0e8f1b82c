// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod gateway;
pub mod progress;
pub mod resolver;
pub mod run;

#[cfg(test)]
mod tests;

// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::context::ReachBookTask;
use crate::modules::credential::task::CredentialRecheckTask;

pub struct PeriodicTasks;

impl PeriodicTasks {
    pub fn start_background_tasks() {
        CredentialRecheckTask::start();
    }
}

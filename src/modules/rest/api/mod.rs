// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use bulk::BulkApi;
use credential::CredentialApi;
use directory::DirectoryApi;
use poem_openapi::{OpenApiService, Tags};

use crate::reachbook_version;

pub mod bulk;
pub mod credential;
pub mod directory;

#[derive(Tags)]
pub enum ApiTags {
    Bulk,
    Credential,
    Directory,
}

type ReachBookOpenApi = (BulkApi, CredentialApi, DirectoryApi);

pub fn create_openapi_service() -> OpenApiService<ReachBookOpenApi, ()> {
    OpenApiService::new(
        (BulkApi, CredentialApi, DirectoryApi),
        "ReachBookApi",
        reachbook_version!(),
    )
}

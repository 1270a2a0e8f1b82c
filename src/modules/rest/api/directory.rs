// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::param::Query;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

use crate::modules::contact::{Channel, Tag};
use crate::modules::context::REACHBOOK_CONTEXT;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::modules::template::Template;

pub struct DirectoryApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Directory")]
impl DirectoryApi {
    /// Lists the contact tags available for recipient selection.
    #[oai(path = "/tags", method = "get", operation_id = "list_tags")]
    async fn list_tags(&self) -> ApiResult<Json<Vec<Tag>>> {
        let tags = REACHBOOK_CONTEXT.controller().contact_store().list_tags().await?;
        Ok(Json(tags))
    }

    /// Lists the templates available for a channel.
    #[oai(path = "/templates", method = "get", operation_id = "list_templates")]
    async fn list_templates(
        &self,
        /// The channel whose templates to list
        channel: Query<Channel>,
    ) -> ApiResult<Json<Vec<Template>>> {
        let templates = REACHBOOK_CONTEXT
            .controller()
            .template_store()
            .list_templates(channel.0)
            .await?;
        Ok(Json(templates))
    }
}

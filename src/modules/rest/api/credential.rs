// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::web::Path;
use poem_openapi::param::Query;
use poem_openapi::payload::{Json, PlainText};
use poem_openapi::OpenApi;

use crate::modules::contact::Channel;
use crate::modules::context::REACHBOOK_CONTEXT;
use crate::modules::credential::CredentialStatus;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;

pub struct CredentialApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Credential")]
impl CredentialApi {
    /// Retrieves the credential status for a channel.
    ///
    /// Served from the cache within its validity window unless `force` is set.
    #[oai(
        path = "/credential/:channel",
        method = "get",
        operation_id = "get_credential_status"
    )]
    async fn get_credential_status(
        &self,
        /// The channel whose credential to inspect
        channel: Path<Channel>,
        /// Optional. Bypass the cache-validity window and hit the provider.
        force: Query<Option<bool>>,
    ) -> ApiResult<Json<CredentialStatus>> {
        let cache = REACHBOOK_CONTEXT.credential(channel.0)?;
        let status = cache.check_status(force.0.unwrap_or(false)).await?;
        Ok(Json(status))
    }

    /// Asks the provider to refresh the channel credential.
    ///
    /// On success the cached status is invalidated, so the next status read
    /// reflects the refreshed token.
    #[oai(
        path = "/credential/:channel/refresh",
        method = "post",
        operation_id = "refresh_credential"
    )]
    async fn refresh_credential(
        &self,
        /// The channel whose credential to refresh
        channel: Path<Channel>,
    ) -> ApiResult<Json<bool>> {
        let cache = REACHBOOK_CONTEXT.credential(channel.0)?;
        Ok(Json(cache.refresh().await))
    }

    /// Signs the channel out: revokes the provider credential and drops the
    /// cached status back to unchecked.
    #[oai(
        path = "/credential/:channel",
        method = "delete",
        operation_id = "revoke_credential"
    )]
    async fn revoke_credential(
        &self,
        /// The channel whose credential to revoke
        channel: Path<Channel>,
    ) -> ApiResult<()> {
        let cache = REACHBOOK_CONTEXT.credential(channel.0)?;
        cache.provider().revoke().await?;
        cache.clear().await;
        Ok(())
    }

    /// Builds the provider consent URL used to (re-)connect the channel.
    #[oai(
        path = "/credential/:channel/authorize-url",
        method = "get",
        operation_id = "get_credential_authorize_url"
    )]
    async fn get_credential_authorize_url(
        &self,
        /// The channel to build a consent URL for
        channel: Path<Channel>,
    ) -> ApiResult<PlainText<String>> {
        let cache = REACHBOOK_CONTEXT.credential(channel.0)?;
        Ok(PlainText(cache.provider().authorize_url()?))
    }
}

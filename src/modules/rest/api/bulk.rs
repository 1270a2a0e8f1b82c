// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::web::Path;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

use crate::modules::bulk::operation::BulkOperation;
use crate::modules::bulk::{BulkOutcome, BulkSendRequest, BulkStatus};
use crate::modules::context::REACHBOOK_CONTEXT;
use crate::modules::error::code::ErrorCode;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::raise_error;
use std::sync::Arc;

pub struct BulkApi;

fn lookup(id: u64) -> Result<Arc<BulkOperation>, crate::modules::error::ReachBookError> {
    REACHBOOK_CONTEXT
        .controller()
        .registry()
        .get(id)
        .ok_or_else(|| {
            raise_error!(
                format!("Bulk operation '{id}' not found"),
                ErrorCode::ResourceNotFound
            )
        })
}

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Bulk")]
impl BulkApi {
    /// Starts a bulk send and returns the accepted operation.
    ///
    /// The operation runs in the background; poll its status and outcome by id.
    #[oai(path = "/bulk-send", method = "post", operation_id = "start_bulk_send")]
    async fn start_bulk_send(
        &self,
        /// The channel, recipient selection, template and placeholder values
        request: Json<BulkSendRequest>,
    ) -> ApiResult<Json<BulkStatus>> {
        let operation = REACHBOOK_CONTEXT.controller().start_bulk_send(request.0)?;
        Ok(Json(operation.status()))
    }

    /// Retrieves the current phase and progress of a bulk operation.
    #[oai(
        path = "/bulk-send/:id",
        method = "get",
        operation_id = "get_bulk_send"
    )]
    async fn get_bulk_send(
        &self,
        /// The id of the bulk operation
        id: Path<u64>,
    ) -> ApiResult<Json<BulkStatus>> {
        Ok(Json(lookup(id.0)?.status()))
    }

    /// Retrieves the terminal outcome of a finished bulk operation.
    ///
    /// Returns an error while the operation is still running.
    #[oai(
        path = "/bulk-send/:id/outcome",
        method = "get",
        operation_id = "get_bulk_send_outcome"
    )]
    async fn get_bulk_send_outcome(
        &self,
        /// The id of the bulk operation
        id: Path<u64>,
    ) -> ApiResult<Json<BulkOutcome>> {
        let operation = lookup(id.0)?;
        let outcome = operation.outcome().ok_or_else(|| {
            raise_error!(
                format!("Bulk operation '{}' has not finished yet", id.0),
                ErrorCode::InvalidParameter
            )
        })?;
        Ok(Json(outcome))
    }

    /// Requests cooperative cancellation of a running bulk operation.
    ///
    /// The in-flight send completes; remaining recipients stay pending.
    #[oai(
        path = "/bulk-send/:id/cancel",
        method = "post",
        operation_id = "cancel_bulk_send"
    )]
    async fn cancel_bulk_send(
        &self,
        /// The id of the bulk operation
        id: Path<u64>,
    ) -> ApiResult<()> {
        let operation = lookup(id.0)?;
        if !operation.request_cancel() {
            return Err(raise_error!(
                format!("Bulk operation '{}' already finished", id.0),
                ErrorCode::InvalidParameter
            )
            .into());
        }
        Ok(())
    }

    /// Lists every bulk operation known to this process.
    #[oai(
        path = "/bulk-send-list",
        method = "get",
        operation_id = "list_bulk_sends"
    )]
    async fn list_bulk_sends(&self) -> ApiResult<Json<Vec<BulkStatus>>> {
        Ok(Json(REACHBOOK_CONTEXT.controller().registry().list()))
    }
}

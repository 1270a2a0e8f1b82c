// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Formatter;

use code::ErrorCode;
use poem::http::StatusCode;
use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};
use snafu::{Location, Snafu};

pub mod code;
pub mod handler;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReachBookError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
}

impl ReachBookError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ReachBookError::Generic { code, .. } => *code,
        }
    }
}

pub type ReachBookResult<T, E = ReachBookError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct ApiError {
    pub message: String,
    pub code: u32,
}

impl From<&ReachBookError> for ApiError {
    fn from(error: &ReachBookError) -> Self {
        Self {
            message: error.to_string(),
            code: error.code() as u32,
        }
    }
}

impl From<ReachBookError> for ApiErrorResponse {
    fn from(error: ReachBookError) -> Self {
        match error {
            ReachBookError::Generic {
                message,
                location,
                code,
            } => {
                tracing::error!(
                    "API error occurred: [{:#?}] {} at {:?}",
                    code,
                    message,
                    location
                );
                let api_error = ApiError {
                    message,
                    code: code as u32,
                };
                ApiErrorResponse::Generic(code.status(), Json(api_error))
            }
        }
    }
}

impl ApiError {
    pub fn new(message: String, code: u32) -> Self {
        Self { message, code }
    }

    pub fn new_with_error_code<ErrorType: std::fmt::Display>(
        error: ErrorType,
        code: u32,
    ) -> ApiError {
        Self::new(format!("{:#}", error), code)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, ApiResponse)]
pub enum ApiErrorResponse {
    Generic(StatusCode, Json<ApiError>),
}

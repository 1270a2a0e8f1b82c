// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use poem_openapi::Enum;

#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    MissingConfiguration = 10010,
    NoRecipients = 10020,
    TemplateInactive = 10030,
    MethodNotAllowed = 10090,

    // Authentication and authorization errors (20000–20999)
    NotAuthenticated = 20010,
    CredentialRefreshFailed = 20020,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,

    // Network connection errors (40000–40999)
    NetworkError = 40000,
    HttpResponseError = 40010,

    // Dispatch errors (50000–50999)
    GatewaySendFailed = 50000,
    MissingRecipientAddress = 50010,

    // Internal system errors (70000–70999)
    InternalError = 70000,
    UnhandledPoemError = 70010,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter
            | ErrorCode::MissingConfiguration
            | ErrorCode::NoRecipients
            | ErrorCode::TemplateInactive => StatusCode::BAD_REQUEST,
            ErrorCode::NotAuthenticated | ErrorCode::CredentialRefreshFailed => {
                StatusCode::FORBIDDEN
            }
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::NetworkError
            | ErrorCode::HttpResponseError
            | ErrorCode::GatewaySendFailed
            | ErrorCode::MissingRecipientAddress
            | ErrorCode::InternalError
            | ErrorCode::UnhandledPoemError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression, Cors};
use poem::{EndpointExt, Route, Server};
use poem_openapi::ContactObject;

use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::error_handler;
use crate::modules::error::{ApiErrorResponse, ReachBookResult};
use crate::modules::{settings::cli::SETTINGS, utils::shutdown::shutdown_signal};
use crate::raise_error;
use api::create_openapi_service;

pub mod api;

pub type ApiResult<T, E = ApiErrorResponse> = std::result::Result<T, E>;

const DESCRIPTION: &str = r#"
    ReachBook is a bulk outbound messaging dispatcher for tag-based contact outreach.

    - Resolves recipient sets from contact tags and individual picks, deduplicated.
    - Renders per-recipient template bodies and dispatches them sequentially, paced.
    - Gates every campaign behind a cached, auto-refreshing OAuth provider credential.
"#;

pub async fn start_http_server() -> ReachBookResult<()> {
    let listener = TcpListener::bind((
        SETTINGS
            .reachbook_bind_ip
            .clone()
            .unwrap_or("0.0.0.0".into()),
        SETTINGS.reachbook_http_port as u16,
    ));

    let api_service = create_openapi_service()
        .description(DESCRIPTION)
        .contact(ContactObject::new().email("support@reachbook.org"))
        .summary("Bulk outbound messaging dispatcher with OAuth credential gating");

    let swagger = api_service.swagger_ui();
    let scalar = api_service.scalar();
    let spec_json = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();

    let mut cors_origins = SETTINGS.reachbook_cors_origins.clone();
    if cors_origins.is_empty() {
        cors_origins = ["*".to_string()].into_iter().collect();
    }

    let cors = Cors::new()
        .allow_origins(cors_origins)
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS", "HEAD"])
        .allow_headers(vec!["Content-Type", "Authorization"])
        .expose_headers(vec!["Accept"])
        .max_age(SETTINGS.reachbook_cors_max_age);

    let route = Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/scalar", scalar)
        .nest("/api-docs/spec.json", spec_json)
        .nest("/api-docs/spec.yaml", spec_yaml)
        .nest_no_strip("/api/v1", api_service)
        .with(cors)
        .with_if(
            SETTINGS.reachbook_http_compression_enabled,
            Compression::new(),
        )
        .with(CatchPanic::new());

    let server = Server::new(listener)
        .name("ReachBook API Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(
            route.catch_all_error(error_handler),
            shutdown_signal(),
            Some(Duration::from_secs(5)),
        );
    println!(
        "ReachBook API Service is now running on port {}.",
        SETTINGS.reachbook_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}

// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, Parser};
use std::{collections::HashSet, sync::LazyLock};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "reachbook",
    about = "Bulk outbound messaging dispatcher for tag-based contact outreach,
    gating WhatsApp/email campaigns behind a cached, auto-refreshing OAuth credential.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// reachbook log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for reachbook"
    )]
    pub reachbook_log_level: String,

    /// Enable ANSI colors in log output (default: false)
    #[clap(long, default_value = "false", env, help = "Enable ANSI colored logs")]
    pub reachbook_ansi_logs: bool,

    /// Write logs to daily-rolling files instead of stdout (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Write logs to rolling files instead of stdout"
    )]
    pub reachbook_log_to_file: bool,

    /// Directory for rolling log files
    #[clap(
        long,
        default_value = "./reachbook_logs",
        env,
        help = "Set the directory used for rolling log files"
    )]
    pub reachbook_log_dir: String,

    /// Maximum number of rolling log files to keep (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of rolling log files to keep"
    )]
    pub reachbook_max_log_files: usize,

    /// reachbook HTTP port (default: 15720)
    #[clap(
        long,
        default_value = "15720",
        env,
        help = "Set the HTTP port for reachbook"
    )]
    pub reachbook_http_port: i32,

    /// The IP address that the service binds to, in IPv4 format (e.g., 192.168.1.1).
    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IP address that the service binds to, in IPv4 format (e.g., 192.168.1.1).",
        value_parser = ValueParser::new(|s: &str| {
            // Ensure the input is a valid IPv4 address
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub reachbook_bind_ip: Option<String>,

    /// CORS allowed origins (default: "*")
    #[clap(
        long,
        default_value = "*",
        env,
        help = "Set the allowed CORS origins (comma-separated list, e.g., \"https://example.com, https://another.com\")",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub reachbook_cors_origins: HashSet<String>,

    /// CORS max age in seconds (default: 86400)
    #[clap(
        long,
        default_value = "86400",
        env,
        help = "Set the CORS max age in seconds"
    )]
    pub reachbook_cors_max_age: i32,

    /// Enable HTTP response compression (default: true)
    #[clap(
        long,
        default_value = "true",
        env,
        help = "Enable HTTP response compression"
    )]
    pub reachbook_http_compression_enabled: bool,

    /// Base URL of the external contact store
    #[clap(
        long,
        default_value = "http://localhost:8089",
        env,
        help = "Set the base URL of the external contact store"
    )]
    pub reachbook_contact_store_url: String,

    /// Base URL of the external template store
    #[clap(
        long,
        default_value = "http://localhost:8089",
        env,
        help = "Set the base URL of the external template store"
    )]
    pub reachbook_template_store_url: String,

    /// WhatsApp gateway send endpoint
    #[clap(
        long,
        default_value = "http://localhost:9090/whatsapp/send",
        env,
        help = "Set the WhatsApp gateway send endpoint"
    )]
    pub reachbook_whatsapp_gateway_url: String,

    /// SMS gateway send endpoint
    #[clap(
        long,
        default_value = "http://localhost:9090/sms/send",
        env,
        help = "Set the SMS gateway send endpoint"
    )]
    pub reachbook_sms_gateway_url: String,

    /// Ordered list of email send endpoints, tried first to last per message
    #[clap(
        long,
        default_value = "http://localhost:9090/email/send",
        env,
        help = "Set the ordered, comma-separated list of email send endpoints (fallback order)",
        value_parser = ValueParser::new(|s: &str| -> Result<Vec<String>, String> {
            let endpoints: Vec<String> = s.split(',')
                .map(|endpoint| endpoint.trim().to_string())
                .filter(|endpoint| !endpoint.is_empty())
                .collect();
            if endpoints.is_empty() {
                return Err("At least one email endpoint is required.".to_string());
            }
            Ok(endpoints)
        })
    )]
    pub reachbook_email_endpoints: Vec<String>,

    /// Delay between consecutive sends in one dispatch, in milliseconds (default: 1000)
    #[clap(
        long,
        default_value = "1000",
        env,
        help = "Set the fixed delay between consecutive sends, in milliseconds"
    )]
    pub reachbook_send_interval_ms: u64,

    /// Credential status cache validity window, in seconds (default: 30)
    #[clap(
        long,
        default_value = "30",
        env,
        help = "Set the credential status cache validity window, in seconds"
    )]
    pub reachbook_credential_cache_secs: u64,

    /// Lookahead before token expiry after which a refresh is wanted, in seconds (default: 300)
    #[clap(
        long,
        default_value = "300",
        env,
        help = "Set the refresh lookahead before credential expiry, in seconds"
    )]
    pub reachbook_refresh_lookahead_secs: u64,

    /// Interval of the advisory background credential re-check, in seconds (default: 300)
    #[clap(
        long,
        default_value = "300",
        env,
        help = "Set the background credential re-check interval, in seconds"
    )]
    pub reachbook_credential_recheck_secs: u64,

    /// Base URL of the OAuth provider bridge (status/refresh/revoke endpoints)
    #[clap(
        long,
        default_value = "http://localhost:9091/oauth",
        env,
        help = "Set the base URL of the OAuth provider bridge"
    )]
    pub reachbook_oauth_base_url: String,

    /// OAuth authorization endpoint used to build consent URLs
    #[clap(
        long,
        default_value = "https://accounts.google.com/o/oauth2/v2/auth",
        env,
        help = "Set the OAuth authorization endpoint"
    )]
    pub reachbook_oauth_auth_url: String,

    /// OAuth client id
    #[clap(
        long,
        default_value = "",
        env,
        help = "Set the OAuth client id used for consent URLs"
    )]
    pub reachbook_oauth_client_id: String,

    /// OAuth redirect URI registered with the provider
    #[clap(
        long,
        default_value = "http://localhost:15720/oauth2/callback",
        env,
        help = "Set the OAuth redirect URI registered with the provider"
    )]
    pub reachbook_oauth_redirect_uri: String,

    /// OAuth scopes requested on the consent screen
    #[clap(
        long,
        default_value = "https://mail.google.com/",
        env,
        help = "Set the comma-separated OAuth scopes requested on the consent screen",
        value_parser = ValueParser::new(|s: &str| -> Result<Vec<String>, String> {
            let scopes: Vec<String> = s.split(',')
                .map(|scope| scope.trim().to_string())
                .filter(|scope| !scope.is_empty())
                .collect();
            Ok(scopes)
        })
    )]
    pub reachbook_oauth_scopes: Vec<String>,
}

impl Settings {
    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            reachbook_log_level: "info".to_string(),
            reachbook_ansi_logs: false,
            reachbook_log_to_file: false,
            reachbook_log_dir: "./reachbook_logs".to_string(),
            reachbook_max_log_files: 5,
            reachbook_http_port: 15720,
            reachbook_bind_ip: None,
            reachbook_cors_origins: HashSet::new(),
            reachbook_cors_max_age: 86400,
            reachbook_http_compression_enabled: false,
            reachbook_contact_store_url: "http://localhost:8089".to_string(),
            reachbook_template_store_url: "http://localhost:8089".to_string(),
            reachbook_whatsapp_gateway_url: "http://localhost:9090/whatsapp/send".to_string(),
            reachbook_sms_gateway_url: "http://localhost:9090/sms/send".to_string(),
            reachbook_email_endpoints: vec!["http://localhost:9090/email/send".to_string()],
            reachbook_send_interval_ms: 0,
            reachbook_credential_cache_secs: 30,
            reachbook_refresh_lookahead_secs: 300,
            reachbook_credential_recheck_secs: 300,
            reachbook_oauth_base_url: "http://localhost:9091/oauth".to_string(),
            reachbook_oauth_auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            reachbook_oauth_client_id: "test-client".to_string(),
            reachbook_oauth_redirect_uri: "http://localhost:15720/oauth2/callback".to_string(),
            reachbook_oauth_scopes: vec!["https://mail.google.com/".to_string()],
        }
    }
}

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    body::Body,
    extract::{ConnectInfo, State, rejection::ExtensionRejection},
    http::{HeaderValue, Request, Response},
    middleware::Next,
};
use tokio::time::Instant;
use tracing::{Level, error};

use crate::{
    build_info::{BUILD_TIME, RUST_VERSION},
    init::state::ServerState,
};

// by default, debug and below not logged at all; hence why
macro_rules! log_codeerror {
    ($level:expr_2021, $kind:expr_2021, response.method = $method:expr_2021, response.path = $path:expr_2021, response.client_ip = $client_ip:expr_2021, response.status = $status:expr_2021, response.status_code = $status_code:expr_2021, response.duration = $duration:expr_2021, response.error_code = $error_code:expr_2021, response.message = $message:expr_2021, response.detail = $detail:expr_2021) => {
        match $level {
            Level::ERROR => tracing::error!(kind = %$kind, method = %$method, path = %$path, client_ip = ?$client_ip, status = %$status, status_code = %$status_code, duration = %$duration, error_code = %$error_code, message = %$message, detail = %$detail),
            Level::WARN => tracing::warn!(kind = %$kind, method = %$method, path = %$path, client_ip = ?$client_ip, status = %$status, status_code = %$status_code, duration = %$duration, error_code = %$error_code, message = %$message, detail = %$detail),
            Level::INFO => tracing::info!(kind = %$kind, method = %$method, path = %$path, client_ip = ?$client_ip, status = %$status, status_code = %$status_code, duration = %$duration, error_code = %$error_code, message = %$message, detail = %$detail),
            Level::DEBUG => tracing::debug!(kind = %$kind, method = %$method, path = %$path, client_ip = ?$client_ip, status = %$status, status_code = %$status_code, duration = %$duration, error_code = %$error_code, message = %$message, detail = %$detail),
            Level::TRACE => tracing::trace!(kind = %$kind, method = %$method, path = %$path, client_ip = ?$client_ip, status = %$status, status_code = %$status_code, duration = %$duration, error_code = %$error_code, message = %$message, detail = %$detail),
        }
    };
}

/// Logs RECV on the way in and RESP/ERSP on the way out. Error responses
/// carry their diagnostics in `x-error-*` headers; this layer records and
/// strips them so they never reach the client.
pub async fn log_middleware(
    State(state): State<Arc<ServerState>>,
    connect_info: Result<ConnectInfo<SocketAddr>, ExtensionRejection>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let start = Instant::now();

    state.add_responses_handled();

    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let client_ip: Option<IpAddr> = match request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        Some(val) => match val.split(',').next().unwrap_or(val).trim().parse() {
            Ok(ip) => Some(ip),
            Err(e) => {
                error!(error=?e, forwarded_for=%val, "Could not parse x-forwarded-for into IpAddr");
                None
            }
        },
        None => connect_info.ok().map(|ConnectInfo(addr)| addr.ip()),
    };

    tracing::info!(kind = %"RECV", method = %method, path = %path, client_ip = ?client_ip);

    let mut response = next.run(request).await;

    if response.status().is_success() {
        let duration = start.elapsed();
        let headers = response.headers_mut();

        headers.insert("x-server-built-time", HeaderValue::from_static(BUILD_TIME));
        if let Ok(value) = HeaderValue::from_str(&state.get_app_name_version()) {
            headers.insert("x-server-name", value);
        }
        headers.insert(
            "x-server-rust-version",
            HeaderValue::from_static(RUST_VERSION),
        );

        tracing::info!(kind = %"RESP", method = %method, path = %path, client_ip = ?client_ip, duration = ?duration);
    } else {
        // Use lowercase header keys for consistency and use empty strings if headers are not present
        let headers = response.headers_mut();

        let log_level = header_value_to_str(headers.get("x-error-log-level")).unwrap_or("INFO");
        let status_code = header_value_to_str(headers.get("x-error-status-code")).unwrap_or("");
        let error_code = header_value_to_str(headers.get("x-error-code")).unwrap_or("");
        let message = header_value_to_str(headers.get("x-error-message")).unwrap_or("");
        let detail = header_value_to_str(headers.get("x-error-detail")).unwrap_or("");

        let duration = start.elapsed();

        log_codeerror!(
            log_level.parse::<Level>().unwrap_or(Level::ERROR),
            "ERSP",
            response.method = method,
            response.path = path,
            response.client_ip = client_ip,
            response.status = "ERROR",
            response.status_code = status_code,
            response.duration = format!("{:?}", duration),
            response.error_code = error_code,
            response.message = message,
            response.detail = detail
        );

        headers.remove("x-error-log-level");
        headers.remove("x-error-status-code");
        headers.remove("x-error-code");
        headers.remove("x-error-message");
        headers.remove("x-error-detail");

        headers.insert("x-server-built-time", HeaderValue::from_static(BUILD_TIME));
        if let Ok(value) = HeaderValue::from_str(&state.get_app_name_version()) {
            headers.insert("x-server-name", value);
        }
        headers.insert(
            "x-server-rust-version",
            HeaderValue::from_static(RUST_VERSION),
        );
    }

    response
}

fn header_value_to_str(value: Option<&HeaderValue>) -> Option<&str> {
    value.and_then(|v| v.to_str().ok())
}

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};
use serde_derive::Serialize;
use utoipa::ToSchema;

use crate::{
    build_info::{AXUM_VERSION, BUILD_TIME, RUST_VERSION},
    dto::responses::response_data::http_resp,
    errors::code_error::HandlerResponse,
    init::state::ServerState,
    util::time::now::tokio_now,
};

#[derive(Serialize, ToSchema)]
pub struct ServerHealthcheckResponse {
    pub server_name: String,
    pub build_time: &'static str,
    pub axum_version: &'static str,
    pub rust_version: &'static str,
    pub uptime_secs: u64,
    pub responses_handled: u64,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "server",
    responses(
        (status = 200, description = "Server is healthy", body = ServerHealthcheckResponse)
    )
)]
pub async fn healthcheck(
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    Ok(http_resp(
        ServerHealthcheckResponse {
            server_name: state.get_app_name_version(),
            build_time: BUILD_TIME,
            axum_version: AXUM_VERSION,
            rust_version: RUST_VERSION,
            uptime_secs: state.get_uptime().as_secs(),
            responses_handled: state.get_responses_handled(),
        },
        start,
    ))
}

use axum::{http::StatusCode, response::IntoResponse};
use serde_derive::Serialize;

use crate::{
    dto::responses::response_data::http_resp, errors::code_error::HandlerResponse,
    util::time::now::tokio_now,
};

#[derive(Serialize)]
pub struct FallbackHandlerResponse<'a> {
    message: &'a str,
}

pub async fn fallback_handler() -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();
    Ok((
        StatusCode::NOT_FOUND,
        http_resp(
            FallbackHandlerResponse {
                message: "Invalid path! Probes, go away.",
            },
            start,
        ),
    ))
}

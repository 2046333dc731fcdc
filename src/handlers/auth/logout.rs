use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::{
    dto::responses::{message_response::MessageResponse, response_data::http_resp_with_cookies},
    errors::code_error::HandlerResponse,
    util::auth::identity::SESSION_COOKIE,
    util::time::now::tokio_now,
};

/// Sessions are stateless signed cookies, so logout is purely client-side
/// cookie removal; there is nothing to revoke server-side.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 401, description = "Not logged in"),
    )
)]
pub async fn logout() -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    // Construct the cookie with the same attributes as when it was set
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();

    Ok(http_resp_with_cookies(
        MessageResponse::new("Logout successful"),
        start,
        None,
        Some(vec![cookie]),
    ))
}

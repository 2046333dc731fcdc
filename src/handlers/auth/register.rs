use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::Cookie;

use crate::{
    domain::user::User,
    dto::{
        requests::auth::register_request::RegisterRequest,
        responses::{
            auth::register_response::RegisterResponse, response_data::http_resp_with_cookies,
        },
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    util::{
        auth::identity::SESSION_COOKIE,
        auth::token::mint_token,
        crypto::hash_pw::hash_pw,
        string::validations::{validate_password_form, validate_username},
        time::now::tokio_now,
    },
};

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, session cookie set", body = RegisterResponse),
        (status = 400, description = "Missing or malformed fields"),
    )
)]
pub async fn register(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RegisterRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let (name, email, password) = match (&request.name, &request.email, &request.password) {
        (Some(name), Some(email), Some(password)) => (name, email, password),
        _ => return Err(CodeError::MISSING_FIELDS.into()),
    };

    // Check forms first to save time; this should also be done in the FE
    if !validate_username(name) {
        return Err(CodeError::USERNAME_INVALID.into());
    }

    if !email_address::EmailAddress::is_valid(email) {
        return Err(CodeError::EMAIL_INVALID.into());
    }

    if !validate_password_form(password) {
        return Err(CodeError::PASSWORD_INVALID.into());
    }

    let hashed_pw = hash_pw(password.to_owned())
        .await
        .map_err(|e| code_err(CodeError::COULD_NOT_HASH_PW, e))?;

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let user_id = User::insert_one(&mut conn, name, email, &hashed_pw).await?;

    drop(conn);

    let auth = state.get_auth_config();
    let token = mint_token(user_id, auth.session_secret.as_bytes(), auth.session_ttl_hours)
        .map_err(|e| code_err(CodeError::TOKEN_SIGN_ERROR, e))?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(axum_extra::extract::cookie::SameSite::Strict)
        .build();

    Ok(http_resp_with_cookies(
        RegisterResponse {
            message: "Registration successful".to_string(),
            user_id,
            user_name: name.to_owned(),
        },
        start,
        Some(vec![cookie]),
        None,
    ))
}

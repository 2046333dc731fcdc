use std::sync::Arc;

use crate::{
    domain::user::User,
    dto::{
        requests::auth::login_request::LoginRequest,
        responses::{auth::login_response::LoginResponse, response_data::http_resp_with_cookies},
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::users,
    util::{
        auth::identity::SESSION_COOKIE, auth::token::mint_token, crypto::verify_pw::verify_pw,
        time::now::tokio_now,
    },
};
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::Cookie;
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<LoginRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let (email, password) = match (&request.email, &request.password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(CodeError::MISSING_FIELDS.into()),
    };

    if !email_address::EmailAddress::is_valid(email) {
        return Err(CodeError::EMAIL_INVALID.into());
    }

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    // A wrong email and a wrong password must be indistinguishable.
    let user: User = match users::table
        .filter(users::user_email.eq(email))
        .first::<User>(&mut conn)
        .await
    {
        Ok(user) => user,
        Err(e) => match e {
            diesel::result::Error::NotFound => {
                return Err(CodeError::INVALID_CREDENTIALS.into());
            }
            _ => {
                return Err(code_err(CodeError::DB_QUERY_ERROR, e));
            }
        },
    };

    drop(conn);

    match verify_pw(password, &user.user_password_hash).await {
        Ok(true) => (),
        Ok(false) => return Err(CodeError::INVALID_CREDENTIALS.into()),
        Err(e) => return Err(code_err(CodeError::COULD_NOT_VERIFY_PW, e)),
    }

    let auth = state.get_auth_config();
    let token = mint_token(
        user.user_id,
        auth.session_secret.as_bytes(),
        auth.session_ttl_hours,
    )
    .map_err(|e| code_err(CodeError::TOKEN_SIGN_ERROR, e))?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(axum_extra::extract::cookie::SameSite::Strict)
        .build();

    Ok(http_resp_with_cookies(
        LoginResponse {
            message: "Login successful".to_string(),
            user_id: user.user_id,
            user_name: user.user_name,
        },
        start,
        Some(vec![cookie]),
        None,
    ))
}

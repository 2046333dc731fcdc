use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    dto::{
        requests::auth::reset_password_request::ResetPasswordRequest,
        responses::{message_response::MessageResponse, response_data::http_resp},
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::users,
    util::{
        crypto::hash_pw::hash_pw, string::validations::validate_password_form,
        time::now::tokio_now,
    },
};

/// No such user, token mismatch and token expiry must all produce the same
/// response, so this never reports which check failed.
#[inline(always)]
fn reset_token_matches(
    stored_token: Option<Uuid>,
    expires_at: Option<DateTime<Utc>>,
    presented: &str,
    now: DateTime<Utc>,
) -> bool {
    let presented: Uuid = match presented.parse() {
        Ok(token) => token,
        Err(_) => return false,
    };

    match (stored_token, expires_at) {
        (Some(stored_token), Some(expires_at)) => stored_token == presented && now <= expires_at,
        _ => false,
    }
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Missing fields, short password, or invalid/expired token"),
    )
)]
pub async fn reset_password(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ResetPasswordRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();
    let now = Utc::now();

    let (email, reset_token, new_password) =
        match (&request.email, &request.reset_token, &request.new_password) {
            (Some(email), Some(reset_token), Some(new_password)) => {
                (email, reset_token, new_password)
            }
            _ => return Err(CodeError::MISSING_FIELDS.into()),
        };

    if !validate_password_form(new_password) {
        return Err(CodeError::PASSWORD_INVALID.into());
    }

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let stored: Option<(Uuid, Option<Uuid>, Option<DateTime<Utc>>)> = users::table
        .filter(users::user_email.eq(email))
        .select((
            users::user_id,
            users::user_reset_token,
            users::user_reset_token_expires_at,
        ))
        .first(&mut conn)
        .await
        .optional()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    let user_id = match stored {
        Some((user_id, stored_token, expires_at))
            if reset_token_matches(stored_token, expires_at, reset_token, now) =>
        {
            user_id
        }
        _ => return Err(CodeError::RESET_TOKEN_INVALID.into()),
    };

    let hashed_pw = hash_pw(new_password.to_owned())
        .await
        .map_err(|e| code_err(CodeError::COULD_NOT_HASH_PW, e))?;

    // One statement writes the hash and consumes the token.
    diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set((
            users::user_password_hash.eq(&hashed_pw),
            users::user_reset_token.eq(None::<Uuid>),
            users::user_reset_token_expires_at.eq(None::<DateTime<Utc>>),
            users::user_updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    drop(conn);

    Ok(http_resp(
        MessageResponse::new("Password has been reset successfully."),
        start,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn matching_unexpired_token_passes() {
        let token = Uuid::new_v4();
        let now = Utc::now();
        assert!(reset_token_matches(
            Some(token),
            Some(now + Duration::minutes(10)),
            &token.to_string(),
            now,
        ));
    }

    #[test]
    fn mismatched_token_fails() {
        let now = Utc::now();
        assert!(!reset_token_matches(
            Some(Uuid::new_v4()),
            Some(now + Duration::minutes(10)),
            &Uuid::new_v4().to_string(),
            now,
        ));
    }

    #[test]
    fn expired_token_fails() {
        let token = Uuid::new_v4();
        let now = Utc::now();
        assert!(!reset_token_matches(
            Some(token),
            Some(now - Duration::minutes(1)),
            &token.to_string(),
            now,
        ));
    }

    #[test]
    fn absent_token_fails() {
        let now = Utc::now();
        assert!(!reset_token_matches(
            None,
            None,
            &Uuid::new_v4().to_string(),
            now,
        ));
        assert!(!reset_token_matches(
            Some(Uuid::new_v4()),
            None,
            &Uuid::new_v4().to_string(),
            now,
        ));
    }

    #[test]
    fn garbage_token_string_fails() {
        let token = Uuid::new_v4();
        let now = Utc::now();
        assert!(!reset_token_matches(
            Some(token),
            Some(now + Duration::minutes(10)),
            "not-a-uuid",
            now,
        ));
    }
}

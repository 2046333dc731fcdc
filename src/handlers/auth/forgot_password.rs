use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{Duration, Utc};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use lettre::AsyncTransport;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    dto::{
        requests::auth::forgot_password_request::ForgotPasswordRequest,
        responses::{message_response::MessageResponse, response_data::http_resp},
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::users,
    util::{
        email::emails::{PasswordResetEmail, password_reset_link},
        time::now::tokio_now,
    },
};

pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

/// The response is identical whether or not the email belongs to an account,
/// so the endpoint cannot be used to enumerate registered addresses.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent.";

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Generic acknowledgement", body = MessageResponse),
        (status = 400, description = "Malformed email"),
    )
)]
pub async fn forgot_password(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let email = match &request.email {
        Some(email) => email,
        None => return Err(CodeError::MISSING_FIELDS.into()),
    };

    if !email_address::EmailAddress::is_valid(email) {
        return Err(CodeError::EMAIL_INVALID.into());
    }

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let user_id: Option<Uuid> = users::table
        .filter(users::user_email.eq(email))
        .select(users::user_id)
        .first::<Uuid>(&mut conn)
        .await
        .optional()
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    if let Some(user_id) = user_id {
        let reset_token = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        diesel::update(users::table.filter(users::user_id.eq(user_id)))
            .set((
                users::user_reset_token.eq(Some(reset_token)),
                users::user_reset_token_expires_at.eq(Some(expires_at)),
                users::user_updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

        let reset_link = password_reset_link(state.get_public_base_url(), email, &reset_token);
        let recipient = email.clone();
        let mail_state = state.clone();

        // Send failures must not change the response the requester sees.
        tokio::spawn(async move {
            let message = match PasswordResetEmail::new()
                .set_link(&reset_link)
                .to_message(&recipient)
            {
                Ok(message) => message,
                Err(e) => {
                    error!(error = %e, "Could not build password reset email");
                    return;
                }
            };

            match mail_state.get_email_client().send(message).await {
                Ok(_) => info!(user_id = %user_id, "Password reset email sent"),
                Err(e) => error!(error = %e, user_id = %user_id, "Could not send password reset email"),
            }
        });
    }

    drop(conn);

    Ok(http_resp(
        MessageResponse::new(FORGOT_PASSWORD_MESSAGE),
        start,
    ))
}

#[cfg(test)]
mod tests {
    use super::FORGOT_PASSWORD_MESSAGE;

    // Clients key off this exact sentence; rewording it is a contract change.
    #[test]
    fn acknowledgement_is_account_agnostic() {
        assert_eq!(
            FORGOT_PASSWORD_MESSAGE,
            "If an account with that email exists, a password reset link has been sent."
        );
    }
}

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use diesel::{AsChangeset, ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::user::{User, UserInfo},
    dto::{
        requests::user::update_profile_request::UpdateProfileRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::users,
    util::{string::validations::validate_username, time::now::tokio_now},
};

// None fields are left out of the generated UPDATE.
#[derive(AsChangeset)]
#[diesel(table_name = users)]
struct ProfileChanges<'a> {
    user_name: Option<&'a str>,
    user_bio: Option<&'a str>,
    user_avatar_url: Option<&'a str>,
    user_updated_at: DateTime<Utc>,
}

#[utoipa::path(
    put,
    path = "/users/me",
    tag = "user",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserInfo),
        (status = 400, description = "Nothing to update or invalid fields"),
        (status = 401, description = "Not logged in"),
    )
)]
pub async fn update_me(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    if request.name.is_none() && request.bio.is_none() && request.avatar_url.is_none() {
        return Err(CodeError::MISSING_FIELDS.into());
    }

    if let Some(name) = &request.name
        && !validate_username(name)
    {
        return Err(CodeError::USERNAME_INVALID.into());
    }

    let changes = ProfileChanges {
        user_name: request.name.as_deref(),
        user_bio: request.bio.as_deref(),
        user_avatar_url: request.avatar_url.as_deref(),
        user_updated_at: Utc::now(),
    };

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let updated: User = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(changes)
        .get_result(&mut conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => code_err(CodeError::USER_NOT_FOUND, e),
            _ => code_err(CodeError::DB_UPDATE_ERROR, e),
        })?;

    drop(conn);

    Ok(http_resp(UserInfo::from(updated), start))
}

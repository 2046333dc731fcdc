use std::sync::Arc;

use axum::{Extension, extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::user::UserInfo,
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::users,
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "user",
    responses(
        (status = 200, description = "Profile of the logged-in user", body = UserInfo),
        (status = 401, description = "Not logged in"),
    )
)]
pub async fn get_me(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let user_info: UserInfo = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserInfo::as_select())
        .first(&mut conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => code_err(CodeError::USER_NOT_FOUND, e),
            _ => code_err(CodeError::DB_QUERY_ERROR, e),
        })?;

    drop(conn);

    Ok(http_resp(user_info, start))
}

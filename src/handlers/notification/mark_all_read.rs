use std::sync::Arc;

use axum::{Extension, extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    dto::responses::{
        notification::mark_all_read_response::MarkAllReadResponse, response_data::http_resp,
    },
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::notifications,
    util::time::now::tokio_now,
};

#[utoipa::path(
    post,
    path = "/notifications/mark-all-read",
    tag = "notification",
    responses(
        (status = 200, description = "Count of notifications flipped to read", body = MarkAllReadResponse),
        (status = 401, description = "Not logged in"),
    )
)]
pub async fn mark_all_read(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let updated = diesel::update(
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::notification_is_read.eq(false)),
    )
    .set(notifications::notification_is_read.eq(true))
    .execute(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

    drop(conn);

    Ok(http_resp(MarkAllReadResponse { updated }, start))
}

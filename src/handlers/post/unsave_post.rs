use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, dsl::exists};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    dto::responses::{post::save_post_response::SavePostResponse, response_data::http_resp},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{posts, saved_posts},
    util::time::now::tokio_now,
};

/// Takes a post off the caller's saved shelf. Idempotent, like [`save_post`].
///
/// [`save_post`]: crate::handlers::post::save_post::save_post
#[utoipa::path(
    post,
    path = "/posts/{post_id}/unsave",
    tag = "post",
    responses(
        (status = 200, description = "Post no longer saved", body = SavePostResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn unsave_post(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let post_exists: bool = diesel::select(exists(
        posts::table.filter(posts::post_id.eq(post_id)),
    ))
    .get_result(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    if !post_exists {
        return Err(CodeError::POST_NOT_FOUND.into());
    }

    diesel::delete(
        saved_posts::table
            .filter(saved_posts::post_id.eq(post_id))
            .filter(saved_posts::user_id.eq(user_id)),
    )
    .execute(&mut conn)
    .await
    .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    drop(conn);

    Ok(http_resp(SavePostResponse { saved: false }, start))
}

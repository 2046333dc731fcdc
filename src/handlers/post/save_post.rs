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
    domain::interaction::NewSavedPost,
    dto::responses::{post::save_post_response::SavePostResponse, response_data::http_resp},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{posts, saved_posts},
    util::time::now::tokio_now,
};

/// Puts a post on the caller's saved shelf. Idempotent; saving an
/// already-saved post is a no-op, not an error.
#[utoipa::path(
    post,
    path = "/posts/{post_id}/save",
    tag = "post",
    responses(
        (status = 200, description = "Post saved", body = SavePostResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn save_post(
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

    diesel::insert_into(saved_posts::table)
        .values(NewSavedPost {
            post_id: &post_id,
            user_id: &user_id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

    drop(conn);

    Ok(http_resp(SavePostResponse { saved: true }, start))
}

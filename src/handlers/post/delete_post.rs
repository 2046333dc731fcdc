use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, result::Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::post::Post,
    dto::responses::{message_response::MessageResponse, response_data::http_resp},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{
        comment_helpfuls, comment_likes, comments, notifications, post_helpfuls, post_likes,
        posts, reports, saved_posts,
    },
    util::time::now::tokio_now,
};

/// Deletes a post and everything hanging off it. The dependent rows go first
/// so a failure partway through never leaves orphans pointing at a missing post.
#[utoipa::path(
    delete,
    path = "/posts/{post_id}",
    tag = "post",
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn delete_post(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let post: Post = match posts::table
        .filter(posts::post_id.eq(post_id))
        .select(Post::as_select())
        .first(&mut conn)
        .await
    {
        Ok(post) => post,
        Err(DieselError::NotFound) => return Err(CodeError::POST_NOT_FOUND.into()),
        Err(e) => return Err(code_err(CodeError::DB_QUERY_ERROR, e)),
    };

    if post.user_id != user_id {
        return Err(CodeError::NOT_RESOURCE_OWNER.into());
    }

    let comment_ids: Vec<Uuid> = comments::table
        .filter(comments::post_id.eq(post_id))
        .select(comments::comment_id)
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    if !comment_ids.is_empty() {
        diesel::delete(
            comment_likes::table.filter(comment_likes::comment_id.eq_any(&comment_ids)),
        )
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

        diesel::delete(
            comment_helpfuls::table.filter(comment_helpfuls::comment_id.eq_any(&comment_ids)),
        )
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;
    }

    // Notification rows reference comments, so they go before the comments do.
    diesel::delete(notifications::table.filter(notifications::post_id.eq(post_id)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    diesel::delete(comments::table.filter(comments::post_id.eq(post_id)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    diesel::delete(post_likes::table.filter(post_likes::post_id.eq(post_id)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    diesel::delete(post_helpfuls::table.filter(post_helpfuls::post_id.eq(post_id)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    diesel::delete(saved_posts::table.filter(saved_posts::post_id.eq(post_id)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    diesel::delete(reports::table.filter(reports::post_id.eq(post_id)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    diesel::delete(posts::table.filter(posts::post_id.eq(post_id)))
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

    drop(conn);

    Ok(http_resp(
        MessageResponse::new("Post deleted successfully."),
        start,
    ))
}

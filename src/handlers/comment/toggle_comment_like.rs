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
    domain::{
        comment::Comment,
        interaction::NewCommentLike,
        notification::{self, NewNotification},
    },
    dto::responses::{response_data::http_resp, toggle_response::ToggleLikeResponse},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{comment_likes, comments},
    util::time::now::tokio_now,
};

/// Comment counterpart of the post like toggle, same conflict-driven flip.
#[utoipa::path(
    post,
    path = "/comments/{comment_id}/like",
    tag = "comment",
    responses(
        (status = 200, description = "New like state and count", body = ToggleLikeResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such comment"),
    )
)]
pub async fn toggle_comment_like(
    State(state): State<Arc<ServerState>>,
    Extension(user_id): Extension<Uuid>,
    Path(comment_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let comment: Comment = match comments::table
        .filter(comments::comment_id.eq(comment_id))
        .select(Comment::as_select())
        .first(&mut conn)
        .await
    {
        Ok(comment) => comment,
        Err(DieselError::NotFound) => return Err(CodeError::COMMENT_NOT_FOUND.into()),
        Err(e) => return Err(code_err(CodeError::DB_QUERY_ERROR, e)),
    };

    let inserted = diesel::insert_into(comment_likes::table)
        .values(NewCommentLike {
            comment_id: &comment_id,
            user_id: &user_id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

    let liked = if inserted == 1 {
        if let Some(new_notification) = NewNotification::comment_like(&comment, user_id) {
            tokio::spawn(notification::dispatch(state.clone(), new_notification));
        }
        true
    } else {
        diesel::delete(
            comment_likes::table
                .filter(comment_likes::comment_id.eq(comment_id))
                .filter(comment_likes::user_id.eq(user_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;
        false
    };

    let likes: i64 = comment_likes::table
        .filter(comment_likes::comment_id.eq(comment_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(ToggleLikeResponse { liked, likes }, start))
}

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
        interaction::NewPostLike,
        notification::{self, NewNotification},
        post::Post,
    },
    dto::responses::{response_data::http_resp, toggle_response::ToggleLikeResponse},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::{post_likes, posts},
    util::time::now::tokio_now,
};

/// Flips the caller's like on a post. The insert runs with ON CONFLICT DO
/// NOTHING; zero inserted rows means the like already existed, so it is
/// removed instead. No separate read of the current state, so two racing
/// requests cannot both insert.
#[utoipa::path(
    post,
    path = "/posts/{post_id}/like",
    tag = "post",
    responses(
        (status = 200, description = "New like state and count", body = ToggleLikeResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn toggle_post_like(
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

    let inserted = diesel::insert_into(post_likes::table)
        .values(NewPostLike {
            post_id: &post_id,
            user_id: &user_id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

    let liked = if inserted == 1 {
        if let Some(new_notification) = NewNotification::post_like(&post, user_id) {
            tokio::spawn(notification::dispatch(state.clone(), new_notification));
        }
        true
    } else {
        diesel::delete(
            post_likes::table
                .filter(post_likes::post_id.eq(post_id))
                .filter(post_likes::user_id.eq(user_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;
        false
    };

    let likes: i64 = post_likes::table
        .filter(post_likes::post_id.eq(post_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    drop(conn);

    Ok(http_resp(ToggleLikeResponse { liked, likes }, start))
}

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::{
    ExpressionMethods, QueryDsl, SelectableHelper,
    dsl::{count_star, exists},
};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::{
        comment::{Comment, CommentWithMeta},
        user::UserBadge,
    },
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    routers::middleware::identity::AuthStatus,
    schema::{comment_helpfuls, comment_likes, comments, posts, users},
    util::time::now::tokio_now,
};

/// All comments on a post, oldest first, with per-comment counts and the
/// viewer's own like/helpful flags. Replies come interleaved in creation
/// order; threading them under their parent is the client's job.
#[utoipa::path(
    get,
    path = "/comments/post/{post_id}",
    tag = "comment",
    responses(
        (status = 200, description = "Comments on the post", body = [CommentWithMeta]),
        (status = 404, description = "No such post"),
    )
)]
pub async fn list_comments(
    State(state): State<Arc<ServerState>>,
    Extension(auth_status): Extension<AuthStatus>,
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

    let comment_rows: Vec<Comment> = comments::table
        .filter(comments::post_id.eq(post_id))
        .order(comments::comment_created_at.asc())
        .select(Comment::as_select())
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    if comment_rows.is_empty() {
        drop(conn);
        return Ok(http_resp(Vec::<CommentWithMeta>::new(), start));
    }

    let comment_ids: Vec<Uuid> = comment_rows.iter().map(|c| c.comment_id).collect();
    let author_ids: Vec<Uuid> = comment_rows.iter().map(|c| c.user_id).collect();

    let authors: HashMap<Uuid, UserBadge> = users::table
        .filter(users::user_id.eq_any(&author_ids))
        .select(UserBadge::as_select())
        .load::<UserBadge>(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .into_iter()
        .map(|badge| (badge.user_id, badge))
        .collect();

    let likes: HashMap<Uuid, i64> = comment_likes::table
        .filter(comment_likes::comment_id.eq_any(&comment_ids))
        .group_by(comment_likes::comment_id)
        .select((comment_likes::comment_id, count_star()))
        .load::<(Uuid, i64)>(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .into_iter()
        .collect();

    let helpfuls: HashMap<Uuid, i64> = comment_helpfuls::table
        .filter(comment_helpfuls::comment_id.eq_any(&comment_ids))
        .group_by(comment_helpfuls::comment_id)
        .select((comment_helpfuls::comment_id, count_star()))
        .load::<(Uuid, i64)>(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .into_iter()
        .collect();

    let (liked_by_me, helpful_by_me): (HashSet<Uuid>, HashSet<Uuid>) = match auth_status.user_id()
    {
        Some(viewer_id) => {
            let liked = comment_likes::table
                .filter(comment_likes::comment_id.eq_any(&comment_ids))
                .filter(comment_likes::user_id.eq(viewer_id))
                .select(comment_likes::comment_id)
                .load::<Uuid>(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
                .into_iter()
                .collect();

            let helpful = comment_helpfuls::table
                .filter(comment_helpfuls::comment_id.eq_any(&comment_ids))
                .filter(comment_helpfuls::user_id.eq(viewer_id))
                .select(comment_helpfuls::comment_id)
                .load::<Uuid>(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
                .into_iter()
                .collect();

            (liked, helpful)
        }
        None => (HashSet::new(), HashSet::new()),
    };

    drop(conn);

    let thread: Vec<CommentWithMeta> = comment_rows
        .into_iter()
        .filter_map(|comment| {
            let comment_id = comment.comment_id;
            let author = authors.get(&comment.user_id)?;
            Some(CommentWithMeta::from_parts(
                comment,
                author,
                likes.get(&comment_id).copied().unwrap_or(0),
                helpfuls.get(&comment_id).copied().unwrap_or(0),
                liked_by_me.contains(&comment_id),
                helpful_by_me.contains(&comment_id),
            ))
        })
        .collect();

    Ok(http_resp(thread, start))
}

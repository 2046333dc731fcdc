use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{Extension, extract::State, response::IntoResponse};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, dsl::count_star};
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::{
    domain::{
        post::{Post, PostCounts, PostWithMeta, ViewerFlags},
        user::UserBadge,
    },
    dto::responses::response_data::http_resp,
    errors::code_error::HandlerResponse,
    init::state::ServerState,
    routers::middleware::identity::AuthStatus,
    schema::{comments, post_helpfuls, post_likes, posts, saved_posts, users},
    util::time::now::tokio_now,
};

/// The caller's saved shelf, newest save first. This endpoint always answers
/// 200: an anonymous caller gets an empty list, and so does a caller whose
/// shelf cannot be loaded (the failure is logged server-side). The shelf is a
/// convenience surface and must never take a page down with it.
#[utoipa::path(
    get,
    path = "/posts/saved",
    tag = "post",
    responses(
        (status = 200, description = "Saved posts, empty when anonymous", body = [PostWithMeta]),
    )
)]
pub async fn saved_posts(
    State(state): State<Arc<ServerState>>,
    Extension(auth_status): Extension<AuthStatus>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let Some(user_id) = auth_status.user_id() else {
        return Ok(http_resp(Vec::<PostWithMeta>::new(), start));
    };

    let shelf = match load_shelf(&state, user_id).await {
        Ok(shelf) => shelf,
        Err(e) => {
            warn!("Could not load saved posts for user {}: {:?}", user_id, e);
            Vec::new()
        }
    };

    Ok(http_resp(shelf, start))
}

async fn load_shelf(state: &Arc<ServerState>, user_id: Uuid) -> anyhow::Result<Vec<PostWithMeta>> {
    let mut conn = state.get_conn().await?;

    let saved_ids: Vec<Uuid> = saved_posts::table
        .filter(saved_posts::user_id.eq(user_id))
        .order(saved_posts::saved_post_created_at.desc())
        .select(saved_posts::post_id)
        .load(&mut conn)
        .await?;

    if saved_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut posts_by_id: HashMap<Uuid, Post> = posts::table
        .filter(posts::post_id.eq_any(&saved_ids))
        .select(Post::as_select())
        .load::<Post>(&mut conn)
        .await?
        .into_iter()
        .map(|post| (post.post_id, post))
        .collect();

    let author_ids: Vec<Uuid> = posts_by_id.values().map(|post| post.user_id).collect();
    let authors: HashMap<Uuid, UserBadge> = users::table
        .filter(users::user_id.eq_any(&author_ids))
        .select(UserBadge::as_select())
        .load::<UserBadge>(&mut conn)
        .await?
        .into_iter()
        .map(|badge| (badge.user_id, badge))
        .collect();

    let likes: HashMap<Uuid, i64> = post_likes::table
        .filter(post_likes::post_id.eq_any(&saved_ids))
        .group_by(post_likes::post_id)
        .select((post_likes::post_id, count_star()))
        .load::<(Uuid, i64)>(&mut conn)
        .await?
        .into_iter()
        .collect();

    let helpfuls: HashMap<Uuid, i64> = post_helpfuls::table
        .filter(post_helpfuls::post_id.eq_any(&saved_ids))
        .group_by(post_helpfuls::post_id)
        .select((post_helpfuls::post_id, count_star()))
        .load::<(Uuid, i64)>(&mut conn)
        .await?
        .into_iter()
        .collect();

    let comment_counts: HashMap<Uuid, i64> = comments::table
        .filter(comments::post_id.eq_any(&saved_ids))
        .group_by(comments::post_id)
        .select((comments::post_id, count_star()))
        .load::<(Uuid, i64)>(&mut conn)
        .await?
        .into_iter()
        .collect();

    let liked: HashSet<Uuid> = post_likes::table
        .filter(post_likes::post_id.eq_any(&saved_ids))
        .filter(post_likes::user_id.eq(user_id))
        .select(post_likes::post_id)
        .load::<Uuid>(&mut conn)
        .await?
        .into_iter()
        .collect();

    let helpful: HashSet<Uuid> = post_helpfuls::table
        .filter(post_helpfuls::post_id.eq_any(&saved_ids))
        .filter(post_helpfuls::user_id.eq(user_id))
        .select(post_helpfuls::post_id)
        .load::<Uuid>(&mut conn)
        .await?
        .into_iter()
        .collect();

    drop(conn);

    // Walk the saved ids so the shelf keeps its newest-save-first order.
    let shelf = saved_ids
        .iter()
        .filter_map(|post_id| {
            let post = posts_by_id.remove(post_id)?;
            let author = authors.get(&post.user_id)?;
            Some(PostWithMeta::from_parts(
                post,
                author,
                PostCounts {
                    likes: likes.get(post_id).copied().unwrap_or(0),
                    helpfuls: helpfuls.get(post_id).copied().unwrap_or(0),
                    comments: comment_counts.get(post_id).copied().unwrap_or(0),
                },
                ViewerFlags {
                    liked: liked.contains(post_id),
                    helpful: helpful.contains(post_id),
                    saved: true,
                },
            ))
        })
        .collect();

    Ok(shelf)
}

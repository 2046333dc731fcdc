use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    Extension,
    extract::{Query, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, SelectableHelper, dsl::count_star};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::{
    domain::{
        post::{Post, PostCounts, PostWithMeta, ViewerFlags},
        user::UserBadge,
    },
    dto::{requests::post::get_posts_request::GetPostsRequest, responses::response_data::http_resp},
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    routers::middleware::identity::AuthStatus,
    schema::{comments, post_helpfuls, post_likes, posts, saved_posts, users},
    util::time::now::tokio_now,
};

/// Counts one join table's rows per post for a page of post ids, on its own
/// pooled connection so the three aggregates can run concurrently.
macro_rules! count_per_post {
    ($state:expr_2021, $post_ids:expr_2021, $table:ident) => {
        async {
            let mut conn = $state
                .get_conn()
                .await
                .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;
            $table::table
                .filter($table::post_id.eq_any($post_ids))
                .group_by($table::post_id)
                .select(($table::post_id, count_star()))
                .load::<(Uuid, i64)>(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))
        }
    };
}

#[utoipa::path(
    get,
    path = "/posts",
    tag = "post",
    params(
        ("page" = Option<usize>, Query, description = "1-based page number"),
        ("postsPerPage" = Option<usize>, Query, description = "Page size"),
    ),
    responses(
        (status = 200, description = "Page of posts, newest first", body = [PostWithMeta]),
    )
)]
pub async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Extension(auth_status): Extension<AuthStatus>,
    Query(request): Query<GetPostsRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let page = request.page.max(1);
    let posts_per_page = request.posts_per_page.clamp(1, 100);
    let offset = ((page - 1) * posts_per_page) as i64;

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    let page_posts: Vec<Post> = posts::table
        .order(posts::post_created_at.desc())
        .offset(offset)
        .limit(posts_per_page as i64)
        .select(Post::as_select())
        .load(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?;

    if page_posts.is_empty() {
        drop(conn);
        return Ok(http_resp(Vec::<PostWithMeta>::new(), start));
    }

    let post_ids: Vec<Uuid> = page_posts.iter().map(|post| post.post_id).collect();
    let author_ids: Vec<Uuid> = page_posts.iter().map(|post| post.user_id).collect();

    let authors: HashMap<Uuid, UserBadge> = users::table
        .filter(users::user_id.eq_any(&author_ids))
        .select(UserBadge::as_select())
        .load::<UserBadge>(&mut conn)
        .await
        .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
        .into_iter()
        .map(|badge| (badge.user_id, badge))
        .collect();

    let (likes, helpfuls, comment_counts) = tokio::join!(
        count_per_post!(state, &post_ids, post_likes),
        count_per_post!(state, &post_ids, post_helpfuls),
        count_per_post!(state, &post_ids, comments),
    );
    let likes: HashMap<Uuid, i64> = likes?.into_iter().collect();
    let helpfuls: HashMap<Uuid, i64> = helpfuls?.into_iter().collect();
    let comment_counts: HashMap<Uuid, i64> = comment_counts?.into_iter().collect();

    let (liked_set, helpful_set, saved_set) = match auth_status.user_id() {
        Some(viewer_id) => {
            let liked: HashSet<Uuid> = post_likes::table
                .filter(post_likes::user_id.eq(viewer_id))
                .filter(post_likes::post_id.eq_any(&post_ids))
                .select(post_likes::post_id)
                .load::<Uuid>(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
                .into_iter()
                .collect();
            let helpful: HashSet<Uuid> = post_helpfuls::table
                .filter(post_helpfuls::user_id.eq(viewer_id))
                .filter(post_helpfuls::post_id.eq_any(&post_ids))
                .select(post_helpfuls::post_id)
                .load::<Uuid>(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
                .into_iter()
                .collect();
            let saved: HashSet<Uuid> = saved_posts::table
                .filter(saved_posts::user_id.eq(viewer_id))
                .filter(saved_posts::post_id.eq_any(&post_ids))
                .select(saved_posts::post_id)
                .load::<Uuid>(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_QUERY_ERROR, e))?
                .into_iter()
                .collect();
            (liked, helpful, saved)
        }
        None => (HashSet::new(), HashSet::new(), HashSet::new()),
    };

    drop(conn);

    let response: Vec<PostWithMeta> = page_posts
        .into_iter()
        .filter_map(|post| {
            let author = authors.get(&post.user_id)?;
            let post_id = post.post_id;
            Some(PostWithMeta::from_parts(
                post,
                author,
                PostCounts {
                    likes: likes.get(&post_id).copied().unwrap_or(0),
                    helpfuls: helpfuls.get(&post_id).copied().unwrap_or(0),
                    comments: comment_counts.get(&post_id).copied().unwrap_or(0),
                },
                ViewerFlags {
                    liked: liked_set.contains(&post_id),
                    helpful: helpful_set.contains(&post_id),
                    saved: saved_set.contains(&post_id),
                },
            ))
        })
        .collect();

    Ok(http_resp(response, start))
}

use chrono::{DateTime, Utc};
use diesel::{
    Insertable, Selectable,
    prelude::{Queryable, QueryableByName},
};
use utoipa::ToSchema;

use crate::{domain::user::UserBadge, schema::posts};

#[derive(Clone, serde_derive::Serialize, Queryable, QueryableByName, Selectable, ToSchema)]
#[diesel(table_name = posts)]
pub struct Post {
    pub post_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub post_headline: String,
    pub post_error_description: String,
    pub post_solution: String,
    pub post_code_snippet: Option<String>,
    pub post_tags: Vec<String>,
    pub post_screenshot_url: Option<String>,
    pub post_created_at: DateTime<Utc>,
    pub post_updated_at: DateTime<Utc>,
}

/// A post as the feed renders it: author badge, computed counts, and the
/// viewer's own interaction flags. Counts are recomputed from the join
/// tables on every read, never stored on the post row.
#[derive(Clone, serde_derive::Serialize, ToSchema)]
pub struct PostWithMeta {
    pub post_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub user_name: String,
    pub user_avatar_url: Option<String>,
    pub post_headline: String,
    pub post_error_description: String,
    pub post_solution: String,
    pub post_code_snippet: Option<String>,
    pub post_tags: Vec<String>,
    pub post_screenshot_url: Option<String>,
    pub post_created_at: DateTime<Utc>,
    pub post_updated_at: DateTime<Utc>,
    pub likes: i64,
    pub helpfuls: i64,
    pub comments: i64,
    pub liked_by_me: bool,
    pub helpful_by_me: bool,
    pub saved_by_me: bool,
}

pub struct PostCounts {
    pub likes: i64,
    pub helpfuls: i64,
    pub comments: i64,
}

pub struct ViewerFlags {
    pub liked: bool,
    pub helpful: bool,
    pub saved: bool,
}

impl PostWithMeta {
    pub fn from_parts(
        post: Post,
        author: &UserBadge,
        counts: PostCounts,
        flags: ViewerFlags,
    ) -> Self {
        Self {
            post_id: post.post_id,
            user_id: post.user_id,
            user_name: author.user_name.clone(),
            user_avatar_url: author.user_avatar_url.clone(),
            post_headline: post.post_headline,
            post_error_description: post.post_error_description,
            post_solution: post.post_solution,
            post_code_snippet: post.post_code_snippet,
            post_tags: post.post_tags,
            post_screenshot_url: post.post_screenshot_url,
            post_created_at: post.post_created_at,
            post_updated_at: post.post_updated_at,
            likes: counts.likes,
            helpfuls: counts.helpfuls,
            comments: counts.comments,
            liked_by_me: flags.liked,
            helpful_by_me: flags.helpful,
            saved_by_me: flags.saved,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost<'np> {
    pub user_id: &'np uuid::Uuid,
    pub post_headline: &'np str,
    pub post_error_description: &'np str,
    pub post_solution: &'np str,
    pub post_code_snippet: Option<&'np str>,
    pub post_tags: &'np [String],
    pub post_screenshot_url: Option<&'np str>,
}

impl<'np> NewPost<'np> {
    pub fn new(
        user_id: &'np uuid::Uuid,
        post_headline: &'np str,
        post_error_description: &'np str,
        post_solution: &'np str,
        post_code_snippet: Option<&'np str>,
        post_tags: &'np [String],
        post_screenshot_url: Option<&'np str>,
    ) -> Self {
        Self {
            user_id,
            post_headline,
            post_error_description,
            post_solution,
            post_code_snippet,
            post_tags,
            post_screenshot_url,
        }
    }
}

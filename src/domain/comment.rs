use chrono::{DateTime, Utc};
use diesel::{
    Insertable, Selectable,
    prelude::{Queryable, QueryableByName},
};
use utoipa::ToSchema;

use crate::{domain::user::UserBadge, schema::comments};

#[derive(Clone, serde_derive::Serialize, Queryable, QueryableByName, Selectable, ToSchema)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub comment_id: uuid::Uuid,
    pub post_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub comment_content: String,
    pub comment_created_at: DateTime<Utc>,
    pub comment_updated_at: Option<DateTime<Utc>>,
    pub parent_comment_id: Option<uuid::Uuid>,
}

/// A comment as the thread view renders it. Replies stay flat: one level of
/// nesting by convention, `parent_comment_id` is not followed recursively.
#[derive(Clone, serde_derive::Serialize, ToSchema)]
pub struct CommentWithMeta {
    pub comment_id: uuid::Uuid,
    pub post_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub user_name: String,
    pub user_avatar_url: Option<String>,
    pub comment_content: String,
    pub comment_created_at: DateTime<Utc>,
    pub comment_updated_at: Option<DateTime<Utc>>,
    pub parent_comment_id: Option<uuid::Uuid>,
    pub likes: i64,
    pub helpfuls: i64,
    pub liked_by_me: bool,
    pub helpful_by_me: bool,
}

impl CommentWithMeta {
    pub fn from_parts(
        comment: Comment,
        author: &UserBadge,
        likes: i64,
        helpfuls: i64,
        liked_by_me: bool,
        helpful_by_me: bool,
    ) -> Self {
        Self {
            comment_id: comment.comment_id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            user_name: author.user_name.clone(),
            user_avatar_url: author.user_avatar_url.clone(),
            comment_content: comment.comment_content,
            comment_created_at: comment.comment_created_at,
            comment_updated_at: comment.comment_updated_at,
            parent_comment_id: comment.parent_comment_id,
            likes,
            helpfuls,
            liked_by_me,
            helpful_by_me,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment<'nc> {
    pub post_id: &'nc uuid::Uuid,
    pub user_id: &'nc uuid::Uuid,
    pub comment_content: &'nc str,
    pub parent_comment_id: Option<&'nc uuid::Uuid>,
}

impl<'nc> NewComment<'nc> {
    pub fn new(
        post_id: &'nc uuid::Uuid,
        user_id: &'nc uuid::Uuid,
        comment_content: &'nc str,
        parent_comment_id: Option<&'nc uuid::Uuid>,
    ) -> Self {
        Self {
            post_id,
            user_id,
            comment_content,
            parent_comment_id,
        }
    }
}

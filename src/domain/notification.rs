use std::sync::Arc;

use chrono::{DateTime, Utc};
use diesel::{
    Insertable, Selectable,
    prelude::{Queryable, QueryableByName},
};
use diesel_async::RunQueryDsl;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{comment::Comment, post::Post},
    init::state::ServerState,
    schema::notifications,
};

pub const NOTIFICATION_POST_LIKE: &str = "post_like";
pub const NOTIFICATION_POST_HELPFUL: &str = "post_helpful";
pub const NOTIFICATION_COMMENT_LIKE: &str = "comment_like";
pub const NOTIFICATION_COMMENT_HELPFUL: &str = "comment_helpful";
pub const NOTIFICATION_COMMENT: &str = "comment";
pub const NOTIFICATION_COMMENT_REPLY: &str = "comment_reply";

#[derive(Clone, serde_derive::Serialize, Queryable, QueryableByName, Selectable, ToSchema)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub notification_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub notification_type: String,
    pub post_id: Option<uuid::Uuid>,
    pub comment_id: Option<uuid::Uuid>,
    pub from_user_id: Option<uuid::Uuid>,
    pub notification_is_read: bool,
    pub notification_created_at: DateTime<Utc>,
}

/// One unread notification row, ready to insert. Constructors return `None`
/// when the recipient would be the acting user; self-notification is
/// suppressed here and nowhere else.
///
/// Owned fields so the row can ride a spawned task: dispatch runs after the
/// primary mutation and must never fail it (see [`dispatch`]).
#[derive(Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub notification_type: &'static str,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub from_user_id: Option<Uuid>,
}

impl NewNotification {
    fn build(
        recipient: Uuid,
        notification_type: &'static str,
        post_id: Option<Uuid>,
        comment_id: Option<Uuid>,
        actor: Uuid,
    ) -> Option<Self> {
        if recipient == actor {
            return None;
        }

        Some(Self {
            user_id: recipient,
            notification_type,
            post_id,
            comment_id,
            from_user_id: Some(actor),
        })
    }

    pub fn post_like(post: &Post, actor: Uuid) -> Option<Self> {
        Self::build(
            post.user_id,
            NOTIFICATION_POST_LIKE,
            Some(post.post_id),
            None,
            actor,
        )
    }

    pub fn post_helpful(post: &Post, actor: Uuid) -> Option<Self> {
        Self::build(
            post.user_id,
            NOTIFICATION_POST_HELPFUL,
            Some(post.post_id),
            None,
            actor,
        )
    }

    pub fn comment_like(comment: &Comment, actor: Uuid) -> Option<Self> {
        Self::build(
            comment.user_id,
            NOTIFICATION_COMMENT_LIKE,
            Some(comment.post_id),
            Some(comment.comment_id),
            actor,
        )
    }

    pub fn comment_helpful(comment: &Comment, actor: Uuid) -> Option<Self> {
        Self::build(
            comment.user_id,
            NOTIFICATION_COMMENT_HELPFUL,
            Some(comment.post_id),
            Some(comment.comment_id),
            actor,
        )
    }

    /// New top-level comment: addressed to the post owner.
    pub fn comment(post: &Post, comment_id: Uuid, actor: Uuid) -> Option<Self> {
        Self::build(
            post.user_id,
            NOTIFICATION_COMMENT,
            Some(post.post_id),
            Some(comment_id),
            actor,
        )
    }

    /// Reply: addressed to the parent comment's author.
    pub fn comment_reply(parent: &Comment, comment_id: Uuid, actor: Uuid) -> Option<Self> {
        Self::build(
            parent.user_id,
            NOTIFICATION_COMMENT_REPLY,
            Some(parent.post_id),
            Some(comment_id),
            actor,
        )
    }
}

/// Writes one notification row on its own pooled connection. Spawned by
/// handlers after the primary mutation has succeeded; failures are logged
/// and dropped, so delivery is best-effort at-most-once and the mutation
/// the notification describes is never rolled back or failed by it.
pub async fn dispatch(state: Arc<ServerState>, new_notification: NewNotification) {
    let mut conn = match state.get_conn().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Could not get connection for notification write: {:?}", e);
            return;
        }
    };

    if let Err(e) = diesel::insert_into(notifications::table)
        .values(&new_notification)
        .execute(&mut conn)
        .await
    {
        error!(
            "Could not write {} notification for user {}: {:?}",
            new_notification.notification_type, new_notification.user_id, e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_by(owner: Uuid) -> Post {
        Post {
            post_id: Uuid::new_v4(),
            user_id: owner,
            post_headline: "stack overflow in recursive macro".to_string(),
            post_error_description: "error: recursion limit reached".to_string(),
            post_solution: "add #![recursion_limit = \"256\"]".to_string(),
            post_code_snippet: None,
            post_tags: vec!["rust".to_string()],
            post_screenshot_url: None,
            post_created_at: Utc::now(),
            post_updated_at: Utc::now(),
        }
    }

    fn comment_by(owner: Uuid, post_id: Uuid) -> Comment {
        Comment {
            comment_id: Uuid::new_v4(),
            post_id,
            user_id: owner,
            comment_content: "worked for me".to_string(),
            comment_created_at: Utc::now(),
            comment_updated_at: None,
            parent_comment_id: None,
        }
    }

    #[test]
    fn own_post_like_is_suppressed() {
        let owner = Uuid::new_v4();
        let post = post_by(owner);

        assert!(NewNotification::post_like(&post, owner).is_none());
        assert!(NewNotification::post_helpful(&post, owner).is_none());
        assert!(NewNotification::comment(&post, Uuid::new_v4(), owner).is_none());
    }

    #[test]
    fn own_comment_interaction_is_suppressed() {
        let owner = Uuid::new_v4();
        let comment = comment_by(owner, Uuid::new_v4());

        assert!(NewNotification::comment_like(&comment, owner).is_none());
        assert!(NewNotification::comment_helpful(&comment, owner).is_none());
        assert!(NewNotification::comment_reply(&comment, Uuid::new_v4(), owner).is_none());
    }

    #[test]
    fn cross_user_like_builds_unread_row_refs() {
        let owner = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let post = post_by(owner);

        let n = NewNotification::post_like(&post, actor).expect("distinct users must notify");
        assert_eq!(n.user_id, owner);
        assert_eq!(n.notification_type, NOTIFICATION_POST_LIKE);
        assert_eq!(n.post_id, Some(post.post_id));
        assert_eq!(n.comment_id, None);
        assert_eq!(n.from_user_id, Some(actor));
    }

    #[test]
    fn reply_targets_parent_author_with_both_refs() {
        let parent_author = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let post_id = Uuid::new_v4();
        let parent = comment_by(parent_author, post_id);
        let reply_id = Uuid::new_v4();

        let n = NewNotification::comment_reply(&parent, reply_id, actor).expect("must notify");
        assert_eq!(n.user_id, parent_author);
        assert_eq!(n.notification_type, NOTIFICATION_COMMENT_REPLY);
        assert_eq!(n.post_id, Some(post_id));
        assert_eq!(n.comment_id, Some(reply_id));
    }
}

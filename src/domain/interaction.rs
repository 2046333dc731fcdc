//! Join rows backing the like/helpful toggles and the saved-posts shelf.
//! Each table carries a UNIQUE (target, user) constraint; the toggle
//! handlers insert with ON CONFLICT DO NOTHING and treat zero inserted
//! rows as "already set".

use diesel::Insertable;

use crate::schema::{comment_helpfuls, comment_likes, post_helpfuls, post_likes, saved_posts};

#[derive(Insertable)]
#[diesel(table_name = post_likes)]
pub struct NewPostLike<'pl> {
    pub post_id: &'pl uuid::Uuid,
    pub user_id: &'pl uuid::Uuid,
}

#[derive(Insertable)]
#[diesel(table_name = post_helpfuls)]
pub struct NewPostHelpful<'ph> {
    pub post_id: &'ph uuid::Uuid,
    pub user_id: &'ph uuid::Uuid,
}

#[derive(Insertable)]
#[diesel(table_name = comment_likes)]
pub struct NewCommentLike<'cl> {
    pub comment_id: &'cl uuid::Uuid,
    pub user_id: &'cl uuid::Uuid,
}

#[derive(Insertable)]
#[diesel(table_name = comment_helpfuls)]
pub struct NewCommentHelpful<'ch> {
    pub comment_id: &'ch uuid::Uuid,
    pub user_id: &'ch uuid::Uuid,
}

#[derive(Insertable)]
#[diesel(table_name = saved_posts)]
pub struct NewSavedPost<'sp> {
    pub post_id: &'sp uuid::Uuid,
    pub user_id: &'sp uuid::Uuid,
}

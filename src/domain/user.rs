use chrono::{DateTime, Utc};
use diesel::{
    Insertable, Selectable,
    prelude::{Queryable, QueryableByName},
};
use diesel_async::{AsyncPgConnection, RunQueryDsl, pooled_connection::bb8::PooledConnection};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    errors::code_error::{CodeError, CodeErrorResp, code_err},
    schema::users,
};

/// Full row, password hash and reset-token state included. Never serialized;
/// anything that leaves the server goes through [`UserInfo`].
#[derive(Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = users)]
pub struct User {
    pub user_id: uuid::Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_password_hash: String,
    pub user_bio: Option<String>,
    pub user_avatar_url: Option<String>,
    pub user_reset_token: Option<uuid::Uuid>,
    pub user_reset_token_expires_at: Option<DateTime<Utc>>,
    pub user_created_at: DateTime<Utc>,
    pub user_updated_at: DateTime<Utc>,
}

#[derive(Clone, serde_derive::Serialize, serde_derive::Deserialize, Queryable, Selectable, ToSchema)]
#[diesel(table_name = users)]
pub struct UserInfo {
    pub user_id: uuid::Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_bio: Option<String>,
    pub user_avatar_url: Option<String>,
    pub user_created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            user_name: user.user_name,
            user_email: user.user_email,
            user_bio: user.user_bio,
            user_avatar_url: user.user_avatar_url,
            user_created_at: user.user_created_at,
        }
    }
}

/// The subset of author fields other entities embed next to their rows.
#[derive(Clone, serde_derive::Serialize, Queryable, Selectable, ToSchema)]
#[diesel(table_name = users)]
pub struct UserBadge {
    pub user_id: uuid::Uuid,
    pub user_name: String,
    pub user_avatar_url: Option<String>,
}

impl User {
    pub async fn insert_one<'a, 'conn>(
        conn: &'conn mut PooledConnection<'_, AsyncPgConnection>,
        user_name: &'a str,
        user_email: &'a str,
        user_password_hash: &'a str,
    ) -> Result<Uuid, CodeErrorResp> {
        let new_user = NewUser::new(user_name, user_email, user_password_hash);

        diesel::insert_into(users::table)
            .values(new_user)
            .returning(users::user_id)
            .get_result::<Uuid>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => code_err(CodeError::EMAIL_MUST_BE_UNIQUE, e),
                _ => code_err(CodeError::DB_INSERTION_ERROR, e),
            })
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'nu> {
    user_name: &'nu str,
    user_email: &'nu str,
    user_password_hash: &'nu str,
}

impl<'nu> NewUser<'nu> {
    pub fn new(user_name: &'nu str, user_email: &'nu str, user_password_hash: &'nu str) -> Self {
        Self {
            user_name,
            user_email,
            user_password_hash,
        }
    }
}

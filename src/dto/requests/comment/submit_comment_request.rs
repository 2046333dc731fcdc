use utoipa::ToSchema;
use uuid::Uuid;

#[derive(serde_derive::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCommentRequest {
    pub content: Option<String>,
    pub parent_comment_id: Option<Uuid>,
}

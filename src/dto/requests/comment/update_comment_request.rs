use utoipa::ToSchema;

#[derive(serde_derive::Deserialize, ToSchema)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

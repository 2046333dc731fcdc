use utoipa::ToSchema;

/// Shared by the post and comment like toggles.
#[derive(serde_derive::Serialize, ToSchema)]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub likes: i64,
}

/// Shared by the post and comment helpful toggles.
#[derive(serde_derive::Serialize, ToSchema)]
pub struct ToggleHelpfulResponse {
    pub helpful: bool,
    pub helpfuls: i64,
}

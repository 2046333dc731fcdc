use utoipa::ToSchema;

#[derive(serde_derive::Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

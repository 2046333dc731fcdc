use utoipa::ToSchema;

#[derive(serde_derive::Serialize, ToSchema)]
pub struct SavePostResponse {
    pub saved: bool,
}

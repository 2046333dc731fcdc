use utoipa::ToSchema;

#[derive(serde_derive::Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

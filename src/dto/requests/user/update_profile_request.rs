use utoipa::ToSchema;

/// Partial update; absent fields leave the stored value untouched.
#[derive(serde_derive::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

use utoipa::ToSchema;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// All fields optional so that missing ones surface as a 400 from the
/// handler's own validation instead of a deserialization rejection.
#[derive(serde_derive::Deserialize, Zeroize, ZeroizeOnDrop, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub reset_token: Option<String>,
    pub new_password: Option<String>,
}

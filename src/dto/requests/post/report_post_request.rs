use utoipa::ToSchema;

#[derive(serde_derive::Deserialize, ToSchema)]
pub struct ReportPostRequest {
    pub reason: Option<String>,
}

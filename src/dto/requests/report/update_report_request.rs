use utoipa::ToSchema;

#[derive(serde_derive::Deserialize, ToSchema)]
pub struct UpdateReportRequest {
    pub status: Option<String>,
}

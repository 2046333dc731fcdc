use chrono::{DateTime, Utc};
use diesel::{
    Insertable, Selectable,
    prelude::{Queryable, QueryableByName},
};
use utoipa::ToSchema;

use crate::schema::reports;

pub const REPORT_STATUS_PENDING: &str = "pending";
pub const REPORT_STATUS_RESOLVED: &str = "resolved";
pub const REPORT_STATUS_IGNORED: &str = "ignored";

#[derive(Clone, serde_derive::Serialize, Queryable, QueryableByName, Selectable, ToSchema)]
#[diesel(table_name = reports)]
pub struct Report {
    pub report_id: uuid::Uuid,
    pub post_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub report_reason: String,
    pub report_status: String,
    pub report_created_at: DateTime<Utc>,
    pub report_updated_at: DateTime<Utc>,
}

/// Status is stored as text; only these three values are ever written.
/// A second pending report per (user, post) is refused by a query-time
/// check at creation, deliberately not by a constraint, so moving a report
/// out of `pending` reopens reporting for that pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReportStatus {
    Pending,
    Resolved,
    Ignored,
}

impl ReportStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            REPORT_STATUS_PENDING => Some(Self::Pending),
            REPORT_STATUS_RESOLVED => Some(Self::Resolved),
            REPORT_STATUS_IGNORED => Some(Self::Ignored),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => REPORT_STATUS_PENDING,
            Self::Resolved => REPORT_STATUS_RESOLVED,
            Self::Ignored => REPORT_STATUS_IGNORED,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = reports)]
pub struct NewReport<'nr> {
    pub post_id: &'nr uuid::Uuid,
    pub user_id: &'nr uuid::Uuid,
    pub report_reason: &'nr str,
}

impl<'nr> NewReport<'nr> {
    pub fn new(post_id: &'nr uuid::Uuid, user_id: &'nr uuid::Uuid, report_reason: &'nr str) -> Self {
        Self {
            post_id,
            user_id,
            report_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_only_known_statuses() {
        assert_eq!(ReportStatus::parse("pending"), Some(ReportStatus::Pending));
        assert_eq!(ReportStatus::parse("resolved"), Some(ReportStatus::Resolved));
        assert_eq!(ReportStatus::parse("ignored"), Some(ReportStatus::Ignored));
        assert_eq!(ReportStatus::parse("Pending"), None);
        assert_eq!(ReportStatus::parse("dismissed"), None);
        assert_eq!(ReportStatus::parse(""), None);
    }

    #[test]
    fn as_str_round_trips() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::Resolved,
            ReportStatus::Ignored,
        ] {
            assert_eq!(ReportStatus::parse(status.as_str()), Some(status));
        }
    }
}

//! Admin-declared closed days

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of declared closure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClosedDayType {
    #[default]
    Holiday,
    Maintenance,
    Personal,
}

impl ClosedDayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosedDayType::Holiday => "holiday",
            ClosedDayType::Maintenance => "maintenance",
            ClosedDayType::Personal => "personal",
        }
    }
}

impl FromStr for ClosedDayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "holiday" => Ok(ClosedDayType::Holiday),
            "maintenance" => Ok(ClosedDayType::Maintenance),
            "personal" => Ok(ClosedDayType::Personal),
            other => Err(format!("Unknown closed day type: {}", other)),
        }
    }
}

impl std::fmt::Display for ClosedDayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A day on which the studio does not accept bookings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosedDay {
    pub id: Uuid,
    pub date: NaiveDate,
    pub reason: Option<String>,
    #[serde(rename = "type")]
    pub closure_type: ClosedDayType,
    pub created_at: DateTime<Utc>,
}

/// Create closed day request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateClosedDay {
    /// Date (YYYY-MM-DD); a time-of-day suffix is ignored
    pub date: String,
    pub reason: Option<String>,
    /// holiday | maintenance | personal (defaults to holiday)
    #[serde(rename = "type")]
    pub closure_type: Option<String>,
}

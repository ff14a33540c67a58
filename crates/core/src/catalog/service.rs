use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ValidationError;

pub type ServiceId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceCategory {
    DailyAarti,
    SpecialPooja,
    GrandCeremony,
    Seva,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::DailyAarti,
        ServiceCategory::SpecialPooja,
        ServiceCategory::GrandCeremony,
        ServiceCategory::Seva,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::DailyAarti => "DAILY_AARTI",
            ServiceCategory::SpecialPooja => "SPECIAL_POOJA",
            ServiceCategory::GrandCeremony => "GRAND_CEREMONY",
            ServiceCategory::Seva => "SEVA",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidCategory {
                value: s.to_string(),
            })
    }
}

/// A bookable temple service (aarti, pooja, ceremony, seva).
/// Maps to the `services` PostgreSQL table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub name_en: String,
    pub name_hi: Option<String>,
    pub description_en: String,
    pub description_hi: Option<String>,
    pub category: ServiceCategory,
    pub price: f64,
    /// Minutes.
    pub duration: u32,
    pub image_url: Option<String>,
    pub benefits_en: Vec<String>,
    pub benefits_hi: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

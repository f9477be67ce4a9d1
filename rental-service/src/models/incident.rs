use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Priority, UnknownVariant};

/// Minimum description length for a reported incident.
pub const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    #[serde(alias = "abierta")]
    Open,
    #[serde(alias = "asignada")]
    Assigned,
    #[serde(alias = "resuelta")]
    Resolved,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::Resolved => "resolved",
        }
    }
}

impl TryFrom<String> for IncidentStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "open" => Ok(Self::Open),
            "assigned" => Ok(Self::Assigned),
            "resolved" => Ok(Self::Resolved),
            _ => Err(UnknownVariant(value)),
        }
    }
}

/// Maintenance incident reported by a tenant.
#[derive(Debug, Clone)]
pub struct Incident {
    pub id: i64,
    pub tenant_id: i64,
    pub description: String,
    pub status: IncidentStatus,
    pub priority: Priority,
    pub provider_id: Option<i64>,
    pub resolved_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewIncident {
    pub tenant_id: i64,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default)]
pub struct IncidentChanges {
    pub status: Option<IncidentStatus>,
    pub priority: Option<Priority>,
    pub provider_id: Option<i64>,
}

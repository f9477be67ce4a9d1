use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UnknownVariant;

/// Priority shared by incidents and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "alta")]
    High,
    #[default]
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "baja")]
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(UnknownVariant(value)),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Priority, UnknownVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    PaymentReminder,
    PaymentReceived,
    IncidentUpdate,
    Contract,
    #[default]
    General,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentReminder => "payment_reminder",
            Self::PaymentReceived => "payment_received",
            Self::IncidentUpdate => "incident_update",
            Self::Contract => "contract",
            Self::General => "general",
        }
    }
}

impl TryFrom<String> for NotificationType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "payment_reminder" => Ok(Self::PaymentReminder),
            "payment_received" => Ok(Self::PaymentReceived),
            "incident_update" => Ok(Self::IncidentUpdate),
            "contract" => Ok(Self::Contract),
            "general" => Ok(Self::General),
            _ => Err(UnknownVariant(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unread,
    Read,
    Archived,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Archived => "archived",
        }
    }
}

impl TryFrom<String> for NotificationStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            "archived" => Ok(Self::Archived),
            _ => Err(UnknownVariant(value)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub priority: Priority,
    pub status: NotificationStatus,
    pub read_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub priority: Priority,
}
